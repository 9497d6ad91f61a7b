//! Three-bar candlestick pattern detectors
//!
//! Morning Star, Evening Star, Three White Soldiers, Three Black Crows.

#![allow(clippy::default_constructed_unit_structs)]

use super::helpers::{self, is_star_body, within};
use crate::{
  patterns::{PatternDetector, PatternKind, PatternMatch},
  OHLCVExt, OHLCV,
};

impl_with_defaults!(
  MorningStarDetector,
  EveningStarDetector,
  ThreeWhiteSoldiersDetector,
  ThreeBlackCrowsDetector,
);

/// The three candles ending at `index`, oldest first.
#[inline]
fn trio<T>(bars: &[T], index: usize) -> Option<(&T, &T, &T)> {
  let start = index.checked_sub(2)?;
  Some((bars.get(start)?, bars.get(start + 1)?, bars.get(index)?))
}

// ============================================================
// MORNING STAR / EVENING STAR
// ============================================================

/// Morning Star: bearish candle, small star, bullish recovery past the first midpoint
#[derive(Debug, Clone)]
pub struct MorningStarDetector {
  pub star_body_ratio: f64,
}

impl Default for MorningStarDetector {
  fn default() -> Self {
    Self { star_body_ratio: helpers::STAR_BODY_RATIO }
  }
}

impl PatternDetector for MorningStarDetector {
  fn kind(&self) -> PatternKind {
    PatternKind::MorningStar
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
    let (first, star, last) = trio(bars, index)?;

    if !first.is_bearish() || !last.is_bullish() {
      return None;
    }
    if !is_star_body(star.body(), first.body(), self.star_body_ratio) {
      return None;
    }
    // Recovery must reach the midpoint of the first body
    if last.close() < first.body_midpoint() {
      return None;
    }

    Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
  }
}

/// Evening Star: bullish candle, small star, bearish drop past the first midpoint
#[derive(Debug, Clone)]
pub struct EveningStarDetector {
  pub star_body_ratio: f64,
}

impl Default for EveningStarDetector {
  fn default() -> Self {
    Self { star_body_ratio: helpers::STAR_BODY_RATIO }
  }
}

impl PatternDetector for EveningStarDetector {
  fn kind(&self) -> PatternKind {
    PatternKind::EveningStar
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
    let (first, star, last) = trio(bars, index)?;

    if !first.is_bullish() || !last.is_bearish() {
      return None;
    }
    if !is_star_body(star.body(), first.body(), self.star_body_ratio) {
      return None;
    }
    if last.close() > first.body_midpoint() {
      return None;
    }

    Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
  }
}

// ============================================================
// THREE WHITE SOLDIERS / THREE BLACK CROWS
// ============================================================

/// Three White Soldiers: three rising bullish candles, each opening inside the previous body
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeWhiteSoldiersDetector;

impl PatternDetector for ThreeWhiteSoldiersDetector {
  fn kind(&self) -> PatternKind {
    PatternKind::ThreeWhiteSoldiers
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
    let (first, second, third) = trio(bars, index)?;

    if !first.is_bullish() || !second.is_bullish() || !third.is_bullish() {
      return None;
    }
    // Ascending closes
    if second.close() <= first.close() || third.close() <= second.close() {
      return None;
    }
    // Opens within the previous body
    if !within(second.open(), first.open(), first.close())
      || !within(third.open(), second.open(), second.close())
    {
      return None;
    }

    Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
  }
}

/// Three Black Crows: three falling bearish candles, each opening inside the previous body
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeBlackCrowsDetector;

impl PatternDetector for ThreeBlackCrowsDetector {
  fn kind(&self) -> PatternKind {
    PatternKind::ThreeBlackCrows
  }

  fn min_bars(&self) -> usize {
    3
  }

  fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
    let (first, second, third) = trio(bars, index)?;

    if !first.is_bearish() || !second.is_bearish() || !third.is_bearish() {
      return None;
    }
    // Descending closes
    if second.close() >= first.close() || third.close() >= second.close() {
      return None;
    }
    if !within(second.open(), first.close(), first.open())
      || !within(third.open(), second.close(), second.open())
    {
      return None;
    }

    Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
  }
}
