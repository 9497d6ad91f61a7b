//! Single-bar candlestick pattern detectors
//!
//! Doji, Hammer and Shooting Star. Each one only looks at the candle at
//! `index`; thresholds are relative to that candle's own body and range.

use super::helpers::{self, is_doji, is_pin_shape};
use crate::{
    patterns::{PatternDetector, PatternKind, PatternMatch},
    OHLCVExt, OHLCV,
};

impl_with_defaults!(DojiDetector, HammerDetector, ShootingStarDetector);

// ============================================================
// DOJI
// ============================================================

/// Doji: body is a small fraction of the high-low range
#[derive(Debug, Clone, Copy)]
pub struct DojiDetector {
    pub tolerance: f64,
}

impl Default for DojiDetector {
    fn default() -> Self {
        Self {
            tolerance: helpers::DOJI_TOLERANCE,
        }
    }
}

impl PatternDetector for DojiDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::Doji
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
        let bar = bars.get(index)?;

        if !is_doji(bar.body(), bar.range(), self.tolerance) {
            return None;
        }

        Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
    }
}

// ============================================================
// HAMMER FAMILY
// ============================================================

/// Hammer: long lower shadow, upper shadow shorter than the body
#[derive(Debug, Clone, Copy)]
pub struct HammerDetector {
    pub shadow_ratio: f64,
}

impl Default for HammerDetector {
    fn default() -> Self {
        Self {
            shadow_ratio: helpers::SHADOW_RATIO,
        }
    }
}

impl PatternDetector for HammerDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::Hammer
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
        let bar = bars.get(index)?;

        if !is_pin_shape(bar.lower_shadow(), bar.upper_shadow(), bar.body(), self.shadow_ratio) {
            return None;
        }

        Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
    }
}

/// Shooting Star: long upper shadow, lower shadow shorter than the body
#[derive(Debug, Clone, Copy)]
pub struct ShootingStarDetector {
    pub shadow_ratio: f64,
}

impl Default for ShootingStarDetector {
    fn default() -> Self {
        Self {
            shadow_ratio: helpers::SHADOW_RATIO,
        }
    }
}

impl PatternDetector for ShootingStarDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::ShootingStar
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
        let bar = bars.get(index)?;

        if !is_pin_shape(bar.upper_shadow(), bar.lower_shadow(), bar.body(), self.shadow_ratio) {
            return None;
        }

        Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
    }
}
