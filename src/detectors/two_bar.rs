//! Two-bar candlestick pattern detectors
//!
//! Bullish and Bearish Engulfing. The current body must strictly engulf the
//! previous body on both ends.

#![allow(clippy::default_constructed_unit_structs)]

use crate::{
    patterns::{PatternDetector, PatternKind, PatternMatch},
    OHLCVExt, OHLCV,
};

impl_with_defaults!(BullishEngulfingDetector, BearishEngulfingDetector);

// ============================================================
// ENGULFING PATTERNS
// ============================================================

/// Bullish Engulfing: bullish candle swallows a bearish one
#[derive(Debug, Clone, Copy, Default)]
pub struct BullishEngulfingDetector;

impl PatternDetector for BullishEngulfingDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::EngulfingBullish
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
        let prev = bars.get(index.checked_sub(1)?)?;
        let curr = bars.get(index)?;

        if !(prev.is_bearish() && curr.is_bullish()) {
            return None;
        }
        if !(curr.open() < prev.close() && curr.close() > prev.open()) {
            return None;
        }

        Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
    }
}

/// Bearish Engulfing: bearish candle swallows a bullish one
#[derive(Debug, Clone, Copy, Default)]
pub struct BearishEngulfingDetector;

impl PatternDetector for BearishEngulfingDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::EngulfingBearish
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
        let prev = bars.get(index.checked_sub(1)?)?;
        let curr = bars.get(index)?;

        if !(prev.is_bullish() && curr.is_bearish()) {
            return None;
        }
        if !(curr.open() > prev.close() && curr.close() < prev.open()) {
            return None;
        }

        Some(PatternMatch::at(bars, index, PatternDetector::kind(self)))
    }
}
