//! Support and resistance levels
//!
//! Swing highs and lows are collected from the trailing window, then merged
//! greedily: candidates are visited from highest to lowest and a candidate
//! survives only if it sits at least `proximity` (relative) away from every
//! level already kept. The first level of a cluster wins.

use serde::Serialize;
use tracing::debug;

use crate::{config::SupportResistanceConfig, OHLCV};

/// Price levels derived from swing points, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportResistance {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

/// Locate levels over the newest `lookback` candles.
pub fn locate<T: OHLCV>(candles: &[T], config: &SupportResistanceConfig) -> SupportResistance {
    let start = candles.len().saturating_sub(config.lookback.get());
    let window = &candles[start..];

    let (highs, lows) = swing_points(window, config.swing_points.get());
    let proximity = config.proximity.get();

    let levels = SupportResistance {
        support: cluster_levels(lows, proximity),
        resistance: cluster_levels(highs, proximity),
    };

    debug!(
        window = window.len(),
        support = levels.support.len(),
        resistance = levels.resistance.len(),
        "support/resistance located"
    );
    levels
}

/// Swing highs and lows, in candle order.
///
/// A candle is a swing high when its high is at least every other high
/// within `swing` candles on either side (swing low symmetric). Only candles
/// with a complete neighbourhood qualify, and ties all register.
pub fn swing_points<T: OHLCV>(candles: &[T], swing: usize) -> (Vec<f64>, Vec<f64>) {
    let mut highs = Vec::new();
    let mut lows = Vec::new();

    let width = 2 * swing + 1;
    if candles.len() < width {
        return (highs, lows);
    }

    for (start, neighbourhood) in candles.windows(width).enumerate() {
        let center = &candles[start + swing];
        let (high, low) = (center.high(), center.low());

        if neighbourhood.iter().all(|c| high >= c.high()) {
            highs.push(high);
        }
        if neighbourhood.iter().all(|c| low <= c.low()) {
            lows.push(low);
        }
    }

    (highs, lows)
}

/// Greedy single-pass proximity merge, descending.
pub fn cluster_levels(mut values: Vec<f64>, proximity: f64) -> Vec<f64> {
    values.sort_by(|a, b| b.total_cmp(a));

    let mut kept: Vec<f64> = Vec::with_capacity(values.len());
    for value in values {
        if kept.iter().all(|&level| relative_gap(value, level) >= proximity) {
            kept.push(value);
        }
    }
    kept
}

#[inline]
fn relative_gap(value: f64, level: f64) -> f64 {
    if level == 0.0 {
        return if value == 0.0 { 0.0 } else { f64::INFINITY };
    }
    (value - level).abs() / level.abs()
}

// ============================================================
// TESTS
// ============================================================
