//! Trend synthesis
//!
//! Folds the latest indicator readings into discrete signals and one
//! composite [`Direction`]:
//!
//! | Signal | Rule |
//! |---|---|
//! | MA alignment | each shorter MA at or above the next longer one |
//! | MACD | golden/death cross on the last step, else DIF vs DEA |
//! | RSI | above overbought / below oversold / normal |
//! | Bollinger | close above upper / below lower / middle |
//!
//! Composite: bullish when aligned and MACD is bullish-ish, bearish when not
//! aligned and MACD is bearish-ish, neutral otherwise.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    config::{RsiConfig, TrendConfig},
    index_from_end,
    indicators::{latest, IndicatorSet, Macd},
    Computed, Direction,
};

// ============================================================
// SIGNALS
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdSignal {
    GoldenCross,
    DeathCross,
    Bullish,
    Bearish,
}

impl MacdSignal {
    /// Golden cross or DIF above DEA
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, MacdSignal::GoldenCross | MacdSignal::Bullish)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BollingerPosition {
    AboveUpper,
    BelowLower,
    Middle,
}

/// Trend verdict for the newest candle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub ma_alignment: bool,
    /// Latest moving average per period; `None` while the window is filling
    pub latest_ma: BTreeMap<usize, Option<f64>>,
    pub macd_signal: MacdSignal,
    pub rsi: Option<f64>,
    pub rsi_signal: RsiSignal,
    pub bollinger_position: BollingerPosition,
    pub trend: Direction,
}

// ============================================================
// RULES
// ============================================================

/// True when every shorter-period MA is at or above the next longer one.
///
/// Periods are visited in ascending order. A pair with an undefined side is
/// skipped rather than breaking the alignment.
pub fn ma_alignment(latest_ma: &BTreeMap<usize, Option<f64>>) -> bool {
    let values: Vec<Option<f64>> = latest_ma.values().copied().collect();
    values.windows(2).all(|pair| match (pair[0], pair[1]) {
        (Some(shorter), Some(longer)) => shorter >= longer,
        _ => true,
    })
}

/// Classify the last MACD step. `prev` and `curr` are `(DIF, DEA)` pairs.
///
/// Without a current pair nothing is above anything and the reading is
/// bearish.
pub fn macd_signal(prev: Option<(f64, f64)>, curr: Option<(f64, f64)>) -> MacdSignal {
    let Some((dif, dea)) = curr else {
        return MacdSignal::Bearish;
    };

    if let Some((prev_dif, prev_dea)) = prev {
        if prev_dif <= prev_dea && dif > dea {
            return MacdSignal::GoldenCross;
        }
        if prev_dif >= prev_dea && dif < dea {
            return MacdSignal::DeathCross;
        }
    }

    if dif > dea {
        MacdSignal::Bullish
    } else {
        MacdSignal::Bearish
    }
}

pub fn rsi_signal(rsi: Option<f64>, thresholds: &RsiConfig) -> RsiSignal {
    match rsi {
        Some(v) if v > thresholds.overbought => RsiSignal::Overbought,
        Some(v) if v < thresholds.oversold => RsiSignal::Oversold,
        _ => RsiSignal::Normal,
    }
}

pub fn bollinger_position(
    close: Option<f64>,
    upper: Option<f64>,
    lower: Option<f64>,
) -> BollingerPosition {
    match (close, upper, lower) {
        (Some(c), Some(u), _) if c > u => BollingerPosition::AboveUpper,
        (Some(c), _, Some(l)) if c < l => BollingerPosition::BelowLower,
        _ => BollingerPosition::Middle,
    }
}

pub fn composite(ma_alignment: bool, macd: MacdSignal) -> Direction {
    match (ma_alignment, macd.is_bullish()) {
        (true, true) => Direction::Bullish,
        (false, false) => Direction::Bearish,
        _ => Direction::Neutral,
    }
}

// ============================================================
// SYNTHESIS
// ============================================================

/// `(DIF, DEA)` at `offset` steps back from the newest value.
fn macd_pair(macd: &Macd, offset: usize) -> Option<(f64, f64)> {
    let i = index_from_end(macd.dif.len(), offset)?;
    Some((macd.dif[i]?, (*macd.dea.get(i)?)?))
}

#[inline]
fn last_of(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Build the trend verdict, or report that `available` candles are fewer
/// than `config.min_candles`.
pub fn synthesize(
    available: usize,
    last_close: Option<f64>,
    indicators: &IndicatorSet,
    thresholds: &RsiConfig,
    config: &TrendConfig,
) -> Computed<TrendAnalysis> {
    Computed::require(config.min_candles.get(), available, || {
        let latest_ma: BTreeMap<usize, Option<f64>> = indicators
            .moving_averages
            .iter()
            .map(|(&period, series)| (period, latest(series)))
            .collect();
        let ma_alignment = ma_alignment(&latest_ma);

        let macd_signal = match indicators.macd.ready() {
            Some(macd) => macd_signal(macd_pair(macd, 1), macd_pair(macd, 0)),
            None => macd_signal(None, None),
        };

        let rsi = latest(&indicators.rsi);
        let rsi_signal = rsi_signal(rsi, thresholds);

        let bollinger_position = match indicators.bollinger.ready() {
            Some(bands) => {
                bollinger_position(last_close, last_of(&bands.upper), last_of(&bands.lower))
            }
            None => BollingerPosition::Middle,
        };

        TrendAnalysis {
            ma_alignment,
            latest_ma,
            macd_signal,
            rsi,
            rsi_signal,
            bollinger_position,
            trend: composite(ma_alignment, macd_signal),
        }
    })
}

// ============================================================
// TESTS
// ============================================================
