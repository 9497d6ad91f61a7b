//! Technical indicators over a candle series
//!
//! Every output is a [`Series`] aligned one-to-one with the input candles,
//! with `None` wherever the indicator's window is not yet full.
//!
//! # Indicator Categories
//!
//! - **Trend**: SMA, EMA, MACD
//! - **Momentum**: RSI
//! - **Volatility**: Bollinger Bands, ATR
//! - **Volume**: volume moving average

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{config::IndicatorConfig, Computed, OHLCV};

pub mod macd;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use macd::macd;
pub use momentum::rsi;
pub use moving_average::{ema, sma};
pub use volatility::{atr, bollinger, true_range};

/// Indicator values aligned with the candles; `None` means undefined
pub type Series = Vec<Option<f64>>;

/// MACD lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Macd {
    pub dif: Series,
    pub dea: Series,
    pub hist: Series,
}

/// Bollinger Bands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bollinger {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Everything the indicator stage produces for one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    /// Keyed by period
    pub moving_averages: BTreeMap<usize, Computed<Series>>,
    pub macd: Computed<Macd>,
    pub rsi: Computed<Series>,
    pub bollinger: Computed<Bollinger>,
    /// `None` when ATR is disabled in the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<Computed<Series>>,
    pub volume_ma: Computed<Series>,
}

/// Compute every configured indicator.
///
/// Each field is gated on its own window: a series too short for RSI still
/// gets its short moving averages.
pub fn compute<T: OHLCV>(candles: &[T], config: &IndicatorConfig) -> IndicatorSet {
    let n = candles.len();
    let closes: Vec<f64> = candles.iter().map(OHLCV::close).collect();

    let moving_averages = config
        .ma
        .periods
        .iter()
        .map(|p| {
            let period = p.get();
            (period, Computed::require(period, n, || sma(&closes, period)))
        })
        .collect();

    let macd = Computed::require(1, n, || macd::macd(&closes, &config.macd));

    let rsi_period = config.rsi.period.get();
    let rsi = Computed::require(rsi_period, n, || momentum::rsi(&closes, rsi_period));

    let bb_period = config.bollinger.period.get();
    let bollinger = Computed::require(bb_period, n, || {
        volatility::bollinger(&closes, bb_period, config.bollinger.std_dev)
    });

    let atr = config.atr.as_ref().map(|cfg| {
        let period = cfg.period.get();
        Computed::require(period, n, || volatility::atr(candles, period))
    });

    let vol_period = config.volume.period.get();
    let volume_ma = Computed::require(vol_period, n, || {
        let volumes: Vec<f64> = candles.iter().map(OHLCV::volume).collect();
        sma(&volumes, vol_period)
    });

    debug!(
        candles = n,
        moving_averages = config.ma.periods.len(),
        rsi_ready = rsi.is_ready(),
        bollinger_ready = bollinger.is_ready(),
        "indicators computed"
    );

    IndicatorSet {
        moving_averages,
        macd,
        rsi,
        bollinger,
        atr,
        volume_ma,
    }
}

/// Value at the newest index of a computed series, if both exist.
#[inline]
pub fn latest(series: &Computed<Series>) -> Option<f64> {
    series.ready().and_then(|s| s.last().copied().flatten())
}

// ============================================================
// TESTS
// ============================================================
