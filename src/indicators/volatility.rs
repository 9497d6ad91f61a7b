//! Volatility indicators: Bollinger Bands and ATR

use super::{
    moving_average::{mean, sma},
    Bollinger, Series,
};
use crate::OHLCV;

/// Bollinger Bands around a `period` SMA, `std_dev` sample deviations wide.
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> Bollinger {
    let len = closes.len();
    let mut bands = Bollinger {
        upper: vec![None; len],
        middle: vec![None; len],
        lower: vec![None; len],
    };
    // sample deviation needs two points
    if period < 2 {
        return bands;
    }

    for (start, window) in closes.windows(period).enumerate() {
        let end = start + period - 1;
        let middle = mean(window);
        let variance =
            window.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / (period - 1) as f64;
        let width = std_dev * variance.sqrt();

        bands.upper[end] = Some(middle + width);
        bands.middle[end] = Some(middle);
        bands.lower[end] = Some(middle - width);
    }
    bands
}

/// True range per candle. The first candle has no previous close and uses
/// its own high-low span.
pub fn true_range<T: OHLCV>(candles: &[T]) -> Vec<f64> {
    let mut prev_close: Option<f64> = None;
    candles
        .iter()
        .map(|c| {
            let span = c.high() - c.low();
            let tr = match prev_close {
                Some(pc) => span.max((c.high() - pc).abs()).max((c.low() - pc).abs()),
                None => span,
            };
            prev_close = Some(c.close());
            tr
        })
        .collect()
}

/// Average True Range as a simple trailing mean of the true range.
pub fn atr<T: OHLCV>(candles: &[T], period: usize) -> Series {
    sma(&true_range(candles), period)
}
