//! Simple and exponential moving averages

use super::Series;

/// Trailing mean over `period` values.
///
/// The first `period - 1` entries are `None`. Each window is summed afresh so
/// the result is exactly the arithmetic mean of its slice, with no drift
/// carried over from earlier windows.
pub fn sma(values: &[f64], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    for (end, window) in values.windows(period).enumerate() {
        out[end + period - 1] = Some(mean(window));
    }
    out
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with the
/// first value. Defined at every index.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    let Some((&first, rest)) = values.split_first() else {
        return out;
    };

    let mut prev = first;
    out.push(prev);
    for &value in rest {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

#[inline]
pub(crate) fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
