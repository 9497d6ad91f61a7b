//! Momentum indicators

use super::Series;

/// Relative Strength Index over simple trailing means of gains and losses.
///
/// The first candle has no previous close, so its move counts as zero and
/// the first defined value sits at `period - 1`. A window with no losses
/// reads 100; a window with neither gains nor losses is undefined.
pub fn rsi(closes: &[f64], period: usize) -> Series {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    // deltas[k] is the move into close[k]
    let deltas: Vec<f64> = std::iter::once(0.0)
        .chain(closes.windows(2).map(|w| w[1] - w[0]))
        .collect();

    for (start, window) in deltas.windows(period).enumerate() {
        let (gain, loss) = window.iter().fold((0.0, 0.0), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });
        let avg_gain = gain / period as f64;
        let avg_loss = loss / period as f64;

        out[start + period - 1] = rsi_value(avg_gain, avg_loss);
    }
    out
}

#[inline]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}
