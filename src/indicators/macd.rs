//! MACD (DIF / DEA / histogram)

use super::{moving_average::ema, Macd};
use crate::config::MacdConfig;

/// `DIF = EMA(fast) - EMA(slow)`, `DEA = EMA(DIF, signal)`,
/// `HIST = (DIF - DEA) * 2`. Every index is defined.
pub fn macd(closes: &[f64], config: &MacdConfig) -> Macd {
    let fast = ema(closes, config.fast.get());
    let slow = ema(closes, config.slow.get());

    let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let dea = ema(&dif, config.signal.get());
    let hist = dif.iter().zip(&dea).map(|(d, e)| Some((d - e) * 2.0)).collect();

    Macd {
        dif: dif.into_iter().map(Some).collect(),
        dea: dea.into_iter().map(Some).collect(),
        hist,
    }
}
