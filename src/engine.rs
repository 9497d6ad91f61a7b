//! Analysis engine
//!
//! [`EngineBuilder`] collects configuration, [`Engine`] runs the pipeline:
//! validation, indicators, support/resistance, patterns, trend. The engine
//! holds only its configuration, so one instance can be shared across
//! threads and every call is reproducible from its input alone.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    config::{
        AtrConfig, BollingerConfig, EngineConfig, MacdConfig, PatternConfig, RsiConfig,
        SupportResistanceConfig, TrendConfig, VolumeConfig,
    },
    indicators::{self, Bollinger, Macd, Series},
    levels,
    patterns::{PatternReport, PatternScanner},
    trend::{self, TrendAnalysis},
    validate_series, Computed, Period, Result, TaError, OHLCV,
};

// ============================================================
// SNAPSHOT
// ============================================================

/// Everything derived from one candle series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalSnapshot {
    /// Number of candles analysed
    pub candles: usize,
    pub last_close: Option<f64>,

    pub moving_averages: BTreeMap<usize, Computed<Series>>,
    pub macd: Computed<Macd>,
    pub rsi: Computed<Series>,
    pub bollinger: Computed<Bollinger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr: Option<Computed<Series>>,
    pub volume_ma: Computed<Series>,

    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,

    pub patterns: PatternReport,
    pub trend: Computed<TrendAnalysis>,
}

// ============================================================
// ENGINE
// ============================================================

/// Immutable, thread-safe analysis engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    scanner: PatternScanner,
    validate_data: bool,
}

impl Engine {
    /// Engine with the default configuration
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        Self {
            scanner: PatternScanner::from_config(&config.patterns),
            config,
            validate_data: true,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reject non-finite values and non-increasing timestamps.
    pub fn validate_candles<T: OHLCV>(&self, candles: &[T]) -> Result<()> {
        validate_series(candles)
    }

    /// Produce a fresh snapshot for `candles`.
    ///
    /// Only malformed input is an error. A series too short for some
    /// indicator yields [`Computed::InsufficientData`] for that field.
    pub fn analyze<T: OHLCV>(&self, candles: &[T]) -> Result<TechnicalSnapshot> {
        if self.validate_data {
            self.validate_candles(candles)?;
        }

        let n = candles.len();
        let last_close = candles.last().map(OHLCV::close);
        debug!(candles = n, "analysing series");

        let indicators = indicators::compute(candles, &self.config.indicators);
        let levels = levels::locate(candles, &self.config.support_resistance);

        let patterns = self.scanner.scan(candles);
        debug!(matches = patterns.len(), "patterns scanned");

        let trend = trend::synthesize(
            n,
            last_close,
            &indicators,
            &self.config.indicators.rsi,
            &self.config.trend,
        );
        match trend.ready() {
            Some(analysis) => debug!(trend = ?analysis.trend, "trend synthesized"),
            None => warn!(
                candles = n,
                required = self.config.trend.min_candles.get(),
                "series too short for a trend verdict"
            ),
        }

        Ok(TechnicalSnapshot {
            candles: n,
            last_close,
            moving_averages: indicators.moving_averages,
            macd: indicators.macd,
            rsi: indicators.rsi,
            bollinger: indicators.bollinger,
            atr: indicators.atr,
            volume_ma: indicators.volume_ma,
            support_levels: levels.support,
            resistance_levels: levels.resistance,
            patterns,
            trend,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating Engine instances
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    config: EngineConfig,
    validate_data: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            validate_data: true,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Moving average periods, in any order. A repeated period fails `build`.
    pub fn ma_periods(mut self, periods: impl IntoIterator<Item = Period>) -> Self {
        self.config.indicators.ma.periods = periods.into_iter().collect();
        self
    }

    pub fn macd(mut self, macd: MacdConfig) -> Self {
        self.config.indicators.macd = macd;
        self
    }

    pub fn rsi(mut self, rsi: RsiConfig) -> Self {
        self.config.indicators.rsi = rsi;
        self
    }

    pub fn bollinger(mut self, bollinger: BollingerConfig) -> Self {
        self.config.indicators.bollinger = bollinger;
        self
    }

    /// `None` disables ATR
    pub fn atr(mut self, atr: Option<AtrConfig>) -> Self {
        self.config.indicators.atr = atr;
        self
    }

    pub fn volume(mut self, volume: VolumeConfig) -> Self {
        self.config.indicators.volume = volume;
        self
    }

    pub fn support_resistance(mut self, config: SupportResistanceConfig) -> Self {
        self.config.support_resistance = config;
        self
    }

    pub fn patterns(mut self, config: PatternConfig) -> Self {
        self.config.patterns = config;
        self
    }

    pub fn trend(mut self, config: TrendConfig) -> Self {
        self.config.trend = config;
        self
    }

    /// Enable/disable input validation in [`Engine::analyze`]
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.validate_data = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;
        Ok(Engine {
            scanner: PatternScanner::from_config(&self.config.patterns),
            config: self.config,
            validate_data: self.validate_data,
        })
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

/// Snapshot of a single instrument
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub snapshot: TechnicalSnapshot,
}

/// Error from analysing a single instrument
#[derive(Debug, Clone)]
pub struct InstrumentError {
    pub symbol: String,
    pub error: TaError,
}

/// Analyse many instruments in parallel
pub fn analyze_parallel<'a, T, I>(
    engine: &Engine,
    instruments: I,
) -> (Vec<InstrumentSnapshot>, Vec<InstrumentError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, candles)| {
            engine
                .analyze(candles)
                .map(|snapshot| InstrumentSnapshot {
                    symbol: symbol.to_string(),
                    snapshot,
                })
                .map_err(|error| InstrumentError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(s) => successes.push(s),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
