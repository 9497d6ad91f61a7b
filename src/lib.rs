//! # kline-ta - technical snapshot engine for candlestick series
//!
//! Turns an OHLCV series into a [`TechnicalSnapshot`]: moving averages, MACD,
//! RSI, Bollinger Bands, ATR, support/resistance levels, candlestick patterns
//! and a composite trend verdict.
//!
//! ## Quick Start
//!
//! ```rust
//! use kline_ta::prelude::*;
//!
//! // Any type implementing OHLCV works; Candle is the bundled one.
//! let candles: Vec<Candle> = (0..40)
//!     .map(|i| {
//!         let p = 100.0 + i as f64;
//!         Candle::new(i as i64 * 60, p, p + 1.5, p - 1.0, p + 0.8, 1_000.0)
//!     })
//!     .collect();
//!
//! let engine = EngineBuilder::new().build().unwrap();
//! let snapshot = engine.analyze(&candles).unwrap();
//!
//! assert!(snapshot.trend.is_ready());
//! assert!(snapshot.moving_averages[&5].is_ready());
//! ```

pub mod config;
pub mod detectors;
pub mod engine;
pub mod indicators;
pub mod levels;
pub mod params;
pub mod patterns;
pub mod trend;

pub use engine::TechnicalSnapshot;

pub mod prelude {
    pub use crate::{
        // Engine
        engine::{
            analyze_parallel, Engine, EngineBuilder, InstrumentError, InstrumentSnapshot,
            TechnicalSnapshot,
        },
        // Configuration
        config::{
            AtrConfig, BollingerConfig, EngineConfig, IndicatorConfig, MaConfig, MacdConfig,
            PatternConfig, RsiConfig, SupportResistanceConfig, TrendConfig, VolumeConfig,
        },
        params::{ParamMeta, ParamType, Tunable},
        // Components
        indicators::{Bollinger, IndicatorSet, Macd, Series},
        levels::SupportResistance,
        patterns::{
            BuiltinDetector, PatternDetector, PatternKind, PatternMatch, PatternReport,
            PatternScanner,
        },
        trend::{BollingerPosition, MacdSignal, RsiSignal, TrendAnalysis},
        // Detectors
        detectors::*,
        // Types
        index_from_end,
        validate_series,
        Candle,
        CandleRecord,
        Computed,
        Direction,
        OHLCVExt,
        Period,
        Ratio,
        // Errors
        Result,
        TaError,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, TaError>;

/// Errors returned by configuration, validation and analysis
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} candles, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Candle {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Invalid candle at index {index}: `{field}` {reason}")]
    InvalidCandle {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },

    #[error("Timestamps must be strictly increasing (violated at index {index})")]
    UnorderedTimestamps { index: usize },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(TaError::InvalidValue("Ratio cannot be NaN or infinite"));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(TaError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Window length in candles (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(TaError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed candle geometry
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Midpoint of the real body
    #[inline]
    fn body_midpoint(&self) -> f64 {
        (self.open() + self.close()) / 2.0
    }

    /// Body as ratio of range. Returns None for a zero-range candle
    #[inline]
    fn body_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range != 0.0).then(|| self.body() / range)
    }

    /// Reject NaN and infinite fields, naming the first offending one.
    ///
    /// Geometry (`low <= open/close <= high`) is not checked.
    fn validate(&self) -> Result<()> {
        let fields = [
            ("open", self.open()),
            ("high", self.high()),
            ("low", self.low()),
            ("close", self.close()),
            ("volume", self.volume()),
        ];
        for (field, value) in fields {
            if value.is_nan() {
                return Err(TaError::InvalidCandle {
                    index: 0,
                    field,
                    reason: "is NaN",
                });
            }
            if value.is_infinite() {
                return Err(TaError::InvalidCandle {
                    index: 0,
                    field,
                    reason: "is infinite",
                });
            }
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// Validate a whole series: finite fields on every candle and strictly
/// increasing timestamps wherever both neighbours carry one.
pub fn validate_series<T: OHLCV>(candles: &[T]) -> Result<()> {
    for (i, candle) in candles.iter().enumerate() {
        candle.validate().map_err(|e| match e {
            TaError::InvalidCandle { field, reason, .. } => TaError::InvalidCandle {
                index: i,
                field,
                reason,
            },
            other => other,
        })?;
    }

    for (i, pair) in candles.windows(2).enumerate() {
        if let (Some(prev), Some(curr)) = (pair[0].timestamp(), pair[1].timestamp()) {
            if curr <= prev {
                return Err(TaError::UnorderedTimestamps { index: i + 1 });
            }
        }
    }

    Ok(())
}

/// Zero-based index of the candle `offset` steps back from the newest one.
///
/// `index_from_end(len, 0)` is the newest candle. Returns `None` instead of
/// wrapping when the series is too short.
#[inline]
pub fn index_from_end(len: usize, offset: usize) -> Option<usize> {
    len.checked_sub(offset.checked_add(1)?)
}

// ============================================================
// CANDLES
// ============================================================

/// One time-bucketed price bar
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

/// Raw record as delivered by a market-data feed; any field may be absent
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandleRecord {
    pub timestamp: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    /// Missing volume is read as 0.0
    pub volume: Option<f64>,
}

impl CandleRecord {
    /// Convert one record, naming the first missing field.
    pub fn into_candle(self, index: usize) -> Result<Candle> {
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or(TaError::MissingField { index, field })
        };

        Ok(Candle {
            timestamp: self
                .timestamp
                .ok_or(TaError::MissingField { index, field: "timestamp" })?,
            open: require(self.open, "open")?,
            high: require(self.high, "high")?,
            low: require(self.low, "low")?,
            close: require(self.close, "close")?,
            volume: self.volume.unwrap_or(0.0),
        })
    }

    /// Convert a feed batch into a validated candle series.
    pub fn into_candles(records: impl IntoIterator<Item = CandleRecord>) -> Result<Vec<Candle>> {
        let candles = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_candle(i))
            .collect::<Result<Vec<_>>>()?;
        validate_series(&candles)?;
        Ok(candles)
    }
}

// ============================================================
// AVAILABILITY MARKER
// ============================================================

/// A value that is only produced when the series is long enough.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Computed<T> {
    Ready(T),
    InsufficientData { required: usize, available: usize },
}

impl<T> Computed<T> {
    /// Run `compute` only when `available >= required`.
    pub fn require(required: usize, available: usize, compute: impl FnOnce() -> T) -> Self {
        if available >= required {
            Computed::Ready(compute())
        } else {
            Computed::InsufficientData {
                required,
                available,
            }
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Computed::Ready(_))
    }

    #[inline]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Computed::Ready(value) => Some(value),
            Computed::InsufficientData { .. } => None,
        }
    }
}

// ============================================================
// DIRECTION
// ============================================================

/// Direction/bias of a verdict or pattern
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

// ============================================================
// TESTS
// ============================================================
