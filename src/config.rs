//! Engine configuration records
//!
//! Each indicator, the level locator, the pattern scanner and the trend
//! synthesizer gets its own typed record. All records implement `Default`
//! and deserialize with `#[serde(default)]`, so a partial document only
//! overrides the knobs it names:
//!
//! ```rust
//! use kline_ta::config::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(r#"{ "rsi": { "period": 9 } }"#).unwrap();
//! assert_eq!(config.indicators.rsi.period.get(), 9);
//! assert_eq!(config.indicators.rsi.overbought, 70.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    params::{ParamMeta, Tunable},
    Period, Ratio, Result, TaError,
};

// ============================================================
// INDICATORS
// ============================================================

/// Moving average periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaConfig {
    pub periods: Vec<Period>,
}

impl Default for MaConfig {
    fn default() -> Self {
        Self {
            periods: vec![
                Period::new_const(5),
                Period::new_const(10),
                Period::new_const(20),
                Period::new_const(60),
            ],
        }
    }
}

static MA_PARAMS: &[ParamMeta] = &[ParamMeta::period("period", 20.0, "Moving average window")];

impl Tunable for MaConfig {
    fn param_meta() -> &'static [ParamMeta] {
        MA_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        self.periods.iter().map(|p| ("period", p.get() as f64)).collect()
    }
}

/// MACD legs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast: Period,
    pub slow: Period,
    pub signal: Period,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: Period::new_const(12),
            slow: Period::new_const(26),
            signal: Period::new_const(9),
        }
    }
}

static MACD_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("fast", 12.0, "Fast EMA span"),
    ParamMeta::period("slow", 26.0, "Slow EMA span"),
    ParamMeta::period("signal", 9.0, "Signal (DEA) EMA span"),
];

impl Tunable for MacdConfig {
    fn param_meta() -> &'static [ParamMeta] {
        MACD_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("fast", self.fast.get() as f64),
            ("slow", self.slow.get() as f64),
            ("signal", self.signal.get() as f64),
        ]
    }
}

/// RSI window and signal thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub period: Period,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: Period::new_const(14),
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

static RSI_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("period", 14.0, "RSI averaging window"),
    ParamMeta::level("overbought", 70.0, "Overbought threshold"),
    ParamMeta::level("oversold", 30.0, "Oversold threshold"),
];

impl Tunable for RsiConfig {
    fn param_meta() -> &'static [ParamMeta] {
        RSI_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("period", self.period.get() as f64),
            ("overbought", self.overbought),
            ("oversold", self.oversold),
        ]
    }
}

/// Bollinger band window and width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: Period,
    /// Standard deviation multiplier `k`
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: Period::new_const(20),
            std_dev: 2.0,
        }
    }
}

static BOLLINGER_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("period", 20.0, "Band window"),
    ParamMeta::multiplier("std_dev", 2.0, "Standard deviation multiplier"),
];

impl Tunable for BollingerConfig {
    fn param_meta() -> &'static [ParamMeta] {
        BOLLINGER_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![("period", self.period.get() as f64), ("std_dev", self.std_dev)]
    }
}

/// Average true range window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtrConfig {
    pub period: Period,
}

impl Default for AtrConfig {
    fn default() -> Self {
        Self {
            period: Period::new_const(14),
        }
    }
}

static ATR_PARAMS: &[ParamMeta] = &[ParamMeta::period("period", 14.0, "True range averaging window")];

impl Tunable for AtrConfig {
    fn param_meta() -> &'static [ParamMeta] {
        ATR_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![("period", self.period.get() as f64)]
    }
}

/// Volume moving average window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub period: Period,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            period: Period::new_const(20),
        }
    }
}

static VOLUME_PARAMS: &[ParamMeta] = &[ParamMeta::period("period", 20.0, "Volume averaging window")];

impl Tunable for VolumeConfig {
    fn param_meta() -> &'static [ParamMeta] {
        VOLUME_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![("period", self.period.get() as f64)]
    }
}

/// All indicator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ma: MaConfig,
    pub macd: MacdConfig,
    pub rsi: RsiConfig,
    pub bollinger: BollingerConfig,
    /// `None` leaves ATR out of the snapshot
    pub atr: Option<AtrConfig>,
    pub volume: VolumeConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma: MaConfig::default(),
            macd: MacdConfig::default(),
            rsi: RsiConfig::default(),
            bollinger: BollingerConfig::default(),
            atr: Some(AtrConfig::default()),
            volume: VolumeConfig::default(),
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ma.periods.is_empty() {
            return Err(TaError::InvalidConfig(
                "at least one moving average period is required".to_string(),
            ));
        }
        self.ma.validate_params()?;
        let mut seen = std::collections::BTreeSet::new();
        if let Some(dup) = self.ma.periods.iter().find(|p| !seen.insert(p.get())) {
            return Err(TaError::InvalidConfig(format!(
                "duplicate moving average period {}",
                dup.get()
            )));
        }

        self.macd.validate_params()?;
        if self.macd.fast >= self.macd.slow {
            return Err(TaError::InvalidConfig(format!(
                "MACD fast span ({}) must be shorter than slow span ({})",
                self.macd.fast.get(),
                self.macd.slow.get()
            )));
        }

        self.rsi.validate_params()?;
        if self.rsi.oversold >= self.rsi.overbought {
            return Err(TaError::InvalidConfig(format!(
                "RSI oversold ({}) must be below overbought ({})",
                self.rsi.oversold, self.rsi.overbought
            )));
        }

        self.bollinger.validate_params()?;
        // sample std-dev needs at least two points
        if self.bollinger.period.get() < 2 {
            return Err(TaError::InvalidConfig(
                "Bollinger period must be at least 2".to_string(),
            ));
        }
        if let Some(atr) = &self.atr {
            atr.validate_params()?;
        }
        self.volume.validate_params()
    }
}

// ============================================================
// SUPPORT / RESISTANCE
// ============================================================

/// Swing point search and level clustering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportResistanceConfig {
    /// Number of most recent candles searched
    pub lookback: Period,
    /// Neighbours required on each side of a swing point
    pub swing_points: Period,
    /// Relative distance under which two levels merge
    pub proximity: Ratio,
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        Self {
            lookback: Period::new_const(100),
            swing_points: Period::new_const(3),
            proximity: Ratio::new_const(0.01),
        }
    }
}

static SR_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("lookback", 100.0, "Candles searched for swing points"),
    ParamMeta::period("swing_points", 3.0, "Neighbours on each side of a swing"),
    ParamMeta::ratio("proximity", 0.01, "Relative merge distance"),
];

impl Tunable for SupportResistanceConfig {
    fn param_meta() -> &'static [ParamMeta] {
        SR_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("lookback", self.lookback.get() as f64),
            ("swing_points", self.swing_points.get() as f64),
            ("proximity", self.proximity.get()),
        ]
    }
}

// ============================================================
// PATTERNS
// ============================================================

/// Candlestick scan window and shape thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Number of most recent candles scanned
    pub lookback: Period,
    /// Doji: body / range must stay below this
    pub doji_tolerance: Ratio,
    /// Hammer / shooting star: long shadow must exceed body times this
    pub shadow_ratio: f64,
    /// Morning / evening star: middle body relative to the first body
    pub star_body_ratio: Ratio,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            lookback: Period::new_const(5),
            doji_tolerance: Ratio::new_const(crate::detectors::DOJI_TOLERANCE),
            shadow_ratio: crate::detectors::SHADOW_RATIO,
            star_body_ratio: Ratio::new_const(crate::detectors::STAR_BODY_RATIO),
        }
    }
}

static PATTERN_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("lookback", 5.0, "Candles scanned, newest first"),
    ParamMeta::ratio("doji_tolerance", 0.1, "Doji body/range ceiling"),
    ParamMeta::multiplier("shadow_ratio", 2.0, "Long shadow to body multiple"),
    ParamMeta::ratio("star_body_ratio", 0.5, "Star body to first body ceiling"),
];

impl Tunable for PatternConfig {
    fn param_meta() -> &'static [ParamMeta] {
        PATTERN_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("lookback", self.lookback.get() as f64),
            ("doji_tolerance", self.doji_tolerance.get()),
            ("shadow_ratio", self.shadow_ratio),
            ("star_body_ratio", self.star_body_ratio.get()),
        ]
    }
}

// ============================================================
// TREND
// ============================================================

/// Trend synthesizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Shortest series that gets a verdict
    pub min_candles: Period,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_candles: Period::new_const(20),
        }
    }
}

static TREND_PARAMS: &[ParamMeta] = &[ParamMeta::period(
    "min_candles",
    20.0,
    "Minimum candles for a trend verdict",
)];

impl Tunable for TrendConfig {
    fn param_meta() -> &'static [ParamMeta] {
        TREND_PARAMS
    }

    fn param_values(&self) -> Vec<(&'static str, f64)> {
        vec![("min_candles", self.min_candles.get() as f64)]
    }
}

// ============================================================
// ENGINE
// ============================================================

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub indicators: IndicatorConfig,
    pub support_resistance: SupportResistanceConfig,
    pub patterns: PatternConfig,
    pub trend: TrendConfig,
}

impl EngineConfig {
    /// Validate every record and the cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;
        self.support_resistance.validate_params()?;
        self.patterns.validate_params()?;
        self.trend.validate_params()
    }
}

// ============================================================
// TESTS
// ============================================================
