//! Parameter metadata for engine configuration records
//!
//! Every configuration record describes its numeric knobs with a [`ParamMeta`],
//! enabling:
//! - Domain validation when the engine is built
//! - Parameter documentation
//!
//! Validation only rejects values the computation cannot use: NaN, negative
//! multipliers, ratios outside `0..=1`, fractional periods and levels outside
//! the `0..=100` oscillator scale. The defaults are suggestions, not limits.
//!
//! # Example
//!
//! ```rust
//! use kline_ta::params::Tunable;
//! use kline_ta::config::RsiConfig;
//!
//! for param in RsiConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use crate::{Result, TaError};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value, which fixes its valid domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Fraction in `0.0..=1.0`
  Ratio,
  /// Non-negative scale factor (e.g. Bollinger width, shadow multiple)
  Multiplier,
  /// Period value (positive integer)
  Period,
  /// Threshold on the 0..100 oscillator scale (e.g. RSI levels)
  Level,
}

impl ParamType {
  /// Inclusive bounds of the valid domain
  pub const fn bounds(self) -> (f64, f64) {
    match self {
      ParamType::Ratio => (0.0, 1.0),
      ParamType::Multiplier => (0.0, f64::INFINITY),
      ParamType::Period => (1.0, f64::INFINITY),
      ParamType::Level => (0.0, 100.0),
    }
  }
}

/// Metadata for a single configuration parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "swing_points")
  pub name: &'static str,
  /// Parameter type
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Ratio parameter
  pub const fn ratio(name: &'static str, default: f64, description: &'static str) -> Self {
    Self { name, param_type: ParamType::Ratio, default, description }
  }

  /// Create a new ParamMeta for a Multiplier parameter
  pub const fn multiplier(name: &'static str, default: f64, description: &'static str) -> Self {
    Self { name, param_type: ParamType::Multiplier, default, description }
  }

  /// Create a new ParamMeta for a Period parameter
  pub const fn period(name: &'static str, default: f64, description: &'static str) -> Self {
    Self { name, param_type: ParamType::Period, default, description }
  }

  /// Create a new ParamMeta for a threshold level
  pub const fn level(name: &'static str, default: f64, description: &'static str) -> Self {
    Self { name, param_type: ParamType::Level, default, description }
  }

  /// Validate a value against this parameter's domain
  pub fn validate(&self, value: f64) -> Result<()> {
    if value.is_nan() {
      return Err(TaError::InvalidValue("parameter cannot be NaN"));
    }
    if value.is_infinite() {
      return Err(TaError::InvalidValue("parameter must be finite"));
    }
    let (min, max) = self.param_type.bounds();
    if value < min || value > max {
      return Err(TaError::OutOfRange { field: self.name, value, min, max });
    }
    if self.param_type == ParamType::Period && value.fract() != 0.0 {
      return Err(TaError::InvalidValue("Period must be a positive integer"));
    }
    Ok(())
  }
}

// ============================================================
// TUNABLE TRAIT
// ============================================================

/// Configuration records with domain-checked numeric knobs
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Domain validation of the current values
pub trait Tunable {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Current values, keyed by [`ParamMeta::name`]
  fn param_values(&self) -> Vec<(&'static str, f64)>;

  /// Check every current value against its parameter's domain
  fn validate_params(&self) -> Result<()> {
    for (name, value) in self.param_values() {
      let meta = Self::param_meta()
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| TaError::InvalidConfig(format!("unknown parameter `{name}`")))?;
      meta.validate(value)?;
    }
    Ok(())
  }
}

// ============================================================
// TESTS
// ============================================================
