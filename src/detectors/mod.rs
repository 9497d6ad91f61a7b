//! Candlestick pattern detectors
//!
//! # Pattern Categories
//!
//! - **Single-bar (3)**: Doji, Hammer, Shooting Star
//! - **Two-bar (2)**: Bullish / Bearish Engulfing
//! - **Three-bar (4)**: Morning / Evening Star, Three White Soldiers, Three Black Crows

pub mod helpers;

/// Generate `with_defaults()` -> `Self::default()` for multiple detector types.
macro_rules! impl_with_defaults {
  ($($detector:ty),* $(,)?) => {
    $(impl $detector {
      pub fn with_defaults() -> Self { Self::default() }
    })*
  };
}

pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

// Re-export all detectors for convenience
pub use helpers::*;
pub use single_bar::*;
pub use three_bar::*;
pub use two_bar::*;
