//! Pattern scanning
//!
//! [`PatternScanner`] walks the newest candles from newest to oldest and runs
//! the single-, two- and three-bar detectors wherever enough history exists.
//! The two continuation patterns (Three White Soldiers, Three Black Crows) are
//! checked once, on the last three candles, regardless of the lookback.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{config::PatternConfig, detectors::*, index_from_end, Direction, OHLCV};

// ============================================================
// PATTERN KIND / MATCH
// ============================================================

/// Closed set of recognised candlestick patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Doji,
    Hammer,
    ShootingStar,
    EngulfingBullish,
    EngulfingBearish,
    MorningStar,
    EveningStar,
    ThreeWhiteSoldiers,
    ThreeBlackCrows,
}

impl PatternKind {
    pub const ALL: [PatternKind; 9] = [
        PatternKind::Doji,
        PatternKind::Hammer,
        PatternKind::ShootingStar,
        PatternKind::EngulfingBullish,
        PatternKind::EngulfingBearish,
        PatternKind::MorningStar,
        PatternKind::EveningStar,
        PatternKind::ThreeWhiteSoldiers,
        PatternKind::ThreeBlackCrows,
    ];

    /// Stable identifier, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Doji => "doji",
            PatternKind::Hammer => "hammer",
            PatternKind::ShootingStar => "shooting_star",
            PatternKind::EngulfingBullish => "engulfing_bullish",
            PatternKind::EngulfingBearish => "engulfing_bearish",
            PatternKind::MorningStar => "morning_star",
            PatternKind::EveningStar => "evening_star",
            PatternKind::ThreeWhiteSoldiers => "three_white_soldiers",
            PatternKind::ThreeBlackCrows => "three_black_crows",
        }
    }

    /// Display name used in summaries
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Doji => "Doji",
            PatternKind::Hammer => "Hammer",
            PatternKind::ShootingStar => "Shooting Star",
            PatternKind::EngulfingBullish => "Bullish Engulfing",
            PatternKind::EngulfingBearish => "Bearish Engulfing",
            PatternKind::MorningStar => "Morning Star",
            PatternKind::EveningStar => "Evening Star",
            PatternKind::ThreeWhiteSoldiers => "Three White Soldiers",
            PatternKind::ThreeBlackCrows => "Three Black Crows",
        }
    }

    /// Fixed human-readable description attached to every match
    pub fn description(self) -> &'static str {
        match self {
            PatternKind::Doji => "Doji: open and close nearly equal, market indecision",
            PatternKind::Hammer => "Hammer: long lower shadow, buyers rejected lower prices",
            PatternKind::ShootingStar => {
                "Shooting Star: long upper shadow, sellers rejected higher prices"
            }
            PatternKind::EngulfingBullish => {
                "Bullish Engulfing: bullish body engulfs the previous bearish body"
            }
            PatternKind::EngulfingBearish => {
                "Bearish Engulfing: bearish body engulfs the previous bullish body"
            }
            PatternKind::MorningStar => {
                "Morning Star: bearish candle, small star, bullish recovery past the midpoint"
            }
            PatternKind::EveningStar => {
                "Evening Star: bullish candle, small star, bearish drop past the midpoint"
            }
            PatternKind::ThreeWhiteSoldiers => {
                "Three White Soldiers: three advancing bullish candles"
            }
            PatternKind::ThreeBlackCrows => "Three Black Crows: three declining bearish candles",
        }
    }

    /// Typical bias of the pattern
    pub fn typical_direction(self) -> Direction {
        match self {
            PatternKind::Hammer
            | PatternKind::EngulfingBullish
            | PatternKind::MorningStar
            | PatternKind::ThreeWhiteSoldiers => Direction::Bullish,
            PatternKind::ShootingStar
            | PatternKind::EngulfingBearish
            | PatternKind::EveningStar
            | PatternKind::ThreeBlackCrows => Direction::Bearish,
            PatternKind::Doji => Direction::Neutral,
        }
    }
}

/// A single detection - Copy, no allocations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternMatch {
    /// Zero-based index of the candle that completes the pattern
    pub candle_index: usize,
    /// Timestamp of that candle, when the input carries one
    pub timestamp: Option<i64>,
    pub kind: PatternKind,
    /// Direction the pattern usually signals
    pub direction: Direction,
    pub description: &'static str,
}

impl PatternMatch {
    /// Match of `kind` completed by `bars[index]`
    pub fn at<T: OHLCV>(bars: &[T], index: usize, kind: PatternKind) -> Self {
        Self {
            candle_index: index,
            timestamp: bars.get(index).and_then(|bar| bar.timestamp()),
            kind,
            direction: kind.typical_direction(),
            description: kind.description(),
        }
    }
}

// ============================================================
// PATTERN DETECTOR TRAIT
// ============================================================

/// Geometric predicate over the candle at `index` and its predecessors
pub trait PatternDetector: Send + Sync {
    fn kind(&self) -> PatternKind;
    /// Candles needed, counting the one at `index`
    fn min_bars(&self) -> usize;
    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch>;
}

// ============================================================
// BUILTIN DETECTORS - generated via macro
// ============================================================

/// Macro to generate BuiltinDetector enum without boilerplate
macro_rules! define_builtin_detectors {
    (
        $(
            $variant:ident($detector:ty)
        ),* $(,)?
    ) => {
        /// All builtin detectors - enum dispatch, no vtable
        #[derive(Debug, Clone)]
        pub enum BuiltinDetector {
            $($variant($detector)),*
        }

        impl BuiltinDetector {
            #[inline]
            pub fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<PatternMatch> {
                match self {
                    $(Self::$variant(d) => PatternDetector::detect(d, bars, index)),*
                }
            }

            #[inline]
            pub fn kind(&self) -> PatternKind {
                match self {
                    $(Self::$variant(d) => PatternDetector::kind(d)),*
                }
            }

            #[inline]
            pub fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(d) => PatternDetector::min_bars(d)),*
                }
            }
        }
    };
}

define_builtin_detectors! {
    // Single bar
    Doji(DojiDetector),
    Hammer(HammerDetector),
    ShootingStar(ShootingStarDetector),

    // Two bar
    BullishEngulfing(BullishEngulfingDetector),
    BearishEngulfing(BearishEngulfingDetector),

    // Three bar
    MorningStar(MorningStarDetector),
    EveningStar(EveningStarDetector),
    ThreeWhiteSoldiers(ThreeWhiteSoldiersDetector),
    ThreeBlackCrows(ThreeBlackCrowsDetector),
}

// ============================================================
// SCANNER
// ============================================================

/// Runs the detector set over the tail of a series
#[derive(Debug, Clone)]
pub struct PatternScanner {
    lookback: usize,
    /// Tested at every scanned position
    rolling: Vec<BuiltinDetector>,
    /// Tested once, at the newest candle
    tail: Vec<BuiltinDetector>,
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::from_config(&PatternConfig::default())
    }
}

impl PatternScanner {
    pub fn from_config(config: &PatternConfig) -> Self {
        let star_body_ratio = config.star_body_ratio.get();
        Self {
            lookback: config.lookback.get(),
            rolling: vec![
                BuiltinDetector::Doji(DojiDetector {
                    tolerance: config.doji_tolerance.get(),
                }),
                BuiltinDetector::Hammer(HammerDetector {
                    shadow_ratio: config.shadow_ratio,
                }),
                BuiltinDetector::ShootingStar(ShootingStarDetector {
                    shadow_ratio: config.shadow_ratio,
                }),
                BuiltinDetector::BullishEngulfing(BullishEngulfingDetector),
                BuiltinDetector::BearishEngulfing(BearishEngulfingDetector),
                BuiltinDetector::MorningStar(MorningStarDetector { star_body_ratio }),
                BuiltinDetector::EveningStar(EveningStarDetector { star_body_ratio }),
            ],
            tail: vec![
                BuiltinDetector::ThreeWhiteSoldiers(ThreeWhiteSoldiersDetector),
                BuiltinDetector::ThreeBlackCrows(ThreeBlackCrowsDetector),
            ],
        }
    }

    /// Detect patterns at a single candle index.
    pub fn scan_at<T: OHLCV>(&self, bars: &[T], index: usize) -> Vec<PatternMatch> {
        Self::run(&self.rolling, bars, index)
    }

    /// Scan the newest `lookback` candles, newest first, then the tail patterns.
    pub fn scan<T: OHLCV>(&self, bars: &[T]) -> PatternReport {
        let mut report = PatternReport::empty();

        for offset in 0..self.lookback {
            let Some(index) = index_from_end(bars.len(), offset) else {
                break;
            };
            report.extend(self.scan_at(bars, index));
        }

        if let Some(last) = index_from_end(bars.len(), 0) {
            report.extend(Self::run(&self.tail, bars, last));
        }

        report
    }

    fn run<T: OHLCV>(detectors: &[BuiltinDetector], bars: &[T], index: usize) -> Vec<PatternMatch> {
        detectors
            .iter()
            .filter(|d| index + 1 >= d.min_bars())
            .filter_map(|d| d.detect(bars, index))
            .collect()
    }
}

// ============================================================
// REPORT
// ============================================================

/// Matches grouped by kind; every kind is present, possibly empty
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PatternReport {
    groups: BTreeMap<PatternKind, Vec<PatternMatch>>,
}

impl PatternReport {
    pub fn empty() -> Self {
        Self {
            groups: PatternKind::ALL.iter().map(|&k| (k, Vec::new())).collect(),
        }
    }

    fn extend(&mut self, matches: impl IntoIterator<Item = PatternMatch>) {
        for m in matches {
            self.groups.entry(m.kind).or_default().push(m);
        }
    }

    /// Matches of one kind, newest first
    pub fn get(&self, kind: PatternKind) -> &[PatternMatch] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, kind: PatternKind) -> bool {
        !self.get(kind).is_empty()
    }

    /// Total number of matches across kinds
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternKind, &[PatternMatch])> {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// One line per detected kind, for narrative and notification text
    pub fn summary(&self) -> String {
        let lines: Vec<String> = self
            .iter()
            .filter(|(_, matches)| !matches.is_empty())
            .map(|(kind, matches)| {
                let n = matches.len();
                let noun = if n == 1 { "occurrence" } else { "occurrences" };
                format!("- {}: {} {}", kind.name(), n, noun)
            })
            .collect();

        if lines.is_empty() {
            "No notable candlestick patterns detected recently".to_string()
        } else {
            lines.join("\n")
        }
    }
}

// ============================================================
// TESTS
// ============================================================
