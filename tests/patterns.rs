//! Integration tests for candlestick pattern scanning.
//!
//! These tests drive the public scanner and detector API.

use kline_ta::prelude::*;

/// Simple test bar structure
#[derive(Debug, Clone, Copy)]
struct TestBar {
    o: f64,
    h: f64,
    l: f64,
    c: f64,
}

impl TestBar {
    fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
        Self { o, h, l, c }
    }
}

impl OHLCV for TestBar {
    fn open(&self) -> f64 {
        self.o
    }

    fn high(&self) -> f64 {
        self.h
    }

    fn low(&self) -> f64 {
        self.l
    }

    fn close(&self) -> f64 {
        self.c
    }

    fn volume(&self) -> f64 {
        1000.0
    }
}

/// Bars that match no pattern on their own or in sequence
fn make_quiet(n: usize) -> Vec<TestBar> {
    (0..n)
        .map(|_| TestBar::new(100.0, 102.5, 99.5, 102.0))
        .collect()
}

fn scan(bars: &[TestBar]) -> PatternReport {
    PatternScanner::default().scan(bars)
}

/// The match of `kind` completed by the newest bar
fn assert_newest(bars: &[TestBar], kind: PatternKind) {
    let report = scan(bars);
    let matches = report.get(kind);
    assert!(!matches.is_empty(), "{} should be detected", kind.name());
    assert_eq!(matches[0].candle_index, bars.len() - 1);
    assert_eq!(matches[0].description, kind.description());
}

// ============================================================
// SINGLE BAR PATTERN TESTS
// ============================================================

#[test]
fn test_quiet_series_matches_nothing() {
    let report = scan(&make_quiet(20));
    assert!(report.is_empty());
    assert_eq!(
        report.summary(),
        "No notable candlestick patterns detected recently"
    );
}

#[test]
fn test_doji_near_equal_open_close() {
    let bar = TestBar::new(100.0, 101.0, 99.0, 100.001);
    let detector = DojiDetector::with_defaults();
    assert!(detector.detect(&[bar], 0).is_some());

    let mut bars = make_quiet(5);
    bars.push(bar);
    assert_newest(&bars, PatternKind::Doji);
}

#[test]
fn test_doji_zero_range_is_not_doji() {
    let flat = TestBar::new(50.0, 50.0, 50.0, 50.0);
    assert!(DojiDetector::with_defaults().detect(&[flat], 0).is_none());
}

#[test]
fn test_hammer_detection() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(100.0, 101.2, 96.0, 101.0));
    assert_newest(&bars, PatternKind::Hammer);
    assert!(!scan(&bars).contains(PatternKind::ShootingStar));
}

#[test]
fn test_shooting_star_detection() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(101.0, 105.0, 99.8, 100.0));
    assert_newest(&bars, PatternKind::ShootingStar);
    assert!(!scan(&bars).contains(PatternKind::Hammer));
}

// ============================================================
// TWO BAR PATTERN TESTS
// ============================================================

#[test]
fn test_bullish_engulfing_detection() {
    let bars = vec![
        TestBar::new(10.0, 10.5, 7.5, 8.0),
        TestBar::new(7.0, 11.5, 6.5, 11.0),
    ];
    assert_newest(&bars, PatternKind::EngulfingBullish);
    assert!(!scan(&bars).contains(PatternKind::EngulfingBearish));
}

#[test]
fn test_bearish_engulfing_detection() {
    let bars = vec![
        TestBar::new(8.0, 10.5, 7.5, 10.0),
        TestBar::new(11.0, 11.5, 6.5, 7.0),
    ];
    assert_newest(&bars, PatternKind::EngulfingBearish);
}

#[test]
fn test_engulfing_requires_strict_overlap() {
    // current open equals previous close: not engulfing
    let bars = vec![
        TestBar::new(10.0, 10.5, 7.5, 8.0),
        TestBar::new(8.0, 11.5, 7.5, 11.0),
    ];
    assert!(!scan(&bars).contains(PatternKind::EngulfingBullish));
}

#[test]
fn test_first_candle_has_no_two_bar_match() {
    let bars = vec![TestBar::new(7.0, 11.5, 6.5, 11.0)];
    assert!(BullishEngulfingDetector::with_defaults()
        .detect(&bars, 0)
        .is_none());
}

// ============================================================
// THREE BAR PATTERN TESTS
// ============================================================

#[test]
fn test_morning_star_detection() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(110.0, 111.0, 99.0, 100.0));
    bars.push(TestBar::new(99.0, 99.5, 97.5, 98.5));
    bars.push(TestBar::new(99.0, 106.5, 98.5, 106.0));
    assert_newest(&bars, PatternKind::MorningStar);
}

#[test]
fn test_morning_star_needs_midpoint_recovery() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(110.0, 111.0, 99.0, 100.0));
    bars.push(TestBar::new(99.0, 99.5, 97.5, 98.5));
    // 104 is below the first body's midpoint of 105
    bars.push(TestBar::new(99.0, 104.5, 98.5, 104.0));
    assert!(!scan(&bars).contains(PatternKind::MorningStar));
}

#[test]
fn test_evening_star_detection() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(100.0, 111.0, 99.5, 110.0));
    bars.push(TestBar::new(111.0, 112.0, 110.5, 111.5));
    bars.push(TestBar::new(110.0, 110.5, 103.5, 104.0));
    assert_newest(&bars, PatternKind::EveningStar);
}

#[test]
fn test_three_white_soldiers_detection() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(100.0, 104.5, 99.5, 104.0));
    bars.push(TestBar::new(102.0, 107.5, 101.5, 107.0));
    bars.push(TestBar::new(105.0, 110.5, 104.5, 110.0));
    assert_newest(&bars, PatternKind::ThreeWhiteSoldiers);

    let detector = ThreeWhiteSoldiersDetector::with_defaults();
    assert!(detector.detect(&bars, bars.len() - 1).is_some());
    assert!(ThreeBlackCrowsDetector::with_defaults()
        .detect(&bars, bars.len() - 1)
        .is_none());
}

#[test]
fn test_three_black_crows_detection() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(110.0, 110.5, 105.5, 106.0));
    bars.push(TestBar::new(108.0, 108.5, 102.5, 103.0));
    bars.push(TestBar::new(105.0, 105.5, 99.5, 100.0));
    assert_newest(&bars, PatternKind::ThreeBlackCrows);
}

#[test]
fn test_soldiers_only_checked_on_last_three() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(100.0, 104.5, 99.5, 104.0));
    bars.push(TestBar::new(102.0, 107.5, 101.5, 107.0));
    bars.push(TestBar::new(105.0, 110.5, 104.5, 110.0));
    bars.push(TestBar::new(100.0, 102.5, 99.5, 102.0));
    assert!(!scan(&bars).contains(PatternKind::ThreeWhiteSoldiers));
}

// ============================================================
// SCAN POLICY TESTS
// ============================================================

#[test]
fn test_lookback_excludes_older_candles() {
    let mut bars = make_quiet(10);
    // sixth from the end: outside the default lookback of 5
    bars[4] = TestBar::new(101.0, 102.0, 100.0, 101.0);
    assert!(!scan(&bars).contains(PatternKind::Doji));

    // fifth from the end: inside
    bars[5] = TestBar::new(101.0, 102.0, 100.0, 101.0);
    let report = scan(&bars);
    assert_eq!(report.get(PatternKind::Doji).len(), 1);
    assert_eq!(report.get(PatternKind::Doji)[0].candle_index, 5);
}

#[test]
fn test_short_series_is_fully_scanned() {
    let bars = vec![
        TestBar::new(101.0, 102.0, 100.0, 101.0),
        TestBar::new(100.0, 102.5, 99.5, 102.0),
    ];
    let report = scan(&bars);
    assert_eq!(report.get(PatternKind::Doji)[0].candle_index, 0);
}

#[test]
fn test_matches_are_newest_first() {
    let mut bars = make_quiet(6);
    bars[2] = TestBar::new(101.0, 102.0, 100.0, 101.0);
    bars[4] = TestBar::new(101.0, 102.0, 100.0, 101.0);
    let report = scan(&bars);
    let indices: Vec<usize> = report
        .get(PatternKind::Doji)
        .iter()
        .map(|m| m.candle_index)
        .collect();
    assert_eq!(indices, vec![4, 2]);
}

#[test]
fn test_empty_series() {
    let report = scan(&[]);
    assert!(report.is_empty());
    assert_eq!(report.iter().count(), PatternKind::ALL.len());
}

#[test]
fn test_custom_lookback_and_tolerance() {
    let config = PatternConfig {
        lookback: Period::new(10).unwrap(),
        doji_tolerance: Ratio::new(0.7).unwrap(),
        ..PatternConfig::default()
    };
    let scanner = PatternScanner::from_config(&config);

    // quiet bars have body/range = 2/3, now a doji under the looser tolerance
    let report = scanner.scan(&make_quiet(12));
    assert_eq!(report.get(PatternKind::Doji).len(), 10);
}

#[test]
fn test_timestamps_carried_into_matches() {
    let candles = vec![
        Candle::new(1_700_000_000, 10.0, 10.5, 7.5, 8.0, 5.0),
        Candle::new(1_700_000_060, 7.0, 11.5, 6.5, 11.0, 5.0),
    ];
    let report = PatternScanner::default().scan(&candles);
    let m = report.get(PatternKind::EngulfingBullish)[0];
    assert_eq!(m.timestamp, Some(1_700_000_060));
    assert_eq!(m.direction, Direction::Bullish);
}

#[test]
fn test_matches_carry_pattern_direction() {
    let mut bars = make_quiet(5);
    bars.push(TestBar::new(110.0, 110.5, 105.5, 106.0));
    bars.push(TestBar::new(108.0, 108.5, 102.5, 103.0));
    bars.push(TestBar::new(105.0, 105.5, 99.5, 100.0));
    let report = scan(&bars);
    assert_eq!(
        report.get(PatternKind::ThreeBlackCrows)[0].direction,
        Direction::Bearish
    );

    let doji = TestBar::new(100.0, 101.0, 99.0, 100.001);
    let m = DojiDetector::with_defaults().detect(&[doji], 0).unwrap();
    assert_eq!(m.direction, Direction::Neutral);
}

#[test]
fn test_summary_lines() {
    let bars = vec![
        TestBar::new(10.0, 10.5, 7.5, 8.0),
        TestBar::new(7.0, 11.5, 6.5, 11.0),
    ];
    assert_eq!(scan(&bars).summary(), "- Bullish Engulfing: 1 occurrence");
}
