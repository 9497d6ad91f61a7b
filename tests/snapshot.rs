//! Integration tests for the full analysis pipeline.

use kline_ta::prelude::*;
use serde_json::Value;

/// Steady advance with a small upper wick
fn make_uptrend(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let p = 100.0 + i as f64;
            Candle::new(i as i64 * 60, p, p + 1.5, p - 1.0, p + 0.8, 1_000.0 + i as f64)
        })
        .collect()
}

/// Deterministic oscillation around 100
fn make_wave(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let mid = 100.0 + (i as f64 * 0.45).sin() * 8.0;
            let o = mid - 0.6;
            let c = mid + 0.6 * (i as f64 * 1.3).cos();
            Candle::new(i as i64 * 60, o, o.max(c) + 1.0, o.min(c) - 1.0, c, 500.0)
        })
        .collect()
}

// ============================================================
// SNAPSHOT CONTENT
// ============================================================

#[test]
fn test_insufficient_data_is_per_field() {
    let engine = Engine::default();
    let snapshot = engine.analyze(&make_uptrend(10)).unwrap();

    assert_eq!(
        snapshot.trend,
        Computed::InsufficientData {
            required: 20,
            available: 10
        }
    );

    let ma5 = snapshot.moving_averages[&5].ready().unwrap();
    assert!(ma5[..4].iter().all(Option::is_none));
    assert!(ma5[4..].iter().all(Option::is_some));
    assert!(!snapshot.moving_averages[&20].is_ready());
    assert!(!snapshot.rsi.is_ready());
}

#[test]
fn test_uptrend_is_bullish() {
    let engine = Engine::default();
    let snapshot = engine.analyze(&make_uptrend(40)).unwrap();
    let trend = snapshot.trend.ready().unwrap();

    assert!(trend.ma_alignment);
    assert!(trend.macd_signal.is_bullish());
    assert_eq!(trend.trend, Direction::Bullish);
    assert_eq!(trend.rsi_signal, RsiSignal::Overbought);
    // not enough candles for MA60
    assert_eq!(trend.latest_ma[&60], None);
    assert!(trend.latest_ma[&5].unwrap() > trend.latest_ma[&20].unwrap());
}

#[test]
fn test_last_close_and_count() {
    let candles = make_uptrend(25);
    let snapshot = Engine::default().analyze(&candles).unwrap();
    assert_eq!(snapshot.candles, 25);
    assert_eq!(snapshot.last_close, candles.last().map(|c| c.close));
}

#[test]
fn test_levels_are_sorted_descending() {
    let snapshot = Engine::default().analyze(&make_wave(150)).unwrap();

    assert!(!snapshot.resistance_levels.is_empty());
    assert!(!snapshot.support_levels.is_empty());
    assert!(snapshot.resistance_levels.windows(2).all(|w| w[0] > w[1]));
    assert!(snapshot.support_levels.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_analysis_is_reproducible() {
    let engine = Engine::default();
    let candles = make_wave(120);

    let first = engine.analyze(&candles).unwrap();
    let second = engine.analyze(&candles).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_snapshot_json_shape() {
    let snapshot = Engine::default().analyze(&make_uptrend(10)).unwrap();
    let json: Value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["candles"], 10);
    assert_eq!(json["moving_averages"]["5"]["status"], "ready");
    assert_eq!(json["moving_averages"]["5"]["value"][0], Value::Null);
    assert_eq!(json["trend"]["status"], "insufficient_data");
    assert_eq!(json["trend"]["value"]["required"], 20);
    assert!(json["patterns"]["three_white_soldiers"].is_array());
    assert!(json["atr"].is_object());
}

// ============================================================
// CONFIGURATION
// ============================================================

#[test]
fn test_partial_config_document() {
    let config: EngineConfig = serde_json::from_str(
        r#"{
            "ma": { "periods": [3, 8] },
            "atr": null,
            "support_resistance": { "proximity": 0.02 },
            "trend": { "min_candles": 30 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.indicators.macd, MacdConfig::default());
    assert_eq!(config.support_resistance.lookback.get(), 100);

    let engine = EngineBuilder::new().config(config).build().unwrap();
    let snapshot = engine.analyze(&make_uptrend(25)).unwrap();

    assert_eq!(snapshot.moving_averages.len(), 2);
    assert!(snapshot.atr.is_none());
    assert!(!snapshot.trend.is_ready());
}

#[test]
fn test_invalid_config_values() {
    assert!(serde_json::from_str::<EngineConfig>(r#"{ "rsi": { "period": 0 } }"#).is_err());
    assert!(
        serde_json::from_str::<EngineConfig>(r#"{ "support_resistance": { "proximity": 2.0 } }"#)
            .is_err()
    );

    let config: EngineConfig =
        serde_json::from_str(r#"{ "macd": { "fast": 40, "slow": 30 } }"#).unwrap();
    assert!(EngineBuilder::new().config(config).build().is_err());

    let config: EngineConfig =
        serde_json::from_str(r#"{ "rsi": { "overbought": 20, "oversold": 80 } }"#).unwrap();
    assert!(EngineBuilder::new().config(config).build().is_err());
}

// ============================================================
// VALIDATION
// ============================================================

#[test]
fn test_nan_close_is_rejected() {
    let mut candles = make_uptrend(30);
    candles[12].close = f64::NAN;

    let err = Engine::default().analyze(&candles).unwrap_err();
    assert_eq!(
        err,
        TaError::InvalidCandle {
            index: 12,
            field: "close",
            reason: "is NaN"
        }
    );
}

#[test]
fn test_infinite_volume_is_rejected() {
    let mut candles = make_uptrend(5);
    candles[0].volume = f64::INFINITY;

    let err = Engine::default().validate_candles(&candles).unwrap_err();
    assert!(matches!(
        err,
        TaError::InvalidCandle {
            index: 0,
            field: "volume",
            ..
        }
    ));
}

#[test]
fn test_duplicate_timestamp_is_rejected() {
    let mut candles = make_uptrend(30);
    candles[7].timestamp = candles[6].timestamp;

    assert_eq!(
        Engine::default().analyze(&candles).unwrap_err(),
        TaError::UnorderedTimestamps { index: 7 }
    );
}

#[test]
fn test_records_missing_high() {
    let records: Vec<CandleRecord> = serde_json::from_str(
        r#"[
            { "timestamp": 1, "open": 1.0, "high": 1.2, "low": 0.9, "close": 1.1, "volume": 10 },
            { "timestamp": 2, "open": 1.1, "low": 1.0, "close": 1.05 }
        ]"#,
    )
    .unwrap();

    assert_eq!(
        CandleRecord::into_candles(records).unwrap_err(),
        TaError::MissingField {
            index: 1,
            field: "high"
        }
    );
}

#[test]
fn test_records_to_snapshot() {
    let records: Vec<CandleRecord> = make_uptrend(30)
        .into_iter()
        .map(|c| CandleRecord {
            timestamp: Some(c.timestamp),
            open: Some(c.open),
            high: Some(c.high),
            low: Some(c.low),
            close: Some(c.close),
            volume: None,
        })
        .collect();

    let candles = CandleRecord::into_candles(records).unwrap();
    let snapshot = Engine::default().analyze(&candles).unwrap();
    let volume_ma = snapshot.volume_ma.ready().unwrap();
    assert_eq!(volume_ma.last().copied().flatten(), Some(0.0));
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

#[test]
fn test_analyze_parallel_splits_results() {
    let engine = EngineBuilder::new().build().unwrap();

    let good_a = make_uptrend(40);
    let good_b = make_wave(60);
    let mut bad = make_uptrend(20);
    bad[3].open = f64::NAN;

    let instruments: Vec<(&str, &[Candle])> = vec![
        ("AAA", good_a.as_slice()),
        ("BBB", good_b.as_slice()),
        ("CCC", bad.as_slice()),
    ];

    let (snapshots, errors) = analyze_parallel(&engine, instruments);

    assert_eq!(snapshots.len(), 2);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].symbol, "CCC");
    assert_eq!(
        errors[0].error,
        TaError::InvalidCandle {
            index: 3,
            field: "open",
            reason: "is NaN"
        }
    );

    let a = snapshots.iter().find(|s| s.symbol == "AAA").unwrap();
    assert_eq!(a.snapshot, engine.analyze(&good_a).unwrap());
}
