use chrono::{Duration, NaiveDate, TimeZone, Utc};
use funstr_core::{
    config::OracleConfig,
    market::{MarketKey, MarketSimulator},
    types::round1,
};
use std::collections::HashSet;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn dominance_sums_to_one_hundred() {
    let config = OracleConfig::builtin();
    let sim = MarketSimulator::new(&config.market);

    for d in [day(2026, 1, 14), day(2026, 1, 15), day(2026, 3, 1), day(2027, 12, 31)] {
        let board = sim.board_for_day(d);
        let day_key = d.format("%Y-%m-%d").to_string();
        let scores: Vec<(MarketKey, f64)> = sim
            .candidates()
            .into_iter()
            .map(|(k, w)| {
                let score = sim.telemetry(&k, w, &day_key).score;
                (k, score)
            })
            .collect();
        let sum: f64 = scores.iter().map(|(_, s)| s).sum();

        let exact: f64 = scores.iter().map(|(_, s)| s / sum * 100.0).sum();
        assert!((exact - 100.0).abs() < 1e-9, "{d}: unrounded {exact}");

        for (key, score) in &scores {
            let signal = board.get(key).unwrap();
            assert_eq!(signal.dominance, round1(score / sum * 100.0), "{d}: {key}");
        }

        let n = board.signals.len() as f64;
        let total: f64 = board.signals.iter().map(|s| s.dominance).sum();
        assert!((total - 100.0).abs() <= 0.025 * n, "{d}: {total}");
        assert!((total - 100.0).abs() < 1.0, "{d}: {total}");
    }
}

#[test]
fn same_day_is_bit_identical() {
    let config = OracleConfig::builtin();
    let sim = MarketSimulator::new(&config.market);
    let morning = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 1).unwrap();
    let night = morning + Duration::hours(23);

    let a = serde_json::to_string(&sim.board(morning)).unwrap();
    let b = serde_json::to_string(&sim.board(night)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn next_day_differs() {
    let config = OracleConfig::builtin();
    let sim = MarketSimulator::new(&config.market);
    let today = sim.board_for_day(day(2026, 1, 15));
    let tomorrow = sim.board_for_day(day(2026, 1, 16));

    assert_ne!(today.signals, tomorrow.signals);
    assert_eq!(tomorrow.previous_day, today.day);
}

#[test]
fn board_covers_every_candidate_once() {
    let config = OracleConfig::builtin();
    let sim = MarketSimulator::new(&config.market);
    let board = sim.board_for_day(day(2026, 1, 15));

    let m = &config.market;
    let expected = m.token_weights.len() + m.shape_weights.len() + m.start_weights.len();
    assert_eq!(board.signals.len(), expected);

    let keys: HashSet<String> = board.signals.iter().map(|s| s.key.to_string()).collect();
    assert_eq!(keys.len(), expected);
    assert!(board.get(&MarketKey::Token("ai".into())).is_some());
    assert_eq!(board.config_version, m.version);
}

#[test]
fn board_is_ranked_and_bounded() {
    let config = OracleConfig::builtin();
    let board = MarketSimulator::new(&config.market).board_for_day(day(2026, 2, 2));

    for pair in board.signals.windows(2) {
        assert!(pair[0].dominance >= pair[1].dominance);
    }
    for s in &board.signals {
        assert!(s.base_score <= 100);
        assert!(s.bids <= 360 && s.offers <= 60 && s.watch <= 1400);
        assert!((0.0..=100.0).contains(&s.dominance));
    }
    assert!(board.top_of_kind("shape", 3).iter().all(|s| s.key.kind() == "shape"));
}

#[test]
fn deltas_compare_against_previous_day() {
    let config = OracleConfig::builtin();
    let sim = MarketSimulator::new(&config.market);
    let today = sim.board_for_day(day(2026, 1, 20));
    let yesterday = sim.board_for_day(day(2026, 1, 19));

    for s in &today.signals {
        let prev = yesterday.get(&s.key).unwrap();
        // both sides are rounded independently
        assert!((s.dominance - prev.dominance - s.dominance_delta).abs() <= 0.11, "{}", s.key);
    }
}

#[test]
fn penalized_tokens_score_below_bumped_ones() {
    let config = OracleConfig::builtin();
    let sim = MarketSimulator::new(&config.market);
    for d in ["2026-01-15", "2026-04-01"] {
        let meme = sim.base_score(&MarketKey::Token("meme".into()), 92.0, d);
        let quiz = sim.base_score(&MarketKey::Token("quiz".into()), 92.0, d);
        assert!(meme > quiz, "{d}");
    }
}

#[test]
fn shape_baseline_matches_portfolio_baseline() {
    let config = OracleConfig::builtin();
    let b = MarketSimulator::new(&config.market).shape_baseline();
    let expected = config.vocabulary.baseline;

    assert_eq!(b.avg_len, expected.avg_label_len);
    assert_eq!(b.hyphen_rate, expected.hyphen_pct);
    assert_eq!(b.digit_rate, expected.digits_pct);
    assert_eq!(b.short_share, expected.short_pct);
    assert_eq!(b.brandable_share, expected.brandable_pct);
}
