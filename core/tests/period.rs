use chrono::{Duration, TimeZone, Utc};
use funstr_core::{
    clock::CurationStage,
    config::OracleConfig,
    engine::OracleEngine,
    inventory::DomainRecord,
    snapshot::InventorySource,
};

fn engine_with(domains: Vec<DomainRecord>) -> OracleEngine {
    OracleEngine::new(OracleConfig::builtin()).with_override(domains, InventorySource::Manual)
}

#[test]
fn current_window_starts_at_last_boundary() {
    let now = Utc.with_ymd_and_hms(2026, 1, 20, 15, 0, 0).unwrap();
    let boundary = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();
    let d = vec![
        DomainRecord::curated("fresh.fun", Some(boundary + Duration::hours(3))),
        DomainRecord::curated("meme-lab.fun", Some(boundary - Duration::hours(3))),
        DomainRecord::curated("vibe42.fun", Some(boundary - Duration::hours(20))),
        DomainRecord::curated("ancient.fun", Some(boundary - Duration::days(3))),
    ];

    let report = engine_with(d).period_report(now, false).unwrap();

    assert_eq!(report.diff.current_window.start, boundary);
    assert_eq!(report.diff.current.count, 1);
    assert_eq!(report.diff.previous.count, 2);
    assert_eq!(report.diff.previous.p_hyphen, 50);
    assert_eq!(report.diff.previous.p_digits, 50);
    assert_eq!(report.diff.delta_hyphen, -50);
    assert_eq!(report.diff.delta_count, -1);
    assert_eq!(report.pace.acquired_24h, 2);
    assert_eq!(report.pace.acquired_prev_24h, 1);
    assert_eq!(report.pace.acquired_7d, 4);
}

#[test]
fn empty_windows_produce_zero_stats() {
    let now = Utc.with_ymd_and_hms(2026, 1, 20, 15, 0, 0).unwrap();
    let report = engine_with(vec![DomainRecord::curated("undated.fun", None)])
        .period_report(now, false)
        .unwrap();

    assert_eq!(report.diff.current.count, 0);
    assert_eq!(report.diff.previous.count, 0);
    assert_eq!(report.diff.delta_avg_len, 0.0);
    assert!(report.diff.current.top_token.is_none());
    assert_eq!(report.pace.created_coverage_pct, 0);
}

#[test]
fn schedule_reports_stage_during_run() {
    let engine = OracleEngine::new(OracleConfig::builtin());
    let boundary = Utc.with_ymd_and_hms(2026, 1, 20, 0, 0, 0).unwrap();

    let status = engine.schedule_status(boundary + Duration::milliseconds(5_300));
    assert!(status.in_run);
    assert_eq!(status.stage, Some(CurationStage::Score));
    assert_eq!(status.title, "SCORE");
    assert_eq!(status.next_run, boundary + Duration::days(1));

    let idle = engine.schedule_status(boundary + Duration::minutes(1));
    assert!(!idle.in_run);
    assert_eq!(idle.stage, None);
}

#[test]
fn mock_inventory_feeds_the_current_period() {
    let config = OracleConfig::builtin();
    // one hour after the epoch, same UTC day
    let now = config.inventory.epoch + Duration::hours(1);
    let report = OracleEngine::new(config).period_report(now, false).unwrap();

    assert!(report.diff.current.count > 0);
    assert_eq!(report.diff.current.count, report.pace.acquired_24h);
}
