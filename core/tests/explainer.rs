use chrono::{TimeZone, Utc};
use funstr_core::{
    config::OracleConfig,
    engine::OracleEngine,
    error::{OracleError, OracleResult},
    explainer::{parse_explainer_reply, DomainExplainer, ExplanationSource},
    scorer::{ScoreResult, Verdict},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Always fails, counting how often it was asked.
struct DownExplainer {
    calls: Arc<AtomicUsize>,
}

impl DomainExplainer for DownExplainer {
    fn name(&self) -> &'static str {
        "down"
    }

    fn explain(&self, _domain: &str) -> OracleResult<ScoreResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OracleError::Explainer {
            reason: "timed out".into(),
        })
    }
}

/// Replies with a canned model answer.
struct CannedExplainer(&'static str);

impl DomainExplainer for CannedExplainer {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn explain(&self, _domain: &str) -> OracleResult<ScoreResult> {
        parse_explainer_reply(self.0)
    }
}

const GOOD_REPLY: &str = r#"```json
{"score": 91, "verdict": "okay",
 "reasons": ["Punchy", "Memorable", "Punchy"],
 "cautions": ["Crowded niche"],
 "features": {"label": "vibe", "labelLen": 4, "tokens": ["vibe"],
              "hasHyphen": false, "hasDigits": false, "vowelPct": 50}}
```"#;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

#[test]
fn failing_explainer_falls_back_after_one_attempt() {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = OracleEngine::new(OracleConfig::builtin())
        .with_explainer(Box::new(DownExplainer { calls: calls.clone() }));

    let out = engine.explain("creator-hub.fun", now());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.source, ExplanationSource::Heuristic);
    assert_eq!(out.result, engine.score("creator-hub.fun"));
}

#[test]
fn model_reply_is_used_and_normalized() {
    let engine = OracleEngine::new(OracleConfig::builtin())
        .with_explainer(Box::new(CannedExplainer(GOOD_REPLY)));

    let out = engine.explain("  Vibe.fun ", now());

    assert_eq!(out.domain, "vibe.fun");
    assert_eq!(out.source, ExplanationSource::Model);
    assert_eq!(out.result.score, 91);
    assert_eq!(out.result.verdict, Verdict::Strong);
    assert_eq!(out.result.reasons, vec!["Punchy", "Memorable"]);
}

#[test]
fn malformed_model_reply_falls_back() {
    let engine = OracleEngine::new(OracleConfig::builtin())
        .with_explainer(Box::new(CannedExplainer("sorry, no JSON today")));

    let out = engine.explain("vibe.fun", now());
    assert_eq!(out.source, ExplanationSource::Heuristic);
}

#[test]
fn no_explainer_means_heuristic() {
    let engine = OracleEngine::new(OracleConfig::builtin());
    let out = engine.explain("vibe.fun", now());
    assert_eq!(out.source, ExplanationSource::Heuristic);

    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["source"], "heuristic");
    assert!(json["score"].is_u64());
    assert!(json["features"]["labelLen"].is_u64());
}
