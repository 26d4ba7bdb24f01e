//! Optional language-model explainer.
//!
//! The model is an unreliable collaborator: one attempt, and on any error
//! or malformed reply the heuristic scorer answers instead. Failures are
//! logged, never returned to the caller.

use crate::{
    error::{OracleError, OracleResult},
    scorer::{DomainFeatures, DomainScorer, ScoreResult, Verdict},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};

/// Anything that can turn a domain into a verdict out-of-process.
pub trait DomainExplainer: Send + Sync {
    fn name(&self) -> &'static str;

    fn explain(&self, domain: &str) -> OracleResult<ScoreResult>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Model,
    Heuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainExplanation {
    pub domain: String,
    pub source: ExplanationSource,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub generated_at: Timestamp,
}

/// Score `domain`, preferring the explainer when one is configured.
pub fn explain_domain(
    explainer: Option<&dyn DomainExplainer>,
    scorer: &DomainScorer<'_>,
    domain: &str,
    now: Timestamp,
) -> DomainExplanation {
    let domain = domain.trim().to_lowercase();

    if let Some(explainer) = explainer {
        match explainer.explain(&domain) {
            Ok(result) => {
                return DomainExplanation {
                    domain,
                    source: ExplanationSource::Model,
                    result: result.normalized(),
                    generated_at: now,
                };
            }
            Err(e) => {
                log::warn!("explainer '{}' failed for {domain}, using heuristic: {e}", explainer.name());
            }
        }
    }

    DomainExplanation {
        result: scorer.score(&domain),
        domain,
        source: ExplanationSource::Heuristic,
        generated_at: now,
    }
}

/// Prompt asking the model for a verdict in the `ScoreResult` schema.
pub fn explainer_prompt(domain: &str, tld: &str) -> String {
    let len = domain.chars().count();
    format!(
        r#"You are a domain name appraiser for the .{tld} TLD.
Analyze the domain "{domain}".

Context:
- .{tld} domains are popular for memes, creators, AI agents, and games.
- Short, punchy, and culturally relevant names are best.

Return a JSON object strictly matching this schema:
{{
  "score": number (0-100),
  "verdict": "strong" | "okay" | "weak",
  "reasons": ["string", "string", "string"], (3-4 bullet points explaining why),
  "cautions": ["string", "string"], (1-2 downsides),
  "features": {{
    "label": "{domain}",
    "labelLen": {len},
    "tokens": ["word1", "word2"],
    "hasHyphen": boolean,
    "hasDigits": boolean,
    "vowelPct": number
  }}
}}
Response must be valid JSON only."#
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelReply {
    score: f64,
    #[serde(default)]
    reasons: Vec<String>,
    #[serde(default)]
    cautions: Vec<String>,
    features: ModelFeatures,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelFeatures {
    label: String,
    #[serde(default)]
    label_len: Option<usize>,
    #[serde(default)]
    tokens: Vec<String>,
    #[serde(default)]
    has_hyphen: Option<bool>,
    #[serde(default)]
    has_digits: Option<bool>,
    #[serde(default)]
    vowel_pct: Option<f64>,
}

/// Parse a model reply into a `ScoreResult`. The model's own verdict is
/// ignored; it is re-derived from the clamped score.
pub fn parse_explainer_reply(text: &str) -> OracleResult<ScoreResult> {
    let json = extract_json_object(text).ok_or_else(|| OracleError::Explainer {
        reason: "reply contains no JSON object".into(),
    })?;
    let reply: ModelReply = serde_json::from_str(json).map_err(|e| OracleError::Explainer {
        reason: format!("reply does not match schema: {e}"),
    })?;
    if !reply.score.is_finite() {
        return Err(OracleError::Explainer {
            reason: "score is not a finite number".into(),
        });
    }

    let f = reply.features;
    let score = reply.score.round().clamp(0.0, 100.0) as u32;
    Ok(ScoreResult {
        score,
        verdict: Verdict::from_score(score),
        reasons: reply.reasons,
        cautions: reply.cautions,
        features: DomainFeatures {
            label_len: f.label_len.unwrap_or_else(|| f.label.chars().count()),
            has_hyphen: f.has_hyphen.unwrap_or_else(|| f.label.contains('-')),
            has_digits: f
                .has_digits
                .unwrap_or_else(|| f.label.chars().any(|c| c.is_ascii_digit())),
            vowel_pct: f.vowel_pct.map(|v| v.round().clamp(0.0, 100.0) as u32).unwrap_or(0),
            tokens: f.tokens,
            label: f.label,
        },
    }
    .normalized())
}

/// Cut the outermost `{ ... }` out of a reply, tolerating code fences
/// and prose around it.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_reply() {
        let text = "Here you go:\n```json\n{\"score\": 81.6, \"verdict\": \"weak\", \
                    \"reasons\": [\"short\", \"short\"], \"cautions\": [], \
                    \"features\": {\"label\": \"vibe\", \"labelLen\": 4, \"tokens\": [\"vibe\"], \
                    \"hasHyphen\": false, \"hasDigits\": false, \"vowelPct\": 50}}\n```";
        let r = parse_explainer_reply(text).unwrap();
        assert_eq!(r.score, 82);
        assert_eq!(r.verdict, Verdict::Strong);
        assert_eq!(r.reasons, vec!["short"]);
        assert_eq!(r.features.vowel_pct, 50);
    }

    #[test]
    fn rejects_reply_without_object() {
        assert!(parse_explainer_reply("I cannot help with that").is_err());
        assert!(parse_explainer_reply("} {").is_err());
    }

    #[test]
    fn rejects_reply_missing_features() {
        assert!(parse_explainer_reply(r#"{"score": 50}"#).is_err());
    }

    #[test]
    fn prompt_mentions_domain_and_length() {
        let p = explainer_prompt("meme.fun", "fun");
        assert!(p.contains("\"meme.fun\""));
        assert!(p.contains("\"labelLen\": 8"));
    }
}
