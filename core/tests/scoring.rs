use funstr_core::{
    config::OracleConfig,
    engine::OracleEngine,
    scorer::{DomainScorer, Verdict},
};
use std::collections::HashSet;

#[test]
fn ai_fun_is_held_back_by_length() {
    let config = OracleConfig::builtin();
    let r = DomainScorer::new(&config).score("ai.fun");

    // 50 - 12 (len ≤ 3) - 6 (vowels 100%) + 10 (one vocabulary hit)
    assert_eq!(r.score, 42);
    assert_eq!(r.verdict, Verdict::Weak);
    assert_eq!(r.features.label, "ai");
    assert_eq!(r.features.label_len, 2);
    assert!(r.reasons.iter().any(|s| s.contains("market keyword(s): ai")));
}

#[test]
fn creator_hub_reads_as_market_pattern() {
    let config = OracleConfig::builtin();
    let r = DomainScorer::new(&config).score("creator-hub.fun");

    // 50 + 2 (len 11) - 8 (hyphen) + 6 (vowels 40%) + 14 (capped vocabulary bonus)
    assert_eq!(r.score, 64);
    assert_eq!(r.verdict, Verdict::Okay);
    assert!(r.reasons.contains(&"Market pattern: creator + hub".to_string()));
    assert!(r.cautions.iter().any(|c| c.starts_with("Hyphenated")));
    assert!(r.features.has_hyphen);
    assert_eq!(r.features.tokens, vec!["creator", "hub"]);
}

#[test]
fn culture_numeric_softens_digit_penalty() {
    let config = OracleConfig::builtin();
    let scorer = DomainScorer::new(&config);
    let numeric = scorer.score("meme-404.fun");
    let plain_digits = scorer.score("meme-123.fun");

    assert!(numeric.score > plain_digits.score);
    assert!(numeric.reasons.iter().any(|r| r.contains("404")));
    assert!(plain_digits.cautions.iter().any(|c| c.starts_with("Digits")));
}

#[test]
fn malformed_input_degrades_instead_of_failing() {
    let config = OracleConfig::builtin();
    let scorer = DomainScorer::new(&config);
    let inputs = [
        "",
        "   ",
        ".fun",
        "...",
        "ÜNÏCÖDÉ.fun",
        "a--b__c.fun",
        "x".repeat(200).as_str(),
        "1234567890.fun",
        "  MiXeD-CaSe.FUN  ",
    ]
    .map(String::from);

    for input in &inputs {
        let r = scorer.score(input);
        assert!(r.score <= 100, "{input}: {}", r.score);
        assert_eq!(r.verdict, Verdict::from_score(r.score), "{input}");
        assert!(r.reasons.len() <= 6 && r.cautions.len() <= 5, "{input}");
    }
    assert_eq!(scorer.score("  MiXeD-CaSe.FUN  ").features.label, "mixed-case");
}

#[test]
fn reasons_and_cautions_are_distinct() {
    let engine = OracleEngine::new(OracleConfig::builtin());
    for d in ["meme-meme.fun", "labs-lab.fun", "69-420.fun", "vibe.fun"] {
        let r = engine.score(d);
        let reasons: HashSet<&String> = r.reasons.iter().collect();
        let cautions: HashSet<&String> = r.cautions.iter().collect();
        assert_eq!(reasons.len(), r.reasons.len(), "{d}");
        assert_eq!(cautions.len(), r.cautions.len(), "{d}");
    }
}
