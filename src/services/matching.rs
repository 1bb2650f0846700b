//! Fuzzy matching between local agent names and scraped leaderboard names.
//!
//! Leaderboards decorate agent names with model identifiers ("AgentX +
//! claude-4-sonnet"), so matching ignores model-family tokens and anchors on
//! the leading brand token.

use std::collections::{BTreeMap, BTreeSet};

/// Model-family noise stripped before token comparison.
const IGNORED_TOKENS: &[&str] = &[
    "gpt", "claude", "sonnet", "opus", "haiku", "gemini", "pro", "flash", "preview", "mini",
    "turbo", "4", "3", "3.5", "5", "4o", "o1", "step", "v1", "v2", "plus", "tools",
];

/// Lowercases and flattens `+ _ - .` separators to single spaces.
pub fn normalize_name(name: &str) -> String {
    let flattened: String = name
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '+' | '_' | '-' | '.') { ' ' } else { c })
        .collect();
    flattened.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether two normalized names refer to the same agent.
///
/// Exact match wins; otherwise the leading tokens must match (or contain one
/// another) and every token of the shorter name must appear in the longer.
/// When filtering leaves no tokens at all (a name that is pure model noise),
/// the original tokens are used instead.
pub fn names_match(wanted_norm: &str, scraped_norm: &str) -> bool {
    if wanted_norm == scraped_norm {
        return true;
    }

    let wanted = significant_tokens(wanted_norm);
    let scraped = significant_tokens(scraped_norm);
    let (Some(wanted_first), Some(scraped_first)) = (wanted.first(), scraped.first()) else {
        return false;
    };
    if wanted_first != scraped_first
        && !wanted_first.contains(scraped_first)
        && !scraped_first.contains(wanted_first)
    {
        return false;
    }

    let wanted_set: BTreeSet<&str> = wanted.iter().copied().collect();
    let scraped_set: BTreeSet<&str> = scraped.iter().copied().collect();
    let common = wanted_set.intersection(&scraped_set).count();
    common >= wanted_set.len().min(scraped_set.len())
}

fn significant_tokens(norm: &str) -> Vec<&str> {
    let all: Vec<&str> = norm.split(' ').filter(|t| !t.is_empty()).collect();
    let kept: Vec<&str> = all
        .iter()
        .copied()
        .filter(|t| !IGNORED_TOKENS.contains(t))
        .collect();
    if kept.is_empty() {
        all
    } else {
        kept
    }
}

/// Maps scraped names back to the local agent names they match.
pub struct AgentMatcher {
    /// Normalized form to original local name, iterated in sorted order so
    /// the first match is deterministic.
    wanted: BTreeMap<String, String>,
}

impl AgentMatcher {
    pub fn new(local_agents: impl IntoIterator<Item = String>) -> Self {
        let wanted = local_agents
            .into_iter()
            .map(|agent| (normalize_name(&agent), agent))
            .collect();
        Self { wanted }
    }

    pub fn len(&self) -> usize {
        self.wanted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wanted.is_empty()
    }

    /// The local agent a scraped name belongs to, if any.
    pub fn match_for(&self, scraped_name: &str) -> Option<&str> {
        let scraped_norm = normalize_name(scraped_name);
        self.wanted
            .iter()
            .find(|(wanted_norm, _)| names_match(wanted_norm, &scraped_norm))
            .map(|(_, original)| original.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_flattens_separators() {
        assert_eq!(normalize_name("SWE-Agent_v2.0"), "swe agent v2 0");
        assert_eq!(normalize_name("OpenHands + Claude-4"), "openhands claude 4");
        assert_eq!(normalize_name("  Spaced   Out  "), "spaced out");
    }

    #[test]
    fn test_exact_normalized_match() {
        assert!(names_match("swe agent", "swe agent"));
    }

    #[test]
    fn test_model_noise_is_ignored() {
        let wanted = normalize_name("OpenHands");
        let scraped = normalize_name("OpenHands + GPT-5 preview");
        assert!(names_match(&wanted, &scraped));
    }

    #[test]
    fn test_brand_token_must_match() {
        let wanted = normalize_name("Epam-Agent claude-4");
        let scraped = normalize_name("Moatless claude-4");
        assert!(!names_match(&wanted, &scraped));
    }

    #[test]
    fn test_brand_containment_is_insufficient_without_overlap() {
        // First tokens overlap by containment, but the shorter token set
        // still has to be covered.
        let wanted = normalize_name("live-swe-agent");
        let scraped = normalize_name("livesweagent");
        assert!(!names_match(&wanted, &scraped));
    }

    #[test]
    fn test_pure_model_names_fall_back_to_raw_tokens() {
        let wanted = normalize_name("claude-4");
        assert!(names_match(&wanted, &normalize_name("claude 4 tools")));
        assert!(!names_match(&wanted, &normalize_name("claude-5")));
    }

    #[test]
    fn test_shorter_token_set_must_be_covered() {
        let wanted = normalize_name("Agentless");
        assert!(names_match(&wanted, &normalize_name("Agentless-Lite gpt-4")));
        // Brand matches but the remaining tokens diverge.
        assert!(!names_match(
            &normalize_name("swe-agent-pro-max"),
            &normalize_name("swe-agent-ultra")
        ));
    }

    #[test]
    fn test_matcher_prefers_lexicographically_first_local_agent() {
        let matcher = AgentMatcher::new(vec![
            "Agentless-Lite".to_string(),
            "Agentless".to_string(),
        ]);
        assert_eq!(matcher.len(), 2);
        assert_eq!(matcher.match_for("agentless + claude-4"), Some("Agentless"));
        assert_eq!(matcher.match_for("Unrelated"), None);
    }
}
