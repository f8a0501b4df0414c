use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json|```").expect("fence pattern is valid"));

static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)score["\s:]+(\d+)"#).expect("score pattern is valid"));

/// Remove markdown code fences around a model reply
pub fn strip_code_fences(text: &str) -> String {
    FENCE.replace_all(text, "").trim().to_string()
}

/// Parse a fenced or bare JSON array; `None` unless it has at least one entry
pub fn parse_non_empty_array<T: DeserializeOwned>(text: &str) -> Option<Vec<T>> {
    serde_json::from_str::<Vec<T>>(&strip_code_fences(text))
        .ok()
        .filter(|items| !items.is_empty())
}

/// Pull a `"score": N` out of a reply that isn't valid JSON
pub fn salvage_score(text: &str) -> Option<u8> {
    let digits = SCORE.captures(text)?.get(1)?.as_str();
    let value: u32 = digits.parse().ok()?;
    Some(value.min(100) as u8)
}

/// First `max` characters, respecting char boundaries
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("  [3] "), "[3]");
    }

    #[test]
    fn test_parse_rejects_empty_and_objects() {
        assert_eq!(parse_non_empty_array::<u32>("```json\n[1,2]```"), Some(vec![1, 2]));
        assert_eq!(parse_non_empty_array::<u32>("[]"), None);
        assert_eq!(parse_non_empty_array::<u32>("{\"a\":1}"), None);
        assert_eq!(parse_non_empty_array::<u32>("not json"), None);
    }

    #[test]
    fn test_salvage_score_variants() {
        assert_eq!(salvage_score(r#"{"score": 72, "feedback": "cut off"#), Some(72));
        assert_eq!(salvage_score("Score: 85 overall"), Some(85));
        assert_eq!(salvage_score("SCORE 40"), Some(40));
        assert_eq!(salvage_score("no number here"), None);
        assert_eq!(salvage_score("score: 450"), Some(100));
    }

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }
}
