use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

use super::fallback;
use super::parse::parse_non_empty_array;
use super::prompts;
use super::types::{ExperienceLevel, QuestionSet, Round, RoundType};
use crate::llm::TextGenerator;
use crate::outcome::Outcome;

static LANGUAGE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)java|python|c\+\+|javascript|kotlin").expect("language pattern is valid")
});

const DEFAULT_DEBUG_LANGUAGE: &str = "Java";

/// Language for a coding round: the first topic naming one, else Java
pub fn debug_language(round: &Round) -> &str {
    round
        .topics
        .iter()
        .find(|t| LANGUAGE_HINT.is_match(t))
        .map(String::as_str)
        .unwrap_or(DEFAULT_DEBUG_LANGUAGE)
}

/// Generates round questions, degrading to the hardcoded banks
#[derive(Clone)]
pub struct QuestionGenerator {
    text: Arc<dyn TextGenerator>,
}

impl QuestionGenerator {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    /// Questions for one round of a company's process.
    ///
    /// Never `Failed`: any generation or parse problem serves the bank for
    /// this round type and level.
    pub async fn questions_for_round(
        &self,
        company: &str,
        round: &Round,
        level: ExperienceLevel,
    ) -> Outcome<QuestionSet> {
        let counts = level.profile().counts;
        let count = counts.for_round(round.kind);

        let (prompt, max_tokens) = match round.kind {
            RoundType::Aptitude => (
                prompts::aptitude(company, level, count),
                prompts::APTITUDE_MAX_TOKENS,
            ),
            RoundType::Managerial => (
                prompts::managerial(company, &round.name, &round.topics, level, count),
                prompts::MANAGERIAL_MAX_TOKENS,
            ),
            RoundType::Coding | RoundType::Debug => (
                prompts::debug(debug_language(round), level, count),
                prompts::DEBUG_MAX_TOKENS,
            ),
            RoundType::Technical | RoundType::Hr => (
                prompts::technical(
                    company,
                    &round.name,
                    &round.topics,
                    level,
                    counts.technical,
                ),
                prompts::TECHNICAL_MAX_TOKENS,
            ),
        };

        let reply = match self.text.generate(&prompt, max_tokens).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(round = %round.name, "Question generation failed: {}", e);
                return Outcome::fallback(
                    fallback::for_round(round, level),
                    format!("generation failed: {}", e),
                );
            }
        };

        let parsed = match round.kind {
            RoundType::Aptitude => parse_non_empty_array(&reply).map(QuestionSet::Aptitude),
            RoundType::Coding | RoundType::Debug => {
                parse_non_empty_array(&reply).map(QuestionSet::Debug)
            }
            _ => parse_non_empty_array(&reply).map(QuestionSet::Open),
        };

        match parsed {
            Some(set) => {
                info!(round = %round.name, count = set.len(), "Generated round questions");
                Outcome::ok(set)
            }
            None => {
                warn!(round = %round.name, "Unparseable question reply, serving fallback bank");
                Outcome::fallback(
                    fallback::for_round(round, level),
                    "reply was not a non-empty JSON array",
                )
            }
        }
    }

    /// Standalone debugging drill for a language; no bank backs this one
    pub async fn debug_questions(
        &self,
        language: &str,
        level: ExperienceLevel,
    ) -> Outcome<QuestionSet> {
        let prompt = prompts::debug(language, level, level.profile().counts.coding);
        match self.text.generate(&prompt, prompts::DEBUG_MAX_TOKENS).await {
            Ok(reply) => match parse_non_empty_array(&reply) {
                Some(questions) => Outcome::ok(QuestionSet::Debug(questions)),
                None => Outcome::failed("reply was not a non-empty JSON array"),
            },
            Err(e) => Outcome::failed(format!("generation failed: {}", e)),
        }
    }

    /// HR interview questions; the six company-templated defaults on failure
    pub async fn hr_questions(
        &self,
        company: &str,
        role: &str,
        level: ExperienceLevel,
    ) -> Outcome<Vec<String>> {
        let prompt = prompts::hr_questions(company, role, level);
        match self.text.generate(&prompt, prompts::HR_QUESTIONS_MAX_TOKENS).await {
            Ok(reply) => match parse_non_empty_array::<String>(&reply) {
                Some(questions) => Outcome::ok(questions),
                None => {
                    warn!("Unparseable HR question reply, using defaults");
                    Outcome::fallback(
                        fallback::hr_questions(company),
                        "reply was not a non-empty JSON array",
                    )
                }
            },
            Err(e) => {
                warn!("HR question generation failed: {}", e);
                Outcome::fallback(
                    fallback::hr_questions(company),
                    format!("generation failed: {}", e),
                )
            }
        }
    }
}
