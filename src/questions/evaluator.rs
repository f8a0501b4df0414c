use std::sync::Arc;
use tracing::{debug, warn};

use super::parse::{salvage_score, strip_code_fences, truncate_chars};
use super::prompts;
use super::types::{Evaluation, ExperienceLevel};
use crate::llm::TextGenerator;
use crate::outcome::Outcome;

const MIN_TECHNICAL_ANSWER_CHARS: usize = 15;
const MIN_HR_ANSWER_CHARS: usize = 10;

const TECHNICAL_DEFAULT_SCORE: u8 = 50;
const HR_DEFAULT_SCORE: u8 = 60;

/// Scores open-ended and HR answers through the text generator.
///
/// Short answers are judged locally. A reply that isn't JSON still yields a
/// score when one can be found in the text.
#[derive(Clone)]
pub struct AnswerEvaluator {
    text: Arc<dyn TextGenerator>,
}

impl AnswerEvaluator {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    pub async fn evaluate_technical(
        &self,
        question: &str,
        answer: &str,
        expected_points: &[String],
        company: &str,
        level: ExperienceLevel,
    ) -> Outcome<Evaluation> {
        if answer.trim().chars().count() < MIN_TECHNICAL_ANSWER_CHARS {
            return Outcome::ok(Evaluation::technical(
                15,
                false,
                "Answer too short. Please explain in detail.",
            ));
        }

        let prompt = prompts::evaluate_technical(question, answer, expected_points, company, level);
        let reply = match self
            .text
            .generate(&prompt, prompts::EVAL_TECHNICAL_MAX_TOKENS)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Technical evaluation unavailable: {}", e);
                return Outcome::fallback(
                    Evaluation::technical(
                        TECHNICAL_DEFAULT_SCORE,
                        false,
                        "Unable to evaluate. Review the expected key points.",
                    ),
                    format!("generation failed: {}", e),
                );
            }
        };

        match serde_json::from_str::<Evaluation>(&strip_code_fences(&reply)) {
            Ok(mut evaluation) => {
                evaluation.score = evaluation.score.min(100);
                if evaluation.correct.is_none() {
                    evaluation.correct = Some(evaluation.score >= 60);
                }
                debug!(score = evaluation.score, "Technical answer evaluated");
                Outcome::ok(evaluation)
            }
            Err(e) => {
                let score = salvage_score(&reply).unwrap_or(TECHNICAL_DEFAULT_SCORE);
                warn!(score, "Unparseable technical evaluation, salvaged score");
                Outcome::fallback(
                    Evaluation::technical(score, false, truncate_chars(&reply, 250)),
                    format!("invalid evaluation JSON: {}", e),
                )
            }
        }
    }

    pub async fn evaluate_hr(
        &self,
        question: &str,
        answer: &str,
        company: &str,
        level: ExperienceLevel,
    ) -> Outcome<Evaluation> {
        if answer.trim().chars().count() < MIN_HR_ANSWER_CHARS {
            return Outcome::ok(Evaluation::hr(
                20,
                "Insufficient",
                &[],
                &["Please provide a detailed answer"],
                "Give a structured response using the STAR method.",
            ));
        }

        let prompt = prompts::evaluate_hr(question, answer, company, level);
        let reply = match self.text.generate(&prompt, prompts::EVAL_HR_MAX_TOKENS).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("HR evaluation unavailable: {}", e);
                return Outcome::fallback(
                    Evaluation::hr(
                        HR_DEFAULT_SCORE,
                        "Average",
                        &["Answered the question"],
                        &["Add specific examples", "Use STAR method"],
                        "Structure your answer with a clear situation, task, action, and result.",
                    ),
                    format!("generation failed: {}", e),
                );
            }
        };

        match serde_json::from_str::<Evaluation>(&strip_code_fences(&reply)) {
            Ok(mut evaluation) => {
                evaluation.score = evaluation.score.min(100);
                debug!(score = evaluation.score, "HR answer evaluated");
                Outcome::ok(evaluation)
            }
            Err(e) => {
                let score = salvage_score(&reply).unwrap_or(HR_DEFAULT_SCORE);
                warn!(score, "Unparseable HR evaluation, salvaged score");
                Outcome::fallback(
                    Evaluation::hr(
                        score,
                        "Average",
                        &[],
                        &[],
                        truncate_chars(&reply, 200),
                    ),
                    format!("invalid evaluation JSON: {}", e),
                )
            }
        }
    }
}
