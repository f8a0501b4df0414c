pub mod evaluator;
pub mod fallback;
pub mod generator;
pub mod levels;
pub mod parse;
pub mod prompts;
pub mod types;

pub use evaluator::AnswerEvaluator;
pub use generator::{debug_language, QuestionGenerator};
pub use levels::{LevelProfile, RoundCounts};
pub use parse::{salvage_score, strip_code_fences};
pub use types::{
    AptitudeQuestion, DebugQuestion, Evaluation, ExperienceLevel, OpenQuestion, QuestionSet, Round,
    RoundType,
};
