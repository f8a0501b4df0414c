use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Fresher,
    Junior,
    Mid,
    Experienced,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Fresher => "fresher",
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Experienced => "experienced",
        }
    }

    /// Difficulty label used on generated technical fallbacks
    pub fn difficulty(self) -> &'static str {
        match self {
            ExperienceLevel::Fresher => "Easy",
            ExperienceLevel::Junior => "Medium",
            ExperienceLevel::Mid | ExperienceLevel::Experienced => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoundType {
    Aptitude,
    Technical,
    Managerial,
    Coding,
    Debug,
    Hr,
}

/// One round of a company's interview process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoundType,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AptitudeQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Letter of the right option, possibly decorated ("A", "A: 8", "(C)")
    pub correct: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topic: String,
}

impl AptitudeQuestion {
    /// Compare a selected option letter to the keyed answer
    pub fn is_correct(&self, selected: &str) -> bool {
        let key: String = self
            .correct
            .chars()
            .filter(|c| matches!(c, 'A'..='D'))
            .collect();
        !key.is_empty() && key == selected.trim()
    }
}

/// Technical and managerial rounds share this shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenQuestion {
    pub question: String,
    #[serde(default)]
    pub expected_points: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_hint: Option<String>,
    /// situational | behavioral | hypothetical
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugQuestion {
    pub question: String,
    pub code: String,
    #[serde(default)]
    pub bug: String,
    #[serde(default)]
    pub fix: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "questions", rename_all = "lowercase")]
pub enum QuestionSet {
    Aptitude(Vec<AptitudeQuestion>),
    Open(Vec<OpenQuestion>),
    Debug(Vec<DebugQuestion>),
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        match self {
            QuestionSet::Aptitude(q) => q.len(),
            QuestionSet::Open(q) => q.len(),
            QuestionSet::Debug(q) => q.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scored feedback for one open-ended or HR answer.
///
/// Technical replies fill `correct`/`feedback`; HR replies fill the
/// assessment fields. Everything is optional because the model decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better_answer: Option<String>,
}

impl Evaluation {
    pub fn technical(score: u8, correct: bool, feedback: impl Into<String>) -> Self {
        Self {
            score,
            correct: Some(correct),
            feedback: Some(feedback.into()),
            assessment: None,
            strengths: Vec::new(),
            improvements: Vec::new(),
            better_answer: None,
        }
    }

    pub fn hr(
        score: u8,
        assessment: &str,
        strengths: &[&str],
        improvements: &[&str],
        better_answer: impl Into<String>,
    ) -> Self {
        Self {
            score,
            correct: None,
            feedback: None,
            assessment: Some(assessment.to_string()),
            strengths: strengths.iter().map(|s| s.to_string()).collect(),
            improvements: improvements.iter().map(|s| s.to_string()).collect(),
            better_answer: Some(better_answer.into()),
        }
    }
}
