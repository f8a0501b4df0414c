use serde::{Deserialize, Serialize};

use crate::questions::ExperienceLevel;

/// Who is being interviewed, for what
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Company name, substituted into prompts
    pub company: String,

    /// Role the candidate applied for
    pub role: String,

    #[serde(default)]
    pub level: ExperienceLevel,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            company: "the company".to_string(),
            role: "Software Engineer".to_string(),
            level: ExperienceLevel::Fresher,
        }
    }
}
