use super::types::{ExperienceLevel, RoundType};

/// Prompt descriptors and pacing for one experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProfile {
    pub label: &'static str,
    pub aptitude_difficulty: &'static str,
    pub technical_difficulty: &'static str,
    pub coding_difficulty: &'static str,
    pub managerial_context: &'static str,
    pub hr_context: &'static str,
    pub counts: RoundCounts,
    /// Seconds per question, by round
    pub time_per_question: RoundCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCounts {
    pub aptitude: u32,
    pub technical: u32,
    pub coding: u32,
    pub managerial: u32,
    pub hr: u32,
}

impl RoundCounts {
    pub fn for_round(&self, round: RoundType) -> u32 {
        match round {
            RoundType::Aptitude => self.aptitude,
            RoundType::Technical => self.technical,
            RoundType::Coding | RoundType::Debug => self.coding,
            RoundType::Managerial => self.managerial,
            RoundType::Hr => self.hr,
        }
    }
}

const FRESHER: LevelProfile = LevelProfile {
    label: "fresher (0-1 year, college graduate)",
    aptitude_difficulty: "easy to medium",
    technical_difficulty: "basic fundamentals, definitions, simple examples",
    coding_difficulty: "easy (arrays, loops, basic sorting, simple recursion)",
    managerial_context: "college projects, internship situations, academic teamwork",
    hr_context: "college background, career goals, self-introduction",
    counts: RoundCounts {
        aptitude: 8,
        technical: 6,
        coding: 5,
        managerial: 6,
        hr: 6,
    },
    time_per_question: RoundCounts {
        aptitude: 90,
        technical: 300,
        coding: 600,
        managerial: 180,
        hr: 240,
    },
};

const JUNIOR: LevelProfile = LevelProfile {
    label: "junior professional (1-3 years experience)",
    aptitude_difficulty: "medium",
    technical_difficulty: "intermediate: applied concepts, real scenarios, debugging",
    coding_difficulty: "easy-medium (data structures, two-pointer, basic DP)",
    managerial_context: "early career situations, peer collaboration, small team challenges",
    hr_context: "early work experience, first job learnings, career transitions",
    counts: RoundCounts {
        aptitude: 8,
        technical: 6,
        coding: 5,
        managerial: 6,
        hr: 6,
    },
    time_per_question: RoundCounts {
        aptitude: 75,
        technical: 360,
        coding: 720,
        managerial: 210,
        hr: 240,
    },
};

const MID: LevelProfile = LevelProfile {
    label: "mid-level professional (3-6 years experience)",
    aptitude_difficulty: "medium to hard",
    technical_difficulty: "advanced: system internals, architecture, performance trade-offs",
    coding_difficulty: "medium-hard (graph algorithms, dynamic programming, system design)",
    managerial_context: "cross-team projects, mentoring juniors, conflict resolution",
    hr_context: "career growth, leadership, major project achievements",
    counts: RoundCounts {
        aptitude: 8,
        technical: 7,
        coding: 5,
        managerial: 6,
        hr: 6,
    },
    time_per_question: RoundCounts {
        aptitude: 60,
        technical: 420,
        coding: 900,
        managerial: 240,
        hr: 300,
    },
};

const EXPERIENCED: LevelProfile = LevelProfile {
    label: "senior/experienced professional (6+ years)",
    aptitude_difficulty: "hard: complex logical and analytical reasoning",
    technical_difficulty:
        "expert: design patterns, distributed systems, scalability, architecture decisions",
    coding_difficulty: "hard (complex algorithms, system design, optimization)",
    managerial_context:
        "strategic decisions, stakeholder management, team building, P&L ownership",
    hr_context: "leadership philosophy, organizational impact, vision, compensation negotiation",
    counts: RoundCounts {
        aptitude: 8,
        technical: 7,
        coding: 5,
        managerial: 7,
        hr: 6,
    },
    time_per_question: RoundCounts {
        aptitude: 60,
        technical: 480,
        coding: 1200,
        managerial: 300,
        hr: 300,
    },
};

impl ExperienceLevel {
    pub fn profile(self) -> &'static LevelProfile {
        match self {
            ExperienceLevel::Fresher => &FRESHER,
            ExperienceLevel::Junior => &JUNIOR,
            ExperienceLevel::Mid => &MID,
            ExperienceLevel::Experienced => &EXPERIENCED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_grow_with_seniority() {
        let fresher = ExperienceLevel::Fresher.profile();
        let senior = ExperienceLevel::Experienced.profile();
        assert_eq!(fresher.counts.for_round(RoundType::Technical), 6);
        assert_eq!(senior.counts.for_round(RoundType::Technical), 7);
        assert_eq!(senior.counts.for_round(RoundType::Debug), 5);
        assert!(senior.time_per_question.coding > fresher.time_per_question.coding);
    }
}
