//! Prompt templates for question generation and answer scoring.
//!
//! Every template asks for bare JSON; replies are still run through
//! `strip_code_fences` because models wrap them anyway.

use super::types::ExperienceLevel;

pub const APTITUDE_MAX_TOKENS: u32 = 2000;
pub const TECHNICAL_MAX_TOKENS: u32 = 2000;
pub const MANAGERIAL_MAX_TOKENS: u32 = 2000;
pub const DEBUG_MAX_TOKENS: u32 = 2500;
pub const HR_QUESTIONS_MAX_TOKENS: u32 = 800;
pub const EVAL_TECHNICAL_MAX_TOKENS: u32 = 500;
pub const EVAL_HR_MAX_TOKENS: u32 = 700;

pub fn aptitude(company: &str, level: ExperienceLevel, count: u32) -> String {
    let lp = level.profile();
    format!(
        r#"Generate {count} multiple choice aptitude questions for a {label} candidate applying at {company}.

Difficulty: {diff}
Mix of topics: quantitative reasoning (40%), logical reasoning (35%), verbal ability (25%)

IMPORTANT level rules:
- Fresher: basic arithmetic, simple series, easy analogies
- Junior: moderate percentages, data interpretation, medium puzzles
- Mid: advanced data sufficiency, complex reasoning chains
- Experienced: hard analytical reasoning, business case math

Return ONLY a valid JSON array, NO markdown, NO explanation:
[{{"question":"...","options":["A: text","B: text","C: text","D: text"],"correct":"A","explanation":"step-by-step solution","difficulty":"Easy|Medium|Hard","topic":"Quantitative|Logical|Verbal"}}]"#,
        label = lp.label,
        diff = lp.aptitude_difficulty,
    )
}

pub fn technical(
    company: &str,
    round_name: &str,
    topics: &[String],
    level: ExperienceLevel,
    count: u32,
) -> String {
    let lp = level.profile();
    format!(
        r#"Generate {count} technical interview questions for a {label} candidate.

Company: {company}
Round: {round_name}
Topics: {topics}
Difficulty: {diff}

IMPORTANT level rules:
- Fresher: basic definitions, simple examples, "what is X", "explain Y"
- Junior: "how does X work internally", "compare X vs Y", "when would you use X"
- Mid: "design X", "what are trade-offs of Y", "debug this scenario"
- Experienced: "architect a system for X", "how would you scale Y", "what decisions would you make for Z"

Questions must be open-ended conceptual (NO code writing required).

Return ONLY valid JSON array, NO markdown:
[{{"question":"...","expectedPoints":["point 1","point 2","point 3"],"difficulty":"Easy|Medium|Hard","topic":"topic name","levelHint":"what a {level} answer should include"}}]"#,
        label = lp.label,
        topics = topics.join(", "),
        diff = lp.technical_difficulty,
        level = level.as_str(),
    )
}

pub fn managerial(
    company: &str,
    round_name: &str,
    topics: &[String],
    level: ExperienceLevel,
    count: u32,
) -> String {
    let lp = level.profile();
    format!(
        r#"Generate {count} managerial/behavioral interview questions for a {label} candidate.

Company: {company}
Round: {round_name}
Topics: {topics}
Context: {context}

IMPORTANT level rules:
- Fresher: focus on college projects, internships, academic teamwork, hypothetical scenarios
- Junior: focus on early work situations, learning from mistakes, working with peers
- Mid: focus on leading small teams, cross-functional work, influencing without authority
- Experienced: focus on strategic decisions, building teams, organizational change, P&L impact

Use STAR method prompts. Mix situational ("tell me about a time...") and hypothetical ("how would you handle...") questions.

Return ONLY valid JSON array, NO markdown:
[{{"question":"...","expectedPoints":["STAR element 1","STAR element 2","key behavioral indicator"],"difficulty":"Easy|Medium|Hard","topic":"topic name","type":"situational|behavioral|hypothetical"}}]"#,
        label = lp.label,
        topics = topics.join(", "),
        context = lp.managerial_context,
    )
}

pub fn debug(language: &str, level: ExperienceLevel, count: u32) -> String {
    let lp = level.profile();
    format!(
        r#"Generate {count} {language} code debugging/fix questions for a {label} developer.

Difficulty: {diff}

IMPORTANT level rules:
- Fresher: basic syntax errors, off-by-one errors, simple null checks, basic loop bugs
- Junior: logic errors in standard algorithms, incorrect data structure usage, edge case bugs
- Mid: concurrency issues, memory leaks, performance anti-patterns, race conditions
- Experienced: architectural bugs, security vulnerabilities, distributed system issues, optimization problems

Each question has a SHORT buggy code snippet (max 20 lines) with 1-2 clear bugs.

Return ONLY valid JSON array, NO markdown:
[{{"question":"Find and fix the bug(s) in this {language} code:","code":"buggy code here (max 15 lines)","bug":"clear description of what is wrong","fix":"corrected code","explanation":"why this is a bug and how fix works","difficulty":"Easy|Medium|Hard"}}]"#,
        label = lp.label,
        diff = lp.coding_difficulty,
    )
}

pub fn hr_questions(company: &str, role: &str, level: ExperienceLevel) -> String {
    let lp = level.profile();
    format!(
        r#"Generate {count} HR interview questions for a {label} {role} candidate at {company}.

Context: {context}

IMPORTANT level rules:
- Fresher: "tell me about yourself", campus projects, career aspirations, learning attitude
- Junior: first job experience, skill growth, team dynamics, short-term goals
- Mid: key achievements, leadership moments, career pivots, medium-term vision
- Experienced: leadership philosophy, company-level impact, compensation, long-term strategy

Mix: 30% self-introduction/background, 30% {company}-specific culture fit, 40% behavioral/situational.
Make questions specific to {company}'s known culture and values.

Return ONLY a JSON array of question strings, NO markdown:
["Q1","Q2","Q3","Q4","Q5","Q6"]"#,
        count = lp.counts.hr,
        label = lp.label,
        context = lp.hr_context,
    )
}

pub fn evaluate_technical(
    question: &str,
    answer: &str,
    expected_points: &[String],
    company: &str,
    level: ExperienceLevel,
) -> String {
    let lp = level.profile();
    let points = if expected_points.is_empty() {
        "general correctness".to_string()
    } else {
        expected_points.join(", ")
    };
    format!(
        r#"Evaluate this technical answer for a {label} candidate at {company}.

Question: {question}
Expected Key Points: {points}
Candidate's Answer: {answer}

Scoring for {label}:
- Judge by what's APPROPRIATE for this experience level
- Fresher: reward correct basic understanding, penalise if advanced concepts totally missed
- Junior: reward applied understanding with examples
- Mid: reward depth, trade-off awareness, real-world scenarios
- Experienced: reward architectural thinking, scalability, leadership context

Return ONLY JSON (no markdown):
{{
"score": <0-100>,
"correct": <true if score >= 60>,
"feedback": "<2-3 sentences: strengths, gaps, and what a better answer would include for this level>"
}}"#,
        label = lp.label,
    )
}

pub fn evaluate_hr(question: &str, answer: &str, company: &str, level: ExperienceLevel) -> String {
    let lp = level.profile();
    format!(
        r#"You are a senior HR interviewer at {company}. Evaluate this answer from a {label}.

Question: {question}
Answer: {answer}

Score by what's appropriate for {label}:
- Fresher: reward genuine enthusiasm, clear communication, relevant college/internship examples
- Junior: reward specific work examples, self-awareness, growth mindset
- Mid: reward leadership situations, measurable outcomes, STAR structure
- Experienced: reward strategic thinking, business impact, executive presence

Return ONLY valid JSON (no markdown):
{{
"score": <0-100>,
"assessment": "<Excellent|Good|Average|Needs Improvement>",
"strengths": ["strength 1", "strength 2"],
"improvements": ["improvement 1", "improvement 2"],
"betterAnswer": "<2-3 sentences: ideal answer for a {label} at {company}>"
}}"#,
        label = lp.label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technical_prompt_carries_level_and_topics() {
        let topics = vec!["Hash maps".to_string(), "TCP".to_string()];
        let prompt = technical("Acme", "Tech 1", &topics, ExperienceLevel::Mid, 7);
        assert!(prompt.starts_with("Generate 7 technical interview questions"));
        assert!(prompt.contains("Topics: Hash maps, TCP"));
        assert!(prompt.contains("mid-level professional"));
        assert!(prompt.contains("what a mid answer should include"));
    }

    #[test]
    fn test_evaluation_prompt_defaults_expected_points() {
        let prompt = evaluate_technical("Q?", "A long enough answer", &[], "Acme", ExperienceLevel::Fresher);
        assert!(prompt.contains("Expected Key Points: general correctness"));
    }
}
