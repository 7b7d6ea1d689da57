use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::question::QuestionType;
use crate::models::resume::ResumeExtraction;
use crate::models::round::RoundType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBatchRequest {
    pub context: String,
    pub role: String,
    pub round_type: RoundType,
    /// Texts already asked in this interview. A hint only; callers re-validate.
    pub exclude_texts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(default)]
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvaluationRequest {
    pub question_text: String,
    pub answer: String,
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub role: String,
    pub round_scores: BTreeMap<String, String>,
    pub final_score: Decimal,
}

/// The language-model collaborator. Every capability may fail with `Error::Upstream`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn extract_resume(&self, document: &[u8]) -> Result<ResumeExtraction>;

    async fn generate_questions(
        &self,
        request: &QuestionBatchRequest,
    ) -> Result<Vec<GeneratedQuestion>>;

    async fn evaluate_answer(&self, request: &AnswerEvaluationRequest) -> Result<Evaluation>;

    async fn summarize_feedback(&self, request: &FeedbackRequest) -> Result<String>;
}

const SKILL_KEYWORDS: &[(&str, &str)] = &[
    ("rust", "Rust"),
    ("python", "Python"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("go", "Go"),
    ("c++", "C++"),
    ("react", "React"),
    ("node", "Node.js"),
    ("sql", "SQL"),
    ("postgresql", "PostgreSQL"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("aws", "AWS"),
    ("pandas", "Pandas"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
];

const BACKEND_SKILLS: &[&str] = &["Rust", "Java", "Go", "Python", "SQL", "PostgreSQL", "Node.js", "C++"];
const FRONTEND_SKILLS: &[&str] = &["React", "JavaScript", "TypeScript"];
const OPS_SKILLS: &[&str] = &["Docker", "Kubernetes", "AWS"];
const DATA_SKILLS: &[&str] = &["Pandas", "PyTorch", "TensorFlow"];

const MAX_PROJECTS: usize = 5;

struct Template {
    text: &'static str,
    question_type: QuestionType,
    options: &'static [&'static str],
    correct: Option<&'static str>,
}

const fn mcq(
    text: &'static str,
    options: &'static [&'static str],
    correct: &'static str,
) -> Template {
    Template {
        text,
        question_type: QuestionType::Mcq,
        options,
        correct: Some(correct),
    }
}

const fn open(text: &'static str, question_type: QuestionType) -> Template {
    Template {
        text,
        question_type,
        options: &[],
        correct: None,
    }
}

const TECHNICAL_BANK: &[Template] = &[
    mcq(
        "Which HTTP status code should a {role} return when a requested resource does not exist?",
        &["200", "301", "404", "500"],
        "404",
    ),
    mcq(
        "What is the average time complexity of a lookup in a hash map?",
        &["O(1)", "O(log n)", "O(n)", "O(n log n)"],
        "O(1)",
    ),
    mcq(
        "Which SQL clause filters rows after aggregation?",
        &["WHERE", "HAVING", "ORDER BY", "LIMIT"],
        "HAVING",
    ),
    mcq(
        "Which data structure follows last-in, first-out ordering?",
        &["Queue", "Stack", "Heap", "Linked list"],
        "Stack",
    ),
    mcq(
        "What does the 'I' in ACID stand for?",
        &["Isolation", "Integrity", "Idempotency", "Indexing"],
        "Isolation",
    ),
    mcq(
        "Which git command replays your commits on top of another branch?",
        &["merge", "rebase", "cherry-pick", "stash"],
        "rebase",
    ),
    mcq(
        "In a {role} codebase, which practice best prevents regressions during refactoring?",
        &["Automated tests", "Longer comments", "Manual QA only", "Bigger commits"],
        "Automated tests",
    ),
];

const BEHAVIORAL_BANK: &[Template] = &[
    open(
        "Tell me about a time you had to deliver a {role} project under a tight deadline. What trade-offs did you make?",
        QuestionType::OpenEnded,
    ),
    open(
        "Describe a disagreement you had with a teammate about a technical decision and how it was resolved.",
        QuestionType::OpenEnded,
    ),
    open(
        "What is the most valuable feedback you have received as a {role}, and how did you act on it?",
        QuestionType::OpenEnded,
    ),
    open(
        "Describe a failure on a project you worked on. What did you learn from it?",
        QuestionType::OpenEnded,
    ),
    open(
        "How do you prioritise when several stakeholders need your help at the same time?",
        QuestionType::OpenEnded,
    ),
    open(
        "Tell me about a time you helped a colleague grow.",
        QuestionType::OpenEnded,
    ),
    open(
        "Why do you want to work as a {role}, and what do you hope to learn next?",
        QuestionType::OpenEnded,
    ),
];

const CODING_BANK: &[Template] = &[
    open(
        "Write a function that returns the first non-repeating character in a string.",
        QuestionType::Code,
    ),
    open(
        "Implement a function that checks whether a string of brackets is balanced.",
        QuestionType::Code,
    ),
    open(
        "Write a function that merges two sorted arrays into one sorted array.",
        QuestionType::Code,
    ),
    open(
        "Implement an LRU cache with get and put operations in O(1) time.",
        QuestionType::Code,
    ),
    open(
        "Write a function that returns the k most frequent elements in a list.",
        QuestionType::Code,
    ),
    open(
        "Reverse a singly linked list in place and explain the complexity of your approach.",
        QuestionType::Code,
    ),
    open(
        "Given a list of intervals, merge all overlapping intervals.",
        QuestionType::Code,
    ),
];

/// Offline content generator: keyword extraction, templated question banks and
/// length/relevance based answer scoring. Stands in for a hosted model.
#[derive(Debug, Clone)]
pub struct HeuristicGenerator {
    batch_size: usize,
}

impl HeuristicGenerator {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    fn bank(round_type: RoundType) -> &'static [Template] {
        match round_type {
            RoundType::Technical => TECHNICAL_BANK,
            RoundType::Behavioral => BEHAVIORAL_BANK,
            RoundType::Coding => CODING_BANK,
        }
    }

    fn render(&self, template: &Template, role: &str, rng: &mut impl rand::Rng) -> GeneratedQuestion {
        let mut options: Vec<String> = template.options.iter().map(|o| o.to_string()).collect();
        options.shuffle(rng);
        GeneratedQuestion {
            text: template.text.replace("{role}", role),
            question_type: template.question_type,
            options,
            correct_answer: template.correct.map(str::to_string),
        }
    }
}

impl Default for HeuristicGenerator {
    fn default() -> Self {
        Self::new(5)
    }
}

pub fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: HashSet<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .collect();

    SKILL_KEYWORDS
        .iter()
        .filter(|(keyword, _)| tokens.contains(keyword))
        .map(|(_, label)| label.to_string())
        .collect()
}

pub fn extract_projects(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.to_lowercase().starts_with("project"))
        .map(|line| match line.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => line,
        })
        .filter(|p| !p.is_empty())
        .take(MAX_PROJECTS)
        .map(str::to_string)
        .collect()
}

pub fn recommend_roles(skills: &[String]) -> Vec<String> {
    let has_any = |group: &[&str]| skills.iter().any(|s| group.contains(&s.as_str()));
    let backend = has_any(BACKEND_SKILLS);
    let frontend = has_any(FRONTEND_SKILLS);

    let mut roles = Vec::new();
    if backend {
        roles.push("Backend Engineer".to_string());
    }
    if frontend {
        roles.push("Frontend Developer".to_string());
    }
    if backend && frontend {
        roles.push("Full Stack Developer".to_string());
    }
    if has_any(OPS_SKILLS) {
        roles.push("DevOps Engineer".to_string());
    }
    if has_any(DATA_SKILLS) {
        roles.push("Data Scientist".to_string());
    }
    if roles.is_empty() {
        roles.push("Software Engineer".to_string());
    }
    roles
}

fn score_answer(request: &AnswerEvaluationRequest) -> f64 {
    let words = request.answer.split_whitespace().count();
    let base: f64 = match words {
        0 => return 0.0,
        1..=4 => 2.0,
        5..=14 => 4.0,
        15..=39 => 6.0,
        40..=79 => 8.0,
        _ => 9.0,
    };

    let answer = request.answer.to_lowercase();
    let relevant = request
        .question_text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 4)
        .any(|w| answer.contains(w));
    let looks_like_code = request.question_type == QuestionType::Code
        && ["fn ", "def ", "function", "return", "{"]
            .iter()
            .any(|marker| answer.contains(marker));

    let bonus = if relevant || looks_like_code { 1.0 } else { 0.0 };
    (base + bonus).min(10.0)
}

fn feedback_for(score: f64) -> &'static str {
    match score {
        s if s <= 0.0 => "No answer was provided.",
        s if s < 4.0 => "The answer is too brief to demonstrate understanding.",
        s if s < 7.0 => "A reasonable start; add concrete examples and more detail.",
        s if s < 9.0 => "Solid answer with relevant detail.",
        _ => "Thorough, well-structured answer.",
    }
}

#[async_trait]
impl ContentGenerator for HeuristicGenerator {
    async fn extract_resume(&self, document: &[u8]) -> Result<ResumeExtraction> {
        let text = String::from_utf8_lossy(document);
        let mut skills = extract_skills(&text);
        let projects = extract_projects(&text);
        let recommended_roles = recommend_roles(&skills);

        if skills.is_empty() {
            skills = vec!["Communication".to_string(), "Problem Solving".to_string()];
        }

        tracing::info!(
            skills = skills.len(),
            projects = projects.len(),
            "Extracted resume fields"
        );

        Ok(ResumeExtraction {
            skills,
            projects,
            recommended_roles,
        })
    }

    async fn generate_questions(
        &self,
        request: &QuestionBatchRequest,
    ) -> Result<Vec<GeneratedQuestion>> {
        let excluded: HashSet<&str> = request.exclude_texts.iter().map(String::as_str).collect();
        let mut rng = rand::thread_rng();

        let questions: Vec<GeneratedQuestion> = Self::bank(request.round_type)
            .iter()
            .map(|t| self.render(t, &request.role, &mut rng))
            .filter(|q| !excluded.contains(q.text.as_str()))
            .take(self.batch_size)
            .collect();

        tracing::info!(
            round_type = %request.round_type,
            count = questions.len(),
            "Generated question batch"
        );
        Ok(questions)
    }

    async fn evaluate_answer(&self, request: &AnswerEvaluationRequest) -> Result<Evaluation> {
        let score = score_answer(request);
        Ok(Evaluation {
            score,
            feedback: feedback_for(score).to_string(),
        })
    }

    async fn summarize_feedback(&self, request: &FeedbackRequest) -> Result<String> {
        let rounds = if request.round_scores.is_empty() {
            "No answers were recorded, so no round could be scored".to_string()
        } else {
            request
                .round_scores
                .iter()
                .map(|(round, score)| format!("{} scored {}", round, score))
                .collect::<Vec<_>>()
                .join("; ")
        };

        let verdict = if request.final_score >= Decimal::from(8) {
            "Strong performance; recommended for the next stage."
        } else if request.final_score >= Decimal::from(5) {
            "Mixed performance; some areas need improvement."
        } else {
            "Significant gaps; further preparation is recommended."
        };

        Ok(format!(
            "Interview summary for the {} role: overall score {}/10. {}. {}",
            request.role, request.final_score, rounds, verdict
        ))
    }
}
