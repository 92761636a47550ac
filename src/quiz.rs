use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One multiple-choice question as produced by the generation model.
///
/// Serde field names match the JSON keys the model is instructed to emit.
/// `answer` is expected to equal one of `options`; that is the model's
/// obligation and is not re-validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is not a question array: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Encodes the question set into the opaque string carried by the client
/// between generation and submission. Reversible, not tamper-proof.
pub fn encode_token(questions: &[Question]) -> Result<String, serde_json::Error> {
    Ok(BASE64.encode(serde_json::to_vec(questions)?))
}

pub fn decode_token(token: &str) -> Result<Vec<Question>, TokenError> {
    let bytes = BASE64.decode(token.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub correctness: Vec<bool>,
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Grades one answer per question by exact string equality, in question
/// order. An unanswered question is an empty string and never matches.
pub fn grade(questions: &[Question], user_answers: &[String]) -> Grade {
    let correctness: Vec<bool> = questions
        .iter()
        .zip(user_answers)
        .map(|(question, answer)| *answer == question.answer)
        .collect();
    let score = correctness.iter().filter(|correct| **correct).count();
    let total = questions.len();
    let percentage = if total > 0 {
        (score as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    };

    Grade {
        correctness,
        score,
        total,
        percentage,
    }
}
