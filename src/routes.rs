use crate::llm::{LlmError, extract_json_array};
use crate::quiz::{self, Grade, Question, TokenError};
use crate::{AppState, NavLinks};
use askama::Template;
use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::error;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

const CONFIG_ERROR: &str = "Application is not configured correctly. Please check the API key.";
const INVALID_FORMAT_ERROR: &str = "The AI returned an invalid format. Please try again.";
const SUBMISSION_ERROR: &str = "Error processing your answers. Please try again.";

#[derive(Template)]
#[template(path = "prompt.txt")]
struct PromptTemplate<'a> {
    mcq_count: &'a str,
    topic: &'a str,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    error: Option<String>,
    nav: &'a NavLinks,
}

#[derive(Template)]
#[template(path = "result.html")]
struct ResultTemplate<'a> {
    topic: &'a str,
    questions: &'a [Question],
    answers_json: &'a str,
    nav: &'a NavLinks,
}

/// One graded question on the results page.
struct ReviewRow {
    question: Question,
    user_answer: String,
    correct: bool,
}

#[derive(Template)]
#[template(path = "submission_result.html")]
struct SubmissionTemplate<'a> {
    topic: String,
    rows: Vec<ReviewRow>,
    grade: Grade,
    nav: &'a NavLinks,
}

#[derive(Debug, Error)]
enum GenerateError {
    #[error("generation model is not configured")]
    Unconfigured,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model output failed strict JSON parsing")]
    BadFormat { raw: String },
    #[error("failed to render prompt: {0}")]
    Prompt(askama::Error),
    #[error("failed to encode question token: {0}")]
    Encode(serde_json::Error),
}

#[derive(Debug, Error)]
enum SubmitError {
    #[error("form field answers_json is missing")]
    MissingToken,
    #[error(transparent)]
    Token(#[from] TokenError),
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("template render failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn form_page(state: &AppState, error: Option<String>) -> Response {
    render(IndexTemplate {
        error,
        nav: &state.nav,
    })
}

#[axum::debug_handler]
pub async fn quiz_form(State(state): State<Arc<AppState>>) -> Response {
    let error = state.llm.is_none().then(|| CONFIG_ERROR.to_string());
    form_page(&state, error)
}

#[axum::debug_handler]
pub async fn generate_mcqs(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let topic = form.get("topic").cloned().unwrap_or_default();
    let mcq_count = form
        .get("mcq_count")
        .cloned()
        .unwrap_or_else(|| "5".to_string());

    match generate_quiz(&state, &topic, &mcq_count).await {
        Ok((questions, answers_json)) => render(ResultTemplate {
            topic: &topic,
            questions: &questions,
            answers_json: &answers_json,
            nav: &state.nav,
        }),
        Err(err) => form_page(&state, Some(generate_error_message(err))),
    }
}

async fn generate_quiz(
    state: &AppState,
    topic: &str,
    mcq_count: &str,
) -> Result<(Vec<Question>, String), GenerateError> {
    let llm = state.llm.as_ref().ok_or(GenerateError::Unconfigured)?;
    let prompt = PromptTemplate { mcq_count, topic }
        .render()
        .map_err(GenerateError::Prompt)?;

    let raw = llm.generate(&prompt).await?;
    let cleaned = extract_json_array(&raw);
    let questions: Vec<Question> =
        serde_json::from_str(&cleaned).map_err(|_| GenerateError::BadFormat { raw })?;

    let answers_json = quiz::encode_token(&questions).map_err(GenerateError::Encode)?;
    Ok((questions, answers_json))
}

fn generate_error_message(err: GenerateError) -> String {
    match err {
        GenerateError::Unconfigured => CONFIG_ERROR.to_string(),
        GenerateError::Llm(err) => {
            error!("generation request failed: {err}");
            INVALID_FORMAT_ERROR.to_string()
        }
        GenerateError::BadFormat { raw } => {
            error!("--- JSON PARSE ERROR ---\n{raw}\n----------------------");
            INVALID_FORMAT_ERROR.to_string()
        }
        err => {
            error!("error while generating quiz: {err}");
            format!("An unexpected error occurred: {err}")
        }
    }
}

#[axum::debug_handler]
pub async fn submit_answers(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let topic = form.get("topic").cloned().unwrap_or_default();

    match grade_submission(&form) {
        Ok((rows, grade)) => render(SubmissionTemplate {
            topic,
            rows,
            grade,
            nav: &state.nav,
        }),
        Err(err) => {
            error!("error processing submission: {err}");
            form_page(&state, Some(SUBMISSION_ERROR.to_string()))
        }
    }
}

fn grade_submission(form: &HashMap<String, String>) -> Result<(Vec<ReviewRow>, Grade), SubmitError> {
    let token = form.get("answers_json").ok_or(SubmitError::MissingToken)?;
    let questions = quiz::decode_token(token)?;

    // answers are keyed positionally; a missing radio group means unanswered
    let user_answers: Vec<String> = (0..questions.len())
        .map(|i| form.get(&format!("q{i}")).cloned().unwrap_or_default())
        .collect();

    let grade = quiz::grade(&questions, &user_answers);
    let rows = questions
        .into_iter()
        .zip(user_answers)
        .zip(grade.correctness.iter())
        .map(|((question, user_answer), &correct)| ReviewRow {
            question,
            user_answer,
            correct,
        })
        .collect();

    Ok((rows, grade))
}
