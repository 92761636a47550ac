pub mod llm;
pub mod quiz;
pub mod routes;

use crate::llm::LlmClient;
use axum::Router;
use axum::routing::{get, post};
use serde::Deserialize;
use std::sync::Arc;

fn get_default_port() -> u16 {
    8080
}

fn get_default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn get_default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn get_default_website_manager_url() -> String {
    "http://localhost:10001".to_string()
}

fn get_default_mcq_video_url() -> String {
    "http://localhost:10002".to_string()
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "get_default_port")]
    pub port: u16,
    pub api_key: Option<String>,
    #[serde(default = "get_default_base_url")]
    pub base_url: String,
    #[serde(default = "get_default_model")]
    pub model: String,
    #[serde(default = "get_default_website_manager_url")]
    pub website_manager_url: String,
    #[serde(default = "get_default_mcq_video_url")]
    pub mcq_video_url: String,
}

/// Links shown in the navigation bar of every page.
#[derive(Debug, Clone)]
pub struct NavLinks {
    pub website_manager_url: String,
    pub mcq_video_url: String,
}

impl Default for NavLinks {
    fn default() -> Self {
        Self {
            website_manager_url: get_default_website_manager_url(),
            mcq_video_url: get_default_mcq_video_url(),
        }
    }
}

/// `llm` is `None` when no API key was configured at startup. The service
/// still serves pages in that state and reports a configuration error on
/// every request instead of generating quizzes.
pub struct AppState {
    pub llm: Option<LlmClient>,
    pub nav: NavLinks,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let llm = config
            .api_key
            .filter(|key| !key.is_empty())
            .map(|key| LlmClient::new(config.base_url, key, config.model));
        Self {
            llm,
            nav: NavLinks {
                website_manager_url: config.website_manager_url,
                mcq_video_url: config.mcq_video_url,
            },
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::quiz_form).post(routes::generate_mcqs))
        .route("/submit", post(routes::submit_answers))
        .with_state(state)
}
