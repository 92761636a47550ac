use env_logger::Env;
use log::{error, info};
use mcq_topic::{AppState, Config, build_app};
use std::process::exit;
use std::sync::Arc;

async fn run() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = envy::from_env::<Config>()?;
    let port = config.port;

    let state = AppState::from_config(config);
    if state.llm.is_some() {
        info!("generation model client configured");
    } else {
        error!("API_KEY is not set; quiz generation is disabled");
    }

    info!("Starting on port {}", port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    axum::serve(listener, build_app(Arc::new(state))).await?;

    Ok(())
}

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();

    if let Err(err) = rt.block_on(run()) {
        error!("{}", err);
        exit(1)
    }
}
