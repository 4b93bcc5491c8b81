mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use arena::config::AppConfig;
use arena::errors::AppError;
use arena::services::auth::firebase::FirebaseAuthProvider;
use arena::services::payment::stripe::StripeGateway;
use arena::services::token::TokenStore;
use arena::state::{App, AppState};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = AppConfig::from_env();
    tracing::debug!(api_url = %config.api_url, "using backend");

    let tokens = Arc::new(TokenStore::load(config.token_path.clone())?);
    let auth = FirebaseAuthProvider::new(config.firebase_api_key.clone());
    let payments = StripeGateway::new(config.stripe_publishable_key.clone());
    let state = AppState::new(config, tokens, Box::new(auth), Box::new(payments))?;

    let app = App::start(state);
    let result = commands::run(cli.command, app.state()).await;
    app.shutdown().await;

    if let Err(e) = result {
        match e.downcast_ref::<AppError>() {
            Some(app_err) => eprintln!("error: {}", app_err.user_message()),
            None => eprintln!("error: {e:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
