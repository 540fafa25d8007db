//! MediConnect Client Entry Point
//!
//! Drives the session layer from a terminal: sign in through the OAuth
//! callback, pick a role, register a profile and check where navigation
//! lands. Uses `anyhow` at this boundary only; library errors are
//! `auth::AuthError`.

mod config;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::application::oauth_callback::{CallbackOutcome, GoogleCallbackUseCase};
use auth::application::register_profile::RegisterProfileUseCase;
use auth::domain::entity::Registration;
use auth::presentation::navigator::{NavigationOutcome, Screen};
use auth::{AuthError, AuthSessionManager, HttpAccountApi, KvSessionStore, Navigator};
use clap::Parser;
use kernel::error::app_error::AppError;
use platform::storage::FileKeyValueStore;
use serde_json::Value as JsonValue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, Command};

type Store = KvSessionStore<FileKeyValueStore>;

/// How long `logout` waits for the backend notification before exiting
const SIGN_OUT_GRACE: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing (stderr, so stdout stays scriptable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediconnect=info,auth=info,platform=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.auth_config();
    let store = Arc::new(KvSessionStore::new(
        FileKeyValueStore::new(&cli.session_file),
        &config,
    ));
    let api = Arc::new(HttpAccountApi::new(&config).context("invalid API_URL")?);
    let sessions = Arc::new(AuthSessionManager::new(store, Arc::clone(&api)));
    sessions.initialize().await;

    tracing::debug!(
        api_url = %config.api_base_url,
        session_file = %cli.session_file.display(),
        "Session loaded"
    );

    match cli.command {
        Command::LoginUrl => {
            println!("{}", config.oauth_url());
        }

        Command::Callback { url } => {
            let outcome = GoogleCallbackUseCase::new(Arc::clone(&sessions))
                .execute(&url)
                .await;
            match &outcome {
                CallbackOutcome::SignedIn(login) => {
                    let name = login.record.display_name().unwrap_or_default();
                    eprintln!("Signed in {name}");
                }
                CallbackOutcome::Failed(e) => eprintln!("Sign-in failed: {}", e.user_message()),
            }
            println!("{}", outcome.redirect());
        }

        Command::Status => {
            let status = sessions.auth_status().await;
            let record = sessions.snapshot().record.filter(|_| status.is_authenticated);
            println!("authenticated: {}", status.is_authenticated);
            println!(
                "role: {}",
                status
                    .role
                    .filter(|_| status.is_authenticated)
                    .map(|r| r.code())
                    .unwrap_or("-")
            );
            if let Some(name) = record.and_then(|r| r.display_name()) {
                println!("user: {name}");
            }
        }

        Command::Logout => {
            if let Some(notification) = sessions.logout().await {
                if tokio::time::timeout(SIGN_OUT_GRACE, notification).await.is_err() {
                    tracing::debug!("Backend sign-out notification still pending at exit");
                }
            }
            println!("signed out");
        }

        Command::SelectRole { role } => match sessions.update_role(role).await {
            Ok(outcome) => println!("{}", outcome.redirect),
            Err(e) => return Err(failure(e)),
        },

        Command::Open { path } => {
            let navigator = Navigator::new(Arc::clone(&sessions), Arc::clone(&api), &config);
            match navigator.settle(&path).await.map_err(failure)? {
                NavigationOutcome::Shown(screen) => println!("{}", describe(&screen)),
                NavigationOutcome::Superseded => println!("superseded"),
            }
        }

        Command::Register { role, file } => {
            let form = read_form(&file)
                .map_err(|e| anyhow::anyhow!(e.report()))
                .with_context(|| format!("reading {}", file.display()))?;
            let registration = Registration::from_json(role, form).context("invalid form")?;
            let register: RegisterProfileUseCase<Store, HttpAccountApi> =
                RegisterProfileUseCase::new(Arc::clone(&sessions), Arc::clone(&api));
            match register.execute(&registration).await {
                Ok(next) => println!("{next}"),
                Err(e) => return Err(failure(e)),
            }
        }
    }

    Ok(())
}

/// Report an auth failure the way a user should see it
fn failure(err: AuthError) -> anyhow::Error {
    let app = err.to_app_error();
    if let Some(detail) = app.detail() {
        tracing::debug!(kind = ?app.kind(), detail, "Command failed");
    }
    anyhow::anyhow!(app.report())
}

/// Load a JSON form from disk
fn read_form(path: &Path) -> Result<JsonValue, AppError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn describe(screen: &Screen) -> String {
    match screen {
        Screen::Loading => "loading".to_string(),
        Screen::View(view) => format!("view {view:?}"),
        Screen::Redirect { to, from } => match from {
            Some(from) => format!("redirect {to} (from {from})"),
            None => format!("redirect {to}"),
        },
    }
}
