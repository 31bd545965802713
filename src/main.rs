//! IPO Client
//!
//! Interactive terminal front-end. Behaves like the single-page app: one
//! screen at a time, inline errors, and the dashboard behind the route guard.
//!
//! # Configuration
//!
//! Environment variables:
//! - `IPO_API_URL`: API base URL (default: http://localhost:8000)
//! - `IPO_SESSION_FILE`: where the session is persisted
//! - `IPO_LOG_LEVEL` / `RUST_LOG`: log level (default: warn)

use anyhow::Context;
use clap::Parser;
use ipo_client::app::{App, Screen};
use ipo_client::client::ApiClient;
use ipo_client::config::Config;
use ipo_client::router::Route;
use ipo_client::session::{FileStore, MemoryStore, SharedStore};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Parser)]
#[command(name = "ipo-client")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive client for the IPO first-day prediction API")]
struct Args {
    /// API server URL (overrides config and IPO_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Session file (overrides config and IPO_SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Path to open first; the route guard still applies
    #[arg(long, default_value = "/dashboard")]
    path: String,

    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, config_error) = match &args.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::from_env(), Some(e)),
        },
    };
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = args.session_file {
        config.session.path = path;
    }

    ipo_client::logging::init(&config.logging)?;
    if let Some(e) = config_error {
        tracing::warn!("{}; using defaults", e);
    }

    let store: SharedStore = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        tracing::debug!("Session file: {:?}", config.session.path);
        Arc::new(FileStore::new(config.session.path.clone()))
    };

    let client = ApiClient::from_config(&config.api, store);
    tracing::info!("Using API at {}", client.base_url());

    let mut app = App::new(client, &args.path);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        // The session file may have been changed by another process
        app.revalidate();
        println!();
        print!("{}", app.render());
        println!("{}", hints(app.screen()));

        let Some(command) = prompt(&mut input, "> ").await? else {
            break;
        };

        match command.as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => continue,
            cmd if cmd.starts_with("goto ") => {
                app.navigate(Route::from_path(cmd.trim_start_matches("goto ").trim()));
                continue;
            }
            _ => {}
        }

        if !handle(&mut app, &mut input, &command).await? {
            println!("Unknown command: {}", command);
        }
    }

    Ok(())
}

/// Run a screen-specific command. Returns false if the command is unknown here.
async fn handle(app: &mut App, input: &mut Input, command: &str) -> anyhow::Result<bool> {
    match (app.route().clone(), command) {
        (Route::Login, "login") => {
            let Some((username, password)) = read_credentials(input).await? else {
                return Ok(true);
            };
            if let Screen::Login(view) = app.screen_mut() {
                view.username = username;
                view.password = password;
            }
            app.submit_and_apply().await;
        }
        (Route::Login, "register") => {
            app.navigate(Route::Register);
        }
        (Route::Register, "register") => {
            let Some((username, password)) = read_credentials(input).await? else {
                return Ok(true);
            };
            if let Screen::Register(view) = app.screen_mut() {
                view.username = username;
                view.password = password;
            }
            let transition = app.submit().await;
            // Show the status message before the delayed redirect
            print!("{}", app.render());
            app.apply(transition).await;
        }
        (Route::Register, "login") => {
            app.navigate(Route::Login);
        }
        (Route::Dashboard, "predict") => {
            let fields = [
                "Ticker",
                "Issue Price (e.g. 120)",
                "Listing Date (YYYY-MM-DD)",
                "Exchange (NSE/BSE/OTH)",
                "Sector (TECH/FIN/...)",
            ];
            let mut values = Vec::with_capacity(fields.len());
            for label in fields {
                match prompt(input, &format!("{}: ", label)).await? {
                    Some(value) => values.push(value),
                    None => return Ok(true),
                }
            }
            if let Screen::Dashboard(view) = app.screen_mut() {
                let mut values = values.into_iter();
                view.form.ticker = values.next().unwrap_or_default();
                view.form.issue_price = values.next().unwrap_or_default();
                view.form.listing_date = values.next().unwrap_or_default();
                view.form.exchange = values.next().unwrap_or_default();
                view.form.sector = values.next().unwrap_or_default();
            }
            app.submit_and_apply().await;
        }
        (Route::Dashboard, "logout") => {
            app.logout();
        }
        (Route::NotFound(_), "home") => {
            app.navigate(Route::Login);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn hints(screen: &Screen) -> &'static str {
    match screen {
        Screen::Login(_) => "Commands: login, register, goto <path>, quit",
        Screen::Register(_) => "Commands: register, login, goto <path>, quit",
        Screen::Dashboard(_) => "Commands: predict, logout, goto <path>, quit",
        Screen::NotFound(_) => "Commands: home, goto <path>, quit",
    }
}

async fn read_credentials(input: &mut Input) -> anyhow::Result<Option<(String, String)>> {
    let Some(username) = prompt(input, "username: ").await? else {
        return Ok(None);
    };
    let Some(password) = prompt(input, "password: ").await? else {
        return Ok(None);
    };
    Ok(Some((username, password)))
}

/// Print a prompt and read one trimmed line; `None` on end of input
async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let line = input.next_line().await.context("Failed to read input")?;
    Ok(line.map(|l| l.trim().to_string()))
}
