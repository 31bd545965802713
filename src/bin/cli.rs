//! IPO CLI
//!
//! Scriptable command-line interface to the prediction API:
//! - Log in, register, log out
//! - Predict first-day change for one IPO or a CSV batch
//! - Explain predictions, list history, check health

use clap::{Parser, Subcommand};
use ipo_client::batch;
use ipo_client::client::{
    ApiClient, Credentials, HistoryEntry, PredictItem, PredictRequest, Prediction,
};
use ipo_client::config::{self, Config};
use ipo_client::session::{self, FileStore, SharedStore};
use ipo_client::views::{self, format_pct, parse_issue_price, PREDICTION_FAILED};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ipo-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict IPO first-day performance from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (overrides config and IPO_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides config and IPO_SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the access token
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Predict first-day change
    Predict {
        #[command(flatten)]
        input: ItemArgs,
    },

    /// Per-feature contributions for a prediction
    Explain {
        #[command(flatten)]
        input: ItemArgs,
    },

    /// List past predictions
    History,

    /// Check that the API is up
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// One IPO from flags, or many from a CSV file
#[derive(clap::Args)]
pub struct ItemArgs {
    /// CSV file with ticker, issue_price, listing_date, exchange, sector columns
    #[arg(long, conflicts_with_all = ["ticker", "issue_price", "listing_date"])]
    csv: Option<PathBuf>,

    #[arg(long, required_unless_present = "csv")]
    ticker: Option<String>,

    #[arg(long, required_unless_present = "csv")]
    issue_price: Option<String>,

    /// YYYY-MM-DD
    #[arg(long, required_unless_present = "csv")]
    listing_date: Option<String>,

    #[arg(long, default_value = "")]
    exchange: String,

    #[arg(long, default_value = "")]
    sector: String,
}

impl ItemArgs {
    fn request(self) -> PredictRequest {
        if let Some(path) = self.csv {
            let import = match batch::import_csv(&path) {
                Ok(import) => import,
                Err(e) => fail(&format!("Failed to read {:?}: {}", path, e)),
            };
            for error in &import.errors {
                eprintln!("Skipped: {}", error);
            }
            if import.items.is_empty() {
                fail("No rows to predict");
            }
            return PredictRequest {
                items: import.items,
            };
        }

        PredictRequest::single(PredictItem {
            ticker: self.ticker.unwrap_or_default(),
            issue_price: parse_issue_price(self.issue_price.as_deref().unwrap_or_default()),
            listing_date: self.listing_date.unwrap_or_default(),
            exchange: self.exchange,
            sector: self.sector,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load_default() {
        Ok(config) => (config, None),
        Err(e) => (Config::from_env(), Some(e)),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session.path = path;
    }
    ipo_client::logging::init(&config.logging)?;
    if let Some(e) = config_error {
        tracing::warn!("{}; using defaults", e);
    }

    let store: SharedStore = Arc::new(FileStore::new(config.session.path.clone()));
    let client = ApiClient::from_config(&config.api, store.clone());
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { username, password } => {
            let password = password.unwrap_or_else(|| read_password(&username));
            match views::login(&client, &Credentials::new(username, password)).await {
                Ok(session) => println!("Logged in as {}", session.username),
                Err(message) => fail(&message),
            }
        }

        Commands::Register { username, password } => {
            let password = password.unwrap_or_else(|| read_password(&username));
            match views::register(&client, &Credentials::new(username, password)).await {
                Ok(()) => println!("{}", views::REGISTERED_MESSAGE),
                Err(message) => fail(&message),
            }
        }

        Commands::Logout => {
            session::clear_session(store.as_ref())?;
            println!("Logged out");
        }

        Commands::Whoami => match session::load_session(store.as_ref()) {
            Some(session) if json => {
                println!("{}", serde_json::json!({ "username": session.username }));
            }
            Some(session) => println!("{}", session.username),
            None => fail("Not logged in"),
        },

        Commands::Predict { input } => {
            let request = input.request();
            let response = match client.predict(&request).await {
                Ok(response) => response,
                Err(e) => fail(&e.user_message(PREDICTION_FAILED)),
            };
            if response.results.is_empty() {
                fail(PREDICTION_FAILED);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&response.results)?);
            } else {
                print_predictions(&response.results);
            }
        }

        Commands::Explain { input } => {
            let request = input.request();
            let response = match client.explain(&request).await {
                Ok(response) => response,
                Err(e) => fail(&e.user_message(PREDICTION_FAILED)),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&response.explanations)?);
            } else {
                for (item, contributions) in request.items.iter().zip(&response.explanations) {
                    println!("{}", item.ticker);
                    let mut features: Vec<_> = contributions.iter().collect();
                    features.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
                    for (feature, value) in features {
                        println!("  {:<20} {:>10.4}", feature, value);
                    }
                }
            }
        }

        Commands::History => {
            let history = match client.history().await {
                Ok(history) => history,
                Err(e) => fail(&e.user_message("Failed to fetch history")),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No predictions yet");
            } else {
                print_history(&history);
            }
        }

        Commands::Health => match client.health().await {
            Ok(true) => println!("API at {} is up", client.base_url()),
            Ok(false) => fail(&format!("API at {} reported not ok", client.base_url())),
            Err(e) => {
                eprintln!("Cannot connect to prediction API at {}", client.base_url());
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let content = config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn print_predictions(results: &[Prediction]) {
    println!("{:<12} {:>22}", "Ticker", "Predicted first-day %");
    println!("{}", "-".repeat(35));
    for prediction in results {
        println!(
            "{:<12} {:>22}",
            prediction.ticker,
            format_pct(prediction.predicted_firstday_pct)
        );
    }
}

fn print_history(history: &[HistoryEntry]) {
    println!("{:<20} {:<12} {:<12} {:>10}", "Time", "User", "Ticker", "Predicted");
    println!("{}", "-".repeat(57));
    for entry in history {
        let time = entry
            .timestamp()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.time.clone());
        println!(
            "{:<20} {:<12} {:<12} {:>10}",
            time,
            entry.user,
            entry.result.ticker,
            format_pct(entry.result.predicted_firstday_pct)
        );
    }
}

fn read_password(username: &str) -> String {
    eprint!("Password for {}: ", username);
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
        fail(&format!("Failed to read password: {}", e));
    }
    line.trim_end_matches(&['\r', '\n'][..]).to_string()
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
