//! TripMate 命令行：逐行读取用户问题并交给编排器处理
//!
//! Usage:
//!   tripmate              Start the interactive assistant
//!   tripmate help         Show this help message
//!   tripmate version      Show version information
//!
//! Inside the session, `help`, `stats`, `clear-cache` and `exit`/`quit`/`bye` are
//! handled locally; every other line is sent through the orchestrator.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tripmate::client::DEFAULT_GREETING;
use tripmate::{Orchestrator, TripMateConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("help" | "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("version" | "--version" | "-V") => {
            println!("tripmate {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }

    dotenvy::dotenv().ok();
    init_logging()?;

    let config = TripMateConfig::from_env()?;
    let orchestrator = Orchestrator::from_config(&config)?;

    println!("Welcome to TripMate! Ask me anything about travel. Type 'exit' or 'quit' to end.");
    let greeting = orchestrator
        .greeting()
        .await
        .unwrap_or_else(|_| DEFAULT_GREETING.to_string());
    println!("TripMate: {greeting}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "" => {
                println!("Please enter a message.");
                continue;
            }
            "exit" | "quit" | "bye" => {
                println!("TripMate: Safe travels and goodbye!");
                break;
            }
            "help" => {
                print_examples();
                continue;
            }
            "stats" => {
                let stats = orchestrator.cache_stats();
                println!(
                    "Cache: {}/{} entries, {} hits, {} misses, {} evicted",
                    stats.size, stats.capacity, stats.hits, stats.misses, stats.evictions
                );
                continue;
            }
            "clear-cache" => {
                orchestrator.clear_cache();
                println!("Cache cleared.");
                continue;
            }
            _ => {}
        }

        let outcome = orchestrator.handle(input).await;
        println!("TripMate: {}", outcome.reply());
    }

    Ok(())
}

/// Log to stderr, or append to `TRIPMATE_LOG_FILE` when set. Level comes from `RUST_LOG`.
fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var("TRIPMATE_LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let file = OpenOptions::new().create(true).append(true).open(path.trim())?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn print_usage() {
    println!(
        r#"tripmate - travel assistant

USAGE:
    tripmate [COMMAND]

COMMANDS:
    (none)      Start an interactive session
    version     Show version information
    help        Show this help message

ENVIRONMENT:
    GOOGLE_API_KEY                  Gemini API key (required; may live in .env)
    TRIPMATE_MODEL                  Model name (default gemini-1.5-flash)
    TRIPMATE_ENDPOINT               Full generateContent URL override
    TRIPMATE_CONNECT_TIMEOUT_SECS   Connect timeout (default 10)
    TRIPMATE_TIMEOUT_SECS           Overall call timeout (default 30)
    TRIPMATE_CACHE_CAPACITY         Classification cache size (default 1000)
    TRIPMATE_CACHE_EVICTION         flush | lru (default flush)
    TRIPMATE_KEYWORD_SHORTCUT       Classify travel keywords locally (default false)
    TRIPMATE_LOG_FILE               Append logs to this file instead of stderr
    RUST_LOG                        Log filter (default warn)"#
    );
}

fn print_examples() {
    println!(
        r#"I'm here to assist with all your travel needs! Some example questions:
- "What's the best time to visit Japan?"
- "Can you suggest a 5-day itinerary for Paris?"
- "What are budget-friendly hotels in New York?"
- "How do I get around in Rome using public transport?"
- "What are must-see landmarks in London?"
Session commands: help, stats, clear-cache, exit."#
    );
}
