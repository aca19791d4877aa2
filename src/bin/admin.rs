//! CLI administration tool for qr-shortener.
//!
//! Inspects stored short links and checks the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the 20 newest links
//! cargo run --bin admin -- urls list
//!
//! # Show one link
//! cargo run --bin admin -- urls show aZ3x9Q
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server: `DATABASE_URL`, or `DB_HOST`,
//! `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`.

use qr_shortener::config::{Config, mask_connection_string};
use qr_shortener::domain::entities::UrlRecord;
use qr_shortener::domain::repositories::UrlRepository;
use qr_shortener::infrastructure::persistence::PgUrlRepository;
use qr_shortener::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing qr-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect short links
    Urls {
        #[command(subcommand)]
        action: UrlsAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UrlsAction {
    /// List the newest links
    List {
        /// Number of links to show
        #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(i64).range(1..=1000))]
        limit: i64,
    },

    /// Show one link by short code
    Show {
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Urls { action } => handle_urls_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

fn repository(pool: &PgPool) -> PgUrlRepository {
    PgUrlRepository::new(Arc::new(pool.clone()))
}

/// Dispatches link inspection commands.
async fn handle_urls_action(action: UrlsAction, pool: &PgPool) -> Result<()> {
    let repo = repository(pool);

    match action {
        UrlsAction::List { limit } => list_urls(&repo, limit).await,
        UrlsAction::Show { code } => show_url(&repo, &code).await,
    }
}

async fn list_urls(repo: &PgUrlRepository, limit: i64) -> Result<()> {
    println!("{}", "📋 Short links".bright_blue().bold());
    println!();

    let records = repo
        .list_recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if records.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<8} {:<20} {:>8}  {}",
        "CODE".bright_white().bold(),
        "CREATED".bright_white().bold(),
        "CLICKS".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<8} {:<20} {:>8}  {}",
            record.short_code.cyan(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            record.clicks.to_string().bright_green(),
            truncate(&record.original_url, 60)
        );
    }

    println!();
    println!(
        "  {} shown",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_url(repo: &PgUrlRepository, code: &str) -> Result<()> {
    let record = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Short code '{code}' not found"))?;

    print_record(&record);
    Ok(())
}

fn print_record(record: &UrlRecord) {
    println!("{}", "🔗 Short link".bright_blue().bold());
    println!();
    println!("  ID:       {}", record.id.to_string().bright_black());
    println!("  Code:     {}", record.short_code.cyan());
    println!("  URL:      {}", record.original_url);
    println!("  Created:  {}", record.created_at.to_rfc3339());
    if let Some(expires_at) = record.expires_at {
        println!("  Expires:  {}", expires_at.to_rfc3339());
    }
    println!("  Clicks:   {}", record.clicks.to_string().bright_green().bold());
    println!();
}

/// Displays link and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = repository(pool)
        .summary()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Links:  {}",
        summary.links.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        summary.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            repository(pool)
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            if let Some(ref url) = config.database_url {
                println!("  URL:        {}", mask_connection_string(url).bright_white());
            }
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Shortens `s` to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
