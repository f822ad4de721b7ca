//! CLI administration tool for snapurl.
//!
//! Provides commands for inspecting and maintaining the URL store without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Most visited links
//! cargo run --bin admin -- top --limit 20
//!
//! # Remove expired links now
//! cargo run --bin admin -- cleanup
//!
//! # Delete one link
//! cargo run --bin admin -- delete aZ3kP9q
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (see `snapurl::config`).

use snapurl::application::cleanup_worker::{SweepOutcome, sweep_once};
use snapurl::config;
use snapurl::domain::repositories::UrlRepository;
use snapurl::infrastructure::persistence::{PgUrlRepository, connect_pool};
use snapurl::prelude::{CodeGenerator, UrlService};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;

/// CLI tool for managing snapurl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show statistics
    Stats,

    /// List the most visited links
    Top {
        /// Number of links to show
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },

    /// Delete expired links now
    Cleanup,

    /// Delete a link by short code
    Delete {
        /// Short code to delete
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connectivity and latency
    Check,

    /// Show server version, size and schema version
    Info,
}

#[derive(sqlx::FromRow)]
struct TopRow {
    short_code: String,
    original_url: String,
    access_count: i64,
    last_accessed: Option<DateTime<Utc>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;

    let pool = connect_pool(&config.database).await?;
    let pool = Arc::new(pool);
    let repo = Arc::new(PgUrlRepository::new(pool.clone()));

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Top { limit } => handle_top(&pool, limit).await?,
        Commands::Cleanup => {
            let service = UrlService::new(
                repo,
                CodeGenerator::with_os_random(config.shortener.code_length),
                config.shortener_settings(),
            );
            handle_cleanup(&service, config.cleanup_schedule().timeout).await?;
        }
        Commands::Delete { code, yes } => delete_url(repo, code, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

/// Displays store statistics.
///
/// Shows:
/// - Total number of links
/// - Links already expired and waiting for the next sweep
/// - Total recorded redirects
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM urls WHERE expires_at IS NOT NULL AND expires_at < NOW()",
    )
    .fetch_one(pool)
    .await?;

    let accesses: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(access_count), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:          {}",
        urls_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired:        {}",
        expired_count.to_string().yellow().bold()
    );
    println!(
        "  Total accesses: {}",
        accesses.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Lists the most visited links, highest count first.
async fn handle_top(pool: &PgPool, limit: i64) -> Result<()> {
    let limit = limit.clamp(1, 100);

    let rows = sqlx::query_as::<_, TopRow>(
        r#"
        SELECT short_code, original_url, access_count, last_accessed
        FROM urls
        ORDER BY access_count DESC, id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    println!("{}", "🏆 Most Visited Links".bright_blue().bold());
    println!();

    if rows.is_empty() {
        println!("{}", "  No links found".bright_black());
        println!();
        return Ok(());
    }

    for row in &rows {
        let last = row
            .last_accessed
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:>8} {:<20} {:<16} {}",
            row.access_count.to_string().bright_green(),
            row.short_code.cyan(),
            last.bright_black(),
            row.original_url
        );
    }

    println!();

    Ok(())
}

/// Runs one sweep immediately.
async fn handle_cleanup(
    service: &UrlService<PgUrlRepository>,
    timeout: std::time::Duration,
) -> Result<()> {
    println!("{}", "🧹 Removing expired links...".bright_blue());

    match sweep_once(service, timeout).await {
        SweepOutcome::Deleted(count) => {
            println!(
                "{} {}",
                "✅ Deleted:".green().bold(),
                count.to_string().bright_white()
            );
            Ok(())
        }
        SweepOutcome::Failed => anyhow::bail!("Cleanup failed"),
        SweepOutcome::TimedOut => anyhow::bail!("Cleanup timed out after {}s", timeout.as_secs()),
    }
}

/// Deletes a link after showing it and asking for confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
async fn delete_url(repo: Arc<PgUrlRepository>, code: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let url = repo
        .find_by_code(&code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Link not found")?;

    println!("  Code:     {}", url.short_code.cyan());
    println!("  Target:   {}", url.original_url);
    println!("  Accesses: {}", url.access_count.to_string().bright_black());
    if let Some(expires_at) = url.expires_at {
        println!(
            "  Expires:  {}",
            expires_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_by_code(&code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  Link was already gone".yellow());
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Pinging database...".bright_blue());

            let started = Instant::now();
            sqlx::query("SELECT 1").execute(pool).await?;

            println!(
                "{} {}",
                "✅ Reachable in".green().bold(),
                format!("{} ms", started.elapsed().as_millis()).bright_white()
            );
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let (version, size): (String, String) = sqlx::query_as(
                "SELECT version(), pg_size_pretty(pg_database_size(current_database()))",
            )
            .fetch_one(pool)
            .await?;

            let migration: Option<(i64, String)> = sqlx::query_as(
                "SELECT version, description FROM _sqlx_migrations ORDER BY version DESC LIMIT 1",
            )
            .fetch_optional(pool)
            .await?;

            println!("  Server:    {}", version.bright_white());
            println!("  Size:      {}", size.bright_white());
            match migration {
                Some((version, description)) => {
                    println!("  Migration: {} ({})", version.to_string().cyan(), description)
                }
                None => println!("  Migration: {}", "none applied".yellow()),
            }
            println!();
        }
    }

    Ok(())
}
