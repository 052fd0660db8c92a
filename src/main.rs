//! Joy of Painting ETL - one-shot batch load.
//!
//! Extracts episode dates, subject matter and colors used, joins them on the
//! lowercased painting title and appends the result to the `Episode` table.

mod db;
mod error;
mod extract;
mod join;
mod models;
mod pipeline;
mod runlog;
mod settings;
mod text;
mod validate;

use anyhow::{Context, Result};
use pipeline::RunOutcome;
use settings::PipelineConfig;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = PipelineConfig::load().context("Failed to load settings")?;
    info!(settings = ?config, "Starting Joy of Painting ETL");

    println!("Joy of Painting ETL");
    println!("===================\n");

    let conn = db::connect(&config.db_path)
        .with_context(|| format!("Failed to open {:?}", config.db_path))?;
    println!("Database: {:?}\n", config.db_path);

    match pipeline::run(&config, &conn)? {
        RunOutcome::Loaded(s) => {
            println!("Episode dates:   {}", s.episode_dates);
            println!("Subject matter:  {}", s.subjects);
            println!("Color rows:      {}", s.colors);
            println!("Joined records:  {}", s.consolidated);
            println!("Inserted:        {}", s.inserted);
            println!("Logged errors:   {}", s.errors_logged);
            println!("\nETL process completed!");
        }
        RunOutcome::ValidationFailed { table, reason } => {
            println!("Error: {}", reason);
            println!("Validation failed for {}.", table);
        }
        RunOutcome::LoadAborted { reason } => {
            println!("Load aborted: {}", reason);
        }
    }
    Ok(())
}
