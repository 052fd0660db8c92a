//! One ETL run: extract the three sources, gate each table, join, load.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db;
use crate::error::EtlError;
use crate::extract;
use crate::join::left_join;
use crate::models::{ColorRow, EpisodeDateRow, SubjectRow, Tabular};
use crate::runlog::{now_stamp, RunLog};
use crate::settings::PipelineConfig;
use crate::validate::{validate, validate_optional};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub episode_dates: usize,
    pub subjects: usize,
    pub colors: usize,
    pub consolidated: usize,
    pub inserted: usize,
    pub errors_logged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Loaded(RunSummary),
    /// A table failed its gate; nothing was written.
    ValidationFailed { table: String, reason: String },
    /// A record lacked a field the insert needs; nothing was written.
    LoadAborted { reason: String },
}

pub fn run(config: &PipelineConfig, conn: &Connection) -> Result<RunOutcome> {
    let mut log = RunLog::open(&config.log_path, &config.error_log_path)
        .context("Failed to open run logs")?;

    let dates = extract::episode_dates(&config.episode_dates_path, &mut log)
        .with_context(|| format!("Failed to read {:?}", config.episode_dates_path))?;
    let subjects = extract::subject_matter(&config.subject_matter_path, &mut log)
        .with_context(|| format!("Failed to read {:?}", config.subject_matter_path))?;
    let colors = extract::colors_used(&config.colors_used_path, &mut log);

    let gates = validate("episode_dates", &dates, EpisodeDateRow::COLUMNS)
        .and_then(|_| validate("subject_matter", &subjects, SubjectRow::COLUMNS))
        .and_then(|_| {
            let rows = colors.as_ref().map(|c| c.rows.as_slice());
            validate_optional("colors_used", rows, ColorRow::COLUMNS)
        });
    match gates {
        Ok(()) => {}
        Err(EtlError::Validation { table, reason }) => {
            warn!(%table, %reason, "validation failed, skipping load");
            return Ok(RunOutcome::ValidationFailed { table, reason });
        }
        Err(e) => return Err(e.into()),
    }
    let colors = colors.unwrap_or_default();

    let records = left_join(&dates, &subjects, &colors);
    info!(
        dates = dates.len(),
        subjects = subjects.len(),
        colors = colors.rows.len(),
        records = records.len(),
        "tables joined"
    );

    if config.create_schema {
        db::create_tables(conn)?;
    }

    let inserted = match db::load_episodes(conn, &records) {
        Ok(n) => n,
        Err(e @ EtlError::MissingField { .. }) => {
            log.error(&format!("Load aborted at {}: {}", now_stamp(), e));
            return Ok(RunOutcome::LoadAborted {
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e).context("Failed to insert episodes"),
    };
    log.status(&format!(
        "Data successfully loaded into {} at {}",
        config.db_path.display(),
        now_stamp()
    ));

    Ok(RunOutcome::Loaded(RunSummary {
        episode_dates: dates.len(),
        subjects: subjects.len(),
        colors: colors.rows.len(),
        consolidated: records.len(),
        inserted,
        errors_logged: log.error_count(),
    }))
}
