use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::EtlResult;

const DEFAULT_EPISODE_DATES: &str = "The Joy of Coding - Episode Dates";
const DEFAULT_SUBJECT_MATTER: &str = "The Joy of Coding - Subject Matter";
const DEFAULT_COLORS_USED: &str = "The Joy of Coding - Colors Used";
const DEFAULT_DB: &str = "joy_of_painting.db";
const DEFAULT_LOG: &str = "log_joy_of_painting.txt";
const DEFAULT_ERROR_LOG: &str = "log_errors_joy_of_coding.txt";

/// Paths for one pipeline run. Passed into the pipeline, never read from globals.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    pub episode_dates_path: PathBuf,
    pub subject_matter_path: PathBuf,
    pub colors_used_path: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub error_log_path: PathBuf,
    #[serde(default)]
    pub create_schema: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            episode_dates_path: PathBuf::from(DEFAULT_EPISODE_DATES),
            subject_matter_path: PathBuf::from(DEFAULT_SUBJECT_MATTER),
            colors_used_path: PathBuf::from(DEFAULT_COLORS_USED),
            db_path: PathBuf::from(DEFAULT_DB),
            log_path: PathBuf::from(DEFAULT_LOG),
            error_log_path: PathBuf::from(DEFAULT_ERROR_LOG),
            create_schema: false,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `JOY_`-prefixed environment settings, e.g. `JOY_DB_PATH`.
    pub fn load() -> EtlResult<Self> {
        Self::load_from(Environment::with_prefix("JOY"))
    }

    fn load_from(env: Environment) -> EtlResult<Self> {
        let settings = Config::builder()
            .set_default("episode_dates_path", DEFAULT_EPISODE_DATES)?
            .set_default("subject_matter_path", DEFAULT_SUBJECT_MATTER)?
            .set_default("colors_used_path", DEFAULT_COLORS_USED)?
            .set_default("db_path", DEFAULT_DB)?
            .set_default("log_path", DEFAULT_LOG)?
            .set_default("error_log_path", DEFAULT_ERROR_LOG)?
            .set_default("create_schema", false)?
            .add_source(env)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// All inputs and outputs rooted under `dir`, keeping the default file names.
    #[cfg(test)]
    pub fn rooted_at(dir: &std::path::Path) -> Self {
        let d = PipelineConfig::default();
        PipelineConfig {
            episode_dates_path: dir.join(d.episode_dates_path),
            subject_matter_path: dir.join(d.subject_matter_path),
            colors_used_path: dir.join(d.colors_used_path),
            db_path: dir.join(d.db_path),
            log_path: dir.join(d.log_path),
            error_log_path: dir.join(d.error_log_path),
            create_schema: d.create_schema,
        }
    }
}
