//! Status and error logs for a single run.
//!
//! Both files are opened once in append mode when the run starts, stamped with
//! a banner, and closed when the `RunLog` is dropped. Every entry is also
//! forwarded to `tracing`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Local;
use tracing::{error, info, warn};

use crate::error::EtlResult;

const BANNER_WIDTH: usize = 50;

pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub struct RunLog {
    status: File,
    errors: File,
    error_count: usize,
}

impl RunLog {
    pub fn open(log_path: &Path, error_log_path: &Path) -> EtlResult<Self> {
        let mut status = open_append(log_path)?;
        let mut errors = open_append(error_log_path)?;
        let started = now_stamp();
        write_banner(&mut status, &started)?;
        write_banner(&mut errors, &started)?;
        info!(log = %log_path.display(), errors = %error_log_path.display(), "run log opened");
        Ok(RunLog {
            status,
            errors,
            error_count: 0,
        })
    }

    pub fn status(&mut self, msg: &str) {
        info!("{}", msg);
        if let Err(e) = writeln!(self.status, "{}", msg).and_then(|_| self.status.flush()) {
            error!(error = %e, "failed to append to status log");
        }
    }

    pub fn error(&mut self, msg: &str) {
        warn!("{}", msg);
        self.error_count += 1;
        if let Err(e) = writeln!(self.errors, "{}", msg).and_then(|_| self.errors.flush()) {
            error!(error = %e, "failed to append to error log");
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

fn open_append(path: &Path) -> EtlResult<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn write_banner(f: &mut File, started: &str) -> EtlResult<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    write!(f, "\n{}\nETL Process Started: {}\n{}\n\n", rule, started, rule)?;
    f.flush()?;
    Ok(())
}
