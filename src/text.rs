use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{EtlError, EtlResult};

/// Split a line of the form `"<title>" (<value>)` into (lowercased title, value).
/// The pattern may appear anywhere in the line.
pub fn parse_line(line: &str) -> EtlResult<(String, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#""(.*?)" \((.*?)\)"#).unwrap());
    let caps = re.captures(line).ok_or_else(|| EtlError::NoMatch {
        line: line.to_string(),
    })?;
    Ok((caps[1].to_lowercase(), caps[2].to_string()))
}

/// "January 5, 2001" -> "2001-01-05". Abbreviated month names are rejected.
pub fn normalize_date(raw: &str) -> EtlResult<String> {
    let invalid = || EtlError::InvalidDate {
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%B %d, %Y").map_err(|_| invalid())?;
    // chrono's %B also matches "Jan"
    let month = trimmed.split_whitespace().next().unwrap_or_default();
    if !month.eq_ignore_ascii_case(&date.format("%B").to_string()) {
        return Err(invalid());
    }
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Every single-quoted substring, e.g. `['Red', 'Blue']` -> ["Red", "Blue"].
pub fn quoted_items(cell: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"'(.*?)'").unwrap());
    re.captures_iter(cell).map(|c| c[1].to_string()).collect()
}
