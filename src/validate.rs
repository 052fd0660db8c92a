use crate::error::{EtlError, EtlResult};
use crate::models::Tabular;

/// Gate a table before joining. Fails if a required column is not part of the
/// row type, or if any row has no value in a required column. An empty string
/// is a value; only what `Tabular::value` reports as absent counts as missing.
/// The table itself is never modified.
pub fn validate<T: Tabular>(table: &str, rows: &[T], required: &[&str]) -> EtlResult<()> {
    let fail = |reason: String| EtlError::Validation {
        table: table.to_string(),
        reason,
    };

    if let Some(col) = required.iter().find(|c| !T::COLUMNS.contains(*c)) {
        return Err(fail(format!("Column '{}' not found in the table.", col)));
    }

    for col in required {
        let has_missing = rows
            .iter()
            .any(|row| row.value(col).is_none());
        if has_missing {
            return Err(fail(format!("Missing values detected in column '{}'.", col)));
        }
    }
    Ok(())
}

/// Same gate for a table an extractor may have failed to produce.
pub fn validate_optional<T: Tabular>(
    table: &str,
    rows: Option<&[T]>,
    required: &[&str],
) -> EtlResult<()> {
    match rows {
        Some(rows) => validate(table, rows, required),
        None => Err(EtlError::Validation {
            table: table.to_string(),
            reason: "table was not produced".to_string(),
        }),
    }
}
