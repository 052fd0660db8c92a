use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection};
use serde::Deserialize;

use crate::error::EtlResult;
use crate::models::{ConsolidatedRecord, Episode};

const SCHEMA_JSON: &str = include_str!("../schema.json");

#[derive(Deserialize)]
struct Schema {
    tables: HashMap<String, Vec<String>>,
    indexes: Vec<(String, String, String)>,
}

pub fn connect(path: &Path) -> EtlResult<Connection> {
    Ok(Connection::open(path)?)
}

/// Create the `Episode` table when absent. Only used when the run is asked to
/// bootstrap its destination; normally the table already exists.
pub fn create_tables(conn: &Connection) -> anyhow::Result<()> {
    let schema: Schema = serde_json::from_str(SCHEMA_JSON)?;
    for (name, cols) in &schema.tables {
        let sql = format!("CREATE TABLE IF NOT EXISTS {} ({})", name, cols.join(", "));
        conn.execute(&sql, [])?;
    }
    for (idx, table, cols) in &schema.indexes {
        let sql = format!("CREATE INDEX IF NOT EXISTS {} ON {} ({})", idx, table, cols);
        conn.execute(&sql, [])?;
    }
    Ok(())
}

/// Insert one `Episode` row per record inside a single transaction.
///
/// Every record is converted before the transaction opens, so a record
/// lacking a required field aborts with nothing written. An insert failure
/// drops the uncommitted transaction, which rolls back earlier rows.
pub fn load_episodes(conn: &Connection, records: &[ConsolidatedRecord]) -> EtlResult<usize> {
    let episodes = records
        .iter()
        .map(Episode::try_from)
        .collect::<EtlResult<Vec<_>>>()?;

    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO Episode (Title, BroadcastDate, ImageSrc, YouTubeSrc, Season, EpisodeInSeason, TotalEpisodeNum)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for e in &episodes {
            count += stmt.execute(params![
                e.title,
                e.broadcast_date,
                e.image_src,
                e.youtube_src,
                e.season,
                e.episode_in_season,
                e.total_episode_num,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

#[cfg(test)]
pub fn fetch_episodes(conn: &Connection) -> EtlResult<Vec<Episode>> {
    let mut stmt = conn.prepare(
        "SELECT Title, BroadcastDate, ImageSrc, YouTubeSrc, Season, EpisodeInSeason, TotalEpisodeNum
         FROM Episode ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Episode {
                title: row.get(0)?,
                broadcast_date: row.get(1)?,
                image_src: row.get(2)?,
                youtube_src: row.get(3)?,
                season: row.get(4)?,
                episode_in_season: row.get(5)?,
                total_episode_num: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
