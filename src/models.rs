use std::collections::HashMap;

use crate::error::{EtlError, EtlResult};

/// Fixed season length of the show, used to derive the running episode number.
pub const EPISODES_PER_SEASON: i64 = 13;

/// Column view of a typed row, used by the validator.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    /// Value of `column` for this row; `None` when the row carries nothing there.
    fn value(&self, column: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeDateRow {
    pub title: String,
    pub broadcast_date: String,
}

impl Tabular for EpisodeDateRow {
    const COLUMNS: &'static [&'static str] = &["Title", "BroadcastDate"];

    fn value(&self, column: &str) -> Option<&str> {
        match column {
            "Title" => Some(&self.title),
            "BroadcastDate" => Some(&self.broadcast_date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRow {
    pub title: String,
    pub subject_matter: String,
}

impl Tabular for SubjectRow {
    const COLUMNS: &'static [&'static str] = &["Title", "SubjectMatter"];

    fn value(&self, column: &str) -> Option<&str> {
        match column {
            "Title" => Some(&self.title),
            "SubjectMatter" => Some(&self.subject_matter),
            _ => None,
        }
    }
}

/// Per-painting media and placement, read from the colors-used source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMedia {
    pub image_src: String,
    pub youtube_src: String,
    pub season: i64,
    pub episode_in_season: i64,
}

impl EpisodeMedia {
    /// `None` when the running number does not fit in an `i64`.
    pub fn total_episode_num(&self) -> Option<i64> {
        self.season
            .checked_sub(1)?
            .checked_mul(EPISODES_PER_SEASON)?
            .checked_add(self.episode_in_season)
    }
}

/// One (painting, color) pair. A painting with N colors yields N rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRow {
    pub title: String,
    pub color: String,
}

/// Output of the colors-used extractor. Media is keyed by lowercased title so
/// a painting listed with no colors still carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorsTable {
    pub rows: Vec<ColorRow>,
    pub media: HashMap<String, EpisodeMedia>,
}

impl Tabular for ColorRow {
    const COLUMNS: &'static [&'static str] = &["painting_title", "color"];

    /// An empty `painting_title` cell reads as absent, as a blank CSV cell would.
    fn value(&self, column: &str) -> Option<&str> {
        match column {
            "painting_title" => Some(self.title.as_str()).filter(|t| !t.is_empty()),
            "color" => Some(&self.color),
            _ => None,
        }
    }
}

/// Left-joined row: episode date, then subject and color when matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedRecord {
    pub title: String,
    pub broadcast_date: String,
    pub subject_matter: Option<String>,
    pub color: Option<String>,
    pub media: Option<EpisodeMedia>,
}

/// Row of the destination `Episode` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    pub broadcast_date: String,
    pub image_src: String,
    pub youtube_src: String,
    pub season: i64,
    pub episode_in_season: i64,
    pub total_episode_num: i64,
}

impl TryFrom<&ConsolidatedRecord> for Episode {
    type Error = EtlError;

    fn try_from(rec: &ConsolidatedRecord) -> EtlResult<Self> {
        let missing = |field| EtlError::MissingField {
            title: rec.title.clone(),
            field,
        };
        if rec.broadcast_date.trim().is_empty() {
            return Err(missing("BroadcastDate"));
        }
        let media = rec.media.as_ref().ok_or_else(|| missing("ImageSrc"))?;
        let total_episode_num = media
            .total_episode_num()
            .ok_or_else(|| missing("TotalEpisodeNum"))?;
        Ok(Episode {
            title: rec.title.clone(),
            broadcast_date: rec.broadcast_date.clone(),
            image_src: media.image_src.clone(),
            youtube_src: media.youtube_src.clone(),
            season: media.season,
            episode_in_season: media.episode_in_season,
            total_episode_num,
        })
    }
}
