//! Record extractors: one per input source.
//!
//! The two line-oriented sources share the `"<title>" (<value>)` parser.
//! Lines that fail are written to the error log and skipped. The colors
//! source is CSV; any failure there is logged and yields no table at all.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{EtlError, EtlResult};
use crate::models::{ColorRow, ColorsTable, EpisodeDateRow, EpisodeMedia, SubjectRow};
use crate::runlog::{now_stamp, RunLog};
use crate::text::{normalize_date, parse_line, quoted_items};

pub fn episode_dates(path: &Path, log: &mut RunLog) -> EtlResult<Vec<EpisodeDateRow>> {
    titled_lines(path, log, |title, value, log| match normalize_date(&value) {
        Ok(broadcast_date) => Some(EpisodeDateRow {
            title,
            broadcast_date,
        }),
        Err(_) => {
            log.error(&format!("Error converting date for episode: {}", title));
            None
        }
    })
}

pub fn subject_matter(path: &Path, log: &mut RunLog) -> EtlResult<Vec<SubjectRow>> {
    titled_lines(path, log, |title, subject_matter, _| {
        Some(SubjectRow {
            title,
            subject_matter,
        })
    })
}

fn titled_lines<T, F>(path: &Path, log: &mut RunLog, mut to_row: F) -> EtlResult<Vec<T>>
where
    F: FnMut(String, String, &mut RunLog) -> Option<T>,
{
    let raw = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for line in raw.lines() {
        match parse_line(line) {
            Ok((title, value)) => {
                if let Some(row) = to_row(title, value, log) {
                    rows.push(row);
                }
            }
            Err(_) => log.error(&format!("Error extracting data from line: {}", line)),
        }
    }
    log.status(&format!("Completed processing file: {}", path.display()));
    Ok(rows)
}

/// `None` when the source is unreadable or lacks `painting_title`/`colors`.
pub fn colors_used(path: &Path, log: &mut RunLog) -> Option<ColorsTable> {
    match read_colors(path) {
        Ok(table) => {
            log.status(&format!(
                "Successfully processed {} at {}",
                path.display(),
                now_stamp()
            ));
            Some(table)
        }
        Err(e) => {
            log.error(&format!(
                "Error processing {} at {}: {}",
                path.display(),
                now_stamp(),
                e
            ));
            None
        }
    }
}

struct ColorColumns {
    title: usize,
    colors: usize,
    image_src: Option<usize>,
    youtube_src: Option<usize>,
    season: Option<usize>,
    episode: Option<usize>,
}

impl ColorColumns {
    fn locate(headers: &StringRecord) -> EtlResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required = |name: &str| {
            find(name).ok_or_else(|| EtlError::Schema {
                column: name.to_string(),
            })
        };
        Ok(ColorColumns {
            title: required("painting_title")?,
            colors: required("colors")?,
            image_src: find("img_src"),
            youtube_src: find("youtube_src"),
            season: find("season"),
            episode: find("episode"),
        })
    }

    fn media(&self, record: &StringRecord) -> Option<EpisodeMedia> {
        let text = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };
        let number = |idx: Option<usize>| text(idx).and_then(|s| s.parse::<i64>().ok());
        let media = EpisodeMedia {
            image_src: text(self.image_src)?.to_string(),
            youtube_src: text(self.youtube_src)?.to_string(),
            season: number(self.season)?,
            episode_in_season: number(self.episode)?,
        };
        media.total_episode_num()?;
        Some(media)
    }
}

fn read_colors(path: &Path) -> EtlResult<ColorsTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let cols = ColorColumns::locate(rdr.headers()?)?;

    let mut table = ColorsTable::default();
    for record in rdr.records() {
        let record = record?;
        let title = record.get(cols.title).unwrap_or_default().to_lowercase();
        if let Some(media) = cols.media(&record) {
            table.media.entry(title.clone()).or_insert(media);
        }
        for color in quoted_items(record.get(cols.colors).unwrap_or_default()) {
            table.rows.push(ColorRow {
                title: title.clone(),
                color,
            });
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        log: PathBuf,
        errors: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("status.txt");
            let errors = dir.path().join("errors.txt");
            Fixture { dir, log, errors }
        }

        fn write(&self, name: &str, body: &str) -> PathBuf {
            let p = self.dir.path().join(name);
            fs::write(&p, body).unwrap();
            p
        }

        fn run_log(&self) -> RunLog {
            RunLog::open(&self.log, &self.errors).unwrap()
        }

        fn error_lines(&self) -> Vec<String> {
            fs::read_to_string(&self.errors)
                .unwrap()
                .lines()
                .filter(|l| l.starts_with("Error"))
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn episode_dates_keep_only_parsed_rows() {
        let fx = Fixture::new();
        let src = fx.write(
            "dates",
            "\"A Walk in the Woods\" (January 11, 1983)\n\
             no pattern on this line\n\
             \"Mt. McKinley\" (13/25/1983)\n\
             \"Ebony Sunset\" (January 25, 1983)\n",
        );
        let mut log = fx.run_log();
        let rows = episode_dates(&src, &mut log).unwrap();
        drop(log);

        assert_eq!(
            rows,
            vec![
                EpisodeDateRow {
                    title: "a walk in the woods".into(),
                    broadcast_date: "1983-01-11".into(),
                },
                EpisodeDateRow {
                    title: "ebony sunset".into(),
                    broadcast_date: "1983-01-25".into(),
                },
            ]
        );
        assert_eq!(
            fx.error_lines(),
            vec![
                "Error extracting data from line: no pattern on this line",
                "Error converting date for episode: mt. mckinley",
            ]
        );
        let status = fs::read_to_string(&fx.log).unwrap();
        assert!(status.contains(&format!("Completed processing file: {}", src.display())));
    }

    #[test]
    fn subject_matter_accepts_any_value() {
        let fx = Fixture::new();
        let src = fx.write(
            "subjects",
            "\"Mountain View\" (Mountains)\n\n\"Winter Mist\" (Snow, Trees)\n",
        );
        let mut log = fx.run_log();
        let rows = subject_matter(&src, &mut log).unwrap();
        assert_eq!(log.error_count(), 1);
        drop(log);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "mountain view");
        assert_eq!(rows[0].subject_matter, "Mountains");
        assert_eq!(rows[1].subject_matter, "Snow, Trees");
        assert_eq!(fx.error_lines(), vec!["Error extracting data from line: "]);
    }

    #[test]
    fn missing_text_source_is_an_io_error() {
        let fx = Fixture::new();
        let mut log = fx.run_log();
        let missing = fx.dir.path().join("nope");
        assert!(matches!(
            episode_dates(&missing, &mut log),
            Err(EtlError::Io(_))
        ));
    }

    #[test]
    fn colors_expand_one_row_per_color() {
        let fx = Fixture::new();
        let src = fx.write(
            "colors.csv",
            "painting_title,colors\nMountain View,\"['Red', 'Blue']\"\nBare,\"[]\"\n",
        );
        let mut log = fx.run_log();
        let table = colors_used(&src, &mut log).unwrap();
        assert_eq!(
            table.rows,
            vec![
                ColorRow {
                    title: "mountain view".into(),
                    color: "Red".into(),
                },
                ColorRow {
                    title: "mountain view".into(),
                    color: "Blue".into(),
                },
            ]
        );
        assert!(table.media.is_empty());
        assert_eq!(log.error_count(), 0);
    }

    #[test]
    fn colors_carry_media_columns() {
        let fx = Fixture::new();
        let src = fx.write(
            "colors.csv",
            ",painting_index,img_src,painting_title,season,episode,num_colors,youtube_src,colors\n\
             0,282,https://img/a.png,A Walk in the Woods,1,1,8,https://yt/1,\"['Alizarin Crimson', 'Bright Red']\"\n\
             1,283,https://img/b.png,Mt. McKinley,1,x,8,https://yt/2,\"['Cadmium Yellow']\"\n\
             2,284,https://img/c.png,Bare Canvas,1,3,0,https://yt/3,\"[]\"\n\
             3,285,https://img/d.png,Endless Season,9223372036854775807,1,1,https://yt/4,\"['Van Dyke Brown']\"\n",
        );
        let mut log = fx.run_log();
        let table = colors_used(&src, &mut log).unwrap();
        assert_eq!(table.rows.len(), 4);

        let media = &table.media["a walk in the woods"];
        assert_eq!(media.image_src, "https://img/a.png");
        assert_eq!(media.youtube_src, "https://yt/1");
        assert_eq!((media.season, media.episode_in_season), (1, 1));
        // a painting with no colors still has its media
        assert_eq!(table.media["bare canvas"].episode_in_season, 3);
        // unparseable episode number leaves the media unset
        assert!(!table.media.contains_key("mt. mckinley"));
        // so does a season whose running episode number overflows
        assert!(!table.media.contains_key("endless season"));
        assert_eq!(table.media.len(), 2);
    }

    #[test]
    fn colors_missing_column_yields_nothing() {
        let fx = Fixture::new();
        let src = fx.write("colors.csv", "title,colors\nMountain View,\"['Red']\"\n");
        let mut log = fx.run_log();
        assert!(colors_used(&src, &mut log).is_none());
        drop(log);

        let errors = fx.error_lines();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(&format!("Error processing {} at ", src.display())));
        assert!(errors[0].ends_with("required column 'painting_title' not found in the dataset"));
    }

    #[test]
    fn colors_unreadable_source_yields_nothing() {
        let fx = Fixture::new();
        let mut log = fx.run_log();
        assert!(colors_used(&fx.dir.path().join("absent.csv"), &mut log).is_none());
        assert_eq!(log.error_count(), 1);
    }
}
