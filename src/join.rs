use std::collections::HashMap;

use itertools::Itertools;

use crate::models::{ColorsTable, ConsolidatedRecord, EpisodeDateRow, SubjectRow};

/// Left outer join of episode dates with subjects, then with colors, on title.
///
/// Episode dates define the row set. Each match on the right multiplies the
/// row, so a title with three colors produces three records carrying the same
/// date and subject. Unmatched titles keep a single row with the right-hand
/// fields unset. Media is looked up by title, independent of color matches.
pub fn left_join(
    dates: &[EpisodeDateRow],
    subjects: &[SubjectRow],
    colors: &ColorsTable,
) -> Vec<ConsolidatedRecord> {
    let subjects_by_title = subjects
        .iter()
        .map(|s| (s.title.as_str(), s))
        .into_group_map();
    let colors_by_title = colors
        .rows
        .iter()
        .map(|c| (c.title.as_str(), c))
        .into_group_map();

    let mut records = Vec::new();
    for date in dates {
        let subject_matches = matches_for(&subjects_by_title, &date.title);
        let color_matches = matches_for(&colors_by_title, &date.title);
        let media = colors.media.get(&date.title);
        for (subject, color) in subject_matches
            .into_iter()
            .cartesian_product(color_matches)
        {
            records.push(ConsolidatedRecord {
                title: date.title.clone(),
                broadcast_date: date.broadcast_date.clone(),
                subject_matter: subject.map(|s| s.subject_matter.clone()),
                color: color.map(|c| c.color.clone()),
                media: media.cloned(),
            });
        }
    }
    records
}

fn matches_for<'a, T>(index: &HashMap<&str, Vec<&'a T>>, title: &str) -> Vec<Option<&'a T>> {
    match index.get(title) {
        Some(rows) => rows.iter().map(|r| Some(*r)).collect(),
        None => vec![None],
    }
}
