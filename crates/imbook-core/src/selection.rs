//! Best-record selection for single-ISBN detail lookups
//!
//! Candidates are assumed to describe the same physical book. The most
//! informationally complete one wins; no fields are merged across records.

use crate::domain::BookRecord;

/// Completeness score of a record
///
/// Description and cover weigh 2, every other populated optional field 1.
pub fn completeness_score(record: &BookRecord) -> u32 {
    let weighted = [
        (record.isbn.is_some(), 1),
        (record.publisher.is_some(), 1),
        (record.published_date.is_some(), 1),
        (record.page_count.is_some(), 1),
        (record.description.is_some(), 2),
        (record.cover_image_url.is_some(), 2),
        (record.affiliate_url.is_some(), 1),
    ];

    weighted
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, weight)| weight)
        .sum()
}

/// Pick the highest scoring record, ties going to the earliest
pub fn select_best(candidates: &[BookRecord]) -> Option<&BookRecord> {
    best_index(candidates).map(|index| &candidates[index])
}

/// Owned variant of [`select_best`]
pub fn into_best(candidates: Vec<BookRecord>) -> Option<BookRecord> {
    let index = best_index(&candidates)?;
    candidates.into_iter().nth(index)
}

fn best_index(candidates: &[BookRecord]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = completeness_score(candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    best.map(|(index, _)| index)
}
