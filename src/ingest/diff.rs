//! Deduplication and change detection against stored state
//!
//! Dedup collapses re-listed notices inside one run; diff then subtracts the
//! reference window of recently stored notices so persistence only sees what
//! is new or changed. The window approach assumes the source never edits old
//! entries, only adds or corrects near the current frontier; retroactive
//! edits to historical notices are missed by design.

use std::collections::{HashMap, HashSet};

use crate::models::{Notice, StoredNotice};

/// Collapse duplicate candidates sharing the `(title, url)` identity key
///
/// The entry with the later inferred date wins under calendar comparison;
/// a known date beats `Unknown`, and ties keep the first encountered.
/// First-encounter order is preserved.
pub fn dedup(notices: Vec<Notice>) -> Vec<Notice> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut kept: Vec<Notice> = Vec::new();
    let mut duplicates = 0usize;

    for notice in notices {
        let key = (notice.title.clone(), notice.url.clone());
        match index.get(&key) {
            Some(&at) => {
                duplicates += 1;
                if notice.date > kept[at].date {
                    kept[at] = notice;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(notice);
            }
        }
    }

    if duplicates > 0 {
        tracing::debug!(duplicates, retained = kept.len(), "collapsed duplicate candidates");
    }

    kept
}

/// Keep every candidate whose composite key `date|title|url` is absent from
/// the reference window
pub fn diff(candidates: Vec<Notice>, window: &[StoredNotice]) -> Vec<Notice> {
    let reference: HashSet<String> = window.iter().map(StoredNotice::composite_key).collect();

    candidates
        .into_iter()
        .filter(|notice| !reference.contains(&notice.composite_key()))
        .collect()
}
