//! Time-based grouping of filtered entries into concurrent batches.

use chrono::TimeDelta;

use crate::har::Entry;

/// A run of consecutive entries rendered as one `http.batch` call.
#[derive(Debug)]
pub struct Batch<'a> {
    pub entries: Vec<&'a Entry>,
    /// Gap between the previous batch's last entry and this batch's first entry.
    /// `None` for the first batch.
    pub pause_before: Option<TimeDelta>,
}

/// Splits capture-ordered entries into batches.
///
/// An entry joins the current batch when its start time is strictly less than
/// `threshold` after the previous entry's start; otherwise it opens a new batch
/// and the gap becomes that batch's `pause_before`. A zero threshold puts every
/// entry in its own batch, including entries with identical start times.
/// Negative gaps (out-of-order captures) are paced as zero.
pub fn split_into_batches<'a>(entries: &[&'a Entry], threshold: TimeDelta) -> Vec<Batch<'a>> {
    let mut batches: Vec<Batch<'a>> = Vec::new();
    let mut prev: Option<&'a Entry> = None;

    for &entry in entries {
        let gap = prev.map(|p| entry.started - p.started);
        let joins = gap.is_some_and(|g| threshold > TimeDelta::zero() && g < threshold);

        if joins {
            if let Some(current) = batches.last_mut() {
                current.entries.push(entry);
            }
        } else {
            let pause_before = gap.map(|g| g.max(TimeDelta::zero()));
            if let Some(pause) = pause_before {
                tracing::debug!(
                    pause_ms = pause.num_milliseconds(),
                    url = %entry.request.url,
                    "batch boundary"
                );
            }
            batches.push(Batch {
                entries: vec![entry],
                pause_before,
            });
        }
        prev = Some(entry);
    }

    batches
}
