//! Progress reporting for a conversion run.
//!
//! The pipeline never logs directly; it talks to a [`Reporter`] handed in by
//! the caller. [`LogReporter`] forwards to the `log` facade.

use std::path::Path;

use crate::event::EventRecord;

/// Why a row produced no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Start column is missing or does not begin with a digit 1-9
    NotData { value: Option<String> },
    /// Start or end column could not be parsed as a date
    BadDate { start: String, end: String },
    /// The CSV reader could not decode the record
    Unreadable { message: String },
}

/// Row counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Records read after the header line
    pub rows: u64,
    pub events: u64,
    pub not_data: u64,
    pub bad_date: u64,
    pub unreadable: u64,
}

impl ConvertSummary {
    pub fn skipped(&self) -> u64 {
        self.not_data + self.bad_date + self.unreadable
    }

    pub(crate) fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::NotData { .. } => self.not_data += 1,
            SkipReason::BadDate { .. } => self.bad_date += 1,
            SkipReason::Unreadable { .. } => self.unreadable += 1,
        }
    }
}

pub trait Reporter {
    /// A row became an event.
    fn accepted(&mut self, event: &EventRecord);

    /// A row was skipped. `line` is the 1-based line in the input.
    fn skipped(&mut self, line: u64, reason: &SkipReason);

    /// The calendar is about to be written.
    fn saving(&mut self, path: &Path, events: usize);

    /// The run finished.
    fn finished(&mut self, summary: &ConvertSummary);
}

/// Forwards everything to the `log` macros.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn accepted(&mut self, event: &EventRecord) {
        log::info!("Subject : {}", event.subject);
        log::info!("Start Date : {}", event.start);
        log::info!("End Date : {}", event.end);
        log::info!("Description : {}", event.description);
        log::info!("Location : {}", event.location);
        log::info!("-------------");
    }

    fn skipped(&mut self, line: u64, reason: &SkipReason) {
        match reason {
            SkipReason::NotData { value: Some(value) } => log::error!(
                "Line {}: start date \"{}\" is not a date. Are you using headers in your CSV file? If so you need the -H option",
                line,
                value
            ),
            SkipReason::NotData { value: None } => {
                log::error!("Line {}: no start date column, check --rows", line)
            }
            // Dropped silently at the default level
            SkipReason::BadDate { start, end } => log::debug!(
                "Line {}: dropped, could not parse dates \"{}\" / \"{}\"",
                line,
                start,
                end
            ),
            SkipReason::Unreadable { message } => {
                log::warn!("Line {}: unreadable record: {}", line, message)
            }
        }
    }

    fn saving(&mut self, path: &Path, events: usize) {
        log::info!("Saving {} events to file : {}", events, path.display());
    }

    fn finished(&mut self, summary: &ConvertSummary) {
        log::info!(
            "Read {} rows: {} events, {} skipped ({} non-data, {} bad dates, {} unreadable)",
            summary.rows,
            summary.events,
            summary.skipped(),
            summary.not_data,
            summary.bad_date,
            summary.unreadable
        );
    }
}

/// Keeps every report in memory. Used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub accepted: Vec<EventRecord>,
    pub skipped: Vec<(u64, SkipReason)>,
    pub saved_to: Option<std::path::PathBuf>,
    pub summary: Option<ConvertSummary>,
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn accepted(&mut self, event: &EventRecord) {
        self.accepted.push(event.clone());
    }

    fn skipped(&mut self, line: u64, reason: &SkipReason) {
        self.skipped.push((line, reason.clone()));
    }

    fn saving(&mut self, path: &Path, _events: usize) {
        self.saved_to = Some(path.to_path_buf());
    }

    fn finished(&mut self, summary: &ConvertSummary) {
        self.summary = Some(*summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_reason() {
        let mut summary = ConvertSummary::default();
        summary.record_skip(&SkipReason::NotData { value: None });
        summary.record_skip(&SkipReason::BadDate {
            start: "1x".into(),
            end: "2y".into(),
        });
        summary.record_skip(&SkipReason::BadDate {
            start: "1x".into(),
            end: "".into(),
        });
        summary.record_skip(&SkipReason::Unreadable {
            message: "invalid utf-8".into(),
        });

        assert_eq!(summary.not_data, 1);
        assert_eq!(summary.bad_date, 2);
        assert_eq!(summary.unreadable, 1);
        assert_eq!(summary.skipped(), 4);
    }
}
