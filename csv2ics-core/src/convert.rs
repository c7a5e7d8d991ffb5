//! Streaming CSV to calendar conversion.

use std::fs::File;
use std::io::{BufReader, Read};

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};

use crate::calendar::EventCalendar;
use crate::config::ConvertConfig;
use crate::date::DateParser;
use crate::error::{ConvertError, ConvertResult};
use crate::ics::write_calendar;
use crate::mapper::{RowOutcome, map_row};
use crate::report::{ConvertSummary, Reporter, SkipReason};
use crate::row::Row;

/// Read every CSV record from `reader` and collect the accepted events.
///
/// Records are pulled one at a time; only the resulting events are kept in
/// memory. Undecodable records are skipped, I/O errors abort.
pub fn convert_reader<R: Read>(
    reader: R,
    config: &ConvertConfig,
    stamp: DateTime<Utc>,
    reporter: &mut dyn Reporter,
) -> ConvertResult<(EventCalendar, ConvertSummary)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_headers)
        .flexible(true)
        .from_reader(reader);

    let headers: Option<StringRecord> = if config.has_headers {
        Some(rdr.headers()?.clone())
    } else {
        None
    };

    let parser = DateParser::new(config.date_format.as_deref());
    let mut calendar = EventCalendar::new(config.metadata.clone(), stamp);
    let mut summary = ConvertSummary::default();

    for result in rdr.records() {
        summary.rows += 1;

        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(ConvertError::Read(err)),
            Err(err) => {
                let line = err.position().map_or(0, |p| p.line());
                let reason = SkipReason::Unreadable {
                    message: err.to_string(),
                };
                summary.record_skip(&reason);
                reporter.skipped(line, &reason);
                continue;
            }
        };

        let line = record.position().map_or(0, |p| p.line());
        let row = match &headers {
            Some(headers) => Row::with_headers(headers, &record),
            None => Row::positional(&record),
        };

        match map_row(&row, line, config, &parser) {
            RowOutcome::Event(event) => {
                summary.events += 1;
                reporter.accepted(&event);
                calendar.add_event(event);
            }
            RowOutcome::Skip(reason) => {
                summary.record_skip(&reason);
                reporter.skipped(line, &reason);
            }
        }
    }

    Ok((calendar, summary))
}

/// Convert `config.input_path` and write the calendar to `config.output_path`.
///
/// DTSTAMP is taken from the input file's modification time so repeated
/// runs over an unchanged file produce identical output.
pub fn convert_file(
    config: &ConvertConfig,
    reporter: &mut dyn Reporter,
) -> ConvertResult<ConvertSummary> {
    let file = File::open(&config.input_path).map_err(|source| ConvertError::Open {
        path: config.input_path.clone(),
        source,
    })?;

    let stamp = file
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(Utc::now);

    let (calendar, summary) = convert_reader(BufReader::new(file), config, stamp, reporter)?;

    reporter.saving(&config.output_path, calendar.len());
    write_calendar(&calendar, &config.output_path)?;
    reporter.finished(&summary);

    Ok(summary)
}
