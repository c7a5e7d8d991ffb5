//! Core of the csv2ics converter.
//!
//! This crate turns CSV event lists into iCalendar files:
//! - `config` for the run configuration and calendar metadata
//! - `row` and `mapper` for turning CSV records into events
//! - `calendar` and `ics` for collecting and writing the result
//! - `convert` for the streaming driver tying them together

pub mod calendar;
pub mod config;
pub mod convert;
pub mod date;
pub mod error;
pub mod event;
pub mod ics;
pub mod mapper;
pub mod report;
pub mod row;

pub use calendar::EventCalendar;
pub use config::{CalendarMeta, ColumnMap, ConvertConfig};
pub use convert::{convert_file, convert_reader};
pub use error::{ConvertError, ConvertResult};
pub use event::{EventRecord, EventTime};
pub use report::{ConvertSummary, LogReporter, Reporter, SkipReason};
