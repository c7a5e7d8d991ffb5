//! ICS file generation.
//!
//! This module writes the accumulated calendar as RFC 5545 text.

mod generate;

pub use generate::{generate_ics, write_calendar};
