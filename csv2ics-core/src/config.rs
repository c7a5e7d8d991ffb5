//! Conversion configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{ConvertError, ConvertResult};

/// Ordinal positions of the five mapped fields, in the order
/// subject, start, end, description, location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub subject: usize,
    pub start: usize,
    pub end: usize,
    pub description: usize,
    pub location: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            subject: 0,
            start: 1,
            end: 2,
            description: 3,
            location: 4,
        }
    }
}

impl ColumnMap {
    /// Build a map from exactly five ordinals.
    ///
    /// Ordinals are not checked against any row width here; rows that are
    /// too short are handled by the mapper.
    pub fn from_ordinals(ordinals: &[usize]) -> ConvertResult<Self> {
        match *ordinals {
            [subject, start, end, description, location] => Ok(ColumnMap {
                subject,
                start,
                end,
                description,
                location,
            }),
            _ => Err(ConvertError::Config(format!(
                "--rows needs exactly 5 column positions (subject, start, end, description, location), got {}",
                ordinals.len()
            ))),
        }
    }
}

static DEFAULT_COMPANY: &str = "My Company";
static DEFAULT_PRODUCT: &str = "My Product";
static DEFAULT_LANGUAGE: &str = "EN";
static DEFAULT_DOMAIN: &str = "mycompany.com";
static DEFAULT_NAME: &str = "My Calendar";
static DEFAULT_URL: &str = "http://mycompany.com/";

/// Fixed calendar metadata written into every generated file.
///
/// Can be overridden from a TOML file:
///
/// ```toml
/// company = "Acme"
/// product = "Rota"
/// domain = "acme.example"
/// name = "Team rota"
/// url = "https://acme.example/rota"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarMeta {
    pub company: String,
    pub product: String,
    pub language: String,
    pub domain: String,
    pub name: String,
    pub url: String,
}

impl Default for CalendarMeta {
    fn default() -> Self {
        CalendarMeta {
            company: DEFAULT_COMPANY.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            name: DEFAULT_NAME.to_string(),
            url: DEFAULT_URL.to_string(),
        }
    }
}

impl CalendarMeta {
    /// Load metadata from a TOML file. Keys missing from the file keep
    /// their default values.
    pub fn load(path: &Path) -> ConvertResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConvertError::MetadataFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Self::from_toml(&contents).map_err(|message| ConvertError::MetadataFile {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    /// PRODID value in the `-//company//product//language` form.
    pub fn prod_id(&self) -> String {
        format!("-//{}//{}//{}", self.company, self.product, self.language)
    }
}

/// Parse a delimiter argument into the single byte the CSV reader needs.
///
/// Accepts one ASCII character, or `\t` / `tab` for a tab.
pub fn parse_delimiter(input: &str) -> ConvertResult<u8> {
    match input {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }

    match input.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConvertError::Config(format!(
            "Delimiter must be a single ASCII character, got \"{}\"",
            input
        ))),
    }
}

/// Parse an IANA timezone name such as `Europe/Paris`.
pub fn parse_timezone(input: &str) -> ConvertResult<Tz> {
    input
        .parse::<Tz>()
        .map_err(|_| ConvertError::Config(format!("Unknown timezone: \"{}\"", input)))
}

/// Everything one conversion run needs. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub delimiter: u8,
    pub has_headers: bool,
    pub columns: ColumnMap,
    pub date_format: Option<String>,
    pub timezone: Option<Tz>,
    pub metadata: CalendarMeta,
}

impl ConvertConfig {
    /// Configuration with every optional setting at its default.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        ConvertConfig {
            input_path: input_path.into(),
            output_path: output_path.into(),
            delimiter: b',',
            has_headers: true,
            columns: ColumnMap::default(),
            date_format: None,
            timezone: None,
            metadata: CalendarMeta::default(),
        }
    }
}
