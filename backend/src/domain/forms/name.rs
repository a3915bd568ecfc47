//! Names of generated form files.

use std::fmt;

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::RecordId;

const PREFIX: &str = "deltio_";
const PDF_SUFFIX: &str = ".pdf";

/// Rejected form file name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a generated form name: {0}")]
pub struct FormNameError(pub String);

/// File name of a generated form, either the intermediate field document or
/// the rendered PDF.
///
/// Intermediate names look like `deltio_{record}_{year}_{month}_{day}_{hex}`
/// where `hex` is 4 random bytes; the PDF adds `.pdf`.
///
/// # Examples
/// ```
/// use repair_desk::domain::FormName;
///
/// assert!(FormName::parse("deltio_12_2025_3_7_0a1b2c3d.pdf").is_ok());
/// assert!(FormName::parse("../deltio_12.pdf").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormName(String);

impl FormName {
    /// Intermediate name for `record` generated at `at`.
    pub fn intermediate<Tz: TimeZone>(record: RecordId, at: &DateTime<Tz>, random: [u8; 4]) -> Self {
        Self(format!(
            "{PREFIX}{record}_{}_{}_{}_{}",
            at.year(),
            at.month(),
            at.day(),
            hex::encode(random)
        ))
    }

    /// Rendered PDF name for this intermediate.
    pub fn rendered(&self) -> Self {
        Self(format!("{}{PDF_SUFFIX}", self.0))
    }

    /// Accept a client-supplied name only when it could have been generated
    /// here.
    pub fn parse(raw: impl Into<String>) -> Result<Self, FormNameError> {
        let raw = raw.into();
        let stem = raw.strip_suffix(PDF_SUFFIX).unwrap_or(&raw);
        let valid = stem.len() > PREFIX.len()
            && stem.starts_with(PREFIX)
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(Self(raw))
        } else {
            Err(FormNameError(raw))
        }
    }

    /// Whether this names a rendered PDF rather than a field document.
    pub fn is_rendered(&self) -> bool {
        self.0.ends_with(PDF_SUFFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FormName {
    type Error = FormNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FormName> for String {
    fn from(value: FormName) -> Self {
        value.0
    }
}

impl fmt::Display for FormName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
