//! Photo references attached to records.
//!
//! A reference is the opaque file name under which the upload was stored.
//! Order inside a record's set is display order.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_LEN: usize = 128;

/// Invalid photo reference or photo set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoValidationError {
    #[error("photo reference must not be empty")]
    Empty,
    #[error("photo reference must be at most {MAX_LEN} characters")]
    TooLong,
    #[error("photo reference contains characters outside [A-Za-z0-9._-]: {0}")]
    InvalidCharacters(String),
    #[error("photo {0} appears more than once")]
    Duplicate(String),
}

/// Stored photo file name.
///
/// Only plain file names are accepted so a reference can never escape the
/// photo directory.
///
/// # Examples
/// ```
/// use repair_desk::domain::PhotoRef;
///
/// assert!(PhotoRef::new("a1b2.jpg").is_ok());
/// assert!(PhotoRef::new("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(raw: impl Into<String>) -> Result<Self, PhotoValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PhotoValidationError::Empty);
        }
        if raw.len() > MAX_LEN {
            return Err(PhotoValidationError::TooLong);
        }
        let allowed = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !allowed || raw.starts_with('.') {
            return Err(PhotoValidationError::InvalidCharacters(raw));
        }
        Ok(Self(raw))
    }

    /// Fresh collision-free name for an upload, keeping a sane extension.
    pub fn generate(original_name: Option<&str>) -> Self {
        let stem = Uuid::new_v4().simple().to_string();
        let extension = original_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| {
                (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric())
            });
        match extension {
            Some(ext) => Self(format!("{stem}.{ext}")),
            None => Self(stem),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhotoRef {
    type Error = PhotoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhotoRef> for String {
    fn from(value: PhotoRef) -> Self {
        value.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub original_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Upload constraints applied per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_bytes: 2_000_000,
        }
    }
}

impl UploadLimits {
    /// First violation in `uploads`, if any.
    pub fn check(&self, uploads: &[PhotoUpload]) -> Result<(), UploadLimitError> {
        if uploads.is_empty() {
            return Err(UploadLimitError::NoFiles);
        }
        if uploads.len() > self.max_files {
            return Err(UploadLimitError::TooManyFiles {
                max: self.max_files,
            });
        }
        if uploads.iter().any(|upload| upload.bytes.len() > self.max_file_bytes) {
            return Err(UploadLimitError::FileTooLarge {
                max: self.max_file_bytes,
            });
        }
        Ok(())
    }
}

/// Upload request outside [`UploadLimits`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadLimitError {
    #[error("no files were uploaded")]
    NoFiles,
    #[error("at most {max} files may be uploaded at once")]
    TooManyFiles { max: usize },
    #[error("each file must be at most {max} bytes")]
    FileTooLarge { max: usize },
}

/// Reject sets that mention the same file twice.
pub fn validate_photo_set(photos: &[PhotoRef]) -> Result<(), PhotoValidationError> {
    let mut seen = HashSet::with_capacity(photos.len());
    for photo in photos {
        if !seen.insert(photo) {
            return Err(PhotoValidationError::Duplicate(photo.0.clone()));
        }
    }
    Ok(())
}

/// Members of `old` missing from `new`, in their original order.
///
/// Never returns a member of `new`.
pub fn orphaned(old: &[PhotoRef], new: &[PhotoRef]) -> Vec<PhotoRef> {
    let keep: HashSet<&PhotoRef> = new.iter().collect();
    old.iter()
        .filter(|photo| !keep.contains(photo))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn refs(names: &[&str]) -> Vec<PhotoRef> {
        names
            .iter()
            .map(|name| PhotoRef::new(*name).expect("valid ref"))
            .collect()
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case(".hidden")]
    #[case("dir/file.jpg")]
    #[case("back\\slash.jpg")]
    #[case("space here.jpg")]
    fn rejects_unsafe_names(#[case] raw: &str) {
        assert!(PhotoRef::new(raw).is_err());
    }

    #[rstest]
    #[case(&["a.jpg"], &["b.jpg"], &["a.jpg"])]
    #[case(&["a.jpg", "b.jpg"], &["b.jpg", "a.jpg"], &[])]
    #[case(&["a.jpg", "b.jpg", "c.jpg"], &["b.jpg"], &["a.jpg", "c.jpg"])]
    #[case(&[], &["a.jpg"], &[])]
    fn orphans_are_old_minus_new(
        #[case] old: &[&str],
        #[case] new: &[&str],
        #[case] expected: &[&str],
    ) {
        assert_eq!(orphaned(&refs(old), &refs(new)), refs(expected));
    }

    #[rstest]
    fn orphans_never_include_new_members() {
        let old = refs(&["a.jpg", "b.jpg"]);
        let new = refs(&["b.jpg", "c.jpg"]);
        let orphans = orphaned(&old, &new);
        assert!(orphans.iter().all(|photo| !new.contains(photo)));
    }

    #[rstest]
    fn duplicate_members_are_rejected() {
        let err = validate_photo_set(&refs(&["a.jpg", "a.jpg"])).expect_err("duplicate");
        assert_eq!(err, PhotoValidationError::Duplicate("a.jpg".to_owned()));
    }

    fn upload(len: usize) -> PhotoUpload {
        PhotoUpload {
            original_name: Some("photo.jpg".to_owned()),
            bytes: vec![0; len],
        }
    }

    #[rstest]
    #[case(0, 10, Err(UploadLimitError::NoFiles))]
    #[case(1, 10, Ok(()))]
    #[case(3, 10, Err(UploadLimitError::TooManyFiles { max: 2 }))]
    #[case(1, 11, Err(UploadLimitError::FileTooLarge { max: 10 }))]
    fn limits_bound_count_and_size(
        #[case] count: usize,
        #[case] size: usize,
        #[case] expected: Result<(), UploadLimitError>,
    ) {
        let limits = UploadLimits {
            max_files: 2,
            max_file_bytes: 10,
        };
        let uploads: Vec<PhotoUpload> = (0..count).map(|_| upload(size)).collect();
        assert_eq!(limits.check(&uploads), expected);
    }

    #[rstest]
    #[case(Some("IMG_0001.JPG"), Some("jpg"))]
    #[case(Some("scan.tar.gz"), Some("gz"))]
    #[case(Some("noext"), None)]
    #[case(Some("weird.j/pg"), None)]
    #[case(None, None)]
    fn generated_names_are_valid_refs(
        #[case] original: Option<&str>,
        #[case] extension: Option<&str>,
    ) {
        let generated = PhotoRef::generate(original);
        assert!(PhotoRef::new(generated.as_str()).is_ok());
        assert_eq!(
            generated.as_str().rsplit_once('.').map(|(_, ext)| ext),
            extension
        );
    }
}
