use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::image::PixelArray;
use crate::error::{LoadError, LoadResult};

/// Path of the image file to decode (required before loading).
pub const IMG_PATH: &str = "img_path";
/// Decoded buffer, written by the loader.
pub const IMG: &str = "img";
/// `(rows, cols)` of the current image, written by the loader.
pub const IMG_SHAPE: &str = "img_shape";
/// `(rows, cols)` as first loaded, before any later transform touches the image.
pub const ORI_SHAPE: &str = "ori_shape";

// ---------------------------------------------------------------------------
// RecordValue – one entry of a sample record
// ---------------------------------------------------------------------------

/// A dynamically-typed record value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    String(String),
    /// Filesystem path, kept byte-exact (may not be valid UTF-8).
    Path(PathBuf),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// `(rows, cols)`
    Shape(usize, usize),
    Image(PixelArray),
    Null,
}

impl RecordValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordValue::String(_) => "string",
            RecordValue::Path(_) => "path",
            RecordValue::Integer(_) => "integer",
            RecordValue::Float(_) => "float",
            RecordValue::Bool(_) => "bool",
            RecordValue::Shape(..) => "shape",
            RecordValue::Image(_) => "image",
            RecordValue::Null => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RecordValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a filesystem path; strings are read as paths.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            RecordValue::String(s) => Some(Path::new(s)),
            RecordValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<(usize, usize)> {
        match self {
            RecordValue::Shape(r, c) => Some((*r, *c)),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&PixelArray> {
        match self {
            RecordValue::Image(img) => Some(img),
            _ => None,
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::String(s) => write!(f, "{s}"),
            RecordValue::Path(p) => write!(f, "{}", p.display()),
            RecordValue::Integer(i) => write!(f, "{i}"),
            RecordValue::Float(v) => write!(f, "{v:.4}"),
            RecordValue::Bool(b) => write!(f, "{b}"),
            RecordValue::Shape(r, c) => write!(f, "({r}, {c})"),
            RecordValue::Image(img) => write!(f, "{img}"),
            RecordValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        RecordValue::String(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        RecordValue::String(s)
    }
}

impl From<PathBuf> for RecordValue {
    fn from(p: PathBuf) -> Self {
        RecordValue::Path(p)
    }
}

// ---------------------------------------------------------------------------
// SampleRecord – the per-sample mapping threaded through a pipeline
// ---------------------------------------------------------------------------

/// Mutable key → value mapping for one sample.
///
/// Keys the loader knows about are [`IMG_PATH`], [`IMG`], [`IMG_SHAPE`] and
/// [`ORI_SHAPE`]; anything else is carried along untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleRecord {
    entries: BTreeMap<String, RecordValue>,
}

impl SampleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record holding only `img_path`.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let mut record = Self::new();
        record.insert(IMG_PATH, RecordValue::Path(path.as_ref().to_path_buf()));
        record
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.entries.get(key)
    }

    /// Insert a value, returning the previous one for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RecordValue>,
    ) -> Option<RecordValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<RecordValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Precondition check for the loader: `img_path` must be present and a
    /// path or string.
    pub fn require_img_path(&self) -> LoadResult<PathBuf> {
        match self.entries.get(IMG_PATH) {
            None => Err(LoadError::MissingKey(IMG_PATH)),
            Some(value) => value
                .as_path()
                .map(Path::to_path_buf)
                .ok_or_else(|| LoadError::InvalidKey {
                    key: IMG_PATH,
                    expected: "a path",
                    found: value.kind().to_string(),
                }),
        }
    }

    pub fn img_path(&self) -> Option<&Path> {
        self.get(IMG_PATH).and_then(RecordValue::as_path)
    }

    pub fn img(&self) -> Option<&PixelArray> {
        self.get(IMG).and_then(RecordValue::as_image)
    }

    pub fn img_shape(&self) -> Option<(usize, usize)> {
        self.get(IMG_SHAPE).and_then(RecordValue::as_shape)
    }

    pub fn ori_shape(&self) -> Option<(usize, usize)> {
        self.get(ORI_SHAPE).and_then(RecordValue::as_shape)
    }
}

impl From<PixelArray> for RecordValue {
    fn from(img: PixelArray) -> Self {
        RecordValue::Image(img)
    }
}

impl FromIterator<(String, RecordValue)> for SampleRecord {
    fn from_iter<I: IntoIterator<Item = (String, RecordValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_img_path_reports_missing_key() {
        let record = SampleRecord::new();
        let err = record.require_img_path().unwrap_err();
        assert!(matches!(err, LoadError::MissingKey(IMG_PATH)));
    }

    #[test]
    fn require_img_path_rejects_non_string() {
        let mut record = SampleRecord::new();
        record.insert(IMG_PATH, RecordValue::Integer(3));
        let err = record.require_img_path().unwrap_err();
        assert!(matches!(err, LoadError::InvalidKey { found, .. } if found == "integer"));
    }

    #[test]
    fn from_path_round_trips_through_require() {
        let record = SampleRecord::from_path("data/sample.png");
        assert_eq!(record.img_path(), Some(Path::new("data/sample.png")));
        assert_eq!(
            record.require_img_path().unwrap(),
            PathBuf::from("data/sample.png")
        );
    }

    #[cfg(unix)]
    #[test]
    fn from_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = Path::new(OsStr::from_bytes(b"imgs/\xffband.tif"));
        let record = SampleRecord::from_path(raw);
        assert_eq!(record.img_path(), Some(raw));
        let stored = record.require_img_path().unwrap();
        assert_eq!(stored.as_os_str().as_bytes(), b"imgs/\xffband.tif");
    }

    #[test]
    fn unrelated_keys_are_kept() {
        let mut record = SampleRecord::from_path("a.png");
        record.insert("instances", RecordValue::Integer(4));
        assert_eq!(record.len(), 2);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["img_path", "instances"]);
        assert_eq!(record.get("instances").map(|v| v.to_string()), Some("4".into()));
    }
}
