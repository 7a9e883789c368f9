use std::path::Path;

use crate::error::CodecError;

use super::codecs::{CsvCodec, JsonCodec, SpreadsheetCodec};
use super::model::RecordSet;

// ---------------------------------------------------------------------------
// Decoder options
// ---------------------------------------------------------------------------

/// Per-call decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Render every spreadsheet cell as text instead of keeping the native
    /// numeric type, so `15` and `015` survive exactly as written.
    pub spreadsheet_as_text: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            spreadsheet_as_text: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Codec trait
// ---------------------------------------------------------------------------

/// A file format: bytes → records and records → bytes.
pub trait RecordCodec: Send + Sync {
    /// Human-readable format name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Lower-case extensions (without the dot) this codec handles.
    fn extensions(&self) -> &'static [&'static str];

    fn decode(&self, bytes: &[u8], options: &ReadOptions) -> Result<RecordSet, CodecError>;

    fn encode(&self, records: &RecordSet) -> Result<Vec<u8>, CodecError>;
}

// ---------------------------------------------------------------------------
// Registry: extension → codec
// ---------------------------------------------------------------------------

/// Lookup table from file extension to codec.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn RecordCodec>>,
}

impl CodecRegistry {
    /// A registry with no formats at all.
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Register a codec. Later registrations win for overlapping extensions.
    pub fn register(&mut self, codec: Box<dyn RecordCodec>) {
        self.codecs.insert(0, codec);
    }

    /// Find the codec for a bare extension (case-insensitive, no dot).
    pub fn for_extension(&self, extension: &str) -> Option<&dyn RecordCodec> {
        let ext = extension.to_ascii_lowercase();
        self.codecs
            .iter()
            .find(|c| c.extensions().contains(&ext.as_str()))
            .map(|c| c.as_ref())
    }

    /// Find the codec for a path by its extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn RecordCodec> {
        self.for_extension(&extension_of(path))
    }

    /// All extensions currently registered.
    pub fn extensions(&self) -> Vec<&'static str> {
        self.codecs
            .iter()
            .flat_map(|c| c.extensions().iter().copied())
            .collect()
    }
}

impl Default for CodecRegistry {
    /// CSV, JSON and spreadsheet formats.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(SpreadsheetCodec));
        registry.register(Box::new(JsonCodec));
        registry.register(Box::new(CsvCodec));
        registry
    }
}

/// Lower-cased extension of `path`, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake;

    impl RecordCodec for Fake {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["csv", "fake"]
        }

        fn decode(&self, _: &[u8], _: &ReadOptions) -> Result<RecordSet, CodecError> {
            Ok(RecordSet::default())
        }

        fn encode(&self, _: &RecordSet) -> Result<Vec<u8>, CodecError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn default_registry_covers_three_families() {
        let registry = CodecRegistry::default();
        assert_eq!(registry.for_extension("csv").map(|c| c.name()), Some("CSV"));
        assert_eq!(registry.for_extension("json").map(|c| c.name()), Some("JSON"));
        assert_eq!(registry.for_extension("xlsx").map(|c| c.name()), Some("spreadsheet"));
        assert_eq!(registry.for_extension("xls").map(|c| c.name()), Some("spreadsheet"));
        assert!(registry.for_extension("txt").is_none());
        assert!(registry.for_extension("").is_none());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = CodecRegistry::default();
        assert!(registry.for_path(Path::new("data/IN.CSV")).is_some());
        assert!(registry.for_path(Path::new("book.XlSx")).is_some());
        assert!(registry.for_path(Path::new("no_extension")).is_none());
    }

    #[test]
    fn later_registration_overrides() {
        let mut registry = CodecRegistry::default();
        registry.register(Box::new(Fake));
        assert_eq!(registry.for_extension("csv").map(|c| c.name()), Some("fake"));
        assert_eq!(registry.for_extension("json").map(|c| c.name()), Some("JSON"));
        assert!(registry.extensions().contains(&"fake"));
    }
}
