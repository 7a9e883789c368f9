use std::path::Path;

use crate::error::{FileRole, Result, SieveError};

use super::format::{extension_of, CodecRegistry, ReadOptions};
use super::model::RecordSet;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load records from a file with the built-in formats and default options.
///
/// Supported formats:
/// * `.csv`          – header row, every cell as text
/// * `.json`         – array of objects, or column-oriented object
/// * `.xlsx`/`.xls`  – first worksheet, first row as header
pub fn load_data(path: &Path) -> Result<RecordSet> {
    load_data_with(&CodecRegistry::default(), path, &ReadOptions::default())
}

/// Load records from a file. Dispatch by extension through `registry`.
pub fn load_data_with(
    registry: &CodecRegistry,
    path: &Path,
    options: &ReadOptions,
) -> Result<RecordSet> {
    if !path.exists() {
        return Err(SieveError::NotFound {
            role: FileRole::Input,
            path: path.to_path_buf(),
        });
    }

    let codec = registry
        .for_path(path)
        .ok_or_else(|| SieveError::UnsupportedFormat {
            role: FileRole::Input,
            extension: extension_of(path),
            path: path.to_path_buf(),
        })?;

    let bytes = std::fs::read(path).map_err(|e| SieveError::io(path, e))?;
    let records = codec
        .decode(&bytes, options)
        .map_err(|source| SieveError::Decode {
            format: codec.name(),
            path: path.to_path_buf(),
            source,
        })?;

    log::info!(
        "Loaded {} records ({}) from {}",
        records.len(),
        codec.name(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Record};
    use crate::error::ErrorKind;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_data(&dir.path().join("nofile.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "foo").unwrap();
        match load_data(&path).unwrap_err() {
            SieveError::UnsupportedFormat {
                role, extension, ..
            } => {
                assert_eq!(role, FileRole::Input);
                assert_eq!(extension, "txt");
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn loads_csv_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IN.CSV");
        std::fs::write(&path, "id,value\n1,5\n2,15\n").unwrap();
        let set = load_data(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[1], Record::new().with("id", "2").with("value", "15"));
    }

    #[test]
    fn loads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, r#"[{"id":"1","value":"5"},{"id":"2","value":null}]"#).unwrap();
        let set = load_data(&path).unwrap();
        assert_eq!(set.records()[1].get("value"), Some(&CellValue::Null));
    }

    #[test]
    fn malformed_content_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.json");
        std::fs::write(&path, "{oops").unwrap();
        let err = load_data(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().contains("in.json"));
    }
}
