use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{FileRole, Result, SieveError};

use super::format::{extension_of, CodecRegistry};
use super::model::RecordSet;

/// What [`save_result`] did with the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file at `path` was replaced with `records` rows.
    Written { path: PathBuf, records: usize },
    /// Dry run: nothing touched on disk.
    DryRun { path: PathBuf, records: usize },
    /// No records to write, so no file was created.
    SkippedEmpty { path: PathBuf },
}

/// Write records to `path` using the built-in formats.
pub fn save_result(records: &RecordSet, path: &Path, dry_run: bool) -> Result<WriteOutcome> {
    save_result_with(&CodecRegistry::default(), records, path, dry_run)
}

/// Write records to `path`, choosing the encoder by extension.
///
/// Decision order: dry run, then empty result, then format. Neither a dry run
/// nor an empty result touches the filesystem. The output is encoded fully in
/// memory, then swapped into place through a temporary file in the target
/// directory, so readers never see a truncated file.
pub fn save_result_with(
    registry: &CodecRegistry,
    records: &RecordSet,
    path: &Path,
    dry_run: bool,
) -> Result<WriteOutcome> {
    if dry_run {
        log::info!(
            "Dry run: would write {} records to {}",
            records.len(),
            path.display()
        );
        return Ok(WriteOutcome::DryRun {
            path: path.to_path_buf(),
            records: records.len(),
        });
    }

    if records.is_empty() {
        log::info!("No records passed the filter; not creating {}", path.display());
        return Ok(WriteOutcome::SkippedEmpty {
            path: path.to_path_buf(),
        });
    }

    let codec = registry
        .for_path(path)
        .ok_or_else(|| SieveError::UnsupportedFormat {
            role: FileRole::Output,
            extension: extension_of(path),
            path: path.to_path_buf(),
        })?;

    let bytes = codec.encode(records).map_err(|source| SieveError::Encode {
        format: codec.name(),
        path: path.to_path_buf(),
        source,
    })?;

    replace_file(path, &bytes)?;

    log::info!(
        "Wrote {} records ({}) to {}",
        records.len(),
        codec.name(),
        path.display()
    );
    Ok(WriteOutcome::Written {
        path: path.to_path_buf(),
        records: records.len(),
    })
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| SieveError::io(parent, e))?;

    let mut tmp = temp_file_in(parent).map_err(|e| SieveError::io(parent, e))?;
    // An existing output keeps its mode across the rename.
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| SieveError::io(tmp.path(), e))?;
    }
    tmp.write_all(bytes).map_err(|e| SieveError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| SieveError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| SieveError::io(path, e.error))?;
    Ok(())
}

/// Temp file that ends up with the same mode a plain `File::create` would
/// give (0o666 minus umask) rather than tempfile's private 0o600.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
