//! Safe extraction of a ZIP archive into a target directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use bucket_unzip_common::{is_within_root, lexical_normalize, SCRATCH_DIR_MODE};
use zip::ZipArchive;

use crate::error::ExtractError;

/// Extract a ZIP archive into `target_dir`, reconstructing the relative
/// directory structure and stored file permissions.
///
/// Entries are processed in the order recorded in the archive index, with
/// only one entry stream open at a time. Each entry's output path is
/// validated lexically before any write: an entry whose path does not
/// resolve strictly inside `target_dir` fails the whole extraction.
///
/// Any failure aborts extraction; already-written output is left in place.
///
/// # Arguments
/// * `archive_path` - Local path of the ZIP file
/// * `target_dir` - Directory to extract into (must exist)
///
/// # Returns
/// The number of regular files written. Directory entries are
/// reconstructed but not counted.
///
/// # Errors
/// - [`ExtractError::ArchiveUnreadable`] if the container is corrupt or
///   its index cannot be read
/// - [`ExtractError::TraversalRejected`] if an entry path escapes
///   `target_dir`
/// - [`ExtractError::IoError`] on any local write failure
pub fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<u64, ExtractError> {
    let file: File = File::open(archive_path)
        .map_err(|e| ExtractError::from_io(archive_path.display().to_string(), e))?;

    let mut archive: ZipArchive<File> =
        ZipArchive::new(file).map_err(|e| ExtractError::ArchiveUnreadable {
            path: archive_path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut files_written: u64 = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ExtractError::ArchiveUnreadable {
                path: archive_path.display().to_string(),
                message: e.to_string(),
            })?;

        let entry_name: String = entry.name().to_string();
        let out_path: PathBuf = resolve_entry_path(&entry_name, target_dir)?;

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .map_err(|e| ExtractError::from_io(out_path.display().to_string(), e))?;
            set_mode(&out_path, SCRATCH_DIR_MODE)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ExtractError::from_io(parent.display().to_string(), e))?;
        }

        let mut out_file: File = File::create(&out_path)
            .map_err(|e| ExtractError::from_io(out_path.display().to_string(), e))?;

        io::copy(&mut entry, &mut out_file)
            .map_err(|e| ExtractError::from_io(out_path.display().to_string(), e))?;

        if let Some(mode) = entry.unix_mode() {
            set_mode(&out_path, mode)?;
        }

        files_written += 1;
    }

    Ok(files_written)
}

/// Join an entry name onto the extraction root and reject escapes.
///
/// The candidate is checked lexically (no filesystem access), so entries
/// with `..` segments or absolute names are rejected before anything is
/// written.
fn resolve_entry_path(entry_name: &str, target_dir: &Path) -> Result<PathBuf, ExtractError> {
    let candidate: PathBuf = target_dir.join(Path::new(entry_name));

    if !is_within_root(&candidate, target_dir) {
        return Err(ExtractError::TraversalRejected {
            entry: entry_name.to_string(),
        });
    }

    Ok(lexical_normalize(&candidate))
}

/// Apply mode bits to an extracted path. No-op on non-unix platforms.
#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), ExtractError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| ExtractError::from_io(path.display().to_string(), e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), ExtractError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Build a zip fixture from (name, contents) pairs. A trailing `/`
    /// in the name produces a directory entry.
    fn write_zip(path: &Path, entries: &[(&str, Option<&[u8]>)]) {
        let file: File = File::create(path).unwrap();
        let mut writer: ZipWriter<File> = ZipWriter::new(file);
        let options: SimpleFileOptions = SimpleFileOptions::default();

        for (name, contents) in entries {
            match contents {
                Some(bytes) => {
                    writer.start_file(*name, options).unwrap();
                    writer.write_all(bytes).unwrap();
                }
                None => {
                    writer.add_directory(*name, options).unwrap();
                }
            }
        }

        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_reconstructs_tree() {
        let dir: TempDir = TempDir::new().unwrap();
        let archive_path: PathBuf = dir.path().join("a.zip");
        let target: PathBuf = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();

        write_zip(
            &archive_path,
            &[
                ("docs/readme.txt", Some(b"hello")),
                ("docs/nested/deep.txt", Some(b"deep")),
                ("empty/", None),
            ],
        );

        let count: u64 = extract_archive(&archive_path, &target).unwrap();
        assert_eq!(count, 2);

        let readme: Vec<u8> = fs::read(target.join("docs/readme.txt")).unwrap();
        assert_eq!(readme, b"hello");
        let deep: Vec<u8> = fs::read(target.join("docs/nested/deep.txt")).unwrap();
        assert_eq!(deep, b"deep");
        assert!(target.join("empty").is_dir());
    }

    #[test]
    fn test_extract_empty_archive() {
        let dir: TempDir = TempDir::new().unwrap();
        let archive_path: PathBuf = dir.path().join("empty.zip");
        let target: PathBuf = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();

        write_zip(&archive_path, &[]);

        let count: u64 = extract_archive(&archive_path, &target).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_extract_rejects_traversal_entry() {
        let dir: TempDir = TempDir::new().unwrap();
        let archive_path: PathBuf = dir.path().join("evil.zip");
        let target: PathBuf = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();

        write_zip(&archive_path, &[("../escaped.txt", Some(b"nope"))]);

        let err: ExtractError = extract_archive(&archive_path, &target).unwrap_err();
        assert!(matches!(err, ExtractError::TraversalRejected { .. }));
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_extract_rejects_nested_traversal_entry() {
        let dir: TempDir = TempDir::new().unwrap();
        let archive_path: PathBuf = dir.path().join("evil.zip");
        let target: PathBuf = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();

        write_zip(&archive_path, &[("docs/../../escaped.txt", Some(b"nope"))]);

        let err: ExtractError = extract_archive(&archive_path, &target).unwrap_err();
        assert!(matches!(err, ExtractError::TraversalRejected { .. }));
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_extract_unreadable_archive() {
        let dir: TempDir = TempDir::new().unwrap();
        let archive_path: PathBuf = dir.path().join("garbage.zip");
        fs::write(&archive_path, b"this is not a zip file").unwrap();
        let target: PathBuf = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();

        let err: ExtractError = extract_archive(&archive_path, &target).unwrap_err();
        assert!(matches!(err, ExtractError::ArchiveUnreadable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_preserves_mode_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir: TempDir = TempDir::new().unwrap();
        let archive_path: PathBuf = dir.path().join("modes.zip");
        let target: PathBuf = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();

        let file: File = File::create(&archive_path).unwrap();
        let mut writer: ZipWriter<File> = ZipWriter::new(file);
        writer
            .start_file(
                "bin/run.sh",
                SimpleFileOptions::default().unix_permissions(0o755),
            )
            .unwrap();
        writer.write_all(b"#!/bin/sh\n").unwrap();
        writer.finish().unwrap();

        extract_archive(&archive_path, &target).unwrap();

        let mode: u32 = fs::metadata(target.join("bin/run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_resolve_entry_path_plain() {
        let resolved: PathBuf =
            resolve_entry_path("docs/readme.txt", Path::new("/scratch/out")).unwrap();
        assert_eq!(resolved, PathBuf::from("/scratch/out/docs/readme.txt"));
    }

    #[test]
    fn test_resolve_entry_path_absolute_rejected() {
        let err: ExtractError =
            resolve_entry_path("/etc/passwd", Path::new("/scratch/out")).unwrap_err();
        assert!(matches!(err, ExtractError::TraversalRejected { .. }));
    }
}
