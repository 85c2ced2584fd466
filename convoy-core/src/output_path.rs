//! Output path resolution.
//!
//! Derives where a converted file is written. The destination sits next to
//! the source (or in a configured output directory) and takes the target
//! format as its extension. Existing files are never overwritten: when
//! `clip.mp4` is taken the resolver walks `clip (1).mp4`, `clip (2).mp4`, ...
//! and returns the first free name.
//!
//! Resolution only checks the filesystem; it creates nothing and keeps no
//! counter between calls. Two resolutions for the same base running at the
//! same time can therefore return the same path.

use crate::error::{CoreError, CoreResult};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Returns the first unused path among `base.ext`, `base (1).ext`, `base (2).ext`, ...
///
/// `base` is the destination without extension. The extension is lower-cased.
pub fn resolve_output_path(base: &Path, extension: &str) -> CoreResult<PathBuf> {
    let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();

    let mut candidate = with_suffix(base, "", &extension);
    let mut counter: u64 = 1;
    while is_taken(&candidate)? {
        candidate = with_suffix(base, &format!(" ({counter})"), &extension);
        counter += 1;
    }

    log::debug!("Resolved output path: {}", candidate.display());
    Ok(candidate)
}

/// Destination path without extension for `source`.
///
/// Without an output directory this is the source path minus its last
/// extension; with one, the source stem inside that directory.
#[must_use]
pub fn output_base_for(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => {
            let stem = source
                .file_stem()
                .map(OsString::from)
                .unwrap_or_else(|| OsString::from("output"));
            dir.join(stem)
        }
        None => source.with_extension(""),
    }
}

fn with_suffix(base: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn is_taken(candidate: &Path) -> CoreResult<bool> {
    candidate
        .try_exists()
        .map_err(|source| CoreError::PathResolution {
            path: candidate.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn free_base_name_is_used_as_is() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("a");

        let resolved = resolve_output_path(&base, "mp4").unwrap();
        assert_eq!(resolved, temp.path().join("a.mp4"));
    }

    #[test]
    fn taken_names_are_skipped_in_order() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("a.mp4")).unwrap();
        File::create(temp.path().join("a (1).mp4")).unwrap();

        let resolved = resolve_output_path(&temp.path().join("a"), "mp4").unwrap();
        assert_eq!(resolved, temp.path().join("a (2).mp4"));
    }

    #[test]
    fn resolving_twice_without_creating_returns_same_path() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("a.mp4")).unwrap();
        let base = temp.path().join("a");

        let first = resolve_output_path(&base, "mp4").unwrap();
        let second = resolve_output_path(&base, "mp4").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, temp.path().join("a (1).mp4"));
    }

    #[test]
    fn extension_is_lower_cased() {
        let temp = TempDir::new().unwrap();
        let resolved = resolve_output_path(&temp.path().join("photo"), "JPEG").unwrap();
        assert_eq!(resolved, temp.path().join("photo.jpeg"));
    }

    #[test]
    fn gap_in_numbering_is_reused() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("a.mp4")).unwrap();
        File::create(temp.path().join("a (2).mp4")).unwrap();

        let resolved = resolve_output_path(&temp.path().join("a"), "mp4").unwrap();
        assert_eq!(resolved, temp.path().join("a (1).mp4"));
    }

    #[test]
    fn base_keeps_source_directory_by_default() {
        let base = output_base_for(Path::new("/videos/clip1.avi"), None);
        assert_eq!(base, PathBuf::from("/videos/clip1"));

        let dotted = output_base_for(Path::new("/videos/my.holiday.avi"), None);
        assert_eq!(dotted, PathBuf::from("/videos/my.holiday"));
    }

    #[test]
    fn base_moves_into_output_directory() {
        let base = output_base_for(Path::new("/videos/clip1.avi"), Some(Path::new("/out")));
        assert_eq!(base, PathBuf::from("/out/clip1"));
    }
}
