//! Finding source files to convert.
//!
//! Only the top level of a directory is searched. Which files qualify depends
//! on the media kind of the target: audio targets also accept video sources
//! (their audio track is extracted).

use crate::error::{CoreError, CoreResult};
use crate::registry::MediaKind;

use std::path::{Path, PathBuf};

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "webm", "mkv", "mov", "flv", "ts", "ogv", "3gp", "gif", "m4v", "mpg", "mpeg", "wmv",
];

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "aac", "m4a", "ogg", "flac", "opus", "wma", "aiff"];

const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "bmp", "tiff", "tif", "webp", "gif"];

/// Whether `path` has an extension accepted as a source for `kind` targets.
pub fn is_convertible(path: &Path, kind: MediaKind) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let matches = |list: &[&str]| list.iter().any(|known| known.eq_ignore_ascii_case(ext));
    match kind {
        MediaKind::Video => matches(VIDEO_EXTENSIONS),
        MediaKind::Audio => matches(AUDIO_EXTENSIONS) || matches(VIDEO_EXTENSIONS),
        MediaKind::Image => matches(IMAGE_EXTENSIONS),
    }
}

/// Lists the files in the top level of `input_dir` that can be converted to
/// a `kind` target, sorted by path.
///
/// # Examples
///
/// ```rust,no_run
/// use convoy_core::{find_convertible_files, MediaKind};
/// use std::path::Path;
///
/// let files = find_convertible_files(Path::new("/media/incoming"), MediaKind::Video).unwrap();
/// for file in files {
///     println!("{}", file.display());
/// }
/// ```
pub fn find_convertible_files(input_dir: &Path, kind: MediaKind) -> CoreResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && is_convertible(&path, kind)).then_some(path)
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    files.sort();
    log::debug!("Found {} {} source(s) in {}", files.len(), kind, input_dir.display());
    Ok(files)
}
