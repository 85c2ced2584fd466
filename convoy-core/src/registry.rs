// ============================================================================
// convoy-core/src/registry.rs
// ============================================================================
//
// CAPABILITY REGISTRY: Valid Codecs per Target Format
//
// This module holds the static table that says which codecs may be used for
// each output format and which media kind (video, audio, image) a format
// belongs to. The table is built once per process and only ever read.
//
// KEY COMPONENTS:
// - MediaKind: Video / Audio / Image
// - CapabilityEntry: One row of the table
// - CapabilityRegistry: Lookup API with the "-" fallback for unknown formats

// ---- External crate imports ----
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ---- Standard library imports ----
use std::fmt;
use std::str::FromStr;

/// Placeholder codec returned for formats the registry does not know.
/// A selection carrying it is not yet convertible.
pub const NO_CODEC: &str = "-";

const NO_CODEC_LIST: &[&str] = &[NO_CODEC];

/// The broad kind of media a format holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "image" => Ok(MediaKind::Image),
            other => Err(format!("unknown media kind '{other}' (expected video, audio or image)")),
        }
    }
}

/// One row of the capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityEntry {
    /// Lower-case format name, also used as the output extension.
    pub target_format: &'static str,
    pub media_kind: MediaKind,
    /// Allowed codecs; the first one is the default.
    pub allowed_codecs: &'static [&'static str],
    /// Audio codec used for the audio sub-encode of a video target.
    /// `None` means the container carries no audio.
    pub audio_codec: Option<&'static str>,
}

impl CapabilityEntry {
    /// The first allowed codec, `None` for an entry with no codecs.
    pub fn default_codec(&self) -> Option<&'static str> {
        self.allowed_codecs.first().copied()
    }

    pub fn allows(&self, codec: &str) -> bool {
        self.allowed_codecs.iter().any(|c| *c == codec)
    }
}

const fn video(
    target_format: &'static str,
    allowed_codecs: &'static [&'static str],
    audio_codec: Option<&'static str>,
) -> CapabilityEntry {
    CapabilityEntry { target_format, media_kind: MediaKind::Video, allowed_codecs, audio_codec }
}

const fn audio(target_format: &'static str, allowed_codecs: &'static [&'static str]) -> CapabilityEntry {
    CapabilityEntry { target_format, media_kind: MediaKind::Audio, allowed_codecs, audio_codec: None }
}

const fn image(target_format: &'static str, allowed_codecs: &'static [&'static str]) -> CapabilityEntry {
    CapabilityEntry { target_format, media_kind: MediaKind::Image, allowed_codecs, audio_codec: None }
}

const MP3: Option<&str> = Some("libmp3lame");
const VORBIS: Option<&str> = Some("libvorbis");

static BUILTIN_ENTRIES: &[CapabilityEntry] = &[
    // Video
    video("mp4", &["libx264", "libx265", "mpeg4"], MP3),
    video("avi", &["libx264", "libxvid", "png", "rawvideo"], MP3),
    video("webm", &["libvpx", "libvpx-vp9", "libvorbis"], VORBIS),
    video("mkv", &["libx264", "libx265", "vp8", "vp9", "mpeg4"], MP3),
    video("mov", &["libx264", "mpeg4", "prores"], MP3),
    video("flv", &["libx264", "flv1"], MP3),
    video("ts", &["libx264", "h264", "mpeg2video"], MP3),
    video("ogv", &["libtheora", "libvorbis"], VORBIS),
    video("3gp", &["mpeg4", "h263"], Some("aac")),
    video("gif", &["gif"], None),
    // Audio
    audio("wav", &["pcm_s16le"]),
    audio("mp3", &["libmp3lame"]),
    audio("aac", &["aac", "libfdk_aac"]),
    audio("m4a", &["aac", "alac", "libfdk_aac"]),
    audio("ogg", &["libvorbis"]),
    audio("flac", &["flac"]),
    audio("opus", &["libopus", "opus"]),
    // Image
    image("jpeg", &["jpeg"]),
    image("png", &["png"]),
    image("bmp", &["bmp"]),
    image("tiff", &["tiff"]),
    image("webp", &["webp"]),
];

static GLOBAL: Lazy<CapabilityRegistry> = Lazy::new(CapabilityRegistry::builtin);

/// Read-only lookup table of target formats and their codecs.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    entries: Vec<CapabilityEntry>,
}

impl CapabilityRegistry {
    /// The process-wide registry, built on first use.
    pub fn global() -> &'static CapabilityRegistry {
        &GLOBAL
    }

    /// Builds the registry with the formats Convoy ships with.
    pub fn builtin() -> Self {
        Self { entries: BUILTIN_ENTRIES.to_vec() }
    }

    /// Builds a registry from custom rows. Rows without codecs are dropped
    /// so every entry keeps a default codec.
    pub fn from_entries(entries: impl IntoIterator<Item = CapabilityEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|entry| {
                let keep = !entry.allowed_codecs.is_empty();
                if !keep {
                    log::warn!("Ignoring format '{}' with no codecs", entry.target_format);
                }
                keep
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CapabilityEntry] {
        &self.entries
    }

    /// Case-insensitive lookup of a format's row.
    pub fn entry(&self, target_format: &str) -> Option<&CapabilityEntry> {
        let wanted = target_format.trim();
        self.entries
            .iter()
            .find(|entry| entry.target_format.eq_ignore_ascii_case(wanted))
    }

    /// Codecs valid for `target_format`, default first.
    /// Unknown formats yield `["-"]`.
    pub fn codecs_for(&self, target_format: &str) -> &[&'static str] {
        self.entry(target_format)
            .map_or(NO_CODEC_LIST, |entry| entry.allowed_codecs)
    }

    pub fn media_kind_of(&self, target_format: &str) -> Option<MediaKind> {
        self.entry(target_format).map(|entry| entry.media_kind)
    }

    /// Default codec of `target_format`, `"-"` for unknown formats.
    pub fn default_codec_for(&self, target_format: &str) -> &'static str {
        self.codecs_for(target_format).first().copied().unwrap_or(NO_CODEC)
    }

    /// All formats of one media kind, in table order.
    pub fn formats_of(&self, kind: MediaKind) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|entry| entry.media_kind == kind)
            .map(|entry| entry.target_format)
            .collect()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
