// ============================================================================
// convoy-core/src/job.rs
// ============================================================================
//
// CONVERSION JOBS: Turning User Selections into Units of Work
//
// A batch starts from the selections a user makes once (target format,
// codec, frame rate mode, audio toggle, image quality tier). Those are
// validated against the capability registry a single time, producing a
// JobTemplate. The template then stamps out one immutable ConversionJob per
// source file right before that file is dispatched.
//
// KEY COMPONENTS:
// - FpsMode / QualityTier: Typed replacements for the "Auto" / tier strings
// - ConversionRequest: Raw selections as received from a front end
// - JobTemplate: Validated selections, shared by every job of a batch
// - ConversionJob: One source file plus its resolved parameters

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::registry::{CapabilityRegistry, MediaKind, NO_CODEC};

// ---- External crate imports ----
use serde::Serialize;

// ---- Standard library imports ----
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Sample rate forced for the native `opus` encoder, which only accepts 48 kHz.
pub const OPUS_SAMPLE_RATE: u32 = 48_000;

// ============================================================================
// SELECTION TYPES
// ============================================================================

/// Frame rate selection for video targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FpsMode {
    /// Keep whatever frame rate the engine picks.
    #[default]
    Auto,
    /// Force a fixed output frame rate.
    Fixed(NonZeroU32),
}

impl FpsMode {
    pub fn as_option(&self) -> Option<NonZeroU32> {
        match self {
            FpsMode::Auto => None,
            FpsMode::Fixed(fps) => Some(*fps),
        }
    }
}

impl FromStr for FpsMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(FpsMode::Auto);
        }
        value
            .parse::<NonZeroU32>()
            .map(FpsMode::Fixed)
            .map_err(|_| {
                CoreError::InvalidParameter(format!(
                    "fps must be 'auto' or a positive integer, got '{value}'"
                ))
            })
    }
}

impl fmt::Display for FpsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FpsMode::Auto => f.write_str("auto"),
            FpsMode::Fixed(fps) => write!(f, "{fps}"),
        }
    }
}

/// Quality tier for image targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum QualityTier {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// Numeric encoder quality (0-100) for the tier.
    pub fn level(&self) -> u8 {
        match self {
            QualityTier::High => 90,
            QualityTier::Medium => 55,
            QualityTier::Low => 25,
        }
    }
}

impl FromStr for QualityTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            other => Err(CoreError::InvalidParameter(format!(
                "quality must be high, medium or low, got '{other}'"
            ))),
        }
    }
}

// ============================================================================
// CONVERSION REQUEST
// ============================================================================

/// Selections for one batch, as a front end collects them.
///
/// Nothing here has been checked yet; call [`ConversionRequest::validate`]
/// before any job is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub target_format: String,
    /// `None` picks the registry's default codec for the format.
    pub codec: Option<String>,
    pub fps: FpsMode,
    pub audio_enabled: bool,
    pub quality: QualityTier,
}

impl ConversionRequest {
    pub fn new(target_format: impl Into<String>) -> Self {
        Self {
            target_format: target_format.into(),
            codec: None,
            fps: FpsMode::Auto,
            audio_enabled: true,
            quality: QualityTier::High,
        }
    }

    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }

    pub fn fps(mut self, fps: FpsMode) -> Self {
        self.fps = fps;
        self
    }

    pub fn audio(mut self, enabled: bool) -> Self {
        self.audio_enabled = enabled;
        self
    }

    pub fn quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    /// Checks the selections against the registry and resolves every
    /// sentinel into a typed value.
    ///
    /// Fails with `InvalidParameter` for an empty or unknown format and for
    /// a codec the format does not allow.
    pub fn validate(&self, registry: &CapabilityRegistry) -> CoreResult<JobTemplate> {
        let format = self.target_format.trim();
        if format.is_empty() || format == NO_CODEC {
            return Err(CoreError::InvalidParameter(
                "no target format selected".to_string(),
            ));
        }

        let entry = registry.entry(format).ok_or_else(|| {
            CoreError::InvalidParameter(format!("unsupported target format '{format}'"))
        })?;

        let codec = match self.codec.as_deref().map(str::trim) {
            None | Some("") => entry.default_codec().ok_or_else(|| {
                CoreError::InvalidParameter(format!("format '{}' has no codecs", entry.target_format))
            })?,
            Some(requested) if entry.allows(requested) => requested,
            Some(requested) => {
                return Err(CoreError::InvalidParameter(format!(
                    "codec '{requested}' is not valid for {} (allowed: {})",
                    entry.target_format,
                    entry.allowed_codecs.join(", ")
                )));
            }
        };

        let kind = entry.media_kind;
        let fps = match kind {
            MediaKind::Video => self.fps.as_option(),
            _ => None,
        };
        let audio_codec = match kind {
            MediaKind::Video if self.audio_enabled => entry.audio_codec,
            _ => None,
        };
        if kind == MediaKind::Video && self.audio_enabled && audio_codec.is_none() {
            log::debug!("{} carries no audio; audio disabled", entry.target_format);
        }
        let quality = (kind == MediaKind::Image).then(|| self.quality.level());
        let sample_rate = (codec == "opus").then_some(OPUS_SAMPLE_RATE);

        Ok(JobTemplate {
            target_format: entry.target_format.to_string(),
            codec: codec.to_string(),
            media_kind: kind,
            fps,
            audio_codec: audio_codec.map(str::to_string),
            quality,
            sample_rate,
        })
    }
}

// ============================================================================
// JOB TEMPLATE
// ============================================================================

/// Validated, resolved parameters shared by every job of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTemplate {
    target_format: String,
    codec: String,
    media_kind: MediaKind,
    fps: Option<NonZeroU32>,
    audio_codec: Option<String>,
    quality: Option<u8>,
    sample_rate: Option<u32>,
}

impl JobTemplate {
    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn target_format(&self) -> &str {
        &self.target_format
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// Builds the job for one source file.
    pub fn job_for(&self, source: &Path) -> ConversionJob {
        ConversionJob {
            source_path: source.to_path_buf(),
            target_format: self.target_format.clone(),
            codec: self.codec.clone(),
            media_kind: self.media_kind,
            fps: self.fps,
            audio_codec: self.audio_codec.clone(),
            quality: self.quality,
            sample_rate: self.sample_rate,
        }
    }
}

// ============================================================================
// CONVERSION JOB
// ============================================================================

/// One source file and the parameters it is converted with.
///
/// Built right before dispatch and dropped once the job finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    source_path: PathBuf,
    target_format: String,
    codec: String,
    media_kind: MediaKind,
    fps: Option<NonZeroU32>,
    audio_codec: Option<String>,
    quality: Option<u8>,
    sample_rate: Option<u32>,
}

impl ConversionJob {
    /// Validates `request` and builds the job for `source` in one step.
    pub fn new(
        source: &Path,
        request: &ConversionRequest,
        registry: &CapabilityRegistry,
    ) -> CoreResult<Self> {
        Ok(request.validate(registry)?.job_for(source))
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Target format, also the output extension.
    pub fn target_format(&self) -> &str {
        &self.target_format
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    /// Fixed output frame rate; `None` leaves it to the engine.
    pub fn fps(&self) -> Option<NonZeroU32> {
        self.fps
    }

    /// Whether a video job keeps its audio track.
    pub fn audio_enabled(&self) -> bool {
        self.audio_codec.is_some()
    }

    /// Codec for the audio sub-encode of a video job with audio.
    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    /// Encoder quality 0-100, image jobs only.
    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static CapabilityRegistry {
        CapabilityRegistry::global()
    }

    #[test]
    fn test_video_job_with_auto_fps_and_audio() {
        let request = ConversionRequest::new("mp4").codec("libx264");
        let job = ConversionJob::new(Path::new("clip1.avi"), &request, registry()).unwrap();

        assert_eq!(job.media_kind(), MediaKind::Video);
        assert_eq!(job.fps(), None);
        assert!(job.audio_enabled());
        assert_eq!(job.audio_codec(), Some("libmp3lame"));
        assert_eq!(job.quality(), None);
        assert_eq!(job.target_format(), "mp4");
    }

    #[test]
    fn test_fixed_fps_is_kept_for_video_only() {
        let fps: FpsMode = "30".parse().unwrap();
        let video = ConversionRequest::new("mkv").fps(fps).validate(registry()).unwrap();
        assert_eq!(video.job_for(Path::new("a.avi")).fps(), NonZeroU32::new(30));

        let audio = ConversionRequest::new("mp3").fps(fps).validate(registry()).unwrap();
        assert_eq!(audio.job_for(Path::new("a.avi")).fps(), None);
    }

    #[test]
    fn test_quality_tiers_map_to_levels() {
        for (tier, level) in [("High", 90), ("medium", 55), ("LOW", 25)] {
            let quality: QualityTier = tier.parse().unwrap();
            let template = ConversionRequest::new("JPEG").quality(quality).validate(registry()).unwrap();
            let job = template.job_for(Path::new("photo.png"));
            assert_eq!(job.quality(), Some(level));
            assert_eq!(job.target_format(), "jpeg");
            assert_eq!(job.codec(), "jpeg");
        }
    }

    #[test]
    fn test_codec_outside_allowed_set_is_rejected() {
        let err = ConversionRequest::new("mp4")
            .codec("libvorbis")
            .validate(registry())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter(_)));
        assert!(err.to_string().contains("libx264"));
    }

    #[test]
    fn test_empty_or_placeholder_format_is_rejected() {
        for format in ["", "   ", "-"] {
            let err = ConversionRequest::new(format).validate(registry()).unwrap_err();
            assert!(matches!(err, CoreError::InvalidParameter(_)), "{format:?}");
        }
        let err = ConversionRequest::new("xyz").validate(registry()).unwrap_err();
        assert!(err.to_string().contains("unsupported target format"));
    }

    #[test]
    fn test_placeholder_codec_is_rejected() {
        let err = ConversionRequest::new("mp4").codec(NO_CODEC).validate(registry()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter(_)));
    }

    #[test]
    fn test_format_without_codecs_is_rejected() {
        let custom = CapabilityRegistry::from_entries([crate::registry::CapabilityEntry {
            target_format: "raw",
            media_kind: MediaKind::Video,
            allowed_codecs: &[],
            audio_codec: None,
        }]);
        let err = ConversionRequest::new("raw").validate(&custom).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter(_)));
    }

    #[test]
    fn test_missing_codec_uses_default() {
        let template = ConversionRequest::new("webm").validate(registry()).unwrap();
        assert_eq!(template.codec(), "libvpx");
    }

    #[test]
    fn test_audio_toggle() {
        let muted = ConversionRequest::new("mp4").audio(false).validate(registry()).unwrap();
        assert!(!muted.job_for(Path::new("a.mov")).audio_enabled());

        let gif = ConversionRequest::new("gif").audio(true).validate(registry()).unwrap();
        assert!(!gif.job_for(Path::new("a.mov")).audio_enabled());
    }

    #[test]
    fn test_opus_codec_forces_sample_rate() {
        let native = ConversionRequest::new("opus").codec("opus").validate(registry()).unwrap();
        assert_eq!(native.job_for(Path::new("a.wav")).sample_rate(), Some(OPUS_SAMPLE_RATE));

        let libopus = ConversionRequest::new("opus").validate(registry()).unwrap();
        assert_eq!(libopus.job_for(Path::new("a.wav")).sample_rate(), None);
    }

    #[test]
    fn test_fps_parsing() {
        assert_eq!("Auto".parse::<FpsMode>().unwrap(), FpsMode::Auto);
        assert_eq!("60".parse::<FpsMode>().unwrap().as_option(), NonZeroU32::new(60));
        assert!("0".parse::<FpsMode>().is_err());
        assert!("fast".parse::<FpsMode>().is_err());
        assert!("-5".parse::<FpsMode>().is_err());
    }
}
