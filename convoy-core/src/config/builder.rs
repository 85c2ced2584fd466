// ============================================================================
// convoy-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Fluent Construction of CoreConfig
//
// KEY COMPONENTS:
// - CoreConfigBuilder: Builder struct for creating CoreConfig instances

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::CoreConfig;

/// Builder for [`CoreConfig`].
///
/// # Examples
///
/// ```rust
/// use convoy_core::config::CoreConfigBuilder;
/// use std::path::Path;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir("/media/out")
///     .temp_dir("/var/tmp")
///     .ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
///     .build();
/// assert_eq!(config.output_dir.as_deref(), Some(Path::new("/media/out")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(output_dir.into());
        self
    }

    pub fn temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(temp_dir.into());
        self
    }

    /// Sets the ntfy topic URL, e.g. `https://ntfy.sh/convoy`.
    pub fn ntfy_topic(mut self, topic: impl Into<String>) -> Self {
        self.config.ntfy_topic = Some(topic.into());
        self
    }

    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = Some(path.into());
        self
    }

    /// Builds the config. Call [`CoreConfig::validate`] before using it.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
