//! Configuration for a conversion run.
//!
//! Everything here is about *where* things go and *who* gets told; the
//! conversion selections themselves live in [`crate::job::ConversionRequest`].

mod builder;

use crate::error::{CoreError, CoreResult};

use serde::Serialize;

use std::path::PathBuf;

pub use builder::CoreConfigBuilder;

/// Environment variable read by the CLI for the ntfy topic URL.
pub const NTFY_TOPIC_ENV: &str = "CONVOY_NTFY_TOPIC";

/// Environment variable read by the CLI for the ffmpeg binary.
pub const FFMPEG_PATH_ENV: &str = "CONVOY_FFMPEG";

/// Run configuration shared by the orchestrator and the engines.
///
/// All fields are optional; an empty config converts every file next to its
/// source, keeps scratch audio next to the output and sends no notifications.
///
/// # Examples
///
/// ```rust,no_run
/// use convoy_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .output_dir("/media/converted")
///     .ntfy_topic("https://ntfy.sh/convoy")
///     .build();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoreConfig {
    /// Directory receiving every output. `None` writes next to each source.
    pub output_dir: Option<PathBuf>,

    /// Parent directory for the scratch audio of video jobs.
    /// `None` uses the directory of the output file.
    pub temp_dir: Option<PathBuf>,

    /// ntfy topic URL (`https://host/topic`) for batch notifications.
    pub ntfy_topic: Option<String>,

    /// ffmpeg binary to run instead of the one found on `PATH`.
    pub ffmpeg_path: Option<PathBuf>,
}

impl CoreConfig {
    /// Checks settings that would otherwise fail every job of a batch.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(topic) = &self.ntfy_topic {
            if !topic.starts_with("https://") {
                return Err(CoreError::Config(format!(
                    "ntfy topic must be an https:// URL, got '{topic}'"
                )));
            }
        }

        for (name, dir) in [("output", &self.output_dir), ("temp", &self.temp_dir)] {
            if let Some(dir) = dir {
                if dir.exists() && !dir.is_dir() {
                    return Err(CoreError::Config(format!(
                        "{name} directory '{}' exists but is not a directory",
                        dir.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Name of the ffmpeg binary to check for and run.
    pub fn ffmpeg_command(&self) -> String {
        self.ffmpeg_path
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ffmpeg".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
        assert_eq!(CoreConfig::default().ffmpeg_command(), "ffmpeg");
    }

    #[test]
    fn test_plain_http_topic_is_rejected() {
        let config = CoreConfigBuilder::new().ntfy_topic("http://ntfy.sh/convoy").build();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_output_dir_must_not_be_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        File::create(&file).unwrap();

        let config = CoreConfigBuilder::new().output_dir(&file).build();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let missing = CoreConfigBuilder::new().output_dir(temp.path().join("later")).build();
        assert!(missing.validate().is_ok());
    }
}
