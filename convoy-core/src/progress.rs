//! Two-level progress aggregation.
//!
//! Engines report raw phase counters ("audio 120/400", "video 35/90").
//! The [`ProgressAggregator`] folds those into a per-file fraction and an
//! overall batch fraction and hands back immutable [`ProgressSnapshot`]s for
//! whatever presentation layer is listening.
//!
//! A video job with audio runs two phases: the audio sub-encode first, then
//! the video encode. The audio phase reaching 100% does not finish the file;
//! that event is swallowed and only the video phase moves the file toward
//! done. Only the last phase of a job feeds the overall fraction, and the
//! overall fraction never moves backwards within a batch.

use serde::Serialize;

/// Encoding stage of the running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    None,
    Audio,
    Video,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::None => "",
            Phase::Audio => "Audio",
            Phase::Video => "Video",
        }
    }
}

/// Raw counter reported by an engine for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEvent {
    pub phase: Phase,
    pub completed: u64,
    pub total: u64,
}

impl PhaseEvent {
    pub fn new(phase: Phase, completed: u64, total: u64) -> Self {
        Self { phase, completed, total }
    }

    /// `completed / total` clamped to [0, 1]; 0 when the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// Everything a presentation layer needs to draw both progress bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub overall_fraction: f64,
    pub overall_label: String,
    pub file_fraction: f64,
    pub file_label: String,
    pub phase: Phase,
    pub completed_count: usize,
    pub total_count: usize,
}

/// Running progress state for one batch.
#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    total_count: usize,
    completed_count: usize,
    current_job_fraction: f64,
    phase: Phase,
    file_fraction: f64,
    file_name: String,
    audio_then_video: bool,
    high_water: f64,
}

impl ProgressAggregator {
    pub fn new(total_count: usize) -> Self {
        Self {
            total_count,
            completed_count: 0,
            current_job_fraction: 0.0,
            phase: Phase::None,
            file_fraction: 0.0,
            file_name: String::new(),
            audio_then_video: false,
            high_water: 0.0,
        }
    }

    /// Job `index` (0-based) is starting.
    ///
    /// `audio_then_video` marks a job whose audio phase is followed by a
    /// video phase.
    pub fn on_job_start(&mut self, index: usize, file_name: &str, audio_then_video: bool) -> ProgressSnapshot {
        self.completed_count = self.completed_count.max(index.min(self.total_count));
        self.current_job_fraction = 0.0;
        self.phase = Phase::None;
        self.file_fraction = 0.0;
        self.file_name = file_name.to_string();
        self.audio_then_video = audio_then_video;
        self.snapshot()
    }

    /// Applies an engine counter. Returns `None` when the event is not
    /// surfaced (the audio phase finishing inside a video job).
    pub fn on_phase_event(&mut self, event: PhaseEvent) -> Option<ProgressSnapshot> {
        if event.phase == Phase::None {
            return None;
        }

        let fraction = event.fraction();
        let is_sub_phase = self.audio_then_video && event.phase == Phase::Audio;
        if is_sub_phase && fraction >= 1.0 {
            return None;
        }

        self.phase = event.phase;
        self.file_fraction = fraction;
        if !is_sub_phase {
            self.current_job_fraction = self.current_job_fraction.max(fraction);
        }
        Some(self.snapshot())
    }

    /// Job `index` (0-based) finished, successfully or not.
    pub fn on_job_end(&mut self, index: usize) -> ProgressSnapshot {
        self.completed_count = self.completed_count.max((index + 1).min(self.total_count));
        self.current_job_fraction = 0.0;
        self.snapshot()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// `(completed + current job fraction) / total`, never decreasing.
    pub fn overall_fraction(&mut self) -> f64 {
        let raw = if self.total_count == 0 {
            1.0
        } else {
            (self.completed_count as f64 + self.current_job_fraction) / self.total_count as f64
        };
        self.high_water = self.high_water.max(raw.clamp(0.0, 1.0));
        self.high_water
    }

    pub fn overall_label(&self) -> String {
        format!("Overall Progress {}/{}", self.completed_count, self.total_count)
    }

    pub fn file_label(&self) -> String {
        match self.phase {
            Phase::None => format!("Converting {}", self.file_name),
            phase => format!(
                "Converting {} {}: {:.2}%",
                self.file_name,
                phase.label(),
                self.file_fraction * 100.0
            ),
        }
    }

    pub fn snapshot(&mut self) -> ProgressSnapshot {
        ProgressSnapshot {
            overall_fraction: self.overall_fraction(),
            overall_label: self.overall_label(),
            file_fraction: self.file_fraction,
            file_label: self.file_label(),
            phase: self.phase,
            completed_count: self.completed_count,
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_phase_fraction_is_clamped() {
        assert_eq!(PhaseEvent::new(Phase::Video, 5, 10).fraction(), 0.5);
        assert_eq!(PhaseEvent::new(Phase::Video, 15, 10).fraction(), 1.0);
        assert_eq!(PhaseEvent::new(Phase::Video, 3, 0).fraction(), 0.0);
    }

    #[test]
    fn test_audio_completion_is_suppressed_for_video_jobs() {
        let mut agg = ProgressAggregator::new(1);
        agg.on_job_start(0, "clip.mp4", true);

        let partial = agg.on_phase_event(PhaseEvent::new(Phase::Audio, 50, 100)).unwrap();
        assert_eq!(partial.phase, Phase::Audio);
        assert!((partial.file_fraction - 0.5).abs() < EPS);
        assert_eq!(partial.file_label, "Converting clip.mp4 Audio: 50.00%");
        assert!(partial.overall_fraction.abs() < EPS);

        assert!(agg.on_phase_event(PhaseEvent::new(Phase::Audio, 100, 100)).is_none());

        let video = agg.on_phase_event(PhaseEvent::new(Phase::Video, 25, 100)).unwrap();
        assert_eq!(video.phase, Phase::Video);
        assert!((video.overall_fraction - 0.25).abs() < EPS);
        assert_eq!(video.file_label, "Converting clip.mp4 Video: 25.00%");
    }

    #[test]
    fn test_audio_only_job_reports_completion() {
        let mut agg = ProgressAggregator::new(2);
        agg.on_job_start(0, "song.mp3", false);
        let done = agg.on_phase_event(PhaseEvent::new(Phase::Audio, 10, 10)).unwrap();
        assert!((done.file_fraction - 1.0).abs() < EPS);
        assert!((done.overall_fraction - 0.5).abs() < EPS);
    }

    #[test]
    fn test_overall_progress_is_monotonic_and_ends_at_one() {
        let mut agg = ProgressAggregator::new(3);
        let mut last = 0.0;
        for index in 0..3 {
            let snap = agg.on_job_start(index, "f", true);
            assert!(snap.overall_fraction >= last - EPS);
            last = snap.overall_fraction;
            for (phase, done) in [(Phase::Audio, 40), (Phase::Audio, 100), (Phase::Video, 70), (Phase::Video, 30)] {
                if let Some(snap) = agg.on_phase_event(PhaseEvent::new(phase, done, 100)) {
                    assert!(snap.overall_fraction >= last - EPS);
                    last = snap.overall_fraction;
                }
            }
            let snap = agg.on_job_end(index);
            assert!(snap.overall_fraction >= last - EPS);
            last = snap.overall_fraction;
        }
        assert!((last - 1.0).abs() < EPS);
        assert_eq!(agg.overall_label(), "Overall Progress 3/3");
    }

    #[test]
    fn test_job_end_advances_even_without_phase_events() {
        let mut agg = ProgressAggregator::new(4);
        agg.on_job_start(0, "broken.avi", true);
        let snap = agg.on_job_end(0);
        assert_eq!(snap.completed_count, 1);
        assert!((snap.overall_fraction - 0.25).abs() < EPS);
        assert_eq!(snap.file_label, "Converting broken.avi");
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let mut agg = ProgressAggregator::new(0);
        assert!((agg.overall_fraction() - 1.0).abs() < EPS);
    }
}
