use std::collections::HashMap;
use std::time::Instant;

/// Observer for collection progress and timings.
///
/// Lets the CLI report progress without the runners knowing how it is shown.
pub trait SessionLogger: Send {
    /// Frames captured so far out of the session target.
    fn progress(&mut self, captured: usize, target: usize);

    /// How long one named step took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A point-in-time measurement, such as snapshot queue depth.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// End-of-collection summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used by tests and embedders with their own
/// progress reporting.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn progress(&mut self, _captured: usize, _target: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards progress to the `log` facade and keeps per-stage timings for an
/// end-of-session summary.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct LogSessionLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    frames_captured: usize,
    messages: Vec<String>,
}

impl LogSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames_captured: 0,
            messages: Vec::new(),
        }
    }

    /// `None` until something has been recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let frames = self.frames_captured;
        let mut lines = vec![format!(
            "Collection summary ({frames} frames, {elapsed_s:.1}s wall clock):"
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = average(durations);
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.2}ms  max {max_ms:6.2}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: avg {:.1}", average(&self.metrics[name])));
        }

        if frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn frames_captured(&self) -> usize {
        self.frames_captured
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for LogSessionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl SessionLogger for LogSessionLogger {
    fn progress(&mut self, captured: usize, target: usize) {
        self.frames_captured = captured;
        if target > 0 && (captured % self.throttle_frames == 0 || captured == target) {
            let pct = captured as f64 / target as f64 * 100.0;
            log::info!("Collecting: {captured}/{target} frames ({pct:.0}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // --- NullSessionLogger tests ---

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullSessionLogger;
        logger.progress(1, 300);
        logger.timing("sample", 0.5);
        logger.metric("snapshot_queue_depth", 2.0);
        logger.info("hello");
        logger.summary();
    }

    // --- LogSessionLogger tests ---

    #[test]
    fn test_timings_recorded_per_stage() {
        let mut logger = LogSessionLogger::new(30);
        logger.timing("sample", 0.4);
        logger.timing("sample", 0.6);
        logger.timing("aggregate", 3.0);

        let sample = logger.timings_for("sample").unwrap();
        assert_eq!(sample.len(), 2);
        assert_relative_eq!(sample[1], 0.6);
        assert_eq!(logger.timings_for("aggregate").unwrap().len(), 1);
        assert!(logger.timings_for("missing").is_none());
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogSessionLogger::new(30);
        logger.progress(300, 300);
        logger.timing("sample", 1.0);
        logger.timing("sample", 3.0);
        logger.metric("snapshot_queue_depth", 1.0);
        logger.metric("snapshot_queue_depth", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Collection summary (300 frames"));
        assert!(summary.contains("sample"));
        assert!(summary.contains("avg   2.00ms"));
        assert!(summary.contains("max   3.00ms"));
        assert!(summary.contains("snapshot_queue_depth: avg 1.5"));
    }

    #[test]
    fn test_empty_summary_is_none() {
        assert!(LogSessionLogger::new(30).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_latest_count() {
        let mut logger = LogSessionLogger::new(30);
        for captured in 1..=45 {
            logger.progress(captured, 300);
        }
        assert_eq!(logger.frames_captured(), 45);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = LogSessionLogger::new(30);
        logger.info("opened camera");
        assert_eq!(logger.messages, vec!["opened camera"]);
    }

    #[test]
    fn test_default_throttles_to_one_second() {
        assert_eq!(LogSessionLogger::default().throttle_frames, 30);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        assert_eq!(LogSessionLogger::new(0).throttle_frames, 1);
    }
}
