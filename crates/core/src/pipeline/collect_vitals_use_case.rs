use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::perception::domain::landmark_provider::LandmarkProvider;
use crate::report::domain::session_report::SessionReport;
use crate::session::domain::session::Session;

use super::collection_error::CollectionError;
use super::session_logger::SessionLogger;
use super::session_runner::{RunConfig, SessionRunner, SnapshotObserver};

/// Frame rate mismatch tolerated between source and session, in fps.
const FPS_TOLERANCE: f64 = 0.5;

/// Opens the landmark source, collects one session and builds its report.
///
/// Single use: `execute` consumes the provider and session, so a second
/// call fails with [`CollectionError::AlreadyRan`].
pub struct CollectVitalsUseCase {
    provider: Option<Box<dyn LandmarkProvider>>,
    session: Option<Session>,
    runner: Box<dyn SessionRunner>,
    on_snapshot: Option<SnapshotObserver>,
    cancelled: Arc<AtomicBool>,
}

impl CollectVitalsUseCase {
    pub fn new(
        provider: Box<dyn LandmarkProvider>,
        session: Session,
        runner: Box<dyn SessionRunner>,
        on_snapshot: Option<SnapshotObserver>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            provider: Some(provider),
            session: Some(session),
            runner,
            on_snapshot,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(
        &mut self,
        logger: &mut dyn SessionLogger,
    ) -> Result<SessionReport, CollectionError> {
        let mut provider = self.provider.take().ok_or(CollectionError::AlreadyRan)?;
        let session = self.session.take().ok_or(CollectionError::AlreadyRan)?;

        let source = provider.open()?;
        logger.info(&format!(
            "Collecting {} frames at {} fps from {}",
            session.config().target_frames(),
            session.config().fps,
            source.description
        ));
        if let Some(fps) = source.fps {
            let expected = session.config().sample_rate();
            if (fps - expected).abs() > FPS_TOLERANCE {
                log::warn!("Source runs at {fps:.1} fps but the session samples at {expected} fps");
            }
        }

        let config = RunConfig {
            on_snapshot: self.on_snapshot.take(),
            cancelled: self.cancelled.clone(),
        };
        let mut session = self.runner.run(provider, session, logger, config)?;

        let started = Instant::now();
        let report = session.complete()?;
        logger.timing("aggregate", started.elapsed().as_secs_f64() * 1000.0);
        logger.summary();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::infrastructure::sequential_session_runner::SequentialSessionRunner;
    use crate::pipeline::infrastructure::threaded_session_runner::ThreadedSessionRunner;
    use crate::pipeline::session_logger::{LogSessionLogger, NullSessionLogger};
    use crate::session::domain::session_config::SessionConfig;
    use crate::session::domain::session_snapshot::SessionSnapshot;
    use crate::test_support::{empty_frames, healthy_frames, ScriptedProvider};
    use std::sync::Mutex;

    // --- Helpers ---

    fn use_case(provider: ScriptedProvider, runner: Box<dyn SessionRunner>) -> CollectVitalsUseCase {
        let session = Session::new(SessionConfig::default()).unwrap();
        CollectVitalsUseCase::new(Box::new(provider), session, runner, None, None)
    }

    // --- Tests ---

    #[test]
    fn test_healthy_session_end_to_end() {
        let mut logger = LogSessionLogger::new(30);
        let report = use_case(
            ScriptedProvider::new(healthy_frames(300, 30.0)),
            Box::new(ThreadedSessionRunner::new()),
        )
        .execute(&mut logger)
        .unwrap();

        let hr = report.physiological_vitals.heart_rate.final_value.unwrap();
        assert!((hr - 72.0).abs() <= 3.0, "got {hr}");
        assert_eq!(report.capture_info.frames_captured, 300);
        assert_eq!(logger.timings_for("aggregate").unwrap().len(), 1);
    }

    #[test]
    fn test_open_failure_is_fatal() {
        let mut case = use_case(
            ScriptedProvider::unavailable(),
            Box::new(SequentialSessionRunner),
        );
        let err = case.execute(&mut NullSessionLogger).unwrap_err();
        assert!(matches!(err, CollectionError::Capture(_)));
        assert!(err.to_string().starts_with("could not start capture"));
    }

    #[test]
    fn test_second_execute_fails() {
        let mut case = use_case(
            ScriptedProvider::new(empty_frames(10)),
            Box::new(SequentialSessionRunner),
        );
        case.execute(&mut NullSessionLogger).unwrap();
        assert!(matches!(
            case.execute(&mut NullSessionLogger),
            Err(CollectionError::AlreadyRan)
        ));
    }

    #[test]
    fn test_zero_faces_still_reports() {
        let report = use_case(
            ScriptedProvider::new(empty_frames(300)),
            Box::new(SequentialSessionRunner),
        )
        .execute(&mut NullSessionLogger)
        .unwrap();
        let json = report.to_json().unwrap();
        assert_eq!(
            json["physiological_vitals"]["heart_rate"]["status"],
            "not_detected"
        );
        assert_eq!(json["session_summary"]["overall_health_status"]["score"], 100);
    }

    #[test]
    fn test_observer_receives_snapshots() {
        let last = Arc::new(Mutex::new(None));
        let last_clone = last.clone();
        let session = Session::new(SessionConfig::default()).unwrap();
        let mut case = CollectVitalsUseCase::new(
            Box::new(ScriptedProvider::new(healthy_frames(60, 30.0))),
            session,
            Box::new(SequentialSessionRunner),
            Some(Box::new(move |snapshot: &SessionSnapshot| {
                *last_clone.lock().unwrap() = Some(snapshot.frames_captured);
            })),
            None,
        );
        case.execute(&mut NullSessionLogger).unwrap();
        assert_eq!(*last.lock().unwrap(), Some(60));
    }
}
