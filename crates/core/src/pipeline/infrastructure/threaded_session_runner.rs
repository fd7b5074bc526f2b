use crate::perception::domain::landmark_provider::LandmarkProvider;
use crate::pipeline::collection_error::CollectionError;
use crate::pipeline::session_logger::SessionLogger;
use crate::pipeline::session_runner::{capture, RunConfig, SessionRunner, SAMPLE_STAGE};
use crate::session::domain::session::Session;
use crate::session::domain::session_error::SessionError;
use crate::session::domain::session_snapshot::SessionSnapshot;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Name under which the snapshot backlog is logged.
pub const QUEUE_DEPTH_METRIC: &str = "snapshot_queue_depth";

/// What the worker publishes after each frame.
struct Progress {
    snapshot: SessionSnapshot,
    sample_ms: f64,
}

/// Captures and samples on a dedicated worker thread.
///
/// Layout: `worker [read → sample] → snapshots → caller [logger, observer]`
///
/// The worker owns the provider and the session; the caller only sees
/// published snapshots. The session comes back through the join handle.
pub struct ThreadedSessionRunner {
    channel_capacity: usize,
}

impl ThreadedSessionRunner {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedSessionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRunner for ThreadedSessionRunner {
    fn run(
        &self,
        provider: Box<dyn LandmarkProvider>,
        session: Session,
        logger: &mut dyn SessionLogger,
        config: RunConfig,
    ) -> Result<Session, CollectionError> {
        let target = session.config().target_frames();
        let (progress_tx, progress_rx) =
            crossbeam_channel::bounded::<Progress>(self.channel_capacity);

        let worker = spawn_worker(provider, session, progress_tx, config.cancelled.clone());

        let mut on_snapshot = config.on_snapshot;
        for progress in progress_rx.iter() {
            logger.metric(QUEUE_DEPTH_METRIC, progress_rx.len() as f64);
            logger.timing(SAMPLE_STAGE, progress.sample_ms);
            logger.progress(progress.snapshot.frames_captured, target);
            if let Some(observer) = on_snapshot.as_mut() {
                observer(&progress.snapshot);
            }
        }

        match worker.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(CollectionError::WorkerPanicked),
        }
    }
}

fn spawn_worker(
    mut provider: Box<dyn LandmarkProvider>,
    mut session: Session,
    progress_tx: crossbeam_channel::Sender<Progress>,
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
) -> std::thread::JoinHandle<Result<Session, SessionError>> {
    std::thread::spawn(move || {
        capture(&mut *provider, &mut session, &cancelled, |session, sample_ms| {
            // A departed observer must not stop collection.
            let _ = progress_tx.send(Progress {
                snapshot: session.snapshot(),
                sample_ms,
            });
        })?;
        Ok(session)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::session_logger::{LogSessionLogger, NullSessionLogger};
    use crate::session::domain::session::SessionState;
    use crate::session::domain::session_config::SessionConfig;
    use crate::test_support::{empty_frames, healthy_frames, ScriptedProvider};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    fn opened(mut provider: ScriptedProvider) -> Box<dyn LandmarkProvider> {
        provider.open().unwrap();
        Box::new(provider)
    }

    fn session() -> Session {
        Session::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_worker_returns_finalizing_session() {
        let provider = ScriptedProvider::new(healthy_frames(300, 30.0));
        let closed = provider.closed.clone();
        let mut logger = LogSessionLogger::new(30);

        let session = ThreadedSessionRunner::new()
            .run(opened(provider), session(), &mut logger, RunConfig::default())
            .unwrap();

        assert_eq!(session.state(), SessionState::Finalizing);
        assert_eq!(session.frames_captured(), 300);
        assert!(*closed.lock().unwrap());
        assert_eq!(logger.timings_for(SAMPLE_STAGE).unwrap().len(), 300);
        assert_eq!(logger.metrics_for(QUEUE_DEPTH_METRIC).unwrap().len(), 300);
    }

    #[test]
    fn test_observer_sees_snapshots_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let config = RunConfig {
            on_snapshot: Some(Box::new(move |snapshot: &SessionSnapshot| {
                seen_clone.lock().unwrap().push(snapshot.frames_captured);
            })),
            ..RunConfig::default()
        };

        ThreadedSessionRunner::new()
            .run(
                opened(ScriptedProvider::new(healthy_frames(120, 30.0))),
                session(),
                &mut NullSessionLogger,
                config,
            )
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, (1..=120).collect::<Vec<_>>());
    }

    #[test]
    fn test_threaded_matches_sequential_report() {
        use crate::pipeline::infrastructure::sequential_session_runner::SequentialSessionRunner;

        let mut threaded = ThreadedSessionRunner::new()
            .run(
                opened(ScriptedProvider::new(healthy_frames(300, 30.0))),
                session(),
                &mut NullSessionLogger,
                RunConfig::default(),
            )
            .unwrap();
        let mut sequential = SequentialSessionRunner
            .run(
                opened(ScriptedProvider::new(healthy_frames(300, 30.0))),
                session(),
                &mut NullSessionLogger,
                RunConfig::default(),
            )
            .unwrap();

        let a = threaded.complete().unwrap().to_pretty_json().unwrap();
        let b = sequential.complete().unwrap().to_pretty_json().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cancelled_before_start_captures_nothing() {
        let cancelled = Arc::new(AtomicBool::new(true));
        let config = RunConfig {
            on_snapshot: None,
            cancelled,
        };
        let mut session = ThreadedSessionRunner::new()
            .run(
                opened(ScriptedProvider::new(empty_frames(300))),
                session(),
                &mut NullSessionLogger,
                config,
            )
            .unwrap();
        assert_eq!(session.frames_captured(), 0);
        let report = session.complete().unwrap();
        assert_eq!(report.session_summary.overall_health_status.score, 100);
    }

    #[test]
    fn test_cancel_from_observer() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let config = RunConfig {
            on_snapshot: Some(Box::new(move |snapshot: &SessionSnapshot| {
                if snapshot.frames_captured >= 30 {
                    flag.store(true, Ordering::Relaxed);
                }
            })),
            cancelled,
        };
        let session = ThreadedSessionRunner::new()
            .run(
                opened(ScriptedProvider::new(healthy_frames(300, 30.0))),
                session(),
                &mut NullSessionLogger,
                config,
            )
            .unwrap();
        // The worker may run ahead of the observer by the channel capacity.
        assert!(session.frames_captured() >= 30);
        assert!(session.frames_captured() < 300);
    }
}
