use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::perception::domain::landmark_provider::LandmarkProvider;
use crate::session::domain::session::{Session, SessionState};
use crate::session::domain::session_error::SessionError;
use crate::session::domain::session_snapshot::SessionSnapshot;

use super::collection_error::CollectionError;
use super::session_logger::SessionLogger;

/// Name under which per-frame sampling time is logged.
pub const SAMPLE_STAGE: &str = "sample";

pub type SnapshotObserver = Box<dyn FnMut(&SessionSnapshot) + Send>;

/// Options for one collection run.
pub struct RunConfig {
    /// Called with a fresh snapshot after every captured frame, on the
    /// caller's thread.
    pub on_snapshot: Option<SnapshotObserver>,
    /// Set to end collection early; the session finalizes with what it has.
    pub cancelled: Arc<AtomicBool>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            on_snapshot: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Drives frames from an opened provider into a session until the session
/// target is reached, the stream ends, or the run is cancelled.
///
/// Returns the session in `Finalizing` state with the provider closed.
pub trait SessionRunner: Send {
    fn run(
        &self,
        provider: Box<dyn LandmarkProvider>,
        session: Session,
        logger: &mut dyn SessionLogger,
        config: RunConfig,
    ) -> Result<Session, CollectionError>;
}

/// The capture loop shared by every runner. `on_frame` receives the session
/// after each pushed frame and how long sampling took, in milliseconds.
///
/// A read error mid-stream ends capture like the end of the stream does;
/// only a session error is returned.
pub fn capture(
    provider: &mut dyn LandmarkProvider,
    session: &mut Session,
    cancelled: &AtomicBool,
    mut on_frame: impl FnMut(&Session, f64),
) -> Result<(), SessionError> {
    let outcome = capture_until_done(provider, session, cancelled, &mut on_frame);
    provider.close();
    outcome?;
    session.stop()?;
    Ok(())
}

fn capture_until_done(
    provider: &mut dyn LandmarkProvider,
    session: &mut Session,
    cancelled: &AtomicBool,
    on_frame: &mut impl FnMut(&Session, f64),
) -> Result<(), SessionError> {
    while session.state() == SessionState::Collecting {
        if cancelled.load(Ordering::Relaxed) {
            log::info!(
                "Collection cancelled after {} frames",
                session.frames_captured()
            );
            break;
        }
        let frame = match provider.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!(
                    "Landmark stream ended after {} frames",
                    session.frames_captured()
                );
                break;
            }
            Err(e) => {
                log::warn!(
                    "Landmark stream failed after {} frames: {e}",
                    session.frames_captured()
                );
                break;
            }
        };

        let started = Instant::now();
        session.push_frame(&frame)?;
        on_frame(session, started.elapsed().as_secs_f64() * 1000.0);
    }
    Ok(())
}
