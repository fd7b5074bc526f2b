use crate::perception::domain::landmark_provider::LandmarkProvider;
use crate::pipeline::collection_error::CollectionError;
use crate::pipeline::session_logger::SessionLogger;
use crate::pipeline::session_runner::{capture, RunConfig, SessionRunner, SAMPLE_STAGE};
use crate::session::domain::session::Session;

/// Captures and samples on the calling thread.
#[derive(Default)]
pub struct SequentialSessionRunner;

impl SessionRunner for SequentialSessionRunner {
    fn run(
        &self,
        mut provider: Box<dyn LandmarkProvider>,
        mut session: Session,
        logger: &mut dyn SessionLogger,
        config: RunConfig,
    ) -> Result<Session, CollectionError> {
        let target = session.config().target_frames();
        let mut on_snapshot = config.on_snapshot;

        capture(
            &mut *provider,
            &mut session,
            &config.cancelled,
            |session, sample_ms| {
                logger.timing(SAMPLE_STAGE, sample_ms);
                logger.progress(session.frames_captured(), target);
                if let Some(observer) = on_snapshot.as_mut() {
                    observer(&session.snapshot());
                }
            },
        )?;
        Ok(session)
    }
}
