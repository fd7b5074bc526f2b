use super::session::SessionState;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot accept frames while {0}")]
    NotCollecting(SessionState),

    #[error("session is still collecting")]
    StillCollecting,

    #[error("session was already finalized")]
    AlreadyFinalized,

    #[error("session report was already produced")]
    AlreadyComplete,
}
