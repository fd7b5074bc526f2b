use std::path::PathBuf;

use thiserror::Error;

use super::frame_sample::FrameSample;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("landmark source {0} is unavailable: {1}")]
    Unavailable(String, #[source] std::io::Error),
    #[error("provider was read before open()")]
    NotOpen,
    #[error("failed to read landmark source: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// What a provider reports about its stream when opened.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub description: String,
    pub source_path: Option<PathBuf>,
    /// Nominal frame rate, when the source knows it.
    pub fps: Option<f64>,
}

/// Supplies per-frame landmarks and skin samples.
///
/// Implementations wrap a live camera plus landmark model, or a recording;
/// the session only sees [`FrameSample`] values.
pub trait LandmarkProvider: Send {
    /// Prepares the source. Failure here aborts the session.
    fn open(&mut self) -> Result<SourceInfo, ProviderError>;

    /// Next captured frame, or `None` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<FrameSample>, ProviderError>;

    /// Releases any resources held by the provider.
    fn close(&mut self);
}
