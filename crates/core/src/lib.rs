//! Vitals signal processing, session sampling and report scoring driven by
//! per-frame face and pose landmarks.

pub mod dsp;
pub mod perception;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod shared;
pub mod vitals;

#[cfg(test)]
pub(crate) mod test_support;
