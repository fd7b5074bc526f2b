//! Per-frame feature extraction and the per-metric estimators, detectors
//! and classifiers that consume those features.

pub mod domain;
