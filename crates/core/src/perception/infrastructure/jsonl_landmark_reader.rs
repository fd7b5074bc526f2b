//! Replays a recorded landmark stream: one JSON object per line.
//!
//! ```text
//! {"width":640,"height":480,
//!  "face":[[0.51,0.42], ...],      // face mesh, normalised
//!  "pose":[[0.50,0.20], ...],      // body pose, normalised
//!  "roi":[152.1,101.7,84.0],       // skin channel means (R, G, B)
//!  "emotion":{"label":"neutral","confidence":0.82},
//!  "action_units":["AU12","AU25"]}
//! ```
//!
//! Every field except `width` and `height` may be omitted or `null`.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;

use serde::Deserialize;

use crate::perception::domain::action_units::ActionUnitSet;
use crate::perception::domain::emotion::EmotionReading;
use crate::perception::domain::face_landmarks::FaceLandmarks;
use crate::perception::domain::frame_sample::FrameSample;
use crate::perception::domain::landmark_provider::{LandmarkProvider, ProviderError, SourceInfo};
use crate::perception::domain::pose_landmarks::PoseLandmarks;
use crate::shared::point::Point2;
use crate::shared::roi_patch::{Rgb, RoiSample};

#[derive(Deserialize)]
struct RecordedEmotion {
    label: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct RecordedFrame {
    width: u32,
    height: u32,
    face: Option<Vec<[f64; 2]>>,
    pose: Option<Vec<[f64; 2]>>,
    roi: Option<[f64; 3]>,
    emotion: Option<RecordedEmotion>,
    action_units: Option<Vec<String>>,
}

impl RecordedFrame {
    fn into_sample(self) -> FrameSample {
        let points = |raw: Vec<[f64; 2]>| raw.into_iter().map(Point2::from).collect::<Vec<_>>();
        FrameSample {
            width: self.width,
            height: self.height,
            face: self.face.map(|p| FaceLandmarks::new(points(p))),
            pose: self.pose.map(|p| PoseLandmarks::new(points(p))),
            roi: self
                .roi
                .map(|[r, g, b]| RoiSample::Means(Rgb::new(r, g, b))),
            emotion: self
                .emotion
                .map(|e| EmotionReading::new(e.label, e.confidence)),
            action_units: self.action_units.map(ActionUnitSet::from_active),
        }
    }
}

pub struct JsonlLandmarkReader {
    path: PathBuf,
    fps: Option<f64>,
    lines: Option<Lines<BufReader<File>>>,
    line_number: usize,
}

impl JsonlLandmarkReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fps: None,
            lines: None,
            line_number: 0,
        }
    }

    /// Declares the rate the recording was captured at.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }
}

impl LandmarkProvider for JsonlLandmarkReader {
    fn open(&mut self) -> Result<SourceInfo, ProviderError> {
        let file = File::open(&self.path)
            .map_err(|e| ProviderError::Unavailable(self.path.display().to_string(), e))?;
        self.lines = Some(BufReader::new(file).lines());
        self.line_number = 0;
        Ok(SourceInfo {
            description: format!("recording {}", self.path.display()),
            source_path: Some(self.path.clone()),
            fps: self.fps,
        })
    }

    fn next_frame(&mut self) -> Result<Option<FrameSample>, ProviderError> {
        let lines = self.lines.as_mut().ok_or(ProviderError::NotOpen)?;
        for line in lines.by_ref() {
            let line = line?;
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let record: RecordedFrame =
                serde_json::from_str(&line).map_err(|source| ProviderError::MalformedRecord {
                    line: self.line_number,
                    source,
                })?;
            return Ok(Some(record.into_sample()));
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.lines = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn recording(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn test_reads_full_record() {
        let file = recording(&[
            r#"{"width":640,"height":480,"face":[[0.1,0.2],[0.3,0.4]],"pose":[[0.5,0.5]],"roi":[150.0,100.0,80.0],"emotion":{"label":"happy","confidence":0.9},"action_units":["AU12"]}"#,
        ]);
        let mut reader = JsonlLandmarkReader::new(file.path()).with_fps(30.0);
        let info = reader.open().unwrap();
        assert_eq!(info.fps, Some(30.0));

        let frame = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 480);
        assert_eq!(frame.face.unwrap().point(1), Some(Point2::new(0.3, 0.4)));
        assert_eq!(frame.pose.unwrap().points().len(), 1);
        assert_eq!(
            frame.roi.unwrap().channel_means(),
            Some(Rgb::new(150.0, 100.0, 80.0))
        );
        assert_eq!(frame.emotion.unwrap().label, "happy");
        assert!(frame.action_units.unwrap().is_active("AU12"));

        assert!(reader.next_frame().unwrap().is_none());
        reader.close();
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let file = recording(&[r#"{"width":320,"height":240,"face":null}"#]);
        let mut reader = JsonlLandmarkReader::new(file.path());
        reader.open().unwrap();
        let frame = reader.next_frame().unwrap().unwrap();
        assert!(frame.face.is_none());
        assert!(frame.pose.is_none());
        assert!(frame.roi.is_none());
        assert!(frame.emotion.is_none());
        assert!(frame.action_units.is_none());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let file = recording(&[
            r#"{"width":1,"height":1}"#,
            "",
            "   ",
            r#"{"width":2,"height":2}"#,
        ]);
        let mut reader = JsonlLandmarkReader::new(file.path());
        reader.open().unwrap();
        assert_eq!(reader.next_frame().unwrap().unwrap().width, 1);
        assert_eq!(reader.next_frame().unwrap().unwrap().width, 2);
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let file = recording(&[r#"{"width":1,"height":1}"#, "{not json"]);
        let mut reader = JsonlLandmarkReader::new(file.path());
        reader.open().unwrap();
        reader.next_frame().unwrap();
        let err = reader.next_frame().unwrap_err();
        assert!(matches!(err, ProviderError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let mut reader = JsonlLandmarkReader::new("/nonexistent/session.jsonl");
        assert!(matches!(
            reader.open().unwrap_err(),
            ProviderError::Unavailable(..)
        ));
    }

    #[test]
    fn test_read_before_open_fails() {
        let mut reader = JsonlLandmarkReader::new("/nonexistent/session.jsonl");
        assert!(matches!(
            reader.next_frame().unwrap_err(),
            ProviderError::NotOpen
        ));
    }
}
