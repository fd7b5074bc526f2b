pub mod blink_detector;
pub mod breathing_estimator;
pub mod estimate;
pub mod frame_feature;
pub mod gaze_classifier;
pub mod head_pose_estimator;
pub mod heart_rate_estimator;
pub mod hrv_analyzer;
pub mod movement_detector;
pub mod posture_scorer;
