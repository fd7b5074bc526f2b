pub mod action_units;
pub mod emotion;
pub mod face_landmarks;
pub mod frame_sample;
pub mod landmark_provider;
pub mod pose_landmarks;
