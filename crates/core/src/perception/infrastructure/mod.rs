pub mod jsonl_landmark_reader;
pub mod landmark_action_unit_detector;
