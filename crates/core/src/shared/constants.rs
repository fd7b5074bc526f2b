pub const DEFAULT_DURATION_SECONDS: u32 = 10;
pub const DEFAULT_FPS: u32 = 30;

/// Frames between behavioral samples (~1 second at 30 fps).
pub const DEFAULT_BEHAVIORAL_INTERVAL: usize = 30;

/// Frames between vital samples (~2 seconds at 30 fps).
pub const DEFAULT_VITAL_INTERVAL: usize = 60;

/// Rolling vital estimates look back this many intervals.
pub const VITAL_WINDOW_INTERVALS: usize = 2;

/// ROI channel means at or below this are treated as unlit skin.
pub const ROI_BRIGHTNESS_FLOOR: f64 = 10.0;

/// A pixel block must hold more values than this to count as observed.
pub const MIN_ROI_VALUES: usize = 200;

pub const HEART_RATE_UNIT: &str = "BPM";
pub const BREATHING_RATE_UNIT: &str = "breaths/min";
pub const BLINK_RATE_UNIT: &str = "blinks/min";
pub const HEART_RATE_METHOD: &str = "CHROM rPPG";
