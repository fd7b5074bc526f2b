pub mod constants;
pub mod point;
pub mod roi_patch;
pub mod rounding;
