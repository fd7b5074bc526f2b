use ndarray::{ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use super::constants::MIN_ROI_VALUES;

/// Mean red, green and blue intensity of a skin region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// True when every channel is strictly brighter than `floor`.
    pub fn all_above(&self, floor: f64) -> bool {
        self.r > floor && self.g > floor && self.b > floor
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

/// A cropped skin region: contiguous RGB bytes in row-major order.
///
/// Only the per-channel means are ever read, so the patch is consumed as
/// soon as the frame's features are extracted.
#[derive(Clone, Debug)]
pub struct RoiPatch {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RoiPatch {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `None` when the buffer does not match the declared dimensions.
    pub fn as_ndarray(&self) -> Option<ArrayView3<'_, u8>> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, 3),
            &self.data,
        )
        .ok()
    }

    /// Per-channel means, or `None` for patches too small to trust.
    pub fn channel_means(&self) -> Option<Rgb> {
        if self.data.len() <= MIN_ROI_VALUES {
            return None;
        }
        let pixels = self.as_ndarray()?.mapv(f64::from);
        let means = pixels.mean_axis(Axis(0))?.mean_axis(Axis(0))?;
        Some(Rgb::new(means[0], means[1], means[2]))
    }
}

/// The skin sample attached to a frame.
#[derive(Clone, Debug)]
pub enum RoiSample {
    Patch(RoiPatch),
    Means(Rgb),
}

impl RoiSample {
    pub fn channel_means(&self) -> Option<Rgb> {
        let means = match self {
            RoiSample::Patch(patch) => patch.channel_means()?,
            RoiSample::Means(rgb) => *rgb,
        };
        means.is_finite().then_some(means)
    }
}
