//! Head orientation from six face landmarks by fitting a generic 3D face
//! model through a pinhole camera (perspective-n-point).
//!
//! The pose is refined with Levenberg-Marquardt over a rotation vector and
//! a translation, starting from a face looking straight into the camera at
//! the depth implied by the eye span. Rotation vectors are applied on top
//! of the frontal pose, so the solved rotation is the head's rotation away
//! from frontal in camera axes (x right, y down, z forward).

use nalgebra::{Rotation3, SMatrix, SVector, Vector3};
use serde::Serialize;

use super::estimate::Estimate;
use crate::shared::point::Point2;
use crate::shared::rounding::round_to;

/// Generic face in model units: nose tip, chin, left and right eye outer
/// corners, left and right mouth corners. `y` up, `z` toward the viewer.
pub const MODEL_POINTS: [[f64; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [0.0, -330.0, -65.0],
    [-225.0, 170.0, -135.0],
    [225.0, 170.0, -135.0],
    [-150.0, -150.0, -125.0],
    [150.0, -150.0, -125.0],
];

const MODEL_EYE_SPAN: f64 = 450.0;
const MIN_EYE_SPAN_PX: f64 = 1.0;
const MIN_DEPTH: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;
const MAX_DAMPING_STEPS: usize = 10;
/// Accepted RMS reprojection error as a fraction of the eye span.
const MAX_RMS_EYE_FRACTION: f64 = 0.25;

type Params = SVector<f64, 6>;
type Residuals = SVector<f64, 12>;
type Jacobian = SMatrix<f64, 12, 6>;

/// Head rotation in degrees relative to facing the camera.
///
/// Positive pitch lifts the chin, positive yaw turns toward the image's
/// right edge, positive roll tilts clockwise as seen in the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeadAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

#[derive(Clone, Copy, Debug)]
struct Camera {
    focal: f64,
    cx: f64,
    cy: f64,
}

impl Camera {
    /// Focal length equal to the image width, principal point at the centre.
    fn for_image(width: u32, height: u32) -> Self {
        Self {
            focal: f64::from(width),
            cx: f64::from(width) / 2.0,
            cy: f64::from(height) / 2.0,
        }
    }
}

struct Observation<'a> {
    points: &'a [Point2; 6],
    camera: Camera,
}

impl Observation<'_> {
    fn residuals(&self, params: &Params) -> Option<Residuals> {
        let rotation = rotation_of(params);
        let translation = Vector3::new(params[3], params[4], params[5]);
        let mut out = Residuals::zeros();
        for (i, (model, seen)) in MODEL_POINTS.iter().zip(self.points).enumerate() {
            let p = rotation * Vector3::new(model[0], model[1], model[2]) + translation;
            if p.z <= MIN_DEPTH {
                return None;
            }
            out[2 * i] = self.camera.focal * p.x / p.z + self.camera.cx - seen.x;
            out[2 * i + 1] = self.camera.focal * p.y / p.z + self.camera.cy - seen.y;
        }
        Some(out)
    }

    fn jacobian(&self, params: &Params) -> Option<Jacobian> {
        let mut jacobian = Jacobian::zeros();
        for k in 0..6 {
            let step = if k < 3 {
                1e-6
            } else {
                1e-6 * params[k].abs().max(1.0)
            };
            let mut plus = *params;
            plus[k] += step;
            let mut minus = *params;
            minus[k] -= step;
            let column = (self.residuals(&plus)? - self.residuals(&minus)?) / (2.0 * step);
            jacobian.set_column(k, &column);
        }
        Some(jacobian)
    }
}

/// The model as seen by a camera it faces: a half turn about x.
fn frontal() -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
}

fn rotation_of(params: &Params) -> Rotation3<f64> {
    Rotation3::new(Vector3::new(params[0], params[1], params[2])) * frontal()
}

#[derive(Clone, Debug, Default)]
pub struct HeadPoseEstimator;

impl HeadPoseEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Solves for the head pose given the six landmarks in pixels, ordered
    /// like [`MODEL_POINTS`].
    pub fn estimate(&self, points: &[Point2; 6], width: u32, height: u32) -> Estimate<HeadAngles> {
        if width == 0 || height == 0 || points.iter().any(|p| !p.is_finite()) {
            return Estimate::NotDetected;
        }
        let eye_span = points[2].distance(&points[3]);
        if eye_span < MIN_EYE_SPAN_PX {
            return Estimate::NotDetected;
        }

        let observation = Observation {
            points,
            camera: Camera::for_image(width, height),
        };
        let Some((params, rms)) = solve(&observation, initial_guess(&observation, eye_span)) else {
            log::debug!("Head pose solver failed");
            return Estimate::NotDetected;
        };
        if !rms.is_finite() || rms > MAX_RMS_EYE_FRACTION * eye_span {
            log::debug!("Head pose rejected: reprojection error {rms:.1}px");
            return Estimate::NotDetected;
        }

        let (about_x, about_y, about_z) =
            Rotation3::new(Vector3::new(params[0], params[1], params[2])).euler_angles();
        let angles = HeadAngles {
            pitch: round_to(-about_x.to_degrees(), 1),
            yaw: round_to(-about_y.to_degrees(), 1),
            roll: round_to(about_z.to_degrees(), 1),
        };
        if angles.pitch.is_finite() && angles.yaw.is_finite() && angles.roll.is_finite() {
            Estimate::Detected(angles)
        } else {
            Estimate::NotDetected
        }
    }
}

/// Frontal pose at the depth that reproduces the observed eye span, with
/// the nose on its observed pixel.
fn initial_guess(observation: &Observation<'_>, eye_span: f64) -> Params {
    let camera = observation.camera;
    let nose = observation.points[0];
    let depth = camera.focal * MODEL_EYE_SPAN / eye_span;
    Params::new(
        0.0,
        0.0,
        0.0,
        (nose.x - camera.cx) * depth / camera.focal,
        (nose.y - camera.cy) * depth / camera.focal,
        depth,
    )
}

/// Levenberg-Marquardt; returns the parameters and RMS pixel error.
fn solve(observation: &Observation<'_>, initial: Params) -> Option<(Params, f64)> {
    let mut params = initial;
    let mut residuals = observation.residuals(&params)?;
    let mut cost = residuals.norm_squared();
    let mut lambda = 1e-3;

    for _ in 0..MAX_ITERATIONS {
        let jacobian = observation.jacobian(&params)?;
        let jt = jacobian.transpose();
        let jtj = jt * jacobian;
        let gradient = jt * residuals;

        let mut accepted: Option<f64> = None;
        for _ in 0..MAX_DAMPING_STEPS {
            let mut damped = jtj;
            for k in 0..6 {
                damped[(k, k)] += lambda * jtj[(k, k)].max(1e-9);
            }
            if let Some(delta) = damped.lu().solve(&(-gradient)) {
                let candidate = params + delta;
                if let Some(next) = observation.residuals(&candidate) {
                    let next_cost = next.norm_squared();
                    if next_cost < cost {
                        params = candidate;
                        residuals = next;
                        cost = next_cost;
                        lambda = (lambda / 10.0).max(1e-12);
                        accepted = Some(delta.norm());
                        break;
                    }
                }
            }
            lambda *= 10.0;
        }

        match accepted {
            Some(step) if step > 1e-10 * (params.norm() + 1e-10) => {}
            _ => break,
        }
    }

    Some((params, (cost / MODEL_POINTS.len() as f64).sqrt()))
}
