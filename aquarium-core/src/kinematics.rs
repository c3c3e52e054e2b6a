//! Turning a steering target into motion.
//!
//! Velocity smoothing is the only source of turning inertia: the fish's
//! velocity is blended toward the steering target by the tick's turn rate
//! and snapped back to the tick's swim speed. There is no separate angular
//! velocity.

use glam::{Quat, Vec3};

use crate::bounds::Tank;

/// Velocities at or below this squared length have no usable direction.
pub const MIN_HEADING_SPEED_SQ: f32 = 1e-8;

/// Blends `vel` toward `target` and renormalizes to `speed`.
///
/// `target` is first rescaled to `speed`. When it has no direction the
/// current velocity is kept, and when that has none either `forward` is
/// used, so the result always has length `speed`.
pub fn smooth_velocity(
    vel: Vec3,
    target: Vec3,
    speed: f32,
    turn_rate: f32,
    forward: Vec3,
) -> Vec3 {
    let fallback = vel
        .try_normalize()
        .or_else(|| forward.try_normalize())
        .unwrap_or(Vec3::X);
    let target_dir = target.try_normalize().unwrap_or(fallback);

    let blended = vel.lerp(target_dir * speed, turn_rate);
    blended.try_normalize().unwrap_or(target_dir) * speed
}

/// One explicit Euler step of one frame, followed by containment.
///
/// The step is taken after steering already pointed an escaped fish back
/// inward, so clamping to the walls here only trims the overshoot of a fish
/// that was still turning.
pub fn integrate(pos: Vec3, vel: Vec3, tank: &Tank) -> Vec3 {
    tank.clamp_inside(pos + vel, 0.0)
}

/// The body rotation for a fish moving along `vel`.
///
/// The model's forward axis (+X) is aligned with the swim direction, then
/// the body is tilted about its own Z axis by the vertical component of the
/// direction, limited to `max_tilt`, so fish bank while climbing or diving.
///
/// Returns `None` for a degenerate velocity; the caller keeps the previous
/// heading.
pub fn orientation(vel: Vec3, max_tilt: f32) -> Option<Quat> {
    if vel.length_squared() <= MIN_HEADING_SPEED_SQ {
        return None;
    }
    let dir = vel.normalize();
    let tilt = dir.y.clamp(-max_tilt, max_tilt);
    Some(Quat::from_rotation_arc(Vec3::X, dir) * Quat::from_rotation_z(-tilt))
}

/// Oscillator state of a fish's tail and side fins. Visual only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinState {
    /// Fixed per-fish offset of the tail swish.
    pub tail_phase: f32,
    /// Seconds of animation accumulated by `frame_dt` steps.
    pub animation_time: f32,
}

/// Where the renderer should put a fish's moving parts this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinPose {
    /// Lateral tail offset per unit of distance from the body axis.
    pub tail_swish: f32,
    pub left_fin_yaw: f32,
    pub right_fin_yaw: f32,
}

impl FinState {
    pub fn advance(&mut self, time: f32, frame_dt: f32) -> FinPose {
        use std::f32::consts::FRAC_PI_2;

        self.animation_time += frame_dt;
        let fin = (time * 5.0 + self.animation_time).sin() * 0.1;
        FinPose {
            tail_swish: (time * 10.0 + self.tail_phase).sin() * 0.2,
            left_fin_yaw: FRAC_PI_2 + fin,
            right_fin_yaw: -FRAC_PI_2 - fin,
        }
    }
}
