//! Orbit camera and the perspective math for drawing a 3-D tank with
//! egui's 2-D painter.
//!
//! The camera circles `target` on a sphere described by `yaw`, `pitch`
//! and `distance`. Drags and scrolls do not move it directly: they feed
//! angular velocities that [`OrbitCamera::update`] bleeds off a little every
//! frame, so motion glides to a stop.

use glam::{Vec2, Vec3};

pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 120.0;
/// Fraction of the pending rotation applied (and removed) per frame.
pub const DAMPING: f32 = 0.05;
/// Just short of straight up or down, where the view basis degenerates.
const MAX_PITCH: f32 = 1.55;
const NEAR: f32 = 0.1;
/// Radians of rotation per pixel dragged.
const DRAG_SPEED: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Rotation still to be applied, as `(yaw, pitch)`.
    pending: Vec2,
}

/// Orthonormal view basis plus the eye position.
struct View {
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl OrbitCamera {
    /// A camera looking at `target` from `eye`.
    pub fn looking_at(eye: Vec3, target: Vec3, fov_y: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let horizontal = Vec2::new(offset.x, offset.z).length();

        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: offset.y.atan2(horizontal).clamp(-MAX_PITCH, MAX_PITCH),
            distance,
            fov_y,
            pending: Vec2::ZERO,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    fn view(&self) -> View {
        let eye = self.eye();
        let forward = (self.target - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        View {
            eye,
            forward,
            right,
            up,
        }
    }

    /// Queues a rotation from a pointer drag, in screen pixels.
    pub fn orbit(&mut self, drag: egui::Vec2) {
        self.pending.x -= drag.x * DRAG_SPEED;
        self.pending.y += drag.y * DRAG_SPEED;
    }

    /// Scroll up moves closer. The distance stays within
    /// [`MIN_DISTANCE`, `MAX_DISTANCE`].
    pub fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * 0.001).clamp(0.5, 2.0);
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Applies one frame of the queued rotation.
    ///
    /// ### Returns
    /// `true` while there is still visible motion left, so the caller knows
    /// to keep repainting.
    pub fn update(&mut self) -> bool {
        let step = self.pending * DAMPING;
        self.yaw += step.x;
        self.pitch = (self.pitch + step.y).clamp(-MAX_PITCH, MAX_PITCH);
        self.pending -= step;
        self.pending.length_squared() > 1e-8
    }

    fn focal(&self) -> f32 {
        1.0 / (self.fov_y * 0.5).tan()
    }

    /// Projects a world point into `rect`, or `None` if it is behind the
    /// near plane.
    pub fn project(&self, p: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let view = self.view();
        let v = p - view.eye;
        let depth = v.dot(view.forward);
        if depth <= NEAR {
            return None;
        }

        let f = self.focal();
        let aspect = rect.width() / rect.height().max(1.0);
        let ndc_x = v.dot(view.right) * f / (depth * aspect);
        let ndc_y = v.dot(view.up) * f / depth;

        let c = rect.center();
        Some(egui::pos2(
            c.x + ndc_x * rect.width() * 0.5,
            c.y - ndc_y * rect.height() * 0.5,
        ))
    }

    /// World-space ray through a screen point, as `(origin, unit direction)`.
    pub fn screen_ray(&self, screen: egui::Pos2, rect: egui::Rect) -> (Vec3, Vec3) {
        let view = self.view();
        let c = rect.center();
        let ndc_x = (screen.x - c.x) / (rect.width() * 0.5);
        let ndc_y = -(screen.y - c.y) / (rect.height() * 0.5);

        let f = self.focal();
        let aspect = rect.width() / rect.height().max(1.0);
        let dir = view.forward + view.right * (ndc_x * aspect / f) + view.up * (ndc_y / f);
        (view.eye, dir.normalize_or_zero())
    }

    /// Where the ray through `screen` crosses the horizontal plane at
    /// height `y`, if it does so in front of the camera.
    pub fn pick_on_plane(&self, screen: egui::Pos2, rect: egui::Rect, y: f32) -> Option<Vec3> {
        let (origin, dir) = self.screen_ray(screen, rect);
        intersect_horizontal(origin, dir, y)
    }
}

fn intersect_horizontal(origin: Vec3, dir: Vec3, y: f32) -> Option<Vec3> {
    if dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (y - origin.y) / dir.y;
    (t > 0.0).then(|| origin + dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::looking_at(
            Vec3::new(0.0, 5.0, 37.5),
            Vec3::new(0.0, -2.0, 0.0),
            75f32.to_radians(),
        )
    }

    #[test]
    fn looking_at_reproduces_eye() {
        let cam = camera();
        assert!(cam.eye().abs_diff_eq(Vec3::new(0.0, 5.0, 37.5), 1e-3));
    }

    #[test]
    fn target_projects_to_rect_center() {
        let cam = camera();
        let rect = test_rect();
        let p = cam.project(cam.target, rect).unwrap();
        assert!((p - rect.center()).length() < 1e-3);
    }

    #[test]
    fn project_then_pick_is_roundtrip() {
        let cam = camera();
        let rect = test_rect();
        let plane_y = 2.95;

        for world in [
            Vec3::new(0.0, plane_y, 0.0),
            Vec3::new(6.0, plane_y, -4.0),
            Vec3::new(-8.5, plane_y, 5.0),
        ] {
            let screen = cam.project(world, rect).unwrap();
            let back = cam.pick_on_plane(screen, rect, plane_y).unwrap();
            assert!(back.abs_diff_eq(world, 1e-2), "world={world:?}, back={back:?}");
        }
    }

    #[test]
    fn points_behind_the_camera_are_not_projected() {
        let cam = camera();
        let behind = cam.eye() + (cam.eye() - cam.target);
        assert!(cam.project(behind, test_rect()).is_none());
    }

    #[test]
    fn ray_parallel_to_plane_misses() {
        assert!(intersect_horizontal(Vec3::ZERO, Vec3::X, 1.0).is_none());
        assert!(intersect_horizontal(Vec3::ZERO, Vec3::Y, -1.0).is_none());
        assert_eq!(intersect_horizontal(Vec3::ZERO, Vec3::Y, 2.0), Some(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.zoom(1000.0);
        }
        assert_eq!(cam.distance, MIN_DISTANCE);
        for _ in 0..100 {
            cam.zoom(-1000.0);
        }
        assert_eq!(cam.distance, MAX_DISTANCE);
    }

    #[test]
    fn orbit_glides_to_a_stop() {
        let mut cam = camera();
        let yaw0 = cam.yaw;
        cam.orbit(egui::vec2(-100.0, 0.0));

        assert!(cam.update());
        let first = cam.yaw - yaw0;
        assert!((first - 1.0 * DAMPING).abs() < 1e-6);

        let mut frames = 1;
        while cam.update() {
            frames += 1;
            assert!(frames < 10_000);
        }
        // The whole queued rotation is applied in the limit.
        assert!((cam.yaw - yaw0 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn pitch_never_flips_over_the_pole() {
        let mut cam = camera();
        cam.orbit(egui::vec2(0.0, 10_000.0));
        for _ in 0..1000 {
            cam.update();
        }
        assert!(cam.pitch <= MAX_PITCH);
    }
}
