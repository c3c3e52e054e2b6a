//! Static geometry of the navigable water volume.
//!
//! Two boxes are derived from the [`TankConfig`] once at startup:
//! - [`Tank`]: the glass walls. A fish outside it has escaped and gets
//!   clamped back.
//! - [`Bounds`]: the walls inset by the boundary margin. Inside the margin
//!   band a spring force pushes fish back toward the interior.

use glam::Vec3;

use crate::config::TankConfig;

/// The outer (hard) envelope of the tank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tank {
    pub center: Vec3,
    pub half_extents: Vec3,
    surface_offset: f32,
}

impl Tank {
    pub fn from_config(cfg: &TankConfig) -> Self {
        Self {
            center: cfg.center,
            half_extents: Vec3::new(cfg.width, cfg.height, cfg.depth) * 0.5,
            surface_offset: cfg.surface_offset,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    /// Height of the resting water surface.
    #[inline]
    pub fn surface_y(&self) -> f32 {
        self.top() - self.surface_offset
    }

    /// `true` if `p` is on or inside the glass on every axis.
    pub fn contains(&self, p: Vec3) -> bool {
        let (lo, hi) = (self.min(), self.max());
        p.cmpge(lo).all() && p.cmple(hi).all()
    }

    /// Clamps `p` into the walls shrunk by `inset` on every side.
    pub fn clamp_inside(&self, p: Vec3, inset: f32) -> Vec3 {
        let inset = Vec3::splat(inset).min(self.half_extents);
        p.clamp(self.min() + inset, self.max() - inset)
    }

    /// Clamps only the horizontal coordinates, leaving `y` untouched.
    pub fn clamp_horizontal(&self, p: Vec3, inset: f32) -> Vec3 {
        let c = self.clamp_inside(p, inset);
        Vec3::new(c.x, p.y, c.z)
    }
}

/// The inner (soft) margin box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Bounds {
    pub fn new(tank: &Tank, margin: f32) -> Self {
        let lo = tank.min() + Vec3::splat(margin);
        let hi = tank.max() - Vec3::splat(margin);
        Self {
            x_min: lo.x,
            x_max: hi.x,
            y_min: lo.y,
            y_max: hi.y,
            z_min: lo.z,
            z_max: hi.z,
        }
    }

    pub fn from_config(cfg: &TankConfig) -> Self {
        Self::new(&Tank::from_config(cfg), cfg.boundary_margin)
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x_min, self.y_min, self.z_min)
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x_max, self.y_max, self.z_max)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min()).all() && p.cmple(self.max()).all()
    }
}
