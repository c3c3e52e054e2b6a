//! Food crumbs: spawning, sinking and consumption.
//!
//! The active collection in [`FoodSet`] is the single source of truth for
//! which crumbs exist. A crumb that is eaten or hits the floor is removed
//! from it; nothing else keeps a reference, so a [`FoodId`] that is gone
//! from the set is gone for good.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::{bounds::Tank, config::FoodConfig, types::FoodId};

#[derive(Clone, Debug, PartialEq)]
pub struct Food {
    pub id: FoodId,
    pub pos: Vec3,
    pub sink_speed: f32,
    pub wobble_phase: f32,
    pub wobble_freq: f32,
    pub wobble_amp: f32,
    pub scale: f32,
    /// Euler angles, cosmetic only.
    pub rotation: Vec3,
}

impl Food {
    /// One tick of sinking plus sideways wobble.
    fn advance(&mut self, time: f32) {
        let angle = time * self.wobble_freq + self.wobble_phase;
        self.pos.y -= self.sink_speed;
        self.pos.x += angle.sin() * self.wobble_amp;
        self.pos.z += angle.cos() * self.wobble_amp;

        self.rotation.x += 0.01;
        self.rotation.z += 0.005;
    }
}

#[derive(Clone, Debug, Default)]
pub struct FoodSet {
    pub items: Vec<Food>,
    next_id: u64,
}

impl FoodSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> FoodId {
        let id = FoodId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds a crumb at `pos` that sinks at `sink_speed` without wobbling.
    pub fn insert_still(&mut self, pos: Vec3, sink_speed: f32) -> FoodId {
        let id = self.alloc_id();
        self.items.push(Food {
            id,
            pos,
            sink_speed,
            wobble_phase: 0.0,
            wobble_freq: 0.0,
            wobble_amp: 0.0,
            scale: 1.0,
            rotation: Vec3::ZERO,
        });
        id
    }

    /// Drops `count` crumbs around `target`.
    ///
    /// `target` is clamped horizontally to `cfg.drop_inset` inside the side
    /// walls; its height is ignored and every crumb starts just below the
    /// top of the tank. Each crumb gets its own sink speed and wobble.
    ///
    /// ### Returns
    /// The surface point above every new crumb, in spawn order, so the
    /// caller can start a splash ring there.
    pub fn drop_batch(
        &mut self,
        target: Vec3,
        count: usize,
        tank: &Tank,
        cfg: &FoodConfig,
        rng: &mut impl Rng,
    ) -> Vec<Vec3> {
        let target = tank.clamp_horizontal(target, cfg.drop_inset);
        let spawn_y = tank.top() - cfg.spawn_depth;
        let jitter = cfg.drop_jitter;

        let mut splashes = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = Vec3::new(
                target.x + rng.random_range(-jitter..=jitter),
                spawn_y,
                target.z + rng.random_range(-jitter..=jitter),
            );
            let id = self.alloc_id();
            self.items.push(Food {
                id,
                pos,
                sink_speed: cfg.sink_speed * rng.random_range(0.7..1.3),
                wobble_phase: rng.random_range(0.0..TAU),
                wobble_freq: rng.random_range(0.5..2.0),
                wobble_amp: rng.random_range(0.01..0.03),
                scale: rng.random_range(0.7..1.3),
                rotation: Vec3::new(
                    rng.random_range(0.0..TAU),
                    rng.random_range(0.0..TAU),
                    rng.random_range(0.0..TAU),
                ),
            });
            splashes.push(Vec3::new(pos.x, tank.surface_y(), pos.z));
        }
        splashes
    }

    /// Sinks every crumb by one tick and removes the ones that reached the
    /// floor threshold (`tank.bottom() + cfg.floor_offset`).
    ///
    /// Removal goes through [`Vec::retain`], so the survivors keep their
    /// relative order and none is skipped.
    ///
    /// ### Returns
    /// How many crumbs were removed.
    pub fn sink_phase(&mut self, time: f32, tank: &Tank, cfg: &FoodConfig) -> usize {
        let floor = tank.bottom() + cfg.floor_offset;
        let before = self.items.len();
        self.items.retain_mut(|f| {
            f.advance(time);
            f.pos.y >= floor
        });
        before - self.items.len()
    }

    /// Finds the crumb closest to `pos`.
    ///
    /// Ties go to the crumb that comes first in the collection: a later
    /// crumb has to be strictly closer to replace the current best.
    pub fn nearest(&self, pos: Vec3) -> Option<(FoodId, f32)> {
        let mut best = None;
        let mut best_d = f32::INFINITY;
        for f in &self.items {
            let d = f.pos.distance(pos);
            if d < best_d {
                best_d = d;
                best = Some(f.id);
            }
        }
        best.map(|id| (id, best_d))
    }

    pub fn get(&self, id: FoodId) -> Option<&Food> {
        self.items.iter().find(|f| f.id == id)
    }

    /// Removes the crumb with the given id, if it is still active.
    pub fn take(&mut self, id: FoodId) -> Option<Food> {
        let idx = self.items.iter().position(|f| f.id == id)?;
        Some(self.items.remove(idx))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
