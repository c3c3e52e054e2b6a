//! Cosmetic light: spotlight beams, the dust floating in them, and the
//! caustic pattern on the sand. All of it is a pure function of time plus
//! fixed per-instance offsets.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::bounds::Tank;

pub const CAUSTIC_FRAMES: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeamMedium {
    Air,
    Water,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    pub medium: BeamMedium,
    /// Position in the global animation order; drives the pulse phase.
    pub index: usize,
    pub opacity: f32,
    /// Horizontal scale of the cone.
    pub breathe: f32,
}

impl Beam {
    fn animate(&mut self, time: f32) {
        let pulse_speed = 0.2 + (self.index % 3) as f32 * 0.1;
        let wave = (time * pulse_speed).sin();
        self.opacity = match self.medium {
            BeamMedium::Air => 0.2 + wave * 0.05,
            BeamMedium::Water => 0.3 + wave * 0.08,
        };
        self.breathe = 0.98 + (time * 0.4 + self.index as f32 * 0.7).sin() * 0.02;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamParticle {
    pub pos: Vec3,
    pub rest_y: f32,
    pub float_speed: f32,
    pub float_range: f32,
    pub phase: f32,
    pub opacity: f32,
}

impl BeamParticle {
    fn animate(&mut self, time: f32) {
        self.pos.y = self.rest_y + (time * self.float_speed + self.phase).sin() * self.float_range;
        self.pos.x += (time * 0.2 + self.phase).sin() * 0.001;
        self.pos.z += (time * 0.3 + self.phase * 2.0).cos() * 0.001;
        self.opacity = 0.5 + (time + self.phase).sin() * 0.2;
    }
}

/// One ceiling spotlight: an air beam down to the surface, a water beam
/// through the tank, and the dust inside them.
#[derive(Clone, Debug)]
pub struct Spotlight {
    pub x: f32,
    pub air: Beam,
    pub water: Beam,
    pub particles: Vec<BeamParticle>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Caustics {
    pub frame: usize,
    pub rotation_a: f32,
    pub rotation_b: f32,
}

impl Caustics {
    fn animate(&mut self, time: f32) {
        self.frame = ((time * 10.0).floor().max(0.0) as usize) % CAUSTIC_FRAMES;
        self.rotation_a = time * 0.05;
        self.rotation_b = -time * 0.03;
    }
}

#[derive(Clone, Debug, Default)]
pub struct LightRig {
    pub spotlights: Vec<Spotlight>,
    pub caustics: Caustics,
}

impl LightRig {
    /// Spreads `count` spotlights evenly across the tank width (three land
    /// at `-W/4`, `0`, `W/4`). `ceiling_gap` is the height of the air beam
    /// above the tank top.
    pub fn new(
        count: usize,
        particles_per_light: usize,
        ceiling_gap: f32,
        tank: &Tank,
        rng: &mut impl Rng,
    ) -> Self {
        let width = tank.half_extents.x * 2.0;
        let step = if count > 1 { width * 0.5 / (count - 1) as f32 } else { 0.0 };
        let first = tank.center.x - step * (count.saturating_sub(1)) as f32 * 0.5;

        let spotlights = (0..count)
            .map(|k| {
                let x = first + step * k as f32;
                let beam = |medium, index| Beam {
                    medium,
                    index,
                    opacity: 0.0,
                    breathe: 1.0,
                };
                let particles = (0..particles_per_light)
                    .map(|_| Self::random_particle(x, ceiling_gap, tank, rng))
                    .collect();
                Spotlight {
                    x,
                    air: beam(BeamMedium::Air, 3 * k),
                    water: beam(BeamMedium::Water, 3 * k + 1),
                    particles,
                }
            })
            .collect();

        Self {
            spotlights,
            caustics: Caustics::default(),
        }
    }

    fn random_particle(x: f32, ceiling_gap: f32, tank: &Tank, rng: &mut impl Rng) -> BeamParticle {
        // Most of the dust sits in the water, where the beam is wider.
        let in_water = rng.random_bool(0.7);
        let (y, radius) = if in_water {
            (
                tank.top() - rng.random_range(0.0..tank.half_extents.y * 2.0),
                rng.random_range(0.7..1.2),
            )
        } else {
            (
                tank.top() + rng.random_range(0.0..ceiling_gap.max(f32::EPSILON)),
                rng.random_range(0.2..0.5),
            )
        };
        let angle = rng.random_range(0.0..TAU);
        let r = radius * rng.random_range(0.0..1.0);
        BeamParticle {
            pos: Vec3::new(x + angle.cos() * r, y, tank.center.z + angle.sin() * r),
            rest_y: y,
            float_speed: rng.random_range(0.01..0.03),
            float_range: rng.random_range(0.1..0.3),
            phase: rng.random_range(0.0..TAU),
            opacity: 0.7,
        }
    }

    pub fn light_phase(&mut self, time: f32) {
        self.caustics.animate(time);
        for s in &mut self.spotlights {
            s.air.animate(time);
            s.water.animate(time);
            for p in &mut s.particles {
                p.animate(time);
            }
        }
    }
}
