use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::bounds::Tank;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterVertex {
    /// Rest position in the surface plane (world x, z).
    pub rest: Vec2,
    pub phase: f32,
    pub amp: f32,
    pub speed: f32,
    /// Current offset from the rest plane.
    pub height: f32,
}

/// The water surface as a regular grid of independently bobbing vertices.
#[derive(Clone, Debug, Default)]
pub struct WaterSurface {
    /// Quads per side; the grid has `(segments + 1)²` vertices.
    pub segments: usize,
    pub vertices: Vec<WaterVertex>,
}

impl WaterSurface {
    /// Lays out a `segments × segments` grid over the tank's footprint, each
    /// vertex with its own wave amplitude, speed and phase.
    pub fn new(segments: usize, tank: &Tank, rng: &mut impl Rng) -> Self {
        let size = Vec2::new(tank.half_extents.x, tank.half_extents.z) * 2.0;
        let origin = Vec2::new(tank.center.x, tank.center.z);
        let n = segments + 1;
        let mut vertices = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let u = col as f32 / segments as f32 - 0.5;
                let v = row as f32 / segments as f32 - 0.5;
                vertices.push(WaterVertex {
                    rest: origin + Vec2::new(u * size.x, v * size.y),
                    phase: rng.random_range(0.0..TAU),
                    amp: rng.random_range(0.05..0.1),
                    speed: rng.random_range(0.05..0.15),
                    height: 0.0,
                });
            }
        }
        Self { segments, vertices }
    }

    pub fn wave_phase(&mut self, time: f32) {
        for v in &mut self.vertices {
            v.height = v.amp * (time * v.speed + v.phase).sin();
        }
    }

    /// Vertex at grid coordinates `(row, col)`.
    #[inline]
    pub fn vertex(&self, row: usize, col: usize) -> &WaterVertex {
        &self.vertices[row * (self.segments + 1) + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankConfig;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn grid_covers_tank_footprint() {
        let tank = Tank::from_config(&TankConfig::default());
        let mut rng = StdRng::seed_from_u64(31);
        let water = WaterSurface::new(4, &tank, &mut rng);

        assert_eq!(water.vertices.len(), 25);
        assert_eq!(water.vertex(0, 0).rest, Vec2::new(-10.0, -7.5));
        assert_eq!(water.vertex(4, 4).rest, Vec2::new(10.0, 7.5));
        assert_eq!(water.vertex(2, 2).rest, Vec2::ZERO);
    }

    #[test]
    fn grid_follows_an_off_center_tank() {
        let cfg = TankConfig {
            center: glam::Vec3::new(4.0, -2.0, -3.0),
            ..TankConfig::default()
        };
        let tank = Tank::from_config(&cfg);
        let mut rng = StdRng::seed_from_u64(34);
        let water = WaterSurface::new(2, &tank, &mut rng);

        assert_eq!(water.vertex(1, 1).rest, Vec2::new(4.0, -3.0));
        assert_eq!(water.vertex(0, 0).rest, Vec2::new(tank.min().x, tank.min().z));
        assert_eq!(water.vertex(2, 2).rest, Vec2::new(tank.max().x, tank.max().z));
    }

    #[test]
    fn heights_stay_within_amplitude() {
        let tank = Tank::from_config(&TankConfig::default());
        let mut rng = StdRng::seed_from_u64(32);
        let mut water = WaterSurface::new(8, &tank, &mut rng);

        for step in 0..50 {
            water.wave_phase(step as f32 * 0.37);
            for v in &water.vertices {
                assert!(v.height.abs() <= v.amp + 1e-6);
            }
        }
    }

    #[test]
    fn height_follows_sine_of_phase() {
        let tank = Tank::from_config(&TankConfig::default());
        let mut rng = StdRng::seed_from_u64(33);
        let mut water = WaterSurface::new(1, &tank, &mut rng);
        water.vertices[0].phase = std::f32::consts::FRAC_PI_2;
        water.vertices[0].amp = 0.08;

        water.wave_phase(0.0);
        assert!((water.vertices[0].height - 0.08).abs() < 1e-6);
    }
}
