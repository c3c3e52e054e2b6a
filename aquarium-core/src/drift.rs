use glam::{Quat, Vec3};
use rand::Rng;

use crate::bounds::Tank;

/// Particles bounce once they are this far out toward a wall, as a fraction
/// of the half extent.
pub const BOUNCE_FRACTION: f32 = 0.9;

/// A mote of floating debris.
#[derive(Clone, Debug, PartialEq)]
pub struct DriftParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub scale: f32,
    pub rotation: Quat,
    pub spin_axis: Vec3,
    pub spin_speed: f32,
}

#[derive(Clone, Debug, Default)]
pub struct DriftField {
    pub particles: Vec<DriftParticle>,
}

impl DriftField {
    pub fn random_in_tank(count: usize, tank: &Tank, rng: &mut impl Rng) -> Self {
        let spread = tank.half_extents * BOUNCE_FRACTION;
        let particles = (0..count)
            .map(|_| {
                let offset = Vec3::new(
                    rng.random_range(-spread.x..=spread.x),
                    rng.random_range(-spread.y..=spread.y),
                    rng.random_range(-spread.z..=spread.z),
                );
                let vel = Vec3::new(
                    rng.random_range(-0.005..=0.005),
                    rng.random_range(-0.0025..=0.0025),
                    rng.random_range(-0.005..=0.005),
                );
                let spin_axis = Vec3::new(
                    rng.random_range(-0.5..0.5),
                    rng.random_range(-0.5..0.5),
                    rng.random_range(-0.5..0.5),
                )
                .try_normalize()
                .unwrap_or(Vec3::Y);

                DriftParticle {
                    pos: tank.center + offset,
                    vel,
                    scale: rng.random_range(0.3..1.0),
                    rotation: Quat::IDENTITY,
                    spin_axis,
                    spin_speed: rng.random_range(0.0..0.02),
                }
            })
            .collect();

        Self { particles }
    }

    /// Drifts, spins and bounces every particle by one tick.
    ///
    /// Small particles slowly sink and large ones slowly rise. A velocity
    /// component flips sign whenever the particle is beyond
    /// [`BOUNCE_FRACTION`] of the tank's half extent on that axis.
    pub fn drift_phase(&mut self, tank: &Tank) {
        let limit = tank.half_extents * BOUNCE_FRACTION;
        for p in &mut self.particles {
            p.pos += p.vel;
            let spin = Quat::from_axis_angle(p.spin_axis, p.spin_speed);
            p.rotation = (p.rotation * spin).normalize();
            p.vel.y += if p.scale < 0.5 { -0.0001 } else { 0.0001 };

            let rel = p.pos - tank.center;
            for axis in 0..3 {
                if rel[axis].abs() > limit[axis] {
                    p.vel[axis] = -p.vel[axis];
                }
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankConfig;
    use rand::{SeedableRng, rngs::StdRng};

    fn particle(pos: Vec3, vel: Vec3, scale: f32) -> DriftParticle {
        DriftParticle {
            pos,
            vel,
            scale,
            rotation: Quat::IDENTITY,
            spin_axis: Vec3::Y,
            spin_speed: 0.01,
        }
    }

    #[test]
    fn particles_spawn_inside_bounce_zone() {
        let tank = Tank::from_config(&TankConfig::default());
        let mut rng = StdRng::seed_from_u64(21);
        let field = DriftField::random_in_tank(200, &tank, &mut rng);
        let limit = tank.half_extents * BOUNCE_FRACTION;
        for p in &field.particles {
            let rel = (p.pos - tank.center).abs();
            assert!(rel.cmple(limit + Vec3::splat(1e-5)).all());
            assert!((p.spin_axis.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn buoyancy_depends_on_scale() {
        let tank = Tank::from_config(&TankConfig::default());
        let mut field = DriftField {
            particles: vec![
                particle(tank.center, Vec3::ZERO, 0.3),
                particle(tank.center, Vec3::ZERO, 0.8),
            ],
        };
        field.drift_phase(&tank);
        assert!(field.particles[0].vel.y < 0.0);
        assert!(field.particles[1].vel.y > 0.0);
    }

    #[test]
    fn velocity_reflects_past_bounce_threshold() {
        let tank = Tank::from_config(&TankConfig::default());
        let edge_x = tank.center.x + tank.half_extents.x * BOUNCE_FRACTION;
        let mut field = DriftField {
            particles: vec![particle(
                Vec3::new(edge_x, tank.center.y, 0.0),
                Vec3::new(0.004, 0.0, 0.003),
                0.8,
            )],
        };

        field.drift_phase(&tank);

        let p = &field.particles[0];
        assert_eq!(p.vel.x, -0.004);
        // z is nowhere near its wall, so it keeps going.
        assert_eq!(p.vel.z, 0.003);
    }

    #[test]
    fn spin_accumulates_rotation() {
        let tank = Tank::from_config(&TankConfig::default());
        let mut field = DriftField {
            particles: vec![particle(tank.center, Vec3::ZERO, 0.8)],
        };
        for _ in 0..10 {
            field.drift_phase(&tank);
        }
        let (_, angle) = field.particles[0].rotation.to_axis_angle();
        assert!((angle - 0.1).abs() < 1e-4);
    }
}
