use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::{
    bounds::Bounds,
    config::FishConfig,
    kinematics::{FinPose, FinState},
    types::FishId,
};

#[derive(Clone, Debug)]
pub struct Fish {
    pub id: FishId,
    pub pos: Vec3,
    pub vel: Vec3,
    pub size: f32,
    /// Swim speed selected by the last tick's steering.
    pub speed: f32,
    /// Rotation taking the model's forward axis (+X) onto the swim direction.
    pub heading: Quat,
    pub fins: FinState,
    pub fin_pose: FinPose,
}

impl Fish {
    pub fn new(id: FishId, pos: Vec3, vel: Vec3, size: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            speed: vel.length(),
            heading: Quat::IDENTITY,
            fins: FinState::default(),
            fin_pose: FinPose::default(),
        }
    }

    /// The direction the fish's body currently points at.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.heading * Vec3::X
    }
}

#[derive(Clone, Debug, Default)]
pub struct School {
    pub fish: Vec<Fish>,
}

impl School {
    /// Builds a school from explicit `(position, velocity)` pairs, all at the
    /// nominal body size.
    pub fn from_states(states: Vec<(Vec3, Vec3)>, size: f32) -> Self {
        let fish = states
            .into_iter()
            .enumerate()
            .map(|(id, (pos, vel))| Fish::new(id, pos, vel, size))
            .collect();

        Self { fish }
    }

    /// Scatters `cfg.count` fish uniformly inside `bounds`, each swimming in
    /// a random direction at cruising speed.
    pub fn random_in_bounds(cfg: &FishConfig, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let fish = (0..cfg.count)
            .map(|id| {
                let pos = Vec3::new(
                    rng.random_range(bounds.x_min..=bounds.x_max),
                    rng.random_range(bounds.y_min..=bounds.y_max),
                    rng.random_range(bounds.z_min..=bounds.z_max),
                );
                let dir = Vec3::new(
                    rng.random_range(-0.5..=0.5),
                    rng.random_range(-0.5..=0.5),
                    rng.random_range(-0.5..=0.5),
                )
                .try_normalize()
                .unwrap_or(Vec3::X);
                let size = cfg.size * rng.random_range(0.8..1.3);

                let mut f = Fish::new(id, pos, dir * cfg.speed, size);
                f.fins.tail_phase = rng.random_range(0.0..TAU);
                f
            })
            .collect();

        Self { fish }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankConfig;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn random_school_starts_inside_bounds_at_cruising_speed() {
        let cfg = FishConfig::default();
        let bounds = Bounds::from_config(&TankConfig::default());
        let mut rng = StdRng::seed_from_u64(7);

        let school = School::random_in_bounds(&cfg, &bounds, &mut rng);

        assert_eq!(school.len(), cfg.count);
        for (i, f) in school.fish.iter().enumerate() {
            assert_eq!(f.id, i);
            assert!(bounds.contains(f.pos), "fish {i} spawned at {:?}", f.pos);
            assert!((f.vel.length() - cfg.speed).abs() < 1e-6);
            assert!(f.size >= cfg.size * 0.8 && f.size < cfg.size * 1.3);
        }
    }

    #[test]
    fn from_states_assigns_sequential_ids() {
        let school = School::from_states(
            vec![(Vec3::ZERO, Vec3::X), (Vec3::ONE, Vec3::Y)],
            0.5,
        );
        assert_eq!(school.fish[0].id, 0);
        assert_eq!(school.fish[1].id, 1);
        assert_eq!(school.fish[1].pos, Vec3::ONE);
    }

    #[test]
    fn forward_follows_heading() {
        let mut f = Fish::new(0, Vec3::ZERO, Vec3::ZERO, 0.5);
        assert_eq!(f.forward(), Vec3::X);

        f.heading = Quat::from_rotation_arc(Vec3::X, Vec3::Z);
        assert!(f.forward().abs_diff_eq(Vec3::Z, 1e-6));
    }
}
