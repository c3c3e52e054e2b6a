//! Per-fish force computation.
//!
//! [`steer`] combines four influences into a desired velocity:
//! 1. [`seek_food`]: pull toward the nearest crumb, or eat it when close.
//! 2. [`hard_boundary`]: an escaped fish is clamped back through the glass
//!    and sent straight for the middle of the tank.
//! 3. [`soft_boundary`]: a spring pushing fish out of the margin band.
//! 4. [`peer_avoidance`]: push away from every fish that is too close.
//!
//! Everything here is read-only over the simulation state. The caller,
//! [`crate::phases::fish_phase`], applies the outcome.

use glam::Vec3;

use crate::{
    bounds::{Bounds, Tank},
    config::{FishConfig, FoodConfig},
    fish::School,
    food::FoodSet,
    types::{FishId, FoodId},
};

/// What the fish decided to do about food this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FoodDecision {
    /// No crumb within the attraction radius.
    None,
    /// Swimming toward a crumb; `influence` is 1 on top of it and 0 at the
    /// attraction radius.
    Attracted { id: FoodId, influence: f32 },
    /// Close enough to eat this crumb.
    Eat { id: FoodId },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Steering {
    /// Summed desired velocity, not yet renormalized.
    pub target: Vec3,
    pub swim_speed: f32,
    pub turn_rate: f32,
    pub food: FoodDecision,
    /// Set when the fish was outside the glass and has to be moved back.
    pub corrected_pos: Option<Vec3>,
}

/// Looks at the nearest crumb and returns the food decision together with
/// the speed and turn rate it implies.
///
/// The eat check comes before the attraction falloff, so a crumb at zero
/// distance is eaten and never divides anything.
pub fn seek_food(
    pos: Vec3,
    food: &FoodSet,
    fish_cfg: &FishConfig,
    food_cfg: &FoodConfig,
) -> (FoodDecision, Vec3, f32, f32) {
    let cruise = (FoodDecision::None, Vec3::ZERO, fish_cfg.speed, fish_cfg.turn_rate);

    let Some((id, dist)) = food.nearest(pos) else {
        return cruise;
    };
    if dist < food_cfg.eat_radius {
        return (FoodDecision::Eat { id }, Vec3::ZERO, fish_cfg.speed, fish_cfg.turn_rate);
    }
    if dist >= food_cfg.attraction_radius {
        return cruise;
    }

    let Some(crumb) = food.get(id) else {
        return cruise;
    };
    let influence = 1.0 - dist / food_cfg.attraction_radius;
    let pull = (crumb.pos - pos).normalize_or_zero() * influence * 2.0;
    let speed = lerp(fish_cfg.speed, fish_cfg.excited_speed, influence);
    let turn = lerp(fish_cfg.turn_rate, fish_cfg.excited_turn_rate, influence);

    (FoodDecision::Attracted { id, influence }, pull, speed, turn)
}

/// Returns the clamped position and the override velocity for a fish that
/// is strictly outside the glass, or `None` while it is inside.
pub fn hard_boundary(pos: Vec3, tank: &Tank, inset: f32, swim_speed: f32) -> Option<(Vec3, Vec3)> {
    if tank.contains(pos) {
        return None;
    }
    let clamped = tank.clamp_inside(pos, inset);
    let home = (-(clamped - tank.center) * 0.1).normalize_or_zero() * swim_speed;
    Some((clamped, home))
}

/// Spring force pushing `pos` back inside the margin box, axis by axis.
pub fn soft_boundary(pos: Vec3, bounds: &Bounds, force: f32) -> Vec3 {
    let lo = bounds.min();
    let hi = bounds.max();
    let mut push = Vec3::ZERO;
    for axis in 0..3 {
        if pos[axis] < lo[axis] {
            push[axis] = (lo[axis] - pos[axis]) * force;
        } else if pos[axis] > hi[axis] {
            push[axis] = (hi[axis] - pos[axis]) * force;
        }
    }
    push
}

/// Sum of unit vectors pointing away from every other fish within `radius`,
/// each scaled by `swim_speed * 0.5`.
///
/// Checks every pair; the school is small and fixed.
pub fn peer_avoidance(
    id: FishId,
    pos: Vec3,
    school: &School,
    radius: f32,
    swim_speed: f32,
) -> Vec3 {
    school
        .fish
        .iter()
        .filter(|other| other.id != id)
        .filter(|other| pos.distance(other.pos) < radius)
        .map(|other| (pos - other.pos).normalize_or_zero() * (swim_speed * 0.5))
        .sum()
}

/// Computes this tick's steering for fish `id`.
///
/// The target starts as the fish's current velocity and collects the food
/// pull, then the hard boundary may replace it outright, and the soft
/// boundary and peer terms are added on top.
pub fn steer(
    id: FishId,
    school: &School,
    food: &FoodSet,
    tank: &Tank,
    bounds: &Bounds,
    fish_cfg: &FishConfig,
    food_cfg: &FoodConfig,
) -> Steering {
    let me = &school.fish[id];
    let mut pos = me.pos;

    let (decision, pull, swim_speed, turn_rate) = seek_food(pos, food, fish_cfg, food_cfg);
    let mut target = me.vel + pull;

    let mut corrected_pos = None;
    if let Some((clamped, home)) = hard_boundary(pos, tank, fish_cfg.hard_inset, swim_speed) {
        pos = clamped;
        target = home;
        corrected_pos = Some(clamped);
    }

    target += soft_boundary(pos, bounds, fish_cfg.boundary_force);
    target += peer_avoidance(id, pos, school, fish_cfg.avoid_radius(), swim_speed);

    Steering {
        target,
        swim_speed,
        turn_rate,
        food: decision,
        corrected_pos,
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankConfig;

    struct Fixture {
        tank: Tank,
        bounds: Bounds,
        fish: FishConfig,
        food: FoodConfig,
    }

    fn fixture() -> Fixture {
        let tank_cfg = TankConfig::default();
        Fixture {
            tank: Tank::from_config(&tank_cfg),
            bounds: Bounds::from_config(&tank_cfg),
            fish: FishConfig::default(),
            food: FoodConfig::default(),
        }
    }

    #[test]
    fn seek_food_without_food_cruises() {
        let fx = fixture();
        let (d, pull, speed, turn) = seek_food(Vec3::ZERO, &FoodSet::new(), &fx.fish, &fx.food);
        assert_eq!(d, FoodDecision::None);
        assert_eq!(pull, Vec3::ZERO);
        assert_eq!(speed, fx.fish.speed);
        assert_eq!(turn, fx.fish.turn_rate);
    }

    #[test]
    fn seek_food_inside_eat_radius_eats() {
        let fx = fixture();
        let mut food = FoodSet::new();
        let id = food.insert_still(Vec3::new(0.1, 0.0, 0.0), 0.03);

        let (d, pull, speed, _) = seek_food(Vec3::ZERO, &food, &fx.fish, &fx.food);
        assert_eq!(d, FoodDecision::Eat { id });
        assert_eq!(pull, Vec3::ZERO);
        assert_eq!(speed, fx.fish.speed);
    }

    #[test]
    fn seek_food_at_zero_distance_eats() {
        let fx = fixture();
        let mut food = FoodSet::new();
        let id = food.insert_still(Vec3::ZERO, 0.03);
        let (d, ..) = seek_food(Vec3::ZERO, &food, &fx.fish, &fx.food);
        assert_eq!(d, FoodDecision::Eat { id });
    }

    #[test]
    fn seek_food_falls_off_linearly() {
        let fx = fixture();
        let mut food = FoodSet::new();
        let id = food.insert_still(Vec3::new(4.0, 0.0, 0.0), 0.03);

        let (d, pull, speed, turn) = seek_food(Vec3::ZERO, &food, &fx.fish, &fx.food);
        assert_eq!(d, FoodDecision::Attracted { id, influence: 0.5 });
        assert!(pull.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!((speed - 0.085).abs() < 1e-6);
        assert!((turn - 0.075).abs() < 1e-6);
    }

    #[test]
    fn seek_food_ignores_crumbs_beyond_radius() {
        let fx = fixture();
        let mut food = FoodSet::new();
        food.insert_still(Vec3::new(8.0, 0.0, 0.0), 0.03);
        let (d, ..) = seek_food(Vec3::ZERO, &food, &fx.fish, &fx.food);
        assert_eq!(d, FoodDecision::None);
    }

    #[test]
    fn hard_boundary_clamps_and_points_home() {
        let fx = fixture();
        let (p, home) = hard_boundary(Vec3::new(15.0, 0.0, 0.0), &fx.tank, 0.1, 0.05).unwrap();
        assert!((p.x - 9.9).abs() < 1e-6);
        assert!(fx.tank.contains(p));
        assert!((home.length() - 0.05).abs() < 1e-6);
        assert!(home.x < 0.0);
    }

    #[test]
    fn hard_boundary_ignores_margin_band() {
        let fx = fixture();
        assert!(hard_boundary(Vec3::new(9.5, 0.0, 0.0), &fx.tank, 0.1, 0.05).is_none());
    }

    #[test]
    fn soft_boundary_is_a_spring_per_axis() {
        let fx = fixture();
        let push = soft_boundary(Vec3::new(9.5, -6.0, 0.0), &fx.bounds, 2.0);
        assert!((push.x - -2.0).abs() < 1e-6);
        assert!((push.y - 1.0).abs() < 1e-6);
        assert_eq!(push.z, 0.0);
        assert_eq!(soft_boundary(Vec3::ZERO, &fx.bounds, 2.0), Vec3::ZERO);
    }

    #[test]
    fn peer_avoidance_pushes_apart_and_skips_self() {
        let school = School::from_states(
            vec![
                (Vec3::ZERO, Vec3::ZERO),
                (Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO),
                (Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO),
            ],
            0.5,
        );
        let push = peer_avoidance(0, Vec3::ZERO, &school, 1.5, 0.05);
        assert!(push.abs_diff_eq(Vec3::new(-0.025, 0.0, 0.0), 1e-7));
    }

    #[test]
    fn steer_hard_boundary_overrides_food_pull() {
        let fx = fixture();
        let school = School::from_states(vec![(Vec3::new(0.0, 10.0, 0.0), Vec3::X * 0.05)], 0.5);
        let mut food = FoodSet::new();
        food.insert_still(Vec3::new(4.0, 6.0, 0.0), 0.03);

        let s = steer(0, &school, &food, &fx.tank, &fx.bounds, &fx.fish, &fx.food);

        let p = s.corrected_pos.unwrap();
        assert!((p.y - (fx.tank.top() - 0.1)).abs() < 1e-6);
        // Straight down toward the centre plus the soft spring, no +X food pull.
        assert!(s.target.x.abs() < 1e-6);
        assert!(s.target.y < 0.0);
    }
}
