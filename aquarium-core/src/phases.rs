//! The per-frame simulation phases.
//!
//! A tick runs them in a fixed order:
//! 1. [`splash_phase`]: splash rings grow and fade.
//! 2. [`food_phase`]: crumbs sink and wobble; crumbs on the floor vanish.
//! 3. [`water_phase`]: surface vertices bob.
//! 4. [`light_phase`]: beams pulse, beam dust floats, caustics turn.
//! 5. [`bubble_phase`]: bubbles rise and recycle.
//! 6. [`drift_phase`]: debris drifts and bounces.
//! 7. [`fish_phase`]: steering, eating, integration and orientation.
//!
//! Each phase borrows only the collections it touches, so any of them can
//! be driven in isolation on synthetic state.

use rand::Rng;

use crate::{
    bounds::{Bounds, Tank},
    bubble::BubbleField,
    config::Config,
    drift::DriftField,
    fish::School,
    food::FoodSet,
    kinematics::{integrate, orientation, smooth_velocity},
    light::LightRig,
    splash::SplashSet,
    steering::{FoodDecision, steer},
    water::WaterSurface,
};

/// Returns the number of rings that expired.
pub fn splash_phase(splashes: &mut SplashSet, cfg: &Config) -> usize {
    splashes.expand_phase(cfg.frame_dt)
}

/// Returns the number of crumbs that sank below the floor threshold.
pub fn food_phase(food: &mut FoodSet, time: f32, tank: &Tank, cfg: &Config) -> usize {
    food.sink_phase(time, tank, &cfg.food)
}

pub fn water_phase(water: &mut WaterSurface, time: f32) {
    water.wave_phase(time);
}

pub fn light_phase(light: &mut LightRig, time: f32) {
    light.light_phase(time);
}

/// Returns the number of burst bubbles that expired.
pub fn bubble_phase(
    bubbles: &mut BubbleField,
    time: f32,
    tank: &Tank,
    cfg: &Config,
    rng: &mut impl Rng,
) -> usize {
    bubbles.rise_phase(time, cfg.frame_dt, tank, rng)
}

pub fn drift_phase(drift: &mut DriftField, tank: &Tank) {
    drift.drift_phase(tank);
}

/// Steers and moves every fish, in id order.
///
/// For each fish:
///
/// 1. [`steer`] computes the desired velocity against the live food set and
///    the current positions of the other fish (fish earlier in the order
///    have already moved this tick).
/// 2. On [`FoodDecision::Eat`] the crumb is taken out of `food` and a few
///    burst bubbles are released at the fish. A crumb eaten here is gone
///    for every fish after this one.
/// 3. An escaped fish is put back at the corrected position.
/// 4. The velocity is smoothed toward the target and renormalized, the
///    position is integrated, and the heading follows the new velocity.
///
/// ### Returns
/// The number of crumbs eaten.
#[allow(clippy::too_many_arguments)]
pub fn fish_phase(
    school: &mut School,
    food: &mut FoodSet,
    bubbles: &mut BubbleField,
    tank: &Tank,
    bounds: &Bounds,
    cfg: &Config,
    time: f32,
    rng: &mut impl Rng,
) -> usize {
    let mut eaten = 0;

    for id in 0..school.fish.len() {
        let s = steer(id, school, food, tank, bounds, &cfg.fish, &cfg.food);

        if let FoodDecision::Eat { id: crumb } = s.food
            && food.take(crumb).is_some()
        {
            eaten += 1;
            bubbles.burst(school.fish[id].pos, cfg.food.burst_bubbles, rng);
        }

        let fish = &mut school.fish[id];
        if let Some(p) = s.corrected_pos {
            fish.pos = p;
        }

        fish.vel = smooth_velocity(fish.vel, s.target, s.swim_speed, s.turn_rate, fish.forward());
        fish.speed = s.swim_speed;
        fish.pos = integrate(fish.pos, fish.vel, tank);

        if let Some(q) = orientation(fish.vel, cfg.fish.max_tilt) {
            fish.heading = q;
        }
        fish.fin_pose = fish.fins.advance(time, cfg.frame_dt);
    }

    eaten
}
