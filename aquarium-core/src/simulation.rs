//! The aquarium as a whole: every collection, the RNG, and the fixed
//! per-frame phase order.

use glam::Vec3;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use crate::{
    bounds::{Bounds, Tank},
    bubble::BubbleField,
    config::Config,
    drift::DriftField,
    fish::School,
    food::FoodSet,
    light::LightRig,
    phases,
    splash::SplashSet,
    water::WaterSurface,
};

/// Everything that changes from frame to frame.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub tank: Tank,
    pub bounds: Bounds,
    pub school: School,
    pub food: FoodSet,
    pub bubbles: BubbleField,
    pub drift: DriftField,
    pub water: WaterSurface,
    pub light: LightRig,
    pub splashes: SplashSet,
    /// Clock value passed to the last tick.
    pub time: f32,
    pub ticks: u64,
}

impl SimulationState {
    /// A fully stocked tank: a random school, the bubble pool, floating
    /// debris, the water grid and the spotlights. No food.
    pub fn populate(cfg: &Config, rng: &mut StdRng) -> Self {
        let tank = Tank::from_config(&cfg.tank);
        let bounds = Bounds::new(&tank, cfg.tank.boundary_margin);
        let a = &cfg.ambient;

        Self {
            school: School::random_in_bounds(&cfg.fish, &bounds, rng),
            food: FoodSet::new(),
            bubbles: BubbleField::random_in_tank(a.bubbles, &tank, rng),
            drift: DriftField::random_in_tank(a.drift_particles, &tank, rng),
            water: WaterSurface::new(a.water_segments, &tank, rng),
            light: LightRig::new(a.spotlights, a.beam_particles, a.ceiling_gap, &tank, rng),
            splashes: SplashSet::default(),
            time: 0.0,
            ticks: 0,
            tank,
            bounds,
        }
    }

    /// A tank with nothing in it. Tests fill in the collections they need.
    pub fn empty(cfg: &Config) -> Self {
        let tank = Tank::from_config(&cfg.tank);
        let bounds = Bounds::new(&tank, cfg.tank.boundary_margin);

        Self {
            tank,
            bounds,
            school: School::default(),
            food: FoodSet::new(),
            bubbles: BubbleField::default(),
            drift: DriftField::default(),
            water: WaterSurface::default(),
            light: LightRig::default(),
            splashes: SplashSet::default(),
            time: 0.0,
            ticks: 0,
        }
    }
}

/// What one tick removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Crumbs eaten by fish.
    pub eaten: usize,
    /// Crumbs that sank to the floor.
    pub despawned: usize,
    pub splashes_expired: usize,
    pub bubbles_expired: usize,
}

pub struct Simulation {
    cfg: Config,
    state: SimulationState,
    rng: StdRng,
}

impl Simulation {
    /// Builds a populated tank from a deterministic seed.
    pub fn new(cfg: Config, seed: u64) -> Self {
        info!(seed, "seeding simulation");
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(cfg: Config, mut rng: StdRng) -> Self {
        let state = SimulationState::populate(&cfg, &mut rng);
        info!(
            fish = state.school.len(),
            bubbles = state.bubbles.len(),
            drift = state.drift.len(),
            spotlights = state.light.spotlights.len(),
            "simulation built"
        );
        Self { cfg, state, rng }
    }

    /// Wraps a hand-built state, typically from [`SimulationState::empty`].
    pub fn from_state(cfg: Config, state: SimulationState, seed: u64) -> Self {
        Self {
            cfg,
            state,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advances every entity by one frame.
    ///
    /// `time` is the driver's clock in seconds. Phases run in the order
    /// splash, food, water, light, bubbles, drift, fish; see
    /// [`phases`] for what each does.
    pub fn tick(&mut self, time: f32) -> TickReport {
        let cfg = &self.cfg;
        let s = &mut self.state;
        let rng = &mut self.rng;

        s.time = time;
        s.ticks += 1;

        let splashes_expired = phases::splash_phase(&mut s.splashes, cfg);
        let despawned = phases::food_phase(&mut s.food, time, &s.tank, cfg);
        phases::water_phase(&mut s.water, time);
        phases::light_phase(&mut s.light, time);
        let bubbles_expired = phases::bubble_phase(&mut s.bubbles, time, &s.tank, cfg, rng);
        phases::drift_phase(&mut s.drift, &s.tank);
        let eaten = phases::fish_phase(
            &mut s.school,
            &mut s.food,
            &mut s.bubbles,
            &s.tank,
            &s.bounds,
            cfg,
            time,
            rng,
        );

        let report = TickReport {
            eaten,
            despawned,
            splashes_expired,
            bubbles_expired,
        };
        if eaten > 0 || despawned > 0 {
            debug!(
                tick = s.ticks,
                eaten,
                despawned,
                food_left = s.food.len(),
                "food consumed"
            );
        }
        trace!(tick = s.ticks, time, ?report, "tick");
        report
    }

    /// Drops one click's worth of crumbs (`food.crumbs_per_click`) over
    /// `target`. Returns how many were added.
    pub fn drop_food(&mut self, target: Vec3) -> usize {
        self.drop_food_batch(target, self.cfg.food.crumbs_per_click)
    }

    /// Drops `count` crumbs over `target` and starts a splash ring on the
    /// surface above each one.
    pub fn drop_food_batch(&mut self, target: Vec3, count: usize) -> usize {
        let s = &mut self.state;
        let origins = s
            .food
            .drop_batch(target, count, &s.tank, &self.cfg.food, &mut self.rng);
        for &origin in &origins {
            s.splashes.spawn(origin, &mut self.rng);
        }
        debug!(
            x = target.x,
            z = target.z,
            count = origins.len(),
            total = s.food.len(),
            "food dropped"
        );
        origins.len()
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replaces the configuration and restocks the tank with it.
    pub fn set_config(&mut self, cfg: Config) {
        self.cfg = cfg;
        self.reset();
    }

    /// Restocks the tank from the current configuration. The RNG carries
    /// on, so a reset tank differs from the first one.
    pub fn reset(&mut self) {
        self.state = SimulationState::populate(&self.cfg, &mut self.rng);
        info!(fish = self.state.school.len(), "simulation reset");
    }
}
