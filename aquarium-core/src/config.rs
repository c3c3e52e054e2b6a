//! Simulation parameters.
//!
//! Every constant the simulation uses lives here, grouped by concern. The
//! defaults reproduce the stock aquarium; a TOML file can override any
//! subset of them:
//!
//! ```toml
//! [fish]
//! count = 30
//! excited_speed = 0.2
//!
//! [food]
//! crumbs_per_click = 8
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Tank geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// World-space centre of the tank box.
    pub center: Vec3,
    /// Distance from each wall at which fish start turning back.
    pub boundary_margin: f32,
    /// Distance of the water surface below the top edge of the glass.
    pub surface_offset: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 10.0,
            depth: 15.0,
            center: Vec3::new(0.0, -2.0, 0.0),
            boundary_margin: 1.5,
            surface_offset: 0.05,
        }
    }
}

/// Fish population and steering constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub count: usize,
    /// Cruising speed, in world units per tick.
    pub speed: f32,
    /// Speed when a crumb is right in front of the fish.
    pub excited_speed: f32,
    /// Nominal body size; individual fish vary around it.
    pub size: f32,
    /// Peers closer than `size * avoid_factor` push each other away.
    pub avoid_factor: f32,
    /// Velocity blend factor per tick.
    pub turn_rate: f32,
    pub excited_turn_rate: f32,
    /// Spring constant of the soft boundary.
    pub boundary_force: f32,
    /// Inset applied when a fish that escaped the glass is clamped back.
    pub hard_inset: f32,
    /// Largest roll (radians) applied when climbing or diving.
    pub max_tilt: f32,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            count: 15,
            speed: 0.05,
            excited_speed: 0.12,
            size: 0.5,
            avoid_factor: 3.0,
            turn_rate: 0.05,
            excited_turn_rate: 0.1,
            boundary_force: 2.0,
            hard_inset: 0.1,
            max_tilt: 0.3,
        }
    }
}

impl FishConfig {
    #[inline]
    pub fn avoid_radius(&self) -> f32 {
        self.size * self.avoid_factor
    }
}

/// Food crumb constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    pub attraction_radius: f32,
    pub eat_radius: f32,
    /// Nominal sink speed per tick; each crumb scales it by 0.7..1.3.
    pub sink_speed: f32,
    pub crumbs_per_click: usize,
    /// Drop targets are clamped this far inside the side walls.
    pub drop_inset: f32,
    /// Half-width of the random x/z scatter around the drop target.
    pub drop_jitter: f32,
    /// Crumbs appear this far below the top edge of the glass.
    pub spawn_depth: f32,
    /// Crumbs are removed once they sink this close to the bottom.
    pub floor_offset: f32,
    /// Bubbles released by a fish that just ate.
    pub burst_bubbles: usize,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            attraction_radius: 8.0,
            eat_radius: 0.4,
            sink_speed: 0.03,
            crumbs_per_click: 5,
            drop_inset: 1.0,
            drop_jitter: 0.5,
            spawn_depth: 0.2,
            floor_offset: 0.5,
            burst_bubbles: 3,
        }
    }
}

/// Counts for the decorative systems.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub bubbles: usize,
    pub drift_particles: usize,
    pub water_segments: usize,
    pub spotlights: usize,
    pub beam_particles: usize,
    /// Length of the air beam between the ceiling fixtures and the tank top.
    pub ceiling_gap: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            bubbles: 60,
            drift_particles: 200,
            water_segments: 32,
            spotlights: 3,
            beam_particles: 20,
            ceiling_gap: 47.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Nominal frame length in seconds, used for age counters.
    pub frame_dt: f32,
    pub tank: TankConfig,
    pub fish: FishConfig,
    pub food: FoodConfig,
    pub ambient: AmbientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_dt: 0.016,
            tank: TankConfig::default(),
            fish: FishConfig::default(),
            food: FoodConfig::default(),
            ambient: AmbientConfig::default(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects parameter combinations the steering model cannot work with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.tank;
        for (field, v) in [
            ("tank.width", t.width),
            ("tank.height", t.height),
            ("tank.depth", t.depth),
        ] {
            if !(v > 0.0) {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }
        let min_half = t.width.min(t.height).min(t.depth) * 0.5;
        if t.boundary_margin < 0.0 || t.boundary_margin >= min_half {
            return Err(ConfigError::invalid(
                "tank.boundary_margin",
                "must be non-negative and smaller than every tank half extent",
            ));
        }

        let f = &self.fish;
        if !(f.speed > 0.0) || f.excited_speed < f.speed {
            return Err(ConfigError::invalid(
                "fish.speed",
                "speed must be positive and excited_speed at least as large",
            ));
        }
        for (field, v) in [
            ("fish.turn_rate", f.turn_rate),
            ("fish.excited_turn_rate", f.excited_turn_rate),
        ] {
            if !(v > 0.0 && v <= 1.0) {
                return Err(ConfigError::invalid(field, "must be in (0, 1]"));
            }
        }
        if !(f.size > 0.0) {
            return Err(ConfigError::invalid("fish.size", "must be positive"));
        }
        if f.hard_inset < 0.0 || f.hard_inset >= min_half {
            return Err(ConfigError::invalid(
                "fish.hard_inset",
                "must be non-negative and smaller than every tank half extent",
            ));
        }

        if !(f.max_tilt >= 0.0) {
            return Err(ConfigError::invalid("fish.max_tilt", "must be non-negative"));
        }

        let food = &self.food;
        if !(food.drop_inset >= 0.0) {
            return Err(ConfigError::invalid("food.drop_inset", "must be non-negative"));
        }
        if !(food.drop_jitter >= 0.0) {
            return Err(ConfigError::invalid("food.drop_jitter", "must be non-negative"));
        }
        if food.drop_inset < food.drop_jitter {
            return Err(ConfigError::invalid(
                "food.drop_jitter",
                "must not exceed food.drop_inset",
            ));
        }
        if !(food.eat_radius > 0.0) {
            return Err(ConfigError::invalid("food.eat_radius", "must be positive"));
        }
        if food.attraction_radius <= food.eat_radius {
            return Err(ConfigError::invalid(
                "food.attraction_radius",
                "must be larger than food.eat_radius",
            ));
        }
        if !(food.sink_speed > 0.0) {
            return Err(ConfigError::invalid("food.sink_speed", "must be positive"));
        }

        if self.ambient.water_segments == 0 {
            return Err(ConfigError::invalid(
                "ambient.water_segments",
                "must be at least 1",
            ));
        }
        if !(self.frame_dt > 0.0) {
            return Err(ConfigError::invalid("frame_dt", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [fish]
            count = 4
            excited_speed = 0.2

            [food]
            crumbs_per_click = 2
            "#,
        )
        .unwrap();

        assert_eq!(cfg.fish.count, 4);
        assert_eq!(cfg.fish.excited_speed, 0.2);
        assert_eq!(cfg.fish.speed, FishConfig::default().speed);
        assert_eq!(cfg.food.crumbs_per_click, 2);
        assert_eq!(cfg.tank, TankConfig::default());
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut cfg = Config::default();
        cfg.tank.center = Vec3::new(1.0, 2.0, 3.0);
        cfg.ambient.bubbles = 7;

        let text = cfg.to_toml_string().unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn eat_radius_must_be_positive() {
        let mut cfg = Config::default();
        cfg.food.eat_radius = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "food.eat_radius", .. }
        ));
    }

    #[test]
    fn negative_max_tilt_is_rejected() {
        let err = Config::from_toml_str("[fish]\nmax_tilt = -0.3\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "fish.max_tilt", .. }
        ));
    }

    #[test]
    fn negative_drop_jitter_is_rejected() {
        let err = Config::from_toml_str("[food]\ndrop_jitter = -0.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "food.drop_jitter", .. }
        ));
    }

    #[test]
    fn negative_drop_inset_is_rejected() {
        let mut cfg = Config::default();
        cfg.food.drop_inset = -1.0;
        cfg.food.drop_jitter = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "food.drop_inset", .. }
        ));
    }

    #[test]
    fn drop_jitter_wider_than_inset_is_rejected() {
        let mut cfg = Config::default();
        cfg.food.drop_inset = 0.2;
        cfg.food.drop_jitter = 0.5;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "food.drop_jitter", .. }
        ));
    }

    #[test]
    fn attraction_must_exceed_eat_radius() {
        let mut cfg = Config::default();
        cfg.food.attraction_radius = cfg.food.eat_radius;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn margin_wider_than_tank_is_rejected() {
        let mut cfg = Config::default();
        cfg.tank.boundary_margin = cfg.tank.height;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml_str("[fish\ncount = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/definitely/not/here/aquarium.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
