use glam::Vec3;
use rand::Rng;

/// Ring growth per second of age.
pub const EXPANSION_RATE: f32 = 0.1;
pub const RING_WIDTH: f32 = 0.02;
pub const START_OPACITY: f32 = 0.7;
/// Seconds for the opacity to fall from `START_OPACITY` to zero.
pub const FADE_SECONDS: f32 = 2.0;
/// Rings fainter than this are dropped.
pub const MIN_OPACITY: f32 = 0.05;

/// An expanding ring on the water surface where a crumb went in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splash {
    pub center: Vec3,
    pub age: f32,
    pub max_radius: f32,
    pub inner_radius: f32,
    pub opacity: f32,
}

impl Splash {
    pub fn new(center: Vec3, rng: &mut impl Rng) -> Self {
        Self {
            center,
            age: 0.0,
            max_radius: rng.random_range(0.5..1.0),
            inner_radius: 0.0,
            opacity: START_OPACITY,
        }
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.inner_radius + RING_WIDTH
    }

    fn advance(&mut self, frame_dt: f32) {
        self.age += frame_dt;
        self.inner_radius = self.age * EXPANSION_RATE;
        self.opacity = START_OPACITY * (1.0 - self.age / FADE_SECONDS);
    }

    #[inline]
    fn is_spent(&self) -> bool {
        self.inner_radius > self.max_radius || self.opacity < MIN_OPACITY
    }
}

#[derive(Clone, Debug, Default)]
pub struct SplashSet {
    pub rings: Vec<Splash>,
}

impl SplashSet {
    pub fn spawn(&mut self, center: Vec3, rng: &mut impl Rng) {
        self.rings.push(Splash::new(center, rng));
    }

    /// Ages every ring by one frame and drops the ones that grew past their
    /// maximum radius or faded out. Returns the number dropped.
    pub fn expand_phase(&mut self, frame_dt: f32) -> usize {
        let before = self.rings.len();
        self.rings.retain_mut(|s| {
            s.advance(frame_dt);
            !s.is_spent()
        });
        before - self.rings.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}
