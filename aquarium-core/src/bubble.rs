use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::bounds::Tank;

/// Pool bubbles are recycled at the bottom of the tank; burst bubbles,
/// released when a fish eats, live for a fixed time and are then dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BubbleKind {
    Pool,
    Burst { lifespan: f32, age: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub pos: Vec3,
    pub scale: f32,
    pub rise_speed: f32,
    pub wobble_freq: f32,
    pub wobble_amp: f32,
    pub wobble_phase: f32,
    pub kind: BubbleKind,
}

#[derive(Clone, Debug, Default)]
pub struct BubbleField {
    pub bubbles: Vec<Bubble>,
}

fn random_spawn_xz(tank: &Tank, rng: &mut impl Rng) -> (f32, f32) {
    let hx = tank.half_extents.x * 0.8;
    let hz = tank.half_extents.z * 0.8;
    (
        tank.center.x + rng.random_range(-hx..=hx),
        tank.center.z + rng.random_range(-hz..=hz),
    )
}

impl BubbleField {
    /// Populates `count` pool bubbles at random heights across the tank.
    pub fn random_in_tank(count: usize, tank: &Tank, rng: &mut impl Rng) -> Self {
        let bubbles = (0..count)
            .map(|_| {
                let (x, z) = random_spawn_xz(tank, rng);
                Bubble {
                    pos: Vec3::new(x, rng.random_range(tank.bottom()..=tank.top()), z),
                    scale: rng.random_range(0.5..2.0),
                    rise_speed: rng.random_range(0.01..0.04),
                    wobble_freq: rng.random_range(0.05..0.1),
                    wobble_amp: rng.random_range(0.1..0.3),
                    wobble_phase: rng.random_range(0.0..TAU),
                    kind: BubbleKind::Pool,
                }
            })
            .collect();

        Self { bubbles }
    }

    /// Releases `count` short-lived bubbles just around `origin`.
    pub fn burst(&mut self, origin: Vec3, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let offset = Vec3::new(
                rng.random_range(-0.05..0.05),
                rng.random_range(0.0..0.1),
                rng.random_range(-0.05..0.05),
            );
            self.bubbles.push(Bubble {
                pos: origin + offset,
                // Burst bubbles are 0.03..0.06 across; pool bubbles are 0.05 at scale 1.
                scale: rng.random_range(0.6..1.2),
                rise_speed: rng.random_range(0.02..0.05),
                wobble_freq: rng.random_range(0.05..0.1),
                wobble_amp: rng.random_range(0.1..0.3),
                wobble_phase: rng.random_range(0.0..TAU),
                kind: BubbleKind::Burst {
                    lifespan: rng.random_range(1.5..2.5),
                    age: 0.0,
                },
            });
        }
    }

    /// Rises and wobbles every bubble by one tick.
    ///
    /// A pool bubble that passes the top of the tank is moved back to the
    /// bottom at a fresh random x/z with a fresh size in the same tick. A
    /// burst bubble is removed once it reaches the top or outlives its
    /// lifespan.
    ///
    /// ### Returns
    /// The number of burst bubbles removed.
    pub fn rise_phase(
        &mut self,
        time: f32,
        frame_dt: f32,
        tank: &Tank,
        rng: &mut impl Rng,
    ) -> usize {
        let before = self.bubbles.len();
        self.bubbles.retain_mut(|b| {
            let angle = time * b.wobble_freq + b.wobble_phase;
            b.pos.y += b.rise_speed;
            b.pos.x += angle.sin() * b.wobble_amp * 0.01;
            b.pos.z += angle.cos() * b.wobble_amp * 0.01;

            let above = b.pos.y > tank.top();
            match &mut b.kind {
                BubbleKind::Pool => {
                    if above {
                        let (x, z) = random_spawn_xz(tank, rng);
                        b.pos = Vec3::new(x, tank.bottom(), z);
                        b.scale = rng.random_range(0.5..2.0);
                    }
                    true
                }
                BubbleKind::Burst { lifespan, age } => {
                    *age += frame_dt;
                    !above && *age <= *lifespan
                }
            }
        });
        before - self.bubbles.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankConfig;
    use rand::{SeedableRng, rngs::StdRng};

    fn tank() -> Tank {
        Tank::from_config(&TankConfig::default())
    }

    #[test]
    fn pool_bubbles_start_inside_tank() {
        let tank = tank();
        let mut rng = StdRng::seed_from_u64(11);
        let field = BubbleField::random_in_tank(60, &tank, &mut rng);
        assert_eq!(field.len(), 60);
        assert!(field.bubbles.iter().all(|b| tank.contains(b.pos)));
    }

    #[test]
    fn bubble_rises_by_its_speed() {
        let tank = tank();
        let mut rng = StdRng::seed_from_u64(12);
        let mut field = BubbleField::random_in_tank(1, &tank, &mut rng);
        field.bubbles[0].pos.y = 0.0;
        let speed = field.bubbles[0].rise_speed;

        field.rise_phase(0.0, 0.016, &tank, &mut rng);
        assert!((field.bubbles[0].pos.y - speed).abs() < 1e-6);
    }

    #[test]
    fn pool_bubble_crossing_top_is_recycled_at_bottom() {
        let tank = tank();
        let mut rng = StdRng::seed_from_u64(13);
        let mut field = BubbleField::random_in_tank(1, &tank, &mut rng);
        field.bubbles[0].pos.y = tank.top() - 0.001;

        let removed = field.rise_phase(0.5, 0.016, &tank, &mut rng);

        assert_eq!(removed, 0);
        let b = &field.bubbles[0];
        assert_eq!(b.pos.y, tank.bottom());
        assert!(tank.contains(b.pos));
        assert!(b.scale >= 0.5 && b.scale < 2.0);
    }

    #[test]
    fn burst_bubbles_expire_after_lifespan() {
        let tank = tank();
        let mut rng = StdRng::seed_from_u64(14);
        let mut field = BubbleField::default();
        field.burst(Vec3::new(0.0, -6.0, 0.0), 3, &mut rng);
        assert_eq!(field.len(), 3);

        let mut removed = 0;
        // 2.5 s of frames at 0.016 s is well under 200 ticks.
        for tick in 0..200 {
            removed += field.rise_phase(tick as f32 * 0.016, 0.016, &tank, &mut rng);
        }
        assert_eq!(removed, 3);
        assert!(field.is_empty());
    }

    #[test]
    fn burst_bubble_reaching_the_top_is_removed() {
        let tank = tank();
        let mut rng = StdRng::seed_from_u64(15);
        let mut field = BubbleField::default();
        field.burst(Vec3::new(0.0, tank.top() - 0.001, 0.0), 1, &mut rng);

        assert_eq!(field.rise_phase(0.0, 0.016, &tank, &mut rng), 1);
    }
}
