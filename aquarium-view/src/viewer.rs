//! Interactive aquarium viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] and an
//! [`OrbitCamera`] and implements [`eframe::App`] to drive the tick once
//! per frame and paint the tank with flat 2-D primitives.

use std::f32::consts::TAU;

use aquarium_core::{
    Config, Simulation, TickReport,
    bubble::BubbleKind,
    light::BeamMedium,
};
use eframe::App;
use egui::{Color32, Stroke};
use glam::Vec3;
use tracing::{info, warn};

use crate::camera::OrbitCamera;

/// Segments used to approximate circles lying in the tank.
const RING_SEGMENTS: usize = 32;

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions (orbit, zoom, food drops).
/// 2. If `running` is `true`, call [`Simulation::tick`] with the frame's
///    clock.
/// 3. Paint the current state.
///
/// ### Fields
/// - `sim` - The simulation being shown.
/// - `camera` - Orbit camera used both for painting and for click picking.
/// - `draft` - Configuration being edited in the side panel; only applied
///   on request.
/// - `draft_error` - Why the last apply was rejected.
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `last_report` / `total_eaten` - Shown in the status bar.
pub struct Viewer {
    sim: Simulation,
    camera: OrbitCamera,

    draft: Config,
    draft_error: Option<String>,

    running: bool,
    last_report: TickReport,
    total_eaten: usize,
}

impl Viewer {
    /// Creates a viewer over a freshly stocked tank.
    ///
    /// The camera starts in front of the glass, slightly above the water
    /// line, looking at the middle of the tank.
    pub fn new(cfg: Config, seed: u64) -> Self {
        let sim = Simulation::new(cfg, seed);
        let t = sim.config().tank;
        let camera = OrbitCamera::looking_at(
            Vec3::new(t.center.x, t.height * 0.5, t.depth * 2.5),
            t.center,
            75f32.to_radians(),
        );

        Self {
            sim,
            camera,
            draft: cfg,
            draft_error: None,
            running: true,
            last_report: TickReport::default(),
            total_eaten: 0,
        }
    }

    /// Restocks the tank with the current configuration and clears the
    /// counters. The camera stays where it is.
    fn reset(&mut self) {
        self.sim.reset();
        self.last_report = TickReport::default();
        self.total_eaten = 0;
    }

    /// Validates the edited configuration and, if it holds up, rebuilds the
    /// simulation with it.
    fn apply_draft(&mut self) {
        match self.draft.validate() {
            Ok(()) => {
                info!("applying edited configuration");
                self.sim.set_config(self.draft);
                self.last_report = TickReport::default();
                self.total_eaten = 0;
                self.draft_error = None;
            }
            Err(e) => {
                warn!(error = %e, "edited configuration rejected");
                self.draft_error = Some(e.to_string());
            }
        }
    }

    fn step_once(&mut self, time: f32) {
        self.last_report = self.sim.tick(time);
        self.total_eaten += self.last_report.eaten;
    }

    /// Drops food where the pointer ray meets the water surface.
    ///
    /// ### Returns
    /// The number of crumbs dropped; `0` when the ray misses the surface.
    fn drop_food_at(&mut self, screen: egui::Pos2, rect: egui::Rect) -> usize {
        let surface = self.sim.state().tank.surface_y();
        match self.camera.pick_on_plane(screen, rect, surface) {
            Some(target) => self.sim.drop_food(target),
            None => 0,
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, manual feeding, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time) as f32;
                    self.step_once(now);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Feed center").clicked() {
                    let c = self.sim.state().tank.center;
                    self.sim.drop_food(c);
                }

                ui.separator();
                ui.add(
                    egui::Slider::new(
                        &mut self.camera.distance,
                        crate::camera::MIN_DISTANCE..=crate::camera::MAX_DISTANCE,
                    )
                    .text("Distance"),
                );
            });
        });
    }

    /// Builds the bottom status bar (entity counts, feeding stats).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let s = self.sim.state();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("t = {:.2} s", s.time));
                ui.label(format!("ticks = {}", s.ticks));
                ui.separator();
                ui.label(format!("eaten = {}", self.total_eaten));
                ui.label(format!("food = {}", s.food.len()));
                ui.label(format!("bubbles = {}", s.bubbles.len()));
                ui.label(format!("splashes = {}", s.splashes.len()));
                ui.label(format!("fish = {}", s.school.len()));
            });
        });
    }

    /// Builds the right-hand configuration panel. Edits go to `draft` and
    /// take effect on "Apply", which restocks the tank.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Fish");
                let f = &mut self.draft.fish;
                Self::labeled_drag_usize(ui, "count:", &mut f.count, 0..=200, 1.0);
                Self::labeled_drag_f32(ui, "speed:", &mut f.speed, 0.001..=1.0, 0.005);
                Self::labeled_drag_f32(
                    ui,
                    "excited_speed:",
                    &mut f.excited_speed,
                    0.001..=1.0,
                    0.005,
                );
                Self::labeled_drag_f32(ui, "turn_rate:", &mut f.turn_rate, 0.001..=1.0, 0.005);
                Self::labeled_drag_f32(
                    ui,
                    "excited_turn_rate:",
                    &mut f.excited_turn_rate,
                    0.001..=1.0,
                    0.005,
                );
                Self::labeled_drag_f32(ui, "avoid_factor:", &mut f.avoid_factor, 0.0..=10.0, 0.1);
                Self::labeled_drag_f32(
                    ui,
                    "boundary_force:",
                    &mut f.boundary_force,
                    0.0..=10.0,
                    0.1,
                );

                ui.separator();
                ui.label("Food");
                let food = &mut self.draft.food;
                Self::labeled_drag_usize(
                    ui,
                    "crumbs_per_click:",
                    &mut food.crumbs_per_click,
                    1..=50,
                    1.0,
                );
                Self::labeled_drag_f32(
                    ui,
                    "attraction_radius:",
                    &mut food.attraction_radius,
                    0.0..=50.0,
                    0.1,
                );
                Self::labeled_drag_f32(ui, "eat_radius:", &mut food.eat_radius, 0.0..=5.0, 0.01);
                Self::labeled_drag_f32(ui, "sink_speed:", &mut food.sink_speed, 0.0..=1.0, 0.005);

                ui.separator();
                ui.label("Ambient");
                let a = &mut self.draft.ambient;
                Self::labeled_drag_usize(ui, "bubbles:", &mut a.bubbles, 0..=500, 1.0);
                Self::labeled_drag_usize(
                    ui,
                    "drift_particles:",
                    &mut a.drift_particles,
                    0..=2000,
                    5.0,
                );
                Self::labeled_drag_usize(ui, "water_segments:", &mut a.water_segments, 1..=64, 1.0);

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.apply_draft();
                    }
                    if ui.button("Defaults").clicked() {
                        self.draft = Config::default();
                    }
                });
                if let Some(err) = &self.draft_error {
                    ui.colored_label(Color32::LIGHT_RED, err.as_str());
                }
            });
    }

    fn line(&self, painter: &egui::Painter, rect: egui::Rect, a: Vec3, b: Vec3, stroke: Stroke) {
        if let (Some(pa), Some(pb)) = (self.camera.project(a, rect), self.camera.project(b, rect)) {
            painter.line_segment([pa, pb], stroke);
        }
    }

    /// A circle lying flat at `center`, drawn as a closed polyline.
    fn flat_ring(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        center: Vec3,
        radius: f32,
        stroke: Stroke,
    ) {
        let pts: Option<Vec<egui::Pos2>> = (0..RING_SEGMENTS)
            .map(|i| {
                let t = i as f32 / RING_SEGMENTS as f32 * TAU;
                let p = center + Vec3::new(t.cos() * radius, 0.0, t.sin() * radius);
                self.camera.project(p, rect)
            })
            .collect();
        if let Some(pts) = pts {
            painter.add(egui::Shape::closed_line(pts, stroke));
        }
    }

    /// Screen radius of a world-space sphere of radius `r` at `p`.
    fn screen_radius(&self, p: Vec3, r: f32, rect: egui::Rect) -> f32 {
        let d = p.distance(self.camera.eye()).max(0.1);
        let f = 1.0 / (self.camera.fov_y * 0.5).tan();
        (r * f / d * rect.height() * 0.5).max(1.0)
    }

    fn paint_tank(&self, painter: &egui::Painter, rect: egui::Rect) {
        let tank = &self.sim.state().tank;
        let (lo, hi) = (tank.min(), tank.max());
        let corner = |i: usize| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        };
        let glass = Stroke::new(1.0, Color32::from_rgba_unmultiplied(200, 230, 255, 120));
        // Two corners share an edge when they differ in exactly one bit.
        for a in 0..8usize {
            for bit in [1, 2, 4] {
                let b = a | bit;
                if b != a {
                    self.line(painter, rect, corner(a), corner(b), glass);
                }
            }
        }
    }

    fn paint_water(&self, painter: &egui::Painter, rect: egui::Rect) {
        let s = self.sim.state();
        let water = &s.water;
        if water.vertices.is_empty() {
            return;
        }
        let y0 = s.tank.surface_y();
        let at = |row: usize, col: usize| {
            let v = water.vertex(row, col);
            Vec3::new(v.rest.x, y0 + v.height, v.rest.y)
        };
        let stroke = Stroke::new(0.5, Color32::from_rgba_unmultiplied(120, 190, 255, 90));
        let n = water.segments;
        for row in 0..=n {
            for col in 0..=n {
                if col < n {
                    self.line(painter, rect, at(row, col), at(row, col + 1), stroke);
                }
                if row < n {
                    self.line(painter, rect, at(row, col), at(row + 1, col), stroke);
                }
            }
        }
    }

    fn paint_light(&self, painter: &egui::Painter, rect: egui::Rect) {
        let s = self.sim.state();
        let top = s.tank.top();
        let bottom = s.tank.bottom();
        let ceiling = top + self.sim.config().ambient.ceiling_gap;
        let z = s.tank.center.z;

        for light in &s.light.spotlights {
            for beam in [&light.air, &light.water] {
                let (from, to, width) = match beam.medium {
                    BeamMedium::Air => (ceiling, top, 4.0),
                    BeamMedium::Water => (top, bottom, 10.0),
                };
                let alpha = (beam.opacity * 255.0).clamp(0.0, 255.0) as u8;
                let stroke = Stroke::new(
                    width * beam.breathe,
                    Color32::from_rgba_unmultiplied(255, 250, 220, alpha / 3),
                );
                self.line(
                    painter,
                    rect,
                    Vec3::new(light.x, from, z),
                    Vec3::new(light.x, to, z),
                    stroke,
                );
            }
            for p in &light.particles {
                if let Some(sp) = self.camera.project(p.pos, rect) {
                    let alpha = (p.opacity * 200.0).clamp(0.0, 255.0) as u8;
                    let dust = Color32::from_rgba_unmultiplied(255, 255, 230, alpha);
                    painter.circle_filled(sp, 1.0, dust);
                }
            }
        }
    }

    fn paint_particles(&self, painter: &egui::Painter, rect: egui::Rect) {
        let s = self.sim.state();

        for d in &s.drift.particles {
            if let Some(p) = self.camera.project(d.pos, rect) {
                let debris = Color32::from_rgba_unmultiplied(210, 210, 190, 110);
                painter.circle_filled(p, d.scale * 1.5, debris);
            }
        }

        for b in &s.bubbles.bubbles {
            let Some(p) = self.camera.project(b.pos, rect) else {
                continue;
            };
            let alpha = match b.kind {
                BubbleKind::Pool => 140,
                BubbleKind::Burst { .. } => 230,
            };
            let r = self.screen_radius(b.pos, 0.05 * b.scale, rect);
            let rim = Color32::from_rgba_unmultiplied(220, 240, 255, alpha);
            painter.circle_stroke(p, r, Stroke::new(1.0, rim));
        }

        for f in &s.food.items {
            if let Some(p) = self.camera.project(f.pos, rect) {
                let r = self.screen_radius(f.pos, 0.05 * f.scale, rect);
                painter.circle_filled(p, r, Color32::from_rgb(200, 120, 40));
            }
        }

        for ring in &s.splashes.rings {
            let alpha = (ring.opacity * 255.0).clamp(0.0, 255.0) as u8;
            let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, alpha));
            self.flat_ring(painter, rect, ring.center, ring.inner_radius.max(0.01), stroke);
            self.flat_ring(painter, rect, ring.center, ring.outer_radius(), stroke);
        }
    }

    /// Each fish is a body segment along its heading, a tail segment that
    /// swishes sideways and two short fins.
    fn paint_fish(&self, painter: &egui::Painter, rect: egui::Rect) {
        let body = Stroke::new(3.0, Color32::from_rgb(255, 150, 60));
        let thin = Stroke::new(1.5, Color32::from_rgb(255, 190, 110));

        for fish in &self.sim.state().school.fish {
            let fwd = fish.forward();
            let side = fish.heading * Vec3::Z;
            let half = fish.size * 0.5;

            let nose = fish.pos + fwd * half;
            let root = fish.pos - fwd * half;
            let tail = root - fwd * (half * 0.6) + side * (fish.fin_pose.tail_swish * half);
            self.line(painter, rect, root, nose, body);
            self.line(painter, rect, root, tail, thin);

            for yaw in [fish.fin_pose.left_fin_yaw, fish.fin_pose.right_fin_yaw] {
                let fin_dir = glam::Quat::from_axis_angle(fish.heading * Vec3::Y, yaw) * fwd;
                self.line(painter, rect, fish.pos, fish.pos + fin_dir * (half * 0.4), thin);
            }
        }
    }

    /// Builds the central panel where the tank is drawn and interacted with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::from_rgb(10, 25, 45)))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Orbit with drag.
                if response.dragged() {
                    self.camera.orbit(response.drag_delta());
                }

                // Zoom with scroll while hovering the view.
                if response.hovered() {
                    let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                    if scroll != 0.0 {
                        self.camera.zoom(scroll);
                    }
                }

                // Feed with click.
                if response.clicked()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    self.drop_food_at(pos, rect);
                }

                let moving = self.camera.update();

                if self.running {
                    let now = ctx.input(|i| i.time) as f32;
                    self.step_once(now);
                }

                self.paint_light(&painter, rect);
                self.paint_tank(&painter, rect);
                self.paint_water(&painter, rect);
                self.paint_particles(&painter, rect);
                self.paint_fish(&painter, rect);

                if self.running || moving {
                    ctx.request_repaint();
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
