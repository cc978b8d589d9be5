//! Cosmetic sky state: stars, burst particles, meteors and drifting names.
//!
//! Nothing here feeds back into the session. The scene owns its own
//! generator so purely visual randomness never perturbs the draw sequence.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use starpick_engine::ui::lerp;
use starpick_engine::{Entity, Point, SessionEvent, SlotIndex, Viewport};

/// One star per this many square units of sky.
const STAR_DENSITY: f32 = 45.0;
const BURST_PARTICLES: usize = 60;
/// Per-frame velocity retention at 60 FPS.
const PARTICLE_DRAG: f32 = 0.98;
const PARTICLE_GRAVITY: f32 = 18.0;
const PARTICLE_LIFE: f32 = 1.1;
const METEOR_SPEED: f32 = 60.0;
const METEOR_MARGIN: f32 = 5.0;
const NAME_PARTICLE_LIMIT: usize = 40;
/// Longest frame gap the physics will integrate in one step.
const MAX_STEP: Duration = Duration::from_millis(100);
/// Starfield spin in radians per 60 FPS frame while a draw is busy.
const SPIN_PER_FRAME: f32 = 0.002;
const DRAW_ZOOM: f32 = 1.8;
/// Per-frame approach toward the draw zoom, and back to 1.0 once quiet.
const ZOOM_IN_RATE: f32 = 0.02;
const ZOOM_OUT_RATE: f32 = 0.05;

/// How busy the current draw is, as far as the sky is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Rockets still in the air.
    Launching,
    /// Names pausing or rising to the board.
    Landing,
    Quiet,
}

/// Frame-rate independent version of a per-frame `lerp` factor.
fn per_frame(rate: f32, frames: f32) -> f32 {
    1.0 - (1.0 - rate).powf(frames)
}

fn unit(rng: &mut StdRng) -> f32 {
    StandardUniform.sample(rng)
}

fn uniform(rng: &mut StdRng, low: f32, high: f32) -> f32 {
    low + (high - low) * unit(rng)
}

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Point,
    base: f32,
    speed: f32,
    phase: f32,
}

impl Star {
    /// Brightness in `[0, 1]`, twinkling over `t` seconds unless motion is
    /// reduced.
    #[must_use]
    pub fn brightness(&self, t: f32, reduced_motion: bool) -> f32 {
        if reduced_motion {
            return self.base;
        }
        (self.base + 0.25 * (t * 3.0 * self.speed + self.phase).sin()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Point,
    vel: Point,
    pub slot: SlotIndex,
    life: f32,
}

impl Particle {
    /// Remaining life in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        (self.life / PARTICLE_LIFE).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Meteor {
    pub pos: Point,
    vel: Point,
    left_to_right: bool,
    pub alpha: f32,
}

impl Meteor {
    /// Unit vector pointing back along the trail.
    #[must_use]
    pub fn trail_direction(&self) -> Point {
        let speed = self.vel.x.hypot(self.vel.y).max(f32::EPSILON);
        Point::new(-self.vel.x / speed, -self.vel.y / speed)
    }
}

#[derive(Debug, Clone)]
pub struct NameParticle {
    pub name: String,
    pub pos: Point,
    born: Instant,
}

impl NameParticle {
    /// Fades in over about a second.
    #[must_use]
    pub fn alpha(&self, now: Instant) -> f32 {
        let frames = now.saturating_duration_since(self.born).as_secs_f32() * 60.0;
        1.0 - 0.95_f32.powf(frames)
    }
}

pub struct Scene {
    rng: StdRng,
    epoch: Instant,
    last_update: Instant,
    viewport: Viewport,
    rotation: f32,
    zoom: f32,
    stars: Vec<Star>,
    particles: Vec<Particle>,
    meteors: Vec<Meteor>,
    name_particles: Vec<NameParticle>,
}

impl Scene {
    #[must_use]
    pub fn new(viewport: Viewport, now: Instant) -> Self {
        Self::with_seed(viewport, now, rand::random())
    }

    #[must_use]
    pub fn with_seed(viewport: Viewport, now: Instant, seed: u64) -> Self {
        let mut scene = Self {
            rng: StdRng::seed_from_u64(seed),
            epoch: now,
            last_update: now,
            viewport,
            rotation: 0.0,
            zoom: 1.0,
            stars: Vec::new(),
            particles: Vec::new(),
            meteors: Vec::new(),
            name_particles: Vec::new(),
        };
        scene.scatter_stars();
        scene
    }

    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    #[must_use]
    pub fn name_particles(&self) -> &[NameParticle] {
        &self.name_particles
    }

    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Where `star` is drawn once the starfield's spin and zoom about the
    /// center are applied.
    #[must_use]
    pub fn star_position(&self, star: &Star, reduced_motion: bool) -> Point {
        if reduced_motion {
            return star.pos;
        }
        let center = self.viewport.center();
        let offset = star.pos - center;
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            center.x + (offset.x * cos - offset.y * sin) * self.zoom,
            center.y + (offset.x * sin + offset.y * cos) * self.zoom,
        )
    }

    /// Seconds since the scene was created, for twinkle phase.
    #[must_use]
    pub fn clock(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.epoch).as_secs_f32()
    }

    /// Re-scatter stars when the sky changes size.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.scatter_stars();
        }
    }

    fn scatter_stars(&mut self) {
        let Viewport { width, height } = self.viewport;
        let count = ((width * height) / STAR_DENSITY).max(0.0) as usize;
        let rng = &mut self.rng;
        self.stars = (0..count)
            .map(|_| Star {
                pos: Point::new(uniform(rng, 0.0, width), uniform(rng, 0.0, height)),
                base: uniform(rng, 0.2, 0.85),
                speed: uniform(rng, 0.4, 1.2),
                phase: uniform(rng, 0.0, TAU),
            })
            .collect();
    }

    /// React to session events: bursts on explosions, drifting roster names
    /// while a draw is in the air.
    pub fn apply_events(&mut self, events: &[SessionEvent], roster: &[Entity], now: Instant) {
        for event in events {
            match event {
                SessionEvent::Exploded { group, at, .. } => self.burst(*at, group.slot()),
                SessionEvent::DrawStarted { .. } => {
                    self.rotation = 0.0;
                    self.zoom = 1.0;
                    self.scatter_names(roster, now);
                }
                SessionEvent::RoundReset => self.particles.clear(),
                _ => {}
            }
        }
    }

    fn burst(&mut self, at: Point, slot: SlotIndex) {
        let rng = &mut self.rng;
        self.particles.extend((0..BURST_PARTICLES).map(|_| {
            let angle = uniform(rng, 0.0, TAU);
            let speed = uniform(rng, 8.0, 40.0);
            Particle {
                pos: at,
                vel: Point::new(angle.cos() * speed, angle.sin() * speed),
                slot,
                life: uniform(rng, PARTICLE_LIFE * 0.6, PARTICLE_LIFE),
            }
        }));
    }

    fn scatter_names(&mut self, roster: &[Entity], now: Instant) {
        let center = self.viewport.center();
        let radius = self.viewport.width.min(self.viewport.height) * 0.25;
        let rng = &mut self.rng;
        let mut picked: Vec<&Entity> = roster.iter().collect();
        picked.shuffle(rng);
        picked.truncate(NAME_PARTICLE_LIMIT);
        self.name_particles = picked
            .into_iter()
            .map(|entity| {
                let angle = uniform(rng, 0.0, TAU);
                let r = uniform(rng, radius * 0.4, radius);
                NameParticle {
                    name: entity.name().to_string(),
                    pos: Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r),
                    born: now,
                }
            })
            .collect();
    }

    /// A meteor across the upper half of the sky, fading near the far side.
    pub fn spawn_meteor(&mut self) {
        let Viewport { width, height } = self.viewport;
        let left_to_right = unit(&mut self.rng) < 0.5;
        let start_y = uniform(&mut self.rng, 0.0, height / 2.0);
        let (pos, target) = if left_to_right {
            (
                Point::new(-METEOR_MARGIN, start_y),
                Point::new(width + METEOR_MARGIN, height / 2.0),
            )
        } else {
            (
                Point::new(width + METEOR_MARGIN, start_y),
                Point::new(-METEOR_MARGIN, height / 2.0),
            )
        };
        let delta = target - pos;
        let length = delta.x.hypot(delta.y).max(f32::EPSILON);
        self.meteors.push(Meteor {
            pos,
            vel: Point::new(delta.x / length * METEOR_SPEED, delta.y / length * METEOR_SPEED),
            left_to_right,
            alpha: 1.0,
        });
    }

    /// Integrate motion up to `now`. Name particles only live while rockets
    /// are in the air; the starfield spins and zooms until the draw is quiet.
    pub fn update(&mut self, now: Instant, activity: Activity) {
        let dt = now
            .saturating_duration_since(self.last_update)
            .min(MAX_STEP)
            .as_secs_f32();
        self.last_update = now;
        let frames = dt * 60.0;

        if activity == Activity::Quiet {
            self.zoom = lerp(self.zoom, 1.0, per_frame(ZOOM_OUT_RATE, frames));
        } else {
            self.rotation += SPIN_PER_FRAME * frames;
            self.zoom = lerp(self.zoom, DRAW_ZOOM, per_frame(ZOOM_IN_RATE, frames));
        }

        let drag = PARTICLE_DRAG.powf(frames);
        for particle in &mut self.particles {
            particle.vel = Point::new(
                particle.vel.x * drag,
                particle.vel.y * drag + PARTICLE_GRAVITY * dt,
            );
            particle.pos = Point::new(
                particle.pos.x + particle.vel.x * dt,
                particle.pos.y + particle.vel.y * dt,
            );
            particle.life -= dt;
        }
        self.particles.retain(|particle| particle.life > 0.0);

        let width = self.viewport.width;
        for meteor in &mut self.meteors {
            meteor.pos = Point::new(
                meteor.pos.x + meteor.vel.x * dt,
                meteor.pos.y + meteor.vel.y * dt,
            );
            meteor.alpha = meteor_alpha(meteor.pos.x, width, meteor.left_to_right);
        }
        self.meteors.retain(|meteor| meteor.alpha > 0.0);

        if activity != Activity::Launching {
            self.name_particles.clear();
        }
    }
}

/// Full brightness until three quarters of the way across, gone by four
/// fifths.
fn meteor_alpha(x: f32, width: f32, left_to_right: bool) -> f32 {
    let (fade_start, fade_end) = if left_to_right {
        (width * 0.75, width * 0.8)
    } else {
        (width * 0.25, width * 0.2)
    };
    let span = fade_end - fade_start;
    if span.abs() <= f32::EPSILON {
        return 0.0;
    }
    (1.0 - (x - fade_start) / span).clamp(0.0, 1.0)
}
