use clap::ValueEnum;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

pub const CELEBRATION_SECS: f64 = 4.0;
pub const CONFETTI_PIECES: usize = 100;
const MAX_CONFETTI_DELAY_SECS: f64 = 0.8;
const GRAVITY: f64 = 6.0;
const DT: f64 = 0.1;

pub const CONFETTI_COLORS: [(u8, u8, u8); 7] = [
    (0xFF, 0xC3, 0x00),
    (0xFF, 0x57, 0x33),
    (0xC7, 0x00, 0x39),
    (0x90, 0x0C, 0x3F),
    (0x58, 0x18, 0x45),
    (0x4C, 0xAF, 0x50),
    (0x00, 0x96, 0x88),
];

// small to large
const CONFETTI_GLYPHS: [char; 4] = ['·', '▪', '■', '█'];
const SPARK_GLYPHS: [char; 3] = ['*', '·', '✦'];
const ROCKET_GLYPH: char = '🚀';

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CelebrationStyle {
    #[default]
    Confetti,
    Rocket,
}

#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Seconds before the particle appears and starts moving
    pub delay: f64,
    pub gravity: f64,
}

impl CelebrationParticle {
    fn confetti<R: Rng>(width: f64, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: 0.0,
            vel_x: rng.gen_range(-1.0..1.0),
            vel_y: rng.gen_range(2.0..5.0),
            symbol: *CONFETTI_GLYPHS.choose(rng).unwrap_or(&'■'),
            color_index: rng.gen_range(0..CONFETTI_COLORS.len()),
            age: 0.0,
            max_age: CELEBRATION_SECS,
            delay: rng.gen_range(0.0..MAX_CONFETTI_DELAY_SECS),
            gravity: GRAVITY,
        }
    }

    fn rocket(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vel_x: 0.0,
            vel_y: -6.0,
            symbol: ROCKET_GLYPH,
            color_index: 0,
            age: 0.0,
            max_age: CELEBRATION_SECS,
            delay: 0.0,
            gravity: 0.0,
        }
    }

    fn spark<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x: x + rng.gen_range(-0.5..0.5),
            y: y + 1.0,
            vel_x: rng.gen_range(-2.0..2.0),
            vel_y: rng.gen_range(0.5..2.5),
            symbol: *SPARK_GLYPHS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..2),
            age: 0.0,
            max_age: rng.gen_range(0.4..1.0),
            delay: 0.0,
            gravity: GRAVITY / 2.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.age >= self.delay
    }

    pub fn is_rocket(&self) -> bool {
        self.symbol == ROCKET_GLYPH
    }

    /// Fraction of the visible lifetime left, 1.0 when fresh
    pub fn remaining(&self) -> f64 {
        let life = (self.max_age - self.delay).max(f64::EPSILON);
        (1.0 - (self.age - self.delay).max(0.0) / life).clamp(0.0, 1.0)
    }

    fn update(&mut self, dt: f64) -> bool {
        self.age += dt;
        if self.is_visible() {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += self.gravity * dt;
        }
        self.age < self.max_age
    }
}

/// Self-terminating results-screen celebration
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    pub style: CelebrationStyle,
    pub start_time: SystemTime,
    pub duration: f64,
    pub is_active: bool,
    pub terminal_width: f64,
    pub terminal_height: f64,
}

impl CelebrationAnimation {
    pub fn new(style: CelebrationStyle) -> Self {
        Self {
            particles: Vec::new(),
            style,
            start_time: SystemTime::now(),
            duration: CELEBRATION_SECS,
            is_active: false,
            terminal_width: 80.0,
            terminal_height: 24.0,
        }
    }

    /// Starting while a celebration is still running leaves it alone
    pub fn start(&mut self, width: u16, height: u16) {
        if self.is_active {
            return;
        }
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.start_time = SystemTime::now();
        self.is_active = true;
        self.terminal_width = f64::from(width);
        self.terminal_height = f64::from(height);

        match self.style {
            CelebrationStyle::Confetti => {
                for _ in 0..CONFETTI_PIECES {
                    self.particles
                        .push(CelebrationParticle::confetti(self.terminal_width, &mut rng));
                }
            }
            CelebrationStyle::Rocket => {
                self.particles.push(CelebrationParticle::rocket(
                    self.terminal_width / 2.0,
                    (self.terminal_height - 1.0).max(0.0),
                ));
            }
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        let elapsed = self
            .start_time
            .elapsed()
            .unwrap_or(Duration::ZERO)
            .as_secs_f64();
        if elapsed >= self.duration {
            self.stop();
            return;
        }

        if self.style == CelebrationStyle::Rocket {
            let mut rng = rand::thread_rng();
            let exhaust: Vec<_> = self
                .particles
                .iter()
                .filter(|p| p.is_rocket() && p.y >= 0.0)
                .flat_map(|p| (0..3).map(move |_| (p.x, p.y)))
                .collect();
            for (x, y) in exhaust {
                self.particles.push(CelebrationParticle::spark(x, y, &mut rng));
            }
        }

        let (width, height) = (self.terminal_width, self.terminal_height);
        self.particles.retain_mut(|particle| {
            let alive = particle.update(DT);
            let buffer = 5.0;
            let off_screen = particle.y > height + buffer
                || particle.y < -buffer
                || particle.x < -buffer
                || particle.x > width + buffer;
            alive && !off_screen
        });
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new(CelebrationStyle::default())
    }
}
