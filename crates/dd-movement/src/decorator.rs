//! Motion decorators.
//!
//! A decorator wraps any [`MovementStrategy`] and, once the wrapped strategy
//! arrives, plays a short celebration before reporting completion.  The
//! celebration never moves the entity off the target in the ground plane,
//! and [`JumpDecorator`] restores the original altitude exactly, so the
//! destination contract of the wrapped strategy is preserved.
//!
//! Decorators nest: `Spin(Jump(path))` jumps first, then spins.

use crate::{Mobile, MovementStrategy};

/// Length of one celebration, in simulated seconds.
pub const CELEBRATION_SECS: f64 = 2.0;

/// Heading rotation rate while spinning (radians per second).
pub const SPIN_RATE: f64 = std::f64::consts::TAU;

/// Peak height of a jump above the landing altitude.
pub const JUMP_HEIGHT: f64 = 5.0;

/// Duration of one up-and-down jump.  `CELEBRATION_SECS` is a whole number
/// of periods.
pub const JUMP_PERIOD: f64 = 0.5;

/// Tracks how much of a celebration has been played.
#[derive(Debug, Clone, Copy, Default)]
struct Celebration {
    elapsed: f64,
}

impl Celebration {
    fn done(&self) -> bool {
        self.elapsed >= CELEBRATION_SECS
    }

    /// Advance by up to `dt`, returning the time actually consumed.
    fn advance(&mut self, dt: f64) -> f64 {
        let step = dt.max(0.0).min(CELEBRATION_SECS - self.elapsed);
        self.elapsed += step;
        step
    }
}

// ── Spin ──────────────────────────────────────────────────────────────────────

/// Turns the entity on the spot after arrival.
pub struct SpinDecorator {
    inner:       Box<dyn MovementStrategy>,
    celebration: Celebration,
}

impl SpinDecorator {
    pub fn new(inner: Box<dyn MovementStrategy>) -> Self {
        Self { inner, celebration: Celebration::default() }
    }
}

impl MovementStrategy for SpinDecorator {
    fn move_entity(&mut self, entity: &mut dyn Mobile, dt: f64) {
        if !self.inner.is_completed() {
            self.inner.move_entity(entity, dt);
            return;
        }
        if self.celebration.done() {
            return;
        }
        let step = self.celebration.advance(dt);
        entity.set_direction(entity.direction().rotate_y(SPIN_RATE * step));
    }

    fn is_completed(&self) -> bool {
        self.inner.is_completed() && self.celebration.done()
    }
}

// ── Jump ──────────────────────────────────────────────────────────────────────

/// Bobs the entity vertically after arrival, landing back on the target.
pub struct JumpDecorator {
    inner:       Box<dyn MovementStrategy>,
    celebration: Celebration,
    /// Altitude at the moment the celebration started.
    base_y:      Option<f64>,
}

impl JumpDecorator {
    pub fn new(inner: Box<dyn MovementStrategy>) -> Self {
        Self { inner, celebration: Celebration::default(), base_y: None }
    }

    /// Triangle wave: 0 at the start and end of each period, `JUMP_HEIGHT`
    /// at the midpoint.
    fn height_at(t: f64) -> f64 {
        let phase = (t / JUMP_PERIOD).fract();
        JUMP_HEIGHT * (1.0 - (2.0 * phase - 1.0).abs())
    }
}

impl MovementStrategy for JumpDecorator {
    fn move_entity(&mut self, entity: &mut dyn Mobile, dt: f64) {
        if !self.inner.is_completed() {
            self.inner.move_entity(entity, dt);
            return;
        }
        if self.celebration.done() {
            return;
        }
        let base_y = *self.base_y.get_or_insert(entity.position().y);
        self.celebration.advance(dt);

        let mut pos = entity.position();
        pos.y = if self.celebration.done() {
            base_y
        } else {
            base_y + Self::height_at(self.celebration.elapsed)
        };
        entity.set_position(pos);
    }

    fn is_completed(&self) -> bool {
        self.inner.is_completed() && self.celebration.done()
    }
}
