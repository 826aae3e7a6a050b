//! Cloth particles integrated with a two-step Adams–Bashforth scheme.

use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// How a particle's position is decided each sub-step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Motion<F: Float> {
    /// Moved by accumulated forces.
    Free,
    /// Moved by an external transform: interpolated from `from` toward
    /// `target` as the frame progresses. Forces are ignored.
    Driven { from: Vec3<F>, target: Vec3<F> },
}

/// A cloth particle.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub pos: Vec3<F>,
    /// Position before the last sub-step.
    pub prev_pos: Vec3<F>,
    /// Position the particle was built at.
    pub rest_pos: Vec3<F>,
    pub velocity: Vec3<F>,
    /// Unit normal averaged from the triangles touching this particle.
    pub normal: Vec3<F>,
    pub mass: F,
    /// Fraction of vertical speed kept on ground contact.
    pub elasticity: F,
    /// Fraction of horizontal speed lost on ground contact.
    pub friction: F,
    pub force: Vec3<F>,
    /// Force used in the previous sub-step.
    pub prev_force: Vec3<F>,
    pub motion: Motion<F>,
}

impl<F: Float> Particle<F> {
    pub fn new(pos: Vec3<F>, mass: F) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            rest_pos: pos,
            velocity: Vec3::zero(),
            normal: Vec3::zero(),
            mass,
            elasticity: F::half(),
            friction: F::zero(),
            force: Vec3::zero(),
            prev_force: Vec3::zero(),
            motion: Motion::Free,
        }
    }

    /// A particle that follows an external transform, starting at rest.
    pub fn driven(pos: Vec3<F>, mass: F) -> Self {
        let mut p = Self::new(pos, mass);
        p.motion = Motion::Driven { from: pos, target: pos };
        p
    }

    pub fn with_contact(mut self, elasticity: F, friction: F) -> Self {
        self.elasticity = elasticity;
        self.friction = friction;
        self
    }

    pub fn is_driven(&self) -> bool {
        matches!(self.motion, Motion::Driven { .. })
    }

    pub fn accumulate_force(&mut self, force: Vec3<F>) {
        if !self.is_driven() {
            self.force += force;
        }
    }

    pub fn clear_force(&mut self) {
        self.force = Vec3::zero();
    }

    /// Start a new frame toward `target`, beginning from the current position.
    ///
    /// Has no effect on free particles.
    pub fn retarget(&mut self, target: Vec3<F>) {
        if let Motion::Driven { .. } = self.motion {
            self.motion = Motion::Driven { from: self.pos, target };
        }
    }

    /// Place a driven particle at `progress` of the way through the frame.
    ///
    /// Velocity is set to the displacement rate over `dt` so dampers and
    /// drag see the anchor moving.
    pub fn drive(&mut self, progress: F, dt: F) {
        if let Motion::Driven { from, target } = self.motion {
            let next = if progress >= F::one() { target } else { from.lerp(target, progress) };
            self.velocity = if dt > F::zero() {
                (next - self.pos).scale(F::one() / dt)
            } else {
                Vec3::zero()
            };
            self.prev_pos = self.pos;
            self.pos = next;
        }
    }

    /// Advance a free particle by `dt`, then clear the force accumulator.
    ///
    /// `v' = v + dt/2 (3a - a_prev)` and `x' = x + dt/2 (3v' - v)`.
    pub fn integrate(&mut self, dt: F) {
        if self.is_driven() {
            return;
        }
        let inv_mass = F::one() / self.mass;
        let accel = self.force.scale(inv_mass);
        let accel_prev = self.prev_force.scale(inv_mass);
        let half_dt = dt * F::half();

        let v_next = self.velocity + (accel.scale(F::three()) - accel_prev).scale(half_dt);
        let p_next = self.pos + (v_next.scale(F::three()) - self.velocity).scale(half_dt);

        self.prev_force = self.force;
        self.velocity = v_next;
        self.prev_pos = self.pos;
        self.pos = p_next;
        self.clear_force();
    }

    /// Scale velocity down to `limit` if faster. Returns true if clamped.
    pub fn clamp_speed(&mut self, limit: F) -> bool {
        let speed = self.velocity.length();
        if speed > limit {
            self.velocity = self.velocity.scale(limit / speed);
            true
        } else {
            false
        }
    }

    /// Bounce off the plane `y = ground`. Returns true on contact.
    pub fn collide_with_ground(&mut self, ground: F) -> bool {
        if self.is_driven() || !(self.pos.y < ground) {
            return false;
        }
        let keep = F::one() - self.friction;
        self.pos.y = ground + ground - self.pos.y;
        self.velocity = Vec3::new(
            self.velocity.x * keep,
            -self.elasticity * self.velocity.y,
            self.velocity.z * keep,
        );
        self.prev_force = Vec3::zero();
        true
    }

    /// Put the particle back where it was built, at rest.
    pub fn reset(&mut self) {
        self.pos = self.rest_pos;
        self.prev_pos = self.rest_pos;
        self.velocity = Vec3::zero();
        self.force = Vec3::zero();
        self.prev_force = Vec3::zero();
        if self.is_driven() {
            self.motion = Motion::Driven { from: self.rest_pos, target: self.rest_pos };
        }
    }
}
