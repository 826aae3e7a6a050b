//! Force laws: uniform gravity, spring-dampers and per-triangle aerodynamic drag.

use crate::error::ClothError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::{Vec, Vec3};

/// Add `mass * (0, -g, 0)` to a particle. Driven particles are unaffected.
pub fn accumulate_gravity<F: Float>(particle: &mut Particle<F>, g: F) {
    let weight = Vec3::new(F::zero(), -g, F::zero()).scale(particle.mass);
    particle.accumulate_force(weight);
}

/// A spring-damper between two particles of the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringDamper<F: Float> {
    pub a: usize,
    pub b: usize,
    pub rest_length: F,
    pub spring_constant: F,
    pub damping_factor: F,
    /// Grid stride the spring was built at (1 structural, 2 shear, 4 bend).
    pub stride: usize,
}

impl<F: Float> SpringDamper<F> {
    /// Connect `a` and `b`; the rest length is their current separation.
    pub fn between(
        a: usize,
        b: usize,
        particles: &[Particle<F>],
        spring_constant: F,
        damping_factor: F,
        stride: usize,
    ) -> Self {
        let rest_length = particles[a].pos.distance(particles[b].pos);
        SpringDamper { a, b, rest_length, spring_constant, damping_factor, stride }
    }

    /// Force acting on particle `a`; particle `b` receives the negation.
    pub fn force(&self, particles: &[Particle<F>]) -> Vec3<F> {
        let p1 = &particles[self.a];
        let p2 = &particles[self.b];
        let e = p2.pos - p1.pos;
        let len = e.length();
        let e_hat = e.normalize();

        let v1 = e_hat.dot(p1.velocity);
        let v2 = e_hat.dot(p2.velocity);
        let spring = -self.spring_constant * (self.rest_length - len);
        let damper = -self.damping_factor * (v1 - v2);
        e_hat.scale(spring + damper)
    }

    pub fn accumulate(&self, particles: &mut [Particle<F>]) {
        let f = self.force(particles);
        particles[self.a].accumulate_force(f);
        particles[self.b].accumulate_force(-f);
    }
}

/// A cloth face used for drag and shading.
///
/// `normal`, `area` and `velocity` are caches refreshed once per frame by
/// [`Triangle::refresh`]; drag during the following frame reads them.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle<F: Float> {
    pub vertices: [usize; 3],
    pub drag_coefficient: F,
    pub air_density: F,
    pub normal: Vec3<F>,
    pub area: F,
    pub velocity: Vec3<F>,
}

impl<F: Float> Triangle<F> {
    pub fn new(vertices: [usize; 3], drag_coefficient: F, air_density: F) -> Self {
        Triangle {
            vertices,
            drag_coefficient,
            air_density,
            normal: Vec3::zero(),
            area: F::zero(),
            velocity: Vec3::zero(),
        }
    }

    /// Recompute the cached normal, area and mean velocity.
    ///
    /// `index` only labels the error.
    pub fn refresh(&mut self, index: usize, particles: &[Particle<F>]) -> Result<(), ClothError> {
        let [i1, i2, i3] = self.vertices;
        let (p1, p2, p3) = (&particles[i1], &particles[i2], &particles[i3]);

        let cross = (p2.pos - p1.pos).cross(p3.pos - p1.pos);
        let area = cross.length() * F::half();
        if !area.is_finite() || area.is_near_zero(F::from_f32(1e-12)) {
            return Err(ClothError::DegenerateTriangle { triangle: index });
        }

        self.area = area;
        self.normal = cross.normalize();
        self.velocity = (p1.velocity + p2.velocity + p3.velocity).scale(F::one() / F::three());
        Ok(())
    }

    /// Total drag on the face for the given ambient wind, or `None` when the
    /// face moves with the air.
    ///
    /// `-0.5 ρ |v|² c_d (A v̂·n) n` with `v` the face velocity relative to the wind.
    pub fn drag_force(&self, wind: Vec3<F>) -> Option<Vec3<F>> {
        let relative = self.velocity - wind;
        let speed_sq = relative.length_sq();
        if speed_sq == F::zero() {
            return None;
        }
        let speed = speed_sq.sqrt();
        let exposed_area = self.area * (relative.dot(self.normal) / speed);
        let magnitude = F::half() * self.air_density * speed_sq * self.drag_coefficient * exposed_area;
        Some(self.normal.scale(-magnitude))
    }

    /// Apply one third of the drag to each vertex.
    pub fn accumulate_drag(&self, particles: &mut [Particle<F>], wind: Vec3<F>) {
        if let Some(total) = self.drag_force(wind) {
            let share = total.scale(F::one() / F::three());
            for &i in &self.vertices {
                particles[i].accumulate_force(share);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn gravity_scales_with_mass() {
        let mut p = Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 2.0);
        accumulate_gravity(&mut p, 9.8);
        assert_eq!(p.force, Vec3::new(0.0, -19.6, 0.0));
    }

    #[test]
    fn gravity_skips_driven_particles() {
        let mut p = Particle::driven(Vec3::new(0.0f32, 0.0, 0.0), 2.0);
        accumulate_gravity(&mut p, 9.8);
        assert_eq!(p.force, Vec3::zero());
    }

    #[test]
    fn stretched_spring_pulls_ends_together() {
        let mut particles = vec![
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(1.0f32, 0.0, 0.0), 1.0),
        ];
        let spring = SpringDamper::between(0, 1, &particles, 10.0, 0.0, 1);
        particles[1].pos = Vec3::new(1.5, 0.0, 0.0);
        spring.accumulate(&mut particles);
        assert!((particles[0].force.x - 5.0).abs() < 1e-5);
        assert!((particles[1].force.x + 5.0).abs() < 1e-5);
    }

    #[test]
    fn damper_resists_closing_speed() {
        let mut particles = vec![
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(1.0f32, 0.0, 0.0), 1.0),
        ];
        particles[0].velocity = Vec3::new(2.0, 0.0, 0.0);
        let spring = SpringDamper::between(0, 1, &particles, 10.0, 0.5, 1);
        let f = spring.force(&particles);
        assert!((f.x + 1.0).abs() < 1e-6, "damping should push a back, got {:?}", f);
    }

    #[test]
    fn refresh_rejects_collinear_triangle() {
        let particles = vec![
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(1.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(2.0f32, 0.0, 0.0), 1.0),
        ];
        let mut tri = Triangle::new([0, 1, 2], 1.0, 1.0);
        assert_eq!(
            tri.refresh(7, &particles),
            Err(ClothError::DegenerateTriangle { triangle: 7 })
        );
    }

    #[test]
    fn face_moving_with_the_air_feels_no_drag() {
        let particles = vec![
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(1.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(0.0f32, 1.0, 0.0), 1.0),
        ];
        let mut tri = Triangle::new([0, 1, 2], 1.0, 1.0);
        tri.refresh(0, &particles).unwrap();
        assert_eq!(tri.drag_force(Vec3::zero()), None);
    }

    #[test]
    fn head_on_wind_pushes_face_downwind() {
        let particles = vec![
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(1.0f32, 0.0, 0.0), 1.0),
            Particle::new(Vec3::new(0.0f32, 1.0, 0.0), 1.0),
        ];
        let mut tri = Triangle::new([0, 1, 2], 1.0, 1.0);
        tri.refresh(0, &particles).unwrap();
        assert_eq!(tri.normal, Vec3::new(0.0, 0.0, 1.0));
        assert!((tri.area - 0.5).abs() < 1e-6);

        // 0.5 * 1 * 4 * 1 * 0.5
        let f = tri.drag_force(Vec3::new(0.0, 0.0, 2.0)).unwrap();
        assert!((f.z - 1.0).abs() < 1e-6, "got {:?}", f);
        assert_eq!(f.x, 0.0);
        assert_eq!(f.y, 0.0);
    }
}
