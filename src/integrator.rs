//! Adaptive, speed-limited Adams–Bashforth sub-stepping with ground contact.

use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::float::Float;
use crate::forces::accumulate_gravity;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::topology::Topology;
use crate::vec::{Vec, Vec3};

/// What happened during one [`Integrator::advance`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepReport<F: Float> {
    /// Sub-steps taken; always at least one.
    pub sub_steps: usize,
    /// Sub-steps shortened because a particle exceeded the speed limit.
    pub shortened_steps: usize,
    /// Velocities scaled down to the speed limit.
    pub clamped_velocities: usize,
    /// Ground contacts resolved.
    pub ground_contacts: usize,
    /// Fastest free particle at the end of any sub-step.
    pub max_speed: F,
    /// Simulated time covered; less than the requested delta only when
    /// `max_frame_delta` is set.
    pub simulated: F,
}

/// Advances a [`Topology`] through time.
///
/// Each sub-step drives anchors, accumulates gravity, springs and drag,
/// integrates free particles, clamps their speed and resolves ground contact.
pub struct Integrator<'a, F: Float> {
    config: &'a ClothConfig<F>,
}

impl<'a, F: Float> Integrator<'a, F> {
    pub fn new(config: &'a ClothConfig<F>) -> Self {
        Integrator { config }
    }

    /// Advance by `dt` seconds under `wind`.
    ///
    /// The interval is covered by sub-steps no longer than `max_sub_step`,
    /// shortened further while any free particle is faster than the speed
    /// limit. Driven particles reach their target exactly when the loop ends.
    /// A frame needing more than `max_iterations` sub-steps fails with
    /// [`ClothError::NumericalInstability`]; nothing is dropped unless the
    /// config opts into `max_frame_delta`.
    pub fn advance<O: StepObserver>(
        &self,
        topology: &mut Topology<F>,
        wind: Vec3<F>,
        dt: F,
        observer: &mut O,
    ) -> Result<StepReport<F>, ClothError> {
        let config = self.config;
        if !dt.is_finite() || dt < F::zero() {
            return Err(ClothError::InvalidTimeStep);
        }
        let dt = match config.max_frame_delta {
            Some(cap) if dt > cap => {
                log::debug!("frame delta {:?} capped to {:?}", dt, cap);
                cap
            }
            _ => dt,
        };

        let mut report = StepReport::default();
        let mut elapsed = F::zero();
        let mut fastest = fastest_free_speed(&topology.particles);
        loop {
            report.sub_steps += 1;
            if report.sub_steps > config.max_iterations {
                log::error!(
                    "cloth integrator exceeded {} sub-steps after {:?} of {:?} s",
                    config.max_iterations, elapsed, dt
                );
                return Err(ClothError::NumericalInstability { iterations: config.max_iterations });
            }

            let remaining = dt - elapsed;
            let mut step = config.max_sub_step.min(remaining);
            if fastest > config.speed_limit {
                step = step * (config.speed_limit / fastest);
                report.shortened_steps += 1;
            }

            let last = step >= remaining;
            elapsed = if last { dt } else { elapsed + step };
            let progress = if dt > F::zero() { elapsed / dt } else { F::one() };

            fastest = self.sub_step(topology, wind, step, progress, &mut report, observer)?;
            observer.on_sub_step(step.to_f32(), progress.to_f32());

            if last {
                break;
            }
        }
        report.simulated = dt;

        if report.shortened_steps > 0 || report.clamped_velocities > 0 {
            log::warn!(
                "speed limit {:?} hit: {} sub-steps shortened, {} velocities clamped",
                config.speed_limit, report.shortened_steps, report.clamped_velocities
            );
        }
        Ok(report)
    }

    fn sub_step<O: StepObserver>(
        &self,
        topology: &mut Topology<F>,
        wind: Vec3<F>,
        step: F,
        progress: F,
        report: &mut StepReport<F>,
        observer: &mut O,
    ) -> Result<F, ClothError> {
        let config = self.config;
        // Free-particle peak speed before the safety clamp; sizes the next sub-step.
        let mut unclamped = F::zero();

        for p in topology.particles.iter_mut() {
            p.drive(progress, step);
        }

        for p in topology.particles.iter_mut() {
            accumulate_gravity(p, config.gravity);
        }
        for spring in &topology.springs {
            spring.accumulate(&mut topology.particles);
        }
        for tri in &topology.triangles {
            tri.accumulate_drag(&mut topology.particles, wind);
        }

        for (index, p) in topology.particles.iter_mut().enumerate() {
            if p.is_driven() {
                continue;
            }
            p.integrate(step);
            unclamped = unclamped.max(p.velocity.length());
            if p.clamp_speed(config.speed_limit) {
                report.clamped_velocities += 1;
            }
            if p.collide_with_ground(config.ground_height) {
                report.ground_contacts += 1;
                observer.on_ground_contact(index);
            }
            if !p.pos.is_finite() {
                log::error!("particle {} left the finite range at {:?}", index, p.pos);
                return Err(ClothError::NonFiniteState { particle: index });
            }
            report.max_speed = report.max_speed.max(p.velocity.length());
        }
        Ok(unclamped)
    }
}

fn fastest_free_speed<F: Float>(particles: &[Particle<F>]) -> F {
    particles
        .iter()
        .filter(|p| !p.is_driven())
        .map(|p| p.velocity.length())
        .fold(F::zero(), |a, b| a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;
    use crate::topology::ClothPrefab;

    struct Counter {
        sub_steps: usize,
        last_progress: f32,
    }

    impl StepObserver for Counter {
        fn on_sub_step(&mut self, _dt: f32, progress: f32) {
            self.sub_steps += 1;
            self.last_progress = progress;
        }
    }

    fn banner(config: &ClothConfig<f32>) -> Topology<f32> {
        Topology::build(4, 4, ClothPrefab::Banner, config).unwrap()
    }

    #[test]
    fn runs_once_for_tiny_delta() {
        let config = ClothConfig::new();
        let mut topology = banner(&config);
        let mut counter = Counter { sub_steps: 0, last_progress: 0.0 };
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 1e-6, &mut counter)
            .unwrap();
        assert_eq!(report.sub_steps, 1);
        assert_eq!(counter.sub_steps, 1);
        assert_eq!(counter.last_progress, 1.0);
    }

    #[test]
    fn zero_delta_still_takes_one_step() {
        let config = ClothConfig::new();
        let mut topology = banner(&config);
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 0.0, &mut NoOpStepObserver)
            .unwrap();
        assert_eq!(report.sub_steps, 1);
    }

    #[test]
    fn splits_frame_into_bounded_sub_steps() {
        let config = ClothConfig::<f64>::new().with_max_sub_step(0.01);
        let mut topology = Topology::build(4, 4, ClothPrefab::Banner, &config).unwrap();
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 0.045, &mut NoOpStepObserver)
            .unwrap();
        assert_eq!(report.sub_steps, 5);
    }

    #[test]
    fn rejects_negative_delta() {
        let config = ClothConfig::new();
        let mut topology = banner(&config);
        let result = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), -0.1, &mut NoOpStepObserver);
        assert_eq!(result, Err(ClothError::InvalidTimeStep));
    }

    #[test]
    fn iteration_cap_is_fatal() {
        let config = ClothConfig::new().with_max_iterations(3);
        let mut topology = banner(&config);
        let result = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 0.1, &mut NoOpStepObserver);
        assert_eq!(result, Err(ClothError::NumericalInstability { iterations: 3 }));
    }

    #[test]
    fn long_frame_is_covered_in_full() {
        let config = ClothConfig::<f64>::new().with_max_sub_step(0.01);
        let mut topology = Topology::build(4, 4, ClothPrefab::Banner, &config).unwrap();
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 2.0, &mut NoOpStepObserver)
            .unwrap();
        assert_eq!(report.simulated, 2.0);
        assert!(report.sub_steps >= 200);
    }

    #[test]
    fn frame_cap_drops_excess_time_when_configured() {
        let config = ClothConfig::<f64>::new().with_max_sub_step(0.01).with_max_frame_delta(0.045);
        let mut topology = Topology::build(4, 4, ClothPrefab::Banner, &config).unwrap();
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 2.0, &mut NoOpStepObserver)
            .unwrap();
        assert_eq!(report.simulated, 0.045);
        assert_eq!(report.sub_steps, 5);
    }

    #[test]
    fn clamped_overshoot_shortens_next_sub_step() {
        // Gravity alone outruns a tiny limit within one sub-step; the clamp
        // hides it from the particle but not from the step sizing.
        let config = ClothConfig::new().with_speed_limit(1e-3).with_max_iterations(100_000);
        let mut topology = banner(&config);
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 1.0 / 60.0, &mut NoOpStepObserver)
            .unwrap();
        assert!(report.clamped_velocities > 0);
        assert!(report.shortened_steps > 0);
        assert!(report.sub_steps > 2);
    }

    #[test]
    fn fast_particle_shortens_sub_steps() {
        let config = ClothConfig::new().with_speed_limit(1.0).with_gravity(0.0);
        let mut topology = banner(&config);
        let free = topology.index(1, 2);
        topology.particles[free].velocity = Vec3::new(4.0, 0.0, 0.0);
        let report = Integrator::new(&config)
            .advance(&mut topology, Vec3::zero(), 1.0 / 120.0, &mut NoOpStepObserver)
            .unwrap();
        assert!(report.shortened_steps >= 1);
        assert!(report.sub_steps >= 2);
        assert!(report.max_speed <= 1.0 + 1e-6);
    }
}
