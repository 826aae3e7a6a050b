//! Hooks into the integrator's sub-step loop.

/// Watches a cloth update from the inside.
///
/// Useful for on-screen debug overlays and profiling: sub-step counts climb
/// quickly when the cloth approaches the speed limit. Every hook defaults to
/// doing nothing.
pub trait StepObserver {
    /// A sub-step of length `dt` finished; `progress` is the fraction of the
    /// frame covered so far and reaches exactly 1.0 on the last one.
    fn on_sub_step(&mut self, _dt: f32, _progress: f32) {}

    /// Particle `index` bounced off the ground.
    fn on_ground_contact(&mut self, _index: usize) {}

    /// The update finished after `sub_steps` sub-steps.
    fn on_step_complete(&mut self, _sub_steps: usize) {}
}

/// Observer for callers that don't need one.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
