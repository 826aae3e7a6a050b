//! The cloth simulation façade: topology, integrator and wind behind one type.

use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::float::Float;
use crate::forces::{SpringDamper, Triangle};
use crate::integrator::{Integrator, StepReport};
use crate::mat::Mat4;
use crate::mesh::ClothVertex;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::Particle;
use crate::topology::{ClothPrefab, Topology};
use crate::vec::Vec3;
use crate::wind::Wind;
use alloc::vec::Vec as AllocVec;

/// A mass-spring-damper cloth driven by an external transform.
///
/// Call [`update`](Self::update) once per rendered frame with the world
/// transform the anchors should follow; the new vertex stream is handed to
/// the supplied callback before `update` returns.
///
/// ```
/// use drape::{ClothConfig, ClothPrefab, ClothSimulation, Mat4, Vec3};
///
/// let mut cloth = ClothSimulation::new(8, 8, ClothPrefab::Banner, ClothConfig::<f32>::new())?;
/// let mut gpu_vertices = Vec::new();
/// cloth.set_wind(Vec3::new(0.0, 0.0, 1.0), 3.0, false);
/// cloth.update(&Mat4::identity(), 1.0 / 60.0, |verts| gpu_vertices = verts.to_vec())?;
/// assert_eq!(gpu_vertices.len(), 64);
/// # Ok::<(), drape::ClothError>(())
/// ```
pub struct ClothSimulation<F: Float> {
    topology: Topology<F>,
    config: ClothConfig<F>,
    wind: Wind<F>,
    vertices: AllocVec<ClothVertex>,
    elapsed: F,
}

impl<F: Float> ClothSimulation<F> {
    /// Build a `width` x `height` cloth. Unimplemented prefabs and invalid
    /// configurations abort construction.
    pub fn new(
        width: usize,
        height: usize,
        prefab: ClothPrefab,
        config: ClothConfig<F>,
    ) -> Result<Self, ClothError> {
        config.validate()?;
        let mut topology = match Topology::build(width, height, prefab, &config) {
            Ok(t) => t,
            Err(e) => {
                log::error!("cannot build {:?} cloth {}x{}: {}", prefab, width, height, e);
                return Err(e);
            }
        };
        topology.collapse_normals();
        log::debug!(
            "built {:?} cloth {}x{}: {} particles, {} springs, {} triangles",
            prefab,
            width,
            height,
            topology.particles.len(),
            topology.springs.len(),
            topology.triangles.len()
        );

        let vertices = topology.particles.iter().map(ClothVertex::from_particle).collect();
        Ok(ClothSimulation {
            topology,
            config,
            wind: Wind::calm(),
            vertices,
            elapsed: F::zero(),
        })
    }

    /// Advance by `dt` seconds with the anchors following `transform`, then
    /// pass the refreshed vertices (particle order) to `sync`.
    pub fn update<S>(&mut self, transform: &Mat4<F>, dt: F, sync: S) -> Result<StepReport<F>, ClothError>
    where
        S: FnOnce(&mut [ClothVertex]),
    {
        self.update_with_observer(transform, dt, sync, &mut NoOpStepObserver)
    }

    /// [`update`](Self::update) with a [`StepObserver`] watching the integrator.
    pub fn update_with_observer<S, O>(
        &mut self,
        transform: &Mat4<F>,
        dt: F,
        sync: S,
        observer: &mut O,
    ) -> Result<StepReport<F>, ClothError>
    where
        S: FnOnce(&mut [ClothVertex]),
        O: StepObserver,
    {
        for p in self.topology.particles.iter_mut() {
            let target = transform.transform_point(p.rest_pos);
            p.retarget(target);
        }

        let wind = self.wind_vector();
        let report = Integrator::new(&self.config).advance(&mut self.topology, wind, dt, observer)?;
        self.elapsed = self.elapsed + report.simulated;

        self.topology.refresh_triangles().map_err(|e| {
            log::error!("cloth topology corrupted: {}", e);
            e
        })?;
        self.topology.collapse_normals();

        for (vertex, p) in self.vertices.iter_mut().zip(self.topology.particles.iter()) {
            *vertex = ClothVertex::from_particle(p);
        }
        sync(&mut self.vertices);

        observer.on_step_complete(report.sub_steps);
        log::trace!(
            "cloth update dt={:?}: {} sub-steps, {} ground contacts, max speed {:?}",
            dt,
            report.sub_steps,
            report.ground_contacts,
            report.max_speed
        );
        Ok(report)
    }

    /// Set the ambient wind.
    ///
    /// Calling this with exactly the parameters already in effect turns the
    /// wind off instead, so a single key binding can toggle it.
    pub fn set_wind(&mut self, direction: Vec3<F>, magnitude: F, fancy: bool) {
        self.wind.toggle(direction, magnitude, fancy);
        log::debug!("wind now {:?}", self.wind);
    }

    pub fn clear_wind(&mut self) {
        self.wind = Wind::calm();
    }

    pub fn wind(&self) -> &Wind<F> {
        &self.wind
    }

    /// Air velocity the drag law sees right now.
    pub fn wind_vector(&self) -> Vec3<F> {
        self.wind.velocity_at(self.elapsed, self.config.fancy_amplitude, self.config.fancy_frequency)
    }

    /// Put every particle back at rest and restart the clock. Wind is kept.
    pub fn reset(&mut self) -> Result<(), ClothError> {
        for p in self.topology.particles.iter_mut() {
            p.reset();
        }
        self.topology.refresh_triangles()?;
        self.topology.collapse_normals();
        for (vertex, p) in self.vertices.iter_mut().zip(self.topology.particles.iter()) {
            *vertex = ClothVertex::from_particle(p);
        }
        self.elapsed = F::zero();
        Ok(())
    }

    /// The full four-part index buffer.
    pub fn indices(&self) -> &[u32] {
        self.topology.mesh.all()
    }

    /// The half of the index buffer a renderer draws.
    pub fn drawable_indices(&self) -> &[u32] {
        self.topology.mesh.drawable()
    }

    /// One front-facing triangulation without duplicate faces.
    pub fn compact_indices(&self) -> &[u32] {
        self.topology.mesh.compact()
    }

    /// Vertices as of the last update (or construction).
    pub fn vertices(&self) -> &[ClothVertex] {
        &self.vertices
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.topology.particles
    }

    /// Particle at column `i`, row `j`; `None` outside the grid.
    pub fn particle(&self, i: usize, j: usize) -> Option<&Particle<F>> {
        let index = self.grid_index(i, j)?;
        self.topology.particles.get(index)
    }

    pub fn particle_mut(&mut self, i: usize, j: usize) -> Option<&mut Particle<F>> {
        let index = self.grid_index(i, j)?;
        self.topology.particles.get_mut(index)
    }

    fn grid_index(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.width() && j < self.height()).then(|| self.topology.index(i, j))
    }

    pub fn springs(&self) -> &[SpringDamper<F>] {
        &self.topology.springs
    }

    pub fn triangles(&self) -> &[Triangle<F>] {
        &self.topology.triangles
    }

    pub fn width(&self) -> usize { self.topology.width() }
    pub fn height(&self) -> usize { self.topology.height() }
    pub fn elapsed(&self) -> F { self.elapsed }
    pub fn config(&self) -> &ClothConfig<F> { &self.config }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec;

    #[test]
    fn construction_fills_vertex_stream() {
        let cloth = ClothSimulation::new(3, 2, ClothPrefab::Banner, ClothConfig::<f32>::new()).unwrap();
        assert_eq!(cloth.vertices().len(), 6);
        for v in cloth.vertices() {
            assert!((v.normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn invalid_config_aborts_construction() {
        let config = ClothConfig::<f32>::new().with_max_sub_step(0.0);
        assert!(matches!(
            ClothSimulation::new(4, 4, ClothPrefab::Banner, config),
            Err(ClothError::InvalidConfig(_))
        ));
    }

    #[test]
    fn sync_receives_every_particle_in_order() {
        let mut cloth = ClothSimulation::new(4, 3, ClothPrefab::Banner, ClothConfig::<f32>::new()).unwrap();
        let mut seen = AllocVec::new();
        cloth
            .update(&Mat4::identity(), 1.0 / 60.0, |verts| seen.extend_from_slice(verts))
            .unwrap();
        assert_eq!(seen.len(), 12);
        for (v, p) in seen.iter().zip(cloth.particles()) {
            assert_eq!(v.position, p.pos.to_array());
        }
    }

    #[test]
    fn reset_restores_rest_pose() {
        let mut cloth = ClothSimulation::new(4, 4, ClothPrefab::Banner, ClothConfig::<f32>::new()).unwrap();
        for _ in 0..30 {
            cloth.update(&Mat4::identity(), 1.0 / 60.0, |_| {}).unwrap();
        }
        let p = cloth.particle(2, 3).unwrap();
        assert!(p.pos != p.rest_pos);
        cloth.reset().unwrap();
        for p in cloth.particles() {
            assert_eq!(p.pos, p.rest_pos);
            assert_eq!(p.velocity, Vec3::zero());
        }
        assert_eq!(cloth.elapsed(), 0.0);
    }

    #[test]
    fn particle_lookup_is_bounds_checked() {
        let mut cloth = ClothSimulation::new(4, 3, ClothPrefab::Banner, ClothConfig::<f32>::new()).unwrap();
        assert!(cloth.particle(3, 2).is_some());
        assert!(cloth.particle(4, 0).is_none());
        assert!(cloth.particle(0, 3).is_none());
        assert!(cloth.particle_mut(0, 3).is_none());
        cloth.particle_mut(1, 1).unwrap().velocity = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(cloth.particle(1, 1).unwrap().velocity, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn clear_wind_stops_drag_source() {
        let mut cloth = ClothSimulation::new(4, 4, ClothPrefab::Banner, ClothConfig::<f32>::new()).unwrap();
        cloth.set_wind(Vec3::new(0.0, 0.0, 1.0), 2.0, false);
        assert_eq!(cloth.wind_vector(), Vec3::new(0.0, 0.0, 2.0));
        cloth.clear_wind();
        assert_eq!(cloth.wind_vector(), Vec3::zero());
    }
}
