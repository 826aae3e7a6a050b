//! Cloth topology: particle grid, multi-stride spring network and triangle mesh.

use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::float::Float;
use crate::forces::{SpringDamper, Triangle};
use crate::particle::Particle;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Named cloth layouts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClothPrefab {
    /// Grid anchored along its left column, like a flag on a pole.
    Flag,
    /// Grid hung from five evenly spaced points of its top row.
    Banner,
    /// Not implemented; construction fails.
    Rope,
    /// Not implemented; construction fails.
    Cube,
}

/// Strides at which springs are laid: structural, shear and bend.
pub const SPRING_STRIDES: [usize; 3] = [1, 2, 4];

/// Triangle index buffer in its fixed four-part layout.
///
/// ```text
/// [ front TL/BR | back TL/BR | front TR/BL | back TR/BL ]
/// ```
///
/// Each part holds two counter-clockwise triangles per grid cell. The first
/// half splits every cell along its top-left/bottom-right diagonal, the
/// second half along the other diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshIndices {
    indices: AllocVec<u32>,
}

impl MeshIndices {
    fn quarter_len(&self) -> usize {
        self.indices.len() / 4
    }

    /// The whole buffer.
    pub fn all(&self) -> &[u32] {
        &self.indices
    }

    /// First half: one diagonal split, both faces. This is what a renderer draws.
    pub fn drawable(&self) -> &[u32] {
        &self.indices[..2 * self.quarter_len()]
    }

    /// Quarters 0 and 2: the front faces of both diagonal splits.
    pub fn front_faces(&self) -> AllocVec<u32> {
        let q = self.quarter_len();
        let mut out = AllocVec::with_capacity(2 * q);
        out.extend_from_slice(&self.indices[..q]);
        out.extend_from_slice(&self.indices[2 * q..3 * q]);
        out
    }

    /// Quarter 0 only: a single front-facing split with no duplicated faces.
    pub fn compact(&self) -> &[u32] {
        &self.indices[..self.quarter_len()]
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Particles, springs and triangles of one cloth, in a flat index arena.
///
/// Particle `(i, j)` lives at index `i + j * width`; row `j = 0` is the top edge.
#[derive(Clone, Debug)]
pub struct Topology<F: Float> {
    pub particles: AllocVec<Particle<F>>,
    pub springs: AllocVec<SpringDamper<F>>,
    pub triangles: AllocVec<Triangle<F>>,
    pub mesh: MeshIndices,
    width: usize,
    height: usize,
}

impl<F: Float> Topology<F> {
    /// Build a `width` x `height` cloth of the given prefab.
    ///
    /// Creates springs at every stride in [`SPRING_STRIDES`], softened by the
    /// cube of the stride, and primes the triangle caches so drag can act on
    /// the very first sub-step.
    pub fn build(
        width: usize,
        height: usize,
        prefab: ClothPrefab,
        config: &ClothConfig<F>,
    ) -> Result<Self, ClothError> {
        if matches!(prefab, ClothPrefab::Rope | ClothPrefab::Cube) {
            return Err(ClothError::UnimplementedPrefab(prefab));
        }
        if width < 2 || height < 2 {
            return Err(ClothError::InvalidGridDimensions { width, height });
        }

        let mut particles = AllocVec::with_capacity(width * height);
        for j in 0..height {
            for i in 0..width {
                let pos = Vec3::new(
                    F::from_usize(i) * config.spacing.0 / F::from_usize(width),
                    -(F::from_usize(j) * config.spacing.1 / F::from_usize(height)),
                    F::zero(),
                );
                let particle = if is_anchor(prefab, i, j, width) {
                    Particle::driven(pos, config.particle_mass)
                } else {
                    Particle::new(pos, config.particle_mass)
                };
                particles.push(particle.with_contact(config.elasticity, config.friction));
            }
        }

        let mut topology = Topology {
            particles,
            springs: AllocVec::new(),
            triangles: AllocVec::new(),
            mesh: MeshIndices { indices: AllocVec::new() },
            width,
            height,
        };

        for stride in SPRING_STRIDES {
            topology.connect_in_steps(stride, config);
        }

        topology.mesh = topology.build_mesh();
        let faces = topology.mesh.front_faces();
        topology.triangles = faces
            .chunks_exact(3)
            .map(|t| {
                Triangle::new(
                    [t[0] as usize, t[1] as usize, t[2] as usize],
                    config.drag_coefficient,
                    config.air_density,
                )
            })
            .collect();
        topology.refresh_triangles()?;

        Ok(topology)
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Lay springs from every `stride`-aligned grid point to its neighbours
    /// below, right, diagonally below-right, and from its right neighbour to
    /// the one below. Candidates leaving the grid are skipped.
    fn connect_in_steps(&mut self, stride: usize, config: &ClothConfig<F>) {
        let cube = F::from_usize(stride * stride * stride);
        let k = config.spring_constant / cube;
        let c = config.damping_factor / cube;
        let s = stride;
        let patterns = [(0, 0, 0, s), (0, 0, s, 0), (0, 0, s, s), (s, 0, 0, s)];

        for x in (0..self.width).step_by(stride) {
            for y in (0..self.height).step_by(stride) {
                for &(x1, y1, x2, y2) in &patterns {
                    let (ax, ay, bx, by) = (x + x1, y + y1, x + x2, y + y2);
                    if ax < self.width && bx < self.width && ay < self.height && by < self.height {
                        let a = self.index(ax, ay);
                        let b = self.index(bx, by);
                        let spring = SpringDamper::between(a, b, &self.particles, k, c, stride);
                        self.springs.push(spring);
                    }
                }
            }
        }
    }

    fn build_mesh(&self) -> MeshIndices {
        let idx = |i: usize, j: usize| self.index(i, j) as u32;
        let mut front_tl_br = AllocVec::new();
        let mut back_tl_br = AllocVec::new();
        let mut front_tr_bl = AllocVec::new();
        let mut back_tr_bl = AllocVec::new();

        for x in 0..self.width - 1 {
            for y in 0..self.height - 1 {
                let (tl, tr) = (idx(x, y), idx(x + 1, y));
                let (bl, br) = (idx(x, y + 1), idx(x + 1, y + 1));

                front_tl_br.extend_from_slice(&[tl, bl, tr, br, tr, bl]);
                back_tl_br.extend_from_slice(&[tr, bl, tl, bl, tr, br]);
                front_tr_bl.extend_from_slice(&[tl, br, tr, br, tl, bl]);
                back_tr_bl.extend_from_slice(&[tr, br, tl, bl, tl, br]);
            }
        }

        let mut indices = front_tl_br;
        indices.extend(back_tl_br);
        indices.extend(front_tr_bl);
        indices.extend(back_tr_bl);
        MeshIndices { indices }
    }

    /// Recompute every triangle's normal, area and velocity.
    pub fn refresh_triangles(&mut self) -> Result<(), ClothError> {
        for (index, tri) in self.triangles.iter_mut().enumerate() {
            tri.refresh(index, &self.particles)?;
        }
        Ok(())
    }

    /// Average the normals of the triangles touching each particle.
    pub fn collapse_normals(&mut self) {
        for p in self.particles.iter_mut() {
            p.normal = Vec3::zero();
        }
        for tri in &self.triangles {
            for &i in &tri.vertices {
                let p = &mut self.particles[i];
                p.normal = p.normal + tri.normal;
            }
        }
        for p in self.particles.iter_mut() {
            p.normal = p.normal.normalize();
        }
    }
}

fn is_anchor(prefab: ClothPrefab, i: usize, j: usize, width: usize) -> bool {
    match prefab {
        ClothPrefab::Banner => {
            j == 0
                && (i == 0
                    || i == width / 4
                    || i == width / 2
                    || i == width / 2 + width / 4
                    || i == width - 1)
        }
        ClothPrefab::Flag => i == 0,
        ClothPrefab::Rope | ClothPrefab::Cube => false,
    }
}
