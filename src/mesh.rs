//! Render-side vertex layout.

use bytemuck::{Pod, Zeroable};

use crate::float::Float;
use crate::particle::Particle;

/// One vertex per particle, in particle index order.
///
/// `#[repr(C)]` and `Pod` so the slice can be cast straight into a GPU
/// vertex buffer with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ClothVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl ClothVertex {
    pub fn from_particle<F: Float>(p: &Particle<F>) -> Self {
        ClothVertex {
            position: p.pos.to_array(),
            normal: p.normal.to_array(),
        }
    }
}
