//! Mass-spring-damper cloth simulation for games and real-time demos.
//!
//! `drape` simulates a rectangular sheet of particles joined by spring-dampers
//! at several strides, pushed around by gravity and aerodynamic drag, and
//! hung from anchor particles that follow an external transform (a hand, a
//! pole, a camera). Rendering is left to the caller: every update hands back
//! a `{position, normal}` vertex stream and the index buffer is fixed at
//! construction.
//!
//! # Features
//!
//! - **Multi-stride springs**: structural, shear and bend stiffness at strides 1, 2 and 4
//! - **Adams–Bashforth integration**: adaptive, speed-limited sub-stepping
//! - **Wind**: per-triangle drag with a toggleable, optionally gusting wind
//! - **Driven anchors**: anchors interpolate toward a 4x4 transform over each frame
//! - **Ground contact**: reflection with elasticity and friction
//! - **Observable**: monitor sub-steps via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod float;
pub mod vec;
pub mod mat;
pub mod particle;
pub mod forces;
pub mod topology;
pub mod wind;
pub mod integrator;
pub mod mesh;
pub mod cloth;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec3};
pub use mat::Mat4;
pub use particle::{Motion, Particle};
pub use forces::{accumulate_gravity, SpringDamper, Triangle};
pub use topology::{ClothPrefab, MeshIndices, Topology};
pub use wind::Wind;
pub use integrator::{Integrator, StepReport};
pub use mesh::ClothVertex;
pub use cloth::ClothSimulation;
pub use config::ClothConfig;
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::ClothError;
