// src/lib.rs
//! Neighbourhood scene core
//!
//! Hierarchical transforms with dirty-flag propagation, a drawable object
//! tree with plain and instanced nodes, light uniforms and a first-person
//! weapon with ammo and procedural recoil. Rendering goes through the traits
//! in [`gfx::rendering`]; the host supplies the window and the GPU.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod gun;
pub mod input;
pub mod neighbourhood;
pub mod prelude;
pub mod ui;

// Re-export main types for convenience
pub use app::{FrameStats, NeighbourhoodApp};
pub use config::DemoConfig;
