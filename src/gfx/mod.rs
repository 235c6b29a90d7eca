//! # Graphics Module
//!
//! Scene graph, light state and the boundary to the renderer.
//!
//! ## Architecture Overview
//!
//! - **Scene Management** ([`scene`]) - Transform arena and object tree
//! - **Lighting** ([`lighting`]) - Light parameters pushed as shader uniforms
//! - **Rendering Boundary** ([`rendering`]) - Backend traits and wgpu instance buffers
//!
//! Nothing in here owns a window or a device. The host implements
//! [`rendering::RenderBackend`] over its own pipeline and hands out handles.

pub mod lighting;
pub mod rendering;
pub mod scene;

// Re-export commonly used types
pub use lighting::{LightManager, LightState};
pub use scene::Scene;
