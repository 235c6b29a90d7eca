//! # Neighbourhood Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use neighbourhood::prelude::*;
//!
//! fn build(assets: &SceneAssets) -> Result<NeighbourhoodApp, AppError> {
//!     NeighbourhoodApp::new(DemoConfig::default(), assets)
//! }
//! ```

// Re-export core application types
pub use crate::app::{FrameStats, NeighbourhoodApp};
pub use crate::config::{DemoConfig, GridConfig, GunConfig};
pub use crate::error::{AppError, GunError, SceneError, SceneResult};
pub use crate::neighbourhood::{InspectorState, Neighbourhood, SceneAssets};

// Re-export graphics and scene types
pub use crate::gfx::lighting::{LightManager, LightSlot, LightState};
pub use crate::gfx::rendering::{
    InstanceBufferId, InstanceUpload, MeshHandle, RenderBackend, ShaderHandle,
};
pub use crate::gfx::scene::{Axis, ObjectId, Renderable, Scene, Transform, TransformId};

// Re-export weapon types
pub use crate::gun::{GunManager, RecoilCurve, RecoilPhase, RecoilStep};
pub use crate::input::GunCommand;

// Re-export common external dependencies
pub use cgmath::{Matrix4, Vector3, Zero};
pub use imgui::Ui;
