//! # Lighting
//!
//! Directional, point and spot light parameters and their upload to shader
//! uniforms. Lights are addressed through [`LightSlot`].

pub mod manager;
pub mod state;

pub use manager::LightManager;
pub use state::{
    Attenuation, DirLight, LightColors, LightSlot, LightState, PointLight, SpotLight,
    SPOT_LIGHT_COUNT,
};
