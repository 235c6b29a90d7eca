//! # Weapons
//!
//! First-person weapon handling on top of the scene.
//!
//! - [`GunManager`] - Selection, ammo, reload, inspect and per-frame update
//! - [`RecoilCurve`] - Shape and speed of the recoil animation
//! - [`RecoilPhase`] - Idle / Recoiling / Returning state of one weapon

pub mod manager;
pub mod recoil;

pub use manager::{Gun, GunManager};
pub use recoil::{RecoilCurve, RecoilPhase, RecoilStep};
