//! # Scene Management Module
//!
//! Hierarchical transforms and the drawable object tree built on top of them.
//!
//! ## Key Components
//!
//! - [`Transform`] - Local position/rotation/scale with a cached world matrix
//! - [`TransformGraph`] - Arena of transforms with dirty-flag propagation
//! - [`Object`] - Drawable node, either plain or instanced
//! - [`Scene`] - Owns the graph and the object arena, drives update and draw
//!
//! ## Usage
//!
//! ```no_run
//! use neighbourhood::gfx::scene::Scene;
//! use neighbourhood::gfx::rendering::{MeshHandle, ShaderHandle};
//! use neighbourhood::gfx::scene::Renderable;
//!
//! let mut scene = Scene::new();
//! let root = scene.add_object("root", None);
//! let cube = scene.add_object("cube", Some(Renderable::new(MeshHandle(0), ShaderHandle(0))));
//! scene.add_child(root, cube).unwrap();
//! ```
//!
//! ## Update Order
//!
//! Each frame the host calls [`Scene::update`] on a root object before
//! [`Scene::draw`]. World matrices are only valid after every ancestor has
//! been updated, so updates always start at the top of a subtree.

pub mod graph;
pub mod object;
pub mod scene;
pub mod transform;

// Re-export main types
pub use graph::{TransformGraph, TransformId};
pub use object::{InstanceSet, Object, ObjectId, ObjectKind, Renderable};
pub use scene::Scene;
pub use transform::{Axis, Transform};
