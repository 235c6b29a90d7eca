//! Error types for scene construction and weapon registration

use thiserror::Error;

use crate::gfx::scene::{ObjectId, TransformId};

/// Structural errors raised while wiring the scene graph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("transform {0:?} does not exist in this graph")]
    UnknownTransform(TransformId),

    #[error("object {0:?} does not exist in this scene")]
    UnknownObject(ObjectId),

    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle {
        child: TransformId,
        parent: TransformId,
    },

    #[error("transform {0:?} already has a parent")]
    AlreadyParented(TransformId),

    #[error("object {0:?} already has a parent object")]
    ObjectAlreadyParented(ObjectId),
}

/// Errors raised while registering weapons
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GunError {
    #[error("weapon object {0:?} does not exist in this scene")]
    UnknownObject(ObjectId),

    #[error("weapon capacity must be at least one round")]
    ZeroCapacity,

    #[error("recoil curve rejected: {0}")]
    InvalidRecoil(&'static str),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Anything that can fail while assembling the demo
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Gun(#[from] GunError),
}
