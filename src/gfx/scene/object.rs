use cgmath::Matrix4;

use super::graph::TransformId;
use crate::gfx::rendering::{InstanceBufferId, MeshHandle, ShaderHandle};

/// Stable handle to an [`Object`] in a [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Mesh plus the program it is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub shader: ShaderHandle,
}

impl Renderable {
    pub fn new(mesh: MeshHandle, shader: ShaderHandle) -> Self {
        Self { mesh, shader }
    }
}

/// Per-instance transforms of an instanced object
#[derive(Debug, Clone)]
pub struct InstanceSet {
    pub(crate) transforms: Vec<TransformId>,
    pub(crate) buffer: InstanceBufferId,
    /// Scratch space reused between uploads
    pub(crate) matrices: Vec<Matrix4<f32>>,
}

impl InstanceSet {
    pub fn new(buffer: InstanceBufferId, transforms: Vec<TransformId>) -> Self {
        Self {
            matrices: Vec::with_capacity(transforms.len()),
            transforms,
            buffer,
        }
    }

    pub fn transforms(&self) -> &[TransformId] {
        &self.transforms
    }

    pub fn buffer(&self) -> InstanceBufferId {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Node variants. Instanced objects draw every instance in one call.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Plain,
    Instanced(InstanceSet),
}

/// Drawable scene node
///
/// Objects without a [`Renderable`] are structural: they carry a transform
/// and children but issue no draw call themselves.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub visible: bool,
    pub(crate) transform: TransformId,
    pub(crate) renderable: Option<Renderable>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) kind: ObjectKind,
}

impl Object {
    pub(crate) fn new(
        name: impl Into<String>,
        transform: TransformId,
        renderable: Option<Renderable>,
        kind: ObjectKind,
    ) -> Self {
        Self {
            name: name.into(),
            visible: true,
            transform,
            renderable,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    pub fn transform_id(&self) -> TransformId {
        self.transform
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        self.renderable.as_ref()
    }

    pub fn set_renderable(&mut self, renderable: Option<Renderable>) {
        self.renderable = renderable;
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn instances(&self) -> Option<&InstanceSet> {
        match &self.kind {
            ObjectKind::Instanced(set) => Some(set),
            ObjectKind::Plain => None,
        }
    }

    pub fn is_instanced(&self) -> bool {
        matches!(self.kind, ObjectKind::Instanced(_))
    }
}
