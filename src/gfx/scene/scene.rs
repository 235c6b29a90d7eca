use std::ops::{Index, IndexMut};

use cgmath::Matrix4;

use super::graph::{TransformGraph, TransformId};
use super::object::{InstanceSet, Object, ObjectId, ObjectKind, Renderable};
use super::transform::Transform;
use crate::error::{SceneError, SceneResult};
use crate::gfx::rendering::{InstanceBufferId, InstanceUpload, RenderBackend};

/// Main scene: the transform arena plus the drawable object tree built on it
#[derive(Debug, Default)]
pub struct Scene {
    graph: TransformGraph,
    objects: Vec<Object>,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene with room for `transforms` transforms up front
    pub fn with_capacity(transforms: usize) -> Self {
        Self {
            graph: TransformGraph::with_capacity(transforms),
            objects: Vec::new(),
        }
    }

    pub fn graph(&self) -> &TransformGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut TransformGraph {
        &mut self.graph
    }

    /// Adds a plain object with an identity transform
    pub fn add_object(&mut self, name: &str, renderable: Option<Renderable>) -> ObjectId {
        self.add_object_with_transform(name, Transform::new(), renderable)
    }

    /// Adds a plain object that starts from `transform`
    pub fn add_object_with_transform(
        &mut self,
        name: &str,
        transform: Transform,
        renderable: Option<Renderable>,
    ) -> ObjectId {
        let transform = self.graph.insert(transform);
        self.push(Object::new(name, transform, renderable, ObjectKind::Plain))
    }

    /// Adds an instanced object drawing `renderable` once per entry of `instances`
    ///
    /// The instance transforms must already live in this scene's graph; they
    /// keep whatever parents they were given there.
    pub fn add_instanced_object(
        &mut self,
        name: &str,
        renderable: Renderable,
        buffer: InstanceBufferId,
        instances: Vec<TransformId>,
    ) -> SceneResult<ObjectId> {
        if let Some(missing) = instances.iter().find(|id| !self.graph.contains(**id)) {
            return Err(SceneError::UnknownTransform(*missing));
        }

        let transform = self.graph.insert(Transform::new());
        let kind = ObjectKind::Instanced(InstanceSet::new(buffer, instances));
        Ok(self.push(Object::new(name, transform, Some(renderable), kind)))
    }

    /// Appends one more instance transform to an instanced object
    pub fn add_instance(&mut self, object: ObjectId, instance: TransformId) -> SceneResult<()> {
        if !self.graph.contains(instance) {
            return Err(SceneError::UnknownTransform(instance));
        }
        match self.objects.get_mut(object.index()).map(|o| &mut o.kind) {
            Some(ObjectKind::Instanced(set)) => {
                set.transforms.push(instance);
                // Force a re-upload on the next update
                self.graph[instance].mark_dirty();
                Ok(())
            }
            _ => Err(SceneError::UnknownObject(object)),
        }
    }

    /// Makes `child` a child object of `parent` and links their transforms
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> SceneResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if self.objects[child.index()].parent.is_some() {
            return Err(SceneError::ObjectAlreadyParented(child));
        }

        let parent_transform = self.objects[parent.index()].transform;
        let child_transform = self.objects[child.index()].transform;
        self.graph.set_parent(child_transform, parent_transform)?;

        self.objects[child.index()].parent = Some(parent);
        self.objects[parent.index()].children.push(child);
        Ok(())
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.index())
    }

    /// Finds the first object with the given name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|object| object.name == name)
            .map(|index| ObjectId(index as u32))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Local transform of an object, for reading
    pub fn transform(&self, id: ObjectId) -> &Transform {
        &self.graph[self[id].transform]
    }

    /// Local transform of an object, for editing
    pub fn transform_mut(&mut self, id: ObjectId) -> &mut Transform {
        let transform = self[id].transform;
        &mut self.graph[transform]
    }

    pub fn world_matrix(&self, id: ObjectId) -> &Matrix4<f32> {
        self.graph.world_matrix(self[id].transform)
    }

    /// Brings the subtree under `root` up to date.
    ///
    /// Transforms propagate first (clean subtrees do no matrix work), then
    /// every instanced object in the subtree whose instances moved since its
    /// last upload pushes its full matrix array to `uploads`. Returns the
    /// number of instance uploads issued.
    ///
    /// `root` must be a top-level object or one whose ancestors are current.
    pub fn update(&mut self, root: ObjectId, uploads: &mut impl InstanceUpload) -> usize {
        let transform = self[root].transform;
        self.graph.update(transform, false);
        self.flush_instances(root, uploads)
    }

    fn flush_instances(&mut self, id: ObjectId, uploads: &mut impl InstanceUpload) -> usize {
        let mut uploaded = 0;

        if let ObjectKind::Instanced(set) = &mut self.objects[id.index()].kind {
            let mut moved = false;
            for &instance in &set.transforms {
                // Instances parented outside this subtree are not reached by
                // the propagation pass above
                if self.graph[instance].is_dirty() {
                    self.graph.update(instance, false);
                }
                moved |= self.graph.take_recomputed(instance);
            }

            if moved {
                set.matrices.clear();
                set.matrices.extend(
                    set.transforms
                        .iter()
                        .map(|instance| *self.graph.world_matrix(*instance)),
                );
                uploads.upload_instances(set.buffer, &set.matrices);
                uploaded += 1;
            }
        }

        for i in 0..self.objects[id.index()].children.len() {
            let child = self.objects[id.index()].children[i];
            uploaded += self.flush_instances(child, uploads);
        }

        uploaded
    }

    /// Draws the subtree under `root` and returns the number of draw calls.
    ///
    /// Hidden objects are skipped together with their children. Objects
    /// without a renderable draw nothing but still recurse.
    pub fn draw(&self, root: ObjectId, backend: &mut impl RenderBackend) -> u32 {
        let object = &self[root];
        if !object.visible {
            return 0;
        }

        let mut draw_calls = 0;
        if let Some(renderable) = object.renderable {
            let world = self.graph.world_matrix(object.transform);
            backend.use_program(renderable.shader);

            match &object.kind {
                ObjectKind::Plain => {
                    backend.set_mat4(renderable.shader, "model", world);
                    backend.draw_mesh(renderable.mesh, renderable.shader);
                }
                ObjectKind::Instanced(set) => {
                    backend.set_mat4(renderable.shader, "mainObjectModel", world);
                    backend.draw_mesh_instanced(
                        renderable.mesh,
                        renderable.shader,
                        set.transforms.len() as u32,
                    );
                }
            }
            draw_calls += 1;
        }

        for child in &object.children {
            draw_calls += self.draw(*child, backend);
        }

        draw_calls
    }

    fn push(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    fn check(&self, id: ObjectId) -> SceneResult<()> {
        if id.index() < self.objects.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownObject(id))
        }
    }
}

impl Index<ObjectId> for Scene {
    type Output = Object;

    fn index(&self, id: ObjectId) -> &Object {
        self.objects.get(id.index()).unwrap_or_else(|| {
            panic!(
                "object {:?} out of range (scene holds {})",
                id,
                self.objects.len()
            )
        })
    }
}

impl IndexMut<ObjectId> for Scene {
    fn index_mut(&mut self, id: ObjectId) -> &mut Object {
        let len = self.objects.len();
        self.objects
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("object {:?} out of range (scene holds {})", id, len))
    }
}
