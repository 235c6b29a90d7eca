//! # Transform Graph
//!
//! Arena of [`Transform`]s linked by parent/child indices. The graph owns
//! every transform; links are plain [`TransformId`]s, so there is nothing to
//! dangle when a subtree is dropped with the arena.
//!
//! ## Propagation
//!
//! [`TransformGraph::update`] walks a subtree root-to-leaf. A node is
//! recomputed when it is dirty itself or when any ancestor was recomputed in
//! the same walk, and that combined flag is handed to every child. A clean
//! subtree under a clean ancestor is visited but performs no matrix work.

use std::ops::{Index, IndexMut};

use cgmath::Matrix4;

use super::transform::Transform;
use crate::error::{SceneError, SceneResult};

/// Stable handle to a transform in a [`TransformGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformId(u32);

impl TransformId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

#[derive(Debug)]
struct TransformNode {
    transform: Transform,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
    /// Set whenever the world matrix is rebuilt, cleared by `take_recomputed`
    recomputed: bool,
}

/// Owning arena of transforms with hierarchical world-matrix propagation
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: Vec<TransformNode>,
    recompute_count: u64,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            recompute_count: 0,
        }
    }

    /// Adds a parentless transform and returns its handle
    pub fn insert(&mut self, transform: Transform) -> TransformId {
        let id = TransformId(self.nodes.len() as u32);
        self.nodes.push(TransformNode {
            transform,
            parent: None,
            children: Vec::new(),
            recomputed: false,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: TransformId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.nodes.get(id.index()).map(|node| &node.transform)
    }

    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.index()).map(|node| &mut node.transform)
    }

    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.node(id).parent
    }

    pub fn children(&self, id: TransformId) -> &[TransformId] {
        &self.node(id).children
    }

    /// Cached world matrix of `id`
    pub fn world_matrix(&self, id: TransformId) -> &Matrix4<f32> {
        self.node(id).transform.world_matrix()
    }

    /// Iterator over every transform without a parent
    pub fn roots(&self) -> impl Iterator<Item = TransformId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| TransformId(index as u32))
    }

    /// Total number of world-matrix recomputations since creation
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Returns whether `id` was recomputed since the last call, and clears the mark
    pub fn take_recomputed(&mut self, id: TransformId) -> bool {
        let node = self.node_mut(id);
        std::mem::replace(&mut node.recomputed, false)
    }

    /// Returns true when `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: TransformId, node: TransformId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }

    /// Links `child` under `parent`.
    ///
    /// Wiring is a one-time setup step: a transform that already has a parent
    /// is rejected, as is any link that would close a cycle. The child is
    /// marked dirty so its next update composes with the parent.
    pub fn set_parent(&mut self, child: TransformId, parent: TransformId) -> SceneResult<()> {
        self.check(child)?;
        self.check(parent)?;

        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { child, parent });
        }
        if self.nodes[child.index()].parent.is_some() {
            return Err(SceneError::AlreadyParented(child));
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[child.index()].transform.mark_dirty();
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Same as [`set_parent`](Self::set_parent) with the arguments flipped
    pub fn add_child(&mut self, parent: TransformId, child: TransformId) -> SceneResult<()> {
        self.set_parent(child, parent)
    }

    /// Propagates world matrices through the subtree rooted at `id`.
    ///
    /// `parent_dirty` is the invalidation signal from above; pass `false`
    /// when starting at a root. When `id` has a parent, its cached world
    /// matrix must already be current (ancestors update first).
    ///
    /// # Panics
    /// If `id` does not belong to this graph.
    pub fn update(&mut self, id: TransformId, parent_dirty: bool) {
        let index = self.node_index(id);
        let effective = parent_dirty || self.nodes[index].transform.is_dirty();

        if effective {
            let parent_world = self.nodes[index]
                .parent
                .map(|parent| *self.nodes[parent.index()].transform.world_matrix());

            let node = &mut self.nodes[index];
            node.transform.compute_world_matrix(parent_world.as_ref());
            node.recomputed = true;
            self.recompute_count += 1;
        }

        for i in 0..self.nodes[index].children.len() {
            let child = self.nodes[index].children[i];
            self.update(child, effective);
        }
    }

    /// Updates every root subtree
    pub fn update_all(&mut self) {
        let roots: Vec<TransformId> = self.roots().collect();
        for root in roots {
            self.update(root, false);
        }
    }

    fn check(&self, id: TransformId) -> SceneResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SceneError::UnknownTransform(id))
        }
    }

    fn node_index(&self, id: TransformId) -> usize {
        assert!(
            self.contains(id),
            "transform {:?} out of range (graph holds {})",
            id,
            self.nodes.len()
        );
        id.index()
    }

    fn node(&self, id: TransformId) -> &TransformNode {
        &self.nodes[self.node_index(id)]
    }

    fn node_mut(&mut self, id: TransformId) -> &mut TransformNode {
        let index = self.node_index(id);
        &mut self.nodes[index]
    }
}

impl Index<TransformId> for TransformGraph {
    type Output = Transform;

    fn index(&self, id: TransformId) -> &Transform {
        &self.node(id).transform
    }
}

impl IndexMut<TransformId> for TransformGraph {
    fn index_mut(&mut self, id: TransformId) -> &mut Transform {
        &mut self.node_mut(id).transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn chain(graph: &mut TransformGraph, len: usize) -> Vec<TransformId> {
        let mut ids = Vec::new();
        for i in 0..len {
            let id = graph.insert(Transform::new());
            if i > 0 {
                graph.set_parent(id, ids[i - 1]).unwrap();
            }
            ids.push(id);
        }
        ids
    }

    #[test]
    fn test_two_level_composition() {
        let mut graph = TransformGraph::new();
        let parent = graph.insert(Transform::from_position(Vector3::new(1.0, 0.0, 0.0)));
        let child = graph.insert(Transform::from_position(Vector3::new(0.0, 2.0, 0.0)));
        graph.set_parent(child, parent).unwrap();

        graph.update(parent, false);

        let origin = graph[child].transform_point(Vector3::zero());
        assert_eq!(origin, Vector3::new(1.0, 2.0, 0.0));
        assert!(!graph[parent].is_dirty());
        assert!(!graph[child].is_dirty());
    }

    #[test]
    fn test_second_update_does_no_work() {
        let mut graph = TransformGraph::new();
        let ids = chain(&mut graph, 5);

        graph.update(ids[0], false);
        assert_eq!(graph.recompute_count(), 5);
        let before: Vec<Matrix4<f32>> = ids.iter().map(|id| *graph.world_matrix(*id)).collect();

        graph.update(ids[0], false);
        assert_eq!(graph.recompute_count(), 5);
        let after: Vec<Matrix4<f32>> = ids.iter().map(|id| *graph.world_matrix(*id)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_dirty_ancestor_forces_clean_descendants() {
        let mut graph = TransformGraph::new();
        let ids = chain(&mut graph, 3);
        graph.update(ids[0], false);
        let count = graph.recompute_count();

        graph[ids[0]].set_local_position(Vector3::new(0.0, 0.0, 5.0));
        assert!(!graph[ids[2]].is_dirty());
        graph.update(ids[0], false);

        assert_eq!(graph.recompute_count(), count + 3);
        let leaf = graph[ids[2]].transform_point(Vector3::zero());
        assert_eq!(leaf, Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_clean_parent_still_reaches_dirty_child() {
        let mut graph = TransformGraph::new();
        let ids = chain(&mut graph, 3);
        graph.update(ids[0], false);
        let count = graph.recompute_count();

        graph[ids[1]].set_local_position(Vector3::new(3.0, 0.0, 0.0));
        graph.update(ids[0], false);

        // Only the mutated node and its single descendant
        assert_eq!(graph.recompute_count(), count + 2);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut graph = TransformGraph::new();
        let ids = chain(&mut graph, 3);
        let loose = graph.insert(Transform::new());

        assert_eq!(
            graph.set_parent(ids[0], ids[2]),
            Err(SceneError::Cycle {
                child: ids[0],
                parent: ids[2]
            })
        );
        assert_eq!(
            graph.set_parent(loose, loose),
            Err(SceneError::Cycle {
                child: loose,
                parent: loose
            })
        );
    }

    #[test]
    fn test_set_parent_rejects_reparenting_and_unknown_ids() {
        let mut graph = TransformGraph::new();
        let ids = chain(&mut graph, 2);
        let other = graph.insert(Transform::new());

        assert_eq!(
            graph.set_parent(ids[1], other),
            Err(SceneError::AlreadyParented(ids[1]))
        );

        let mut small = TransformGraph::new();
        small.insert(Transform::new());
        assert_eq!(
            small.add_child(TransformId(0), other),
            Err(SceneError::UnknownTransform(other))
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_update_unknown_id_panics() {
        let mut graph = TransformGraph::new();
        graph.update(TransformId(3), false);
    }

    #[test]
    fn test_random_trees_only_recompute_mutated_subtree() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let mut graph = TransformGraph::new();
            let count = rng.random_range(2..60);
            let mut ids = Vec::with_capacity(count);

            for i in 0..count {
                let mut transform = Transform::new();
                transform.set_local_position(Vector3::new(
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                ));
                transform.set_local_rotation(Vector3::new(0.0, rng.random_range(0.0..360.0), 0.0));
                let id = graph.insert(transform);
                // Roughly one in five nodes starts a new root
                if i > 0 && rng.random_range(0..5) != 0 {
                    let parent = ids[rng.random_range(0..i)];
                    graph.set_parent(id, parent).unwrap();
                }
                ids.push(id);
            }

            graph.update_all();
            for id in &ids {
                graph.take_recomputed(*id);
            }
            let before: Vec<Matrix4<f32>> =
                ids.iter().map(|id| *graph.world_matrix(*id)).collect();

            let mutated = ids[rng.random_range(0..count)];
            graph[mutated].set_local_scale(Vector3::new(2.0, 2.0, 2.0));
            graph.update_all();

            for (i, id) in ids.iter().enumerate() {
                let in_subtree = graph.is_ancestor(mutated, *id);
                assert_eq!(graph.take_recomputed(*id), in_subtree);
                if !in_subtree {
                    assert_eq!(*graph.world_matrix(*id), before[i]);
                }
            }
        }
    }
}
