//! Scene-graph abstraction: nodes are property bags the host renders

use crate::texture::DrawableHandle;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;
use std::collections::BTreeMap;

/// Handle to one node in a scene graph. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub u64);

/// A sprite node: what to draw and where
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub drawable: DrawableHandle,
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl Node {
    pub fn new(drawable: DrawableHandle) -> Self {
        Self {
            drawable,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

/// The operations an effect needs from the host's scene graph.
///
/// Lookups return `None` for nodes that no longer exist; callers treat that as
/// "skip this particle this frame".
pub trait SceneGraph {
    /// Attach a new node drawing `drawable` and return its id
    fn add_child(&mut self, drawable: DrawableHandle) -> NodeId;

    /// Detach one node. Unknown ids are ignored.
    fn remove_child(&mut self, id: NodeId);

    /// Detach every node
    fn remove_all_children(&mut self);

    fn node(&self, id: NodeId) -> Option<&Node>;

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;

    fn child_count(&self) -> usize;

    /// Set a node's alpha, clamped to [0, 1]
    fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        if let Some(node) = self.node_mut(id) {
            node.alpha = alpha.clamp(0.0, 1.0);
        }
    }
}

/// GPU instance data for one visible node.
/// 32 bytes: position, rotation, scale, alpha, drawable id, padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct SpriteInstance {
    /// xy = position, z = rotation, w = scale
    pub pos_rot_scale: [f32; 4],
    pub alpha: f32,
    pub drawable: u32,
    pub _pad: [u32; 2],
}

impl SpriteInstance {
    pub fn from_node(node: &Node) -> Self {
        Self {
            pos_rot_scale: [node.position.x, node.position.y, node.rotation, node.scale],
            alpha: node.alpha,
            drawable: node.drawable.0,
            _pad: [0; 2],
        }
    }
}

/// In-memory scene graph for headless hosts and tests.
/// Iteration order is insertion order, which is also draw order.
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn visible_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_visible()).count()
    }

    /// Highest alpha of any node, 0.0 for an empty scene
    pub fn max_alpha(&self) -> f32 {
        self.nodes.values().map(|n| n.alpha).fold(0.0, f32::max)
    }

    /// Pack visible nodes into `out` (cleared first), ready for instanced drawing
    pub fn pack_instances(&self, out: &mut Vec<SpriteInstance>) {
        out.clear();
        out.extend(
            self.nodes
                .values()
                .filter(|n| n.is_visible())
                .map(SpriteInstance::from_node),
        );
    }
}

impl SceneGraph for SceneTree {
    fn add_child(&mut self, drawable: DrawableHandle) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(drawable));
        id
    }

    fn remove_child(&mut self, id: NodeId) {
        self.nodes.remove(&id);
    }

    fn remove_all_children(&mut self) {
        self.nodes.clear();
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn child_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_nodes() {
        let mut scene = SceneTree::new();
        let a = scene.add_child(DrawableHandle(1));
        let b = scene.add_child(DrawableHandle(2));
        assert_ne!(a, b);
        assert_eq!(scene.child_count(), 2);

        scene.remove_child(a);
        assert!(scene.node(a).is_none());
        assert_eq!(scene.child_count(), 1);

        // removing twice and touching a removed node are no-ops
        scene.remove_child(a);
        scene.set_alpha(a, 1.0);
        assert_eq!(scene.child_count(), 1);

        scene.remove_all_children();
        assert_eq!(scene.child_count(), 0);
        // ids keep increasing after a clear
        let c = scene.add_child(DrawableHandle(3));
        assert!(c > b);
    }

    #[test]
    fn set_alpha_clamps() {
        let mut scene = SceneTree::new();
        let id = scene.add_child(DrawableHandle(0));
        scene.set_alpha(id, 1.7);
        assert_eq!(scene.node(id).unwrap().alpha, 1.0);
        scene.set_alpha(id, 0.4);
        assert!((scene.node(id).unwrap().alpha - 0.4).abs() < 1e-6);
        scene.set_alpha(id, -2.0);
        assert_eq!(scene.node(id).unwrap().alpha, 0.0);
    }

    #[test]
    fn pack_skips_invisible_nodes() {
        let mut scene = SceneTree::new();
        let a = scene.add_child(DrawableHandle(4));
        let b = scene.add_child(DrawableHandle(5));
        scene.set_alpha(a, 0.0);
        if let Some(node) = scene.node_mut(b) {
            node.position = Vec2::new(10.0, 20.0);
            node.scale = 2.0;
        }
        let mut out = Vec::new();
        scene.pack_instances(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].drawable, 5);
        assert_eq!(out[0].pos_rot_scale, [10.0, 20.0, 0.0, 2.0]);
        assert_eq!(scene.visible_count(), 1);
    }

    #[test]
    fn sprite_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 32);
        assert_eq!(std::mem::align_of::<SpriteInstance>(), 4);
    }
}
