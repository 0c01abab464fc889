// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory retained surface.

use std::collections::BTreeMap;

use super::{DrawCommand, Layer, NodeId, Surface};

#[derive(Debug, Clone)]
struct Node {
    layer: Layer,
    commands: Vec<DrawCommand>,
}

/// Retained node tree that records every draw command.
///
/// Node ids are never reused, so a test can tell a repainted mark from a
/// recreated one.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    created: u64,
    removed: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn layer_of(&self, node: NodeId) -> Option<Layer> {
        self.nodes.get(&node).map(|n| n.layer)
    }

    /// Commands drawn into `node`, empty when it does not exist.
    pub fn commands(&self, node: NodeId) -> &[DrawCommand] {
        self.nodes.get(&node).map(|n| n.commands.as_slice()).unwrap_or_default()
    }

    /// Nodes on `layer`, in creation order.
    pub fn nodes_on(&self, layer: Layer) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.layer == layer)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every command in paint order: by layer, then by node creation.
    pub fn paint_order(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        [Layer::Base, Layer::Overlay, Layer::Controls]
            .into_iter()
            .flat_map(move |layer| {
                self.nodes
                    .values()
                    .filter(move |n| n.layer == layer)
                    .flat_map(|n| n.commands.iter())
            })
    }

    /// Total nodes ever created on this scene.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total nodes ever removed from this scene.
    pub fn removed_count(&self) -> u64 {
        self.removed
    }
}

impl Surface for Scene {
    fn create_node(&mut self, layer: Layer) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.nodes.insert(
            id,
            Node {
                layer,
                commands: Vec::new(),
            },
        );
        id
    }

    fn remove_node(&mut self, node: NodeId) {
        if self.nodes.remove(&node).is_some() {
            self.removed += 1;
        }
    }

    fn clear_node(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.commands.clear();
        }
    }

    fn draw(&mut self, node: NodeId, command: DrawCommand) {
        match self.nodes.get_mut(&node) {
            Some(n) => n.commands.push(command),
            None => log::debug!("Dropping draw into missing node {:?}", node),
        }
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
