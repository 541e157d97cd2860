//! Chain nodes and the slot arena that owns them.
//!
//! Buckets and successor links are `NodeId`s into the arena rather than pointers, so a
//! node can be detached from one bucket array and relinked into another without moving
//! its key or value.

use std::ops::{Index, IndexMut};

use crate::common::config::NodeId;

/// A singly linked key/value cell of a collision chain.
#[derive(Debug)]
pub(crate) struct ChainNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) next: Option<NodeId>,
}

impl<K, V> ChainNode<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            next: None,
        }
    }
}

/// Slot storage for chain nodes. Released slots are recycled through a free list.
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<ChainNode<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Stores `node` and returns its id, reusing a released slot when one exists.
    pub(crate) fn alloc(&mut self, node: ChainNode<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Removes the node at `id` from the arena, handing ownership to the caller.
    pub(crate) fn take(&mut self, id: NodeId) -> ChainNode<K, V> {
        match self.slots[id].take() {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("chain link {} points at a released node", id),
        }
    }

    /// Number of nodes currently stored.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots held, live or released.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Gives back the released slots at the end of the arena.
    ///
    /// Live nodes never move, so released slots below the last live node stay on the
    /// free list.
    pub(crate) fn trim(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let end = self.slots.len();
        self.free.retain(|&id| id < end);
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Walks the chain starting at `head`.
    pub(crate) fn chain(&self, head: Option<NodeId>) -> Chain<'_, K, V> {
        Chain {
            arena: self,
            cursor: head,
        }
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = ChainNode<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id] {
            Some(node) => node,
            None => panic!("chain link {} points at a released node", id),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id] {
            Some(node) => node,
            None => panic!("chain link {} points at a released node", id),
        }
    }
}

/// Iterator over the nodes of one chain, head first.
pub(crate) struct Chain<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    cursor: Option<NodeId>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (NodeId, &'a ChainNode<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = &self.arena[id];
        self.cursor = node.next;
        Some((id, node))
    }
}
