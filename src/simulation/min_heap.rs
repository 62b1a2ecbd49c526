//! Indexed binary min-heap driving the route planner's searches.
//!
//! Each vertex sits in the heap at most once. A slot table maps every vertex
//! to its current heap index so `contains` is O(1) and `decrease_priority`
//! updates the entry in place instead of pushing a duplicate.

use ordered_float::OrderedFloat;

use super::error::{SimError, SimResult};
use super::types::JunctionId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HeapNode {
    pub vertex: JunctionId,
    pub dist: f32,
    pub priority: OrderedFloat<f32>,
}

#[derive(Debug)]
pub(crate) struct MinHeap {
    nodes: Vec<HeapNode>,
    /// Heap index of each vertex, `None` while it is not in the heap
    slots: Vec<Option<usize>>,
    capacity: usize,
}

impl MinHeap {
    /// A heap for a graph with `capacity` vertices
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            slots: vec![None; capacity],
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, vertex: JunctionId) -> bool {
        self.slots.get(vertex.index()).copied().flatten().is_some()
    }

    pub fn insert(&mut self, vertex: JunctionId, dist: f32, priority: f32) -> SimResult<()> {
        if vertex.index() >= self.capacity {
            return Err(SimError::junction(vertex.index()));
        }
        if self.contains(vertex) {
            self.decrease_priority(vertex, dist, priority);
            return Ok(());
        }
        if self.nodes.len() >= self.capacity {
            return Err(SimError::HeapFull(self.capacity));
        }

        let index = self.nodes.len();
        self.nodes.push(HeapNode {
            vertex,
            dist,
            priority: OrderedFloat(priority),
        });
        self.slots[vertex.index()] = Some(index);
        self.sift_up(index);
        Ok(())
    }

    pub fn extract_min(&mut self) -> SimResult<HeapNode> {
        if self.nodes.is_empty() {
            return Err(SimError::EmptyHeap);
        }

        let last = self.nodes.len() - 1;
        self.swap(0, last);
        let min = self.nodes.pop().ok_or(SimError::EmptyHeap)?;
        self.slots[min.vertex.index()] = None;

        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Rewrites a queued vertex's key in place. Returns false if the vertex is
    /// not queued.
    ///
    /// Searches only ever lower a key, but a raised key sinks back down so
    /// the heap stays ordered either way.
    pub fn decrease_priority(&mut self, vertex: JunctionId, dist: f32, priority: f32) -> bool {
        let Some(index) = self.slots.get(vertex.index()).copied().flatten() else {
            return false;
        };

        let node = &mut self.nodes[index];
        let old = node.priority;
        node.dist = dist;
        node.priority = OrderedFloat(priority);
        if node.priority < old {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
        true
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
        self.slots[self.nodes[a].vertex.index()] = Some(a);
        self.slots[self.nodes[b].vertex.index()] = Some(b);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].priority < self.nodes[parent].priority {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < self.nodes.len() && self.nodes[left].priority < self.nodes[smallest].priority
            {
                smallest = left;
            }
            if right < self.nodes.len()
                && self.nodes[right].priority < self.nodes[smallest].priority
            {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}
