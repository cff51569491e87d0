//! Slab-backed graph container.
//!
//! Vertices and edges live in slab vectors; slots are tombstoned on removal
//! and ids are never reused within one graph, so iterating ids in ascending
//! order always equals insertion order. Queries that return id lists return
//! fresh `Vec`s, which lets callers delete entries mid-iteration.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u32);

impl VertexId {
    /// Slot index; side tables keyed by vertex should be sized to
    /// [`Graph::vertex_limit`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Copyable read view of one edge. Follow predicates receive this view, so
/// they can look at the endpoints and the cut state without borrowing the
/// graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo {
    pub id: EdgeId,
    pub from: VertexId,
    pub to: VertexId,
    pub weight: i32,
    pub cutable: bool,
    pub cut: bool,
}

/// Follows every edge. Algorithms additionally gate on `weight > 0`.
pub fn follow_always(_e: &EdgeInfo) -> bool {
    true
}

/// Follows only edges that may not be cut.
pub fn follow_not_cutable(e: &EdgeInfo) -> bool {
    !e.cutable
}

#[derive(Debug, Clone)]
struct VertexSlot<N> {
    label: N,
    name: Option<String>,
    color: u32,
    rank: u32,
    out_edges: Vec<EdgeId>,
    in_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeSlot<E> {
    label: E,
    from: VertexId,
    to: VertexId,
    weight: i32,
    cutable: bool,
    cut: bool,
}

#[derive(Debug, Clone)]
pub struct Graph<N = (), E = ()> {
    vertices: Vec<Option<VertexSlot<N>>>,
    edges: Vec<Option<EdgeSlot<E>>>,
    vertex_count: usize,
    edge_count: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            vertex_count: 0,
            edge_count: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// One past the highest vertex slot ever allocated, including tombstones.
    pub fn vertex_limit(&self) -> usize {
        self.vertices.len()
    }

    /// One past the highest edge slot ever allocated, including tombstones.
    pub fn edge_limit(&self) -> usize {
        self.edges.len()
    }

    fn vertex_slot(&self, v: VertexId) -> Option<&VertexSlot<N>> {
        self.vertices.get(v.index()).and_then(|s| s.as_ref())
    }

    fn vertex_slot_mut(&mut self, v: VertexId) -> Option<&mut VertexSlot<N>> {
        self.vertices.get_mut(v.index()).and_then(|s| s.as_mut())
    }

    fn edge_slot(&self, e: EdgeId) -> Option<&EdgeSlot<E>> {
        self.edges.get(e.index()).and_then(|s| s.as_ref())
    }

    fn edge_slot_mut(&mut self, e: EdgeId) -> Option<&mut EdgeSlot<E>> {
        self.edges.get_mut(e.index()).and_then(|s| s.as_mut())
    }

    pub fn is_vertex(&self, v: VertexId) -> bool {
        self.vertex_slot(v).is_some()
    }

    pub fn is_edge(&self, e: EdgeId) -> bool {
        self.edge_slot(e).is_some()
    }

    pub fn add_vertex(&mut self, label: N) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(VertexSlot {
            label,
            name: None,
            color: 0,
            rank: 0,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }));
        self.vertex_count += 1;
        id
    }

    pub fn add_named_vertex(&mut self, name: impl Into<String>, label: N) -> VertexId {
        let id = self.add_vertex(label);
        if let Some(slot) = self.vertex_slot_mut(id) {
            slot.name = Some(name.into());
        }
        id
    }

    /// Adds a directed edge. Both endpoints must be live.
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        weight: i32,
        cutable: bool,
        label: E,
    ) -> EdgeId {
        debug_assert!(
            self.is_vertex(from) && self.is_vertex(to),
            "edge endpoints must be live vertices"
        );
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(EdgeSlot {
            label,
            from,
            to,
            weight,
            cutable,
            cut: false,
        }));
        self.edge_count += 1;
        if let Some(slot) = self.vertex_slot_mut(from) {
            slot.out_edges.push(id);
        }
        if let Some(slot) = self.vertex_slot_mut(to) {
            slot.in_edges.push(id);
        }
        id
    }

    pub fn vertex(&self, v: VertexId) -> Option<&N> {
        self.vertex_slot(v).map(|s| &s.label)
    }

    pub fn vertex_mut(&mut self, v: VertexId) -> Option<&mut N> {
        self.vertex_slot_mut(v).map(|s| &mut s.label)
    }

    /// Display name for diagnostics: the assigned name, or `v{n}`.
    pub fn name(&self, v: VertexId) -> Cow<'_, str> {
        match self.vertex_slot(v).and_then(|s| s.name.as_deref()) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(v.to_string()),
        }
    }

    pub fn color(&self, v: VertexId) -> u32 {
        self.vertex_slot(v).map_or(0, |s| s.color)
    }

    pub fn set_color(&mut self, v: VertexId, color: u32) {
        if let Some(slot) = self.vertex_slot_mut(v) {
            slot.color = color;
        }
    }

    pub fn rank(&self, v: VertexId) -> u32 {
        self.vertex_slot(v).map_or(0, |s| s.rank)
    }

    pub fn set_rank(&mut self, v: VertexId, rank: u32) {
        if let Some(slot) = self.vertex_slot_mut(v) {
            slot.rank = rank;
        }
    }

    /// Live vertex ids in insertion order. A snapshot: callers may remove
    /// vertices while walking it.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| VertexId(i as u32))
            .collect()
    }

    /// Live edge ids in insertion order. A snapshot, like [`Graph::vertex_ids`].
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| EdgeId(i as u32))
            .collect()
    }

    pub fn edge(&self, e: EdgeId) -> Option<EdgeInfo> {
        self.edge_slot(e).map(|s| EdgeInfo {
            id: e,
            from: s.from,
            to: s.to,
            weight: s.weight,
            cutable: s.cutable,
            cut: s.cut,
        })
    }

    pub fn edge_label(&self, e: EdgeId) -> Option<&E> {
        self.edge_slot(e).map(|s| &s.label)
    }

    pub fn edge_label_mut(&mut self, e: EdgeId) -> Option<&mut E> {
        self.edge_slot_mut(e).map(|s| &mut s.label)
    }

    pub fn set_weight(&mut self, e: EdgeId, weight: i32) {
        if let Some(slot) = self.edge_slot_mut(e) {
            slot.weight = weight;
        }
    }

    pub fn set_cutable(&mut self, e: EdgeId, cutable: bool) {
        if let Some(slot) = self.edge_slot_mut(e) {
            slot.cutable = cutable;
        }
    }

    /// Marks the edge cut and zeroes its weight, so weight-gated follow
    /// predicates stop seeing it. The edge itself stays in the graph.
    pub fn cut(&mut self, e: EdgeId) {
        if let Some(slot) = self.edge_slot_mut(e) {
            slot.cut = true;
            slot.weight = 0;
        }
    }

    /// Out-edge ids of `v` in insertion order, as a snapshot.
    pub fn out_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.vertex_slot(v).map_or(Vec::new(), |s| s.out_edges.clone())
    }

    /// In-edge ids of `v` in insertion order, as a snapshot.
    pub fn in_edges(&self, v: VertexId) -> Vec<EdgeId> {
        self.vertex_slot(v).map_or(Vec::new(), |s| s.in_edges.clone())
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.vertex_slot(v).map_or(0, |s| s.out_edges.len())
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.vertex_slot(v).map_or(0, |s| s.in_edges.len())
    }

    pub fn first_out_edge(&self, v: VertexId) -> Option<EdgeId> {
        self.vertex_slot(v).and_then(|s| s.out_edges.first().copied())
    }

    pub fn first_in_edge(&self, v: VertexId) -> Option<EdgeId> {
        self.vertex_slot(v).and_then(|s| s.in_edges.first().copied())
    }

    /// Unlinks the edge from both endpoints and tombstones its slot.
    pub fn remove_edge(&mut self, e: EdgeId) -> bool {
        let Some(slot) = self.edges.get_mut(e.index()).and_then(|s| s.take()) else {
            return false;
        };
        self.edge_count -= 1;
        if let Some(v) = self.vertex_slot_mut(slot.from) {
            v.out_edges.retain(|&x| x != e);
        }
        if let Some(v) = self.vertex_slot_mut(slot.to) {
            v.in_edges.retain(|&x| x != e);
        }
        true
    }

    /// Removes the vertex together with all incident edges.
    pub fn remove_vertex(&mut self, v: VertexId) -> bool {
        if !self.is_vertex(v) {
            return false;
        }
        for e in self.out_edges(v) {
            self.remove_edge(e);
        }
        for e in self.in_edges(v) {
            self.remove_edge(e);
        }
        if let Some(slot) = self.vertices.get_mut(v.index()) {
            if slot.take().is_some() {
                self.vertex_count -= 1;
            }
        }
        true
    }
}
