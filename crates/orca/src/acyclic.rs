//! The feedback-arc reducer.
//!
//! The caller's graph is never restructured: the reducer works on a private
//! *work graph* holding one vertex per original vertex inside a
//! strongly-connected component, rewrites that work graph until only the
//! hard decisions remain, and finally marks losing original edges cut. Each
//! work edge carries a group of the original edges it stands for; cutting
//! the work edge cuts them all.

use std::collections::VecDeque;

use orca_graph::alg;
use orca_graph::{EdgeId, EdgeInfo, Graph, VertexId, follow_always, follow_not_cutable};
use rustc_hash::FxHashMap;

use crate::AcyclicOptions;

mod place;
mod simplify;

/// Breaks every cycle reachable through `follow` by cutting a low-weight set
/// of cutable edges. Mutates `g` in place through [`Graph::cut`]; failing to
/// find a minimal set is not an error. An uncutable cycle is reported at
/// `error!` level and broken best-effort.
///
/// An edge participates only when `follow` accepts it and its weight is
/// positive; since cutting zeroes the weight, running `acyclic` again cuts
/// nothing new.
pub fn acyclic<N, E>(g: &mut Graph<N, E>, follow: impl Fn(&EdgeInfo) -> bool) {
    acyclic_with(g, follow, &AcyclicOptions::default());
}

/// [`acyclic`] with explicit options.
pub fn acyclic_with<N, E>(
    g: &mut Graph<N, E>,
    follow: impl Fn(&EdgeInfo) -> bool,
    options: &AcyclicOptions,
) {
    tracing::debug!("acyclic begin");
    let acyc = Acyc {
        orig: g,
        follow,
        options,
        work: Graph::new(),
        groups: EdgeGroups::default(),
        pending: VecDeque::new(),
        place_step: 0,
    };
    acyc.main();
    tracing::debug!("acyclic done");
}

/// Work-graph vertex payload.
#[derive(Debug, Clone)]
struct WorkNode {
    /// First original vertex this work vertex stands for.
    orig: VertexId,
    /// Rank held until a placement attempt commits.
    stored_rank: u32,
    /// True while the vertex is linked on the pending queue.
    on_work_list: bool,
    /// Tombstone; flagged vertices are swept after the simplifier settles.
    deleted: bool,
    /// Placement attempt that last touched this vertex.
    visit: u32,
}

impl WorkNode {
    fn new(orig: VertexId) -> Self {
        Self {
            orig,
            stored_rank: 0,
            on_work_list: false,
            deleted: false,
            visit: 0,
        }
    }
}

/// Work-graph edge payload: the group of original edges this edge stands for.
#[derive(Debug, Clone, Copy, Default)]
struct WorkEdge {
    group: Option<GroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupId(u32);

/// Arena of original-edge groups. Groups are allocated as work edges pick up
/// original edges, concatenated when work edges merge, and all freed together
/// when the reducer is dropped; a group emptied by a merge just stays behind
/// in the arena.
#[derive(Debug, Default)]
struct EdgeGroups {
    groups: Vec<Vec<EdgeId>>,
}

impl EdgeGroups {
    fn alloc(&mut self) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(Vec::new());
        id
    }

    fn push(&mut self, group: GroupId, orig_e: EdgeId) {
        self.groups[group.0 as usize].push(orig_e);
    }

    fn concat(&mut self, into: GroupId, from: GroupId) {
        if into == from {
            return;
        }
        let moved = std::mem::take(&mut self.groups[from.0 as usize]);
        self.groups[into.0 as usize].extend(moved);
    }

    fn edges(&self, group: GroupId) -> &[EdgeId] {
        &self.groups[group.0 as usize]
    }
}

struct Acyc<'a, N, E, F> {
    /// The caller's graph. Only edge cut flags are written back.
    orig: &'a mut Graph<N, E>,
    follow: F,
    options: &'a AcyclicOptions,
    /// The work graph; ids below are work ids unless named `orig`.
    work: Graph<WorkNode, WorkEdge>,
    groups: EdgeGroups,
    /// FIFO of work vertices pending re-examination; doubles as the undo log
    /// of rank changes during placement.
    pending: VecDeque<VertexId>,
    /// Bumped once per placement attempt, so visit marks need no clearing.
    place_step: u32,
}

impl<N, E, F: Fn(&EdgeInfo) -> bool> Acyc<'_, N, E, F> {
    fn main(mut self) {
        // Color so that vertices share a nonzero color exactly when a cycle
        // can run through them.
        alg::strongly_connected(self.orig, &self.follow);

        self.build();
        self.dump("acyc_pre", 6);

        // Settle the cheap rewrites before any cutting happens.
        self.simplify(false);
        self.dump("acyc_simp", 5);

        tracing::debug!("cutting trivial loops");
        self.simplify(true);
        self.dump("acyc_mid", 6);

        tracing::debug!("ranking");
        if let Err(err) = alg::rank(&mut self.work, follow_not_cutable) {
            tracing::error!(%err, "uncutable subgraph is not acyclic");
        }
        self.dump("acyc_rank", 6);

        tracing::debug!("placement");
        self.place();
        self.dump("acyc_place", 6);

        // Re-rank across every remaining edge purely to check the result is
        // a DAG.
        if let Err(err) = alg::rank(&mut self.work, follow_always) {
            debug_assert!(false, "placement left a loop: {err}");
            tracing::error!(%err, "placement left a loop");
        }
        self.dump("acyc_done", 6);
    }

    fn follow_orig(&self, info: &EdgeInfo) -> bool {
        info.weight > 0 && (self.follow)(info)
    }

    /// Projects the colored original graph onto the work graph: one work
    /// vertex per colored original vertex, one work edge per surviving
    /// original edge between colored vertices. Parallel originals become
    /// parallel work edges here; the duplicate rewrite merges them later.
    fn build(&mut self) {
        let mut vertex_map: FxHashMap<VertexId, VertexId> = FxHashMap::default();
        for v in self.orig.vertex_ids() {
            if self.orig.color(v) != 0 {
                let name = self.orig.name(v).into_owned();
                let a = self.work.add_named_vertex(name, WorkNode::new(v));
                vertex_map.insert(v, a);
            }
        }
        for v in self.orig.vertex_ids() {
            let Some(&a) = vertex_map.get(&v) else {
                continue;
            };
            for e in self.orig.out_edges(v) {
                let Some(info) = self.orig.edge(e) else {
                    continue;
                };
                if !self.follow_orig(&info) || self.orig.color(info.to) == 0 {
                    continue;
                }
                let Some(&b) = vertex_map.get(&info.to) else {
                    continue;
                };
                let we = self
                    .work
                    .add_edge(a, b, info.weight, info.cutable, WorkEdge::default());
                self.group_push(we, e);
            }
        }
    }

    /// First original vertex behind a work vertex.
    fn orig_vertex(&self, v: VertexId) -> Option<VertexId> {
        self.work.vertex(v).map(|n| n.orig)
    }

    /// Records `orig_e` as one of the original edges `work_e` stands for.
    fn group_push(&mut self, work_e: EdgeId, orig_e: EdgeId) {
        let group = match self.work.edge_label(work_e).and_then(|l| l.group) {
            Some(group) => group,
            None => {
                let group = self.groups.alloc();
                if let Some(label) = self.work.edge_label_mut(work_e) {
                    label.group = Some(group);
                }
                group
            }
        };
        self.groups.push(group, orig_e);
    }

    /// Moves every original edge represented by `from_e` over to `into_e`.
    fn group_concat(&mut self, into_e: EdgeId, from_e: EdgeId) {
        let Some(from_group) = self.work.edge_label(from_e).and_then(|l| l.group) else {
            debug_assert!(false, "merged edge {from_e} has no original edges");
            return;
        };
        let into_group = match self.work.edge_label(into_e).and_then(|l| l.group) {
            Some(group) => group,
            None => {
                let group = self.groups.alloc();
                if let Some(label) = self.work.edge_label_mut(into_e) {
                    label.group = Some(group);
                }
                group
            }
        };
        self.groups.concat(into_group, from_group);
    }

    /// Makes a new work edge with `template` as the model: same weight, same
    /// cutable state, same original-edge group. The caller removes the
    /// template right after, so every group keeps a single owner.
    fn edge_from_edge(&mut self, template: EdgeId, from: VertexId, to: VertexId) {
        let Some(info) = self.work.edge(template) else {
            debug_assert!(false, "template edge {template} is gone");
            return;
        };
        let group = self.work.edge_label(template).and_then(|l| l.group);
        self.work
            .add_edge(from, to, info.weight, info.cutable, WorkEdge { group });
    }

    /// Cuts a work edge: flips it to cut state and cuts every original edge
    /// it stands for.
    fn cut_orig_edge(&mut self, work_e: EdgeId, why: &str) {
        self.work.cut(work_e);
        let Some(group) = self.work.edge_label(work_e).and_then(|l| l.group) else {
            debug_assert!(false, "no original edges associated with cut edge {work_e}");
            return;
        };
        let orig_edges: Vec<EdgeId> = self.groups.edges(group).to_vec();
        debug_assert!(!orig_edges.is_empty(), "cut edge {work_e} stands for nothing");
        for orig_e in orig_edges {
            tracing::trace!(%orig_e, why, "cut original edge");
            self.orig.cut(orig_e);
        }
    }

    fn work_push(&mut self, v: VertexId) {
        let Some(node) = self.work.vertex_mut(v) else {
            return;
        };
        if !node.on_work_list {
            node.on_work_list = true;
            self.pending.push_back(v);
        }
    }

    fn work_pop(&mut self) -> Option<VertexId> {
        let v = self.pending.pop_front()?;
        if let Some(node) = self.work.vertex_mut(v) {
            node.on_work_list = false;
        }
        Some(v)
    }

    fn dump(&self, prefix: &str, level: u32) {
        if self.options.dump_level < level {
            return;
        }
        if let Err(err) = self
            .work
            .dump_dot_file_prefixed(&self.options.dump_dir, prefix)
        {
            tracing::warn!(%err, prefix, "failed to write graph dump");
        }
    }
}
