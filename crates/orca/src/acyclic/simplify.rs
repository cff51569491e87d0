//! Work-graph rewrites.
//!
//! Four structural rules plus two optional cutters run off the pending queue
//! until nothing changes. Rules tombstone vertices instead of removing them
//! so a popped id stays valid; the sweep at the end drops the tombstones.

use orca_graph::alg;
use orca_graph::{EdgeId, EdgeInfo, VertexId, follow_not_cutable};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Acyc;

impl<N, E, F: Fn(&EdgeInfo) -> bool> Acyc<'_, N, E, F> {
    pub(super) fn simplify(&mut self, allow_cut: bool) {
        for v in self.work.vertex_ids() {
            self.work_push(v);
        }
        while let Some(v) = self.work_pop() {
            self.simplify_none(v);
            self.simplify_one(v);
            self.simplify_out(v);
            self.simplify_dup(v);
            if allow_cut && self.options.cut_simplify {
                self.cut_basic(v);
                self.cut_backward(v);
            }
        }
        self.delete_marked();
    }

    fn is_deleted(&self, v: VertexId) -> bool {
        self.work.vertex(v).is_none_or(|n| n.deleted)
    }

    fn set_deleted(&mut self, v: VertexId) {
        if let Some(node) = self.work.vertex_mut(v) {
            node.deleted = true;
        }
    }

    /// A vertex with no inputs or no outputs cannot sit on a cycle; drop it
    /// and requeue its neighbors.
    fn simplify_none(&mut self, v: VertexId) {
        if self.is_deleted(v) {
            return;
        }
        if self.work.in_degree(v) != 0 && self.work.out_degree(v) != 0 {
            return;
        }
        tracing::trace!(vertex = %self.work.name(v), "simplify: dead end");
        self.set_deleted(v);
        for e in self.work.out_edges(v) {
            if let Some(info) = self.work.edge(e) {
                self.work_push(info.to);
            }
            self.work.remove_edge(e);
        }
        for e in self.work.in_edges(v) {
            if let Some(info) = self.work.edge(e) {
                self.work_push(info.from);
            }
            self.work.remove_edge(e);
        }
    }

    /// Bypasses a vertex with exactly one input and one output.
    fn simplify_one(&mut self, v: VertexId) {
        if self.is_deleted(v) {
            return;
        }
        if self.work.in_degree(v) != 1 || self.work.out_degree(v) != 1 {
            return;
        }
        let (Some(in_e), Some(out_e)) = (self.work.first_in_edge(v), self.work.first_out_edge(v))
        else {
            return;
        };
        let (Some(in_info), Some(out_info)) = (self.work.edge(in_e), self.work.edge(out_e)) else {
            return;
        };
        // A self edge means the vertex must stay.
        if in_info.from == v || out_info.to == v {
            return;
        }
        tracing::trace!(vertex = %self.work.name(v), "simplify: bypass");
        self.set_deleted(v);
        // The bypass edge stands in for one side's original edges only:
        // breaking either side already breaks the chain. Prefer the cutable
        // side (lighter one if both are cutable) so the bypass stays
        // breakable at the lower price.
        let template = if in_info.cutable && (!out_info.cutable || in_info.weight < out_info.weight)
        {
            in_e
        } else {
            out_e
        };
        self.edge_from_edge(template, in_info.from, out_info.to);
        self.work.remove_edge(in_e);
        self.work.remove_edge(out_e);
        self.work_push(in_info.from);
        self.work_push(out_info.to);
    }

    /// A vertex whose only output is uncutable: every input can reattach
    /// directly to the output's destination.
    fn simplify_out(&mut self, v: VertexId) {
        if self.is_deleted(v) {
            return;
        }
        if self.work.out_degree(v) != 1 {
            return;
        }
        let Some(out_e) = self.work.first_out_edge(v) else {
            return;
        };
        let Some(out_info) = self.work.edge(out_e) else {
            return;
        };
        if out_info.cutable {
            return;
        }
        tracing::trace!(vertex = %self.work.name(v), "simplify: absorb into output");
        for in_e in self.work.in_edges(v) {
            let Some(in_info) = self.work.edge(in_e) else {
                continue;
            };
            if in_info.from == v {
                // An uncutable self loop: the caller's graph carries a cycle
                // no permitted cut can break. Report it, force the edge
                // cutable so a later pass can dispose of it, and abandon
                // this rewrite.
                let report = self
                    .orig_vertex(v)
                    .map(|o| alg::report_loops(&*self.orig, follow_not_cutable, o))
                    .unwrap_or_default();
                tracing::error!(
                    vertex = %self.work.name(v),
                    %report,
                    "circular logic with no cutable edge"
                );
                self.work.set_cutable(in_e, true);
                return;
            }
            self.edge_from_edge(in_e, in_info.from, out_info.to);
            self.work.remove_edge(in_e);
            self.work_push(in_info.from);
        }
        self.work.remove_edge(out_e);
        self.work_push(out_info.to);
        self.set_deleted(v);
    }

    /// Merges or drops edges duplicating another edge to the same
    /// destination.
    fn simplify_dup(&mut self, v: VertexId) {
        if self.is_deleted(v) {
            return;
        }
        let mut first_to: FxHashMap<VertexId, EdgeId> = FxHashMap::default();
        for e in self.work.out_edges(v) {
            let Some(info) = self.work.edge(e) else {
                continue;
            };
            let Some(&prev) = first_to.get(&info.to) else {
                first_to.insert(info.to, e);
                continue;
            };
            let Some(prev_info) = self.work.edge(prev) else {
                continue;
            };
            if !prev_info.cutable {
                // Duplicating an unbreakable path changes nothing, whether
                // or not the newcomer could be cut.
                tracing::trace!(vertex = %self.work.name(v), to = %self.work.name(info.to), "dup: drop");
                self.work.remove_edge(e);
            } else if !info.cutable {
                tracing::trace!(vertex = %self.work.name(v), to = %self.work.name(info.to), "dup: drop earlier cutable");
                self.work.remove_edge(prev);
                first_to.insert(info.to, e);
            } else {
                tracing::trace!(vertex = %self.work.name(v), to = %self.work.name(info.to), "dup: combine");
                self.work.set_weight(prev, prev_info.weight + info.weight);
                self.group_concat(prev, e);
                self.work.remove_edge(e);
            }
            self.work_push(info.to);
            self.work_push(v);
        }
    }

    /// Cuts cutable self loops outright.
    fn cut_basic(&mut self, v: VertexId) {
        if self.is_deleted(v) {
            return;
        }
        for e in self.work.out_edges(v) {
            let Some(info) = self.work.edge(e) else {
                continue;
            };
            if info.cutable && info.to == v {
                self.cut_orig_edge(e, "basic");
                self.work.remove_edge(e);
                self.work_push(v);
            }
        }
    }

    /// A cutable A->B opposed by an uncutable B->A can never be kept; cut it
    /// now rather than letting placement discover that.
    fn cut_backward(&mut self, v: VertexId) {
        if self.is_deleted(v) {
            return;
        }
        let mut locked_sources: FxHashSet<VertexId> = FxHashSet::default();
        for e in self.work.in_edges(v) {
            let Some(info) = self.work.edge(e) else {
                continue;
            };
            if !info.cutable {
                locked_sources.insert(info.from);
            }
        }
        for e in self.work.out_edges(v) {
            let Some(info) = self.work.edge(e) else {
                continue;
            };
            if info.cutable && locked_sources.contains(&info.to) {
                self.cut_orig_edge(e, "backward");
                self.work.remove_edge(e);
                self.work_push(v);
            }
        }
    }

    /// Sweeps tombstoned vertices out of the work graph.
    fn delete_marked(&mut self) {
        for v in self.work.vertex_ids() {
            if self.is_deleted(v) {
                self.work.remove_vertex(v);
            }
        }
    }
}
