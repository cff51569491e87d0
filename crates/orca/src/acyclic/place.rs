//! Greedy edge placement.
//!
//! Ranks are already consistent along the uncutable edges. Each cutable edge
//! is tried heaviest-first: pretend it is uncutable, retighten ranks
//! downstream, and either commit the new ranks or roll them back and cut the
//! edge. The pending queue records exactly the vertices whose ranks moved,
//! so rollback is a drain of the queue.

use orca_graph::{EdgeId, EdgeInfo, VertexId};

use super::Acyc;

impl<N, E, F: Fn(&EdgeInfo) -> bool> Acyc<'_, N, E, F> {
    pub(super) fn place(&mut self) {
        // Collect per vertex so equal weights stay grouped by source after
        // the stable sort.
        let mut edges: Vec<(EdgeId, i32)> = Vec::new();
        for v in self.work.vertex_ids() {
            for e in self.work.out_edges(v) {
                let Some(info) = self.work.edge(e) else {
                    continue;
                };
                if info.weight > 0 && info.cutable {
                    edges.push((e, info.weight));
                }
            }
        }
        tracing::debug!(cutable = edges.len(), "placing cutable edges");

        edges.sort_by_key(|&(_, weight)| std::cmp::Reverse(weight));

        self.place_step = 10;
        for (e, _) in edges {
            self.place_try_edge(e);
        }
    }

    fn place_try_edge(&mut self, e: EdgeId) {
        self.place_step += 1;
        let Some(info) = self.work.edge(e) else {
            return;
        };
        tracing::trace!(step = self.place_step, weight = info.weight, %e, "try placing edge");
        // Pretend the edge is uncutable and push ranks downstream; revisiting
        // a vertex within this attempt means the edge closes a cycle.
        self.work.set_cutable(e, false);
        let target = self.work.rank(info.from) + 1;
        if !self.place_iterate(info.to, target) {
            // Keep the new ranks; just unhook the change log.
            while self.work_pop().is_some() {}
        } else {
            self.work.set_cutable(e, true);
            self.cut_orig_edge(e, "loop");
            self.work.remove_edge(e);
            while let Some(v) = self.work_pop() {
                if let Some(stored) = self.work.vertex(v).map(|n| n.stored_rank) {
                    self.work.set_rank(v, stored);
                }
            }
        }
    }

    /// Raises `v`, and everything it reaches over uncutable edges, to at
    /// least `target_rank`. Returns true if the walk re-entered a vertex it
    /// already touched in this attempt.
    fn place_iterate(&mut self, v: VertexId, target_rank: u32) -> bool {
        if self.work.rank(v) >= target_rank {
            return false;
        }
        let Some(node) = self.work.vertex(v) else {
            return false;
        };
        if node.visit == self.place_step {
            return true;
        }
        let rank = self.work.rank(v);
        let place_step = self.place_step;
        let mut record = false;
        if let Some(node) = self.work.vertex_mut(v) {
            node.visit = place_step;
            if !node.on_work_list {
                node.stored_rank = rank;
                record = true;
            }
        }
        if record {
            self.work_push(v);
        }
        self.work.set_rank(v, target_rank);
        for e in self.work.out_edges(v) {
            let Some(info) = self.work.edge(e) else {
                continue;
            };
            if info.weight > 0 && !info.cutable && self.place_iterate(info.to, target_rank + 1) {
                // Leave the visit mark in place; the next attempt runs under
                // a fresh step.
                return true;
            }
        }
        if let Some(node) = self.work.vertex_mut(v) {
            node.visit = 0;
        }
        false
    }
}
