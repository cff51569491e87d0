//! Graph algorithms consumed by the reduction passes: strongly-connected
//! coloring, rank assignment, and loop reporting.
//!
//! Every algorithm follows an edge only when the caller's predicate accepts
//! it *and* the edge weight is positive; cut edges have weight zero and so
//! drop out of all traversals.

use crate::error::{Error, Result};
use crate::graph::{EdgeId, EdgeInfo, Graph, VertexId};

fn followed<N, E>(
    g: &Graph<N, E>,
    e: EdgeId,
    follow: &impl Fn(&EdgeInfo) -> bool,
) -> Option<EdgeInfo> {
    let info = g.edge(e)?;
    (info.weight > 0 && follow(&info)).then_some(info)
}

/// Colors every vertex by strongly-connected component on the followed
/// subgraph. Components that can carry a cycle (more than one vertex, or a
/// single vertex with a followed self-loop) get distinct nonzero colors,
/// numbered by their smallest member id; every other vertex gets color 0.
pub fn strongly_connected<N, E>(g: &mut Graph<N, E>, follow: impl Fn(&EdgeInfo) -> bool) {
    const UNSET: u32 = u32::MAX;

    struct State {
        next_index: u32,
        indices: Vec<u32>,
        lowlink: Vec<u32>,
        on_stack: Vec<bool>,
        stack: Vec<VertexId>,
        sccs: Vec<Vec<VertexId>>,
    }

    fn connect<N, E>(
        g: &Graph<N, E>,
        follow: &impl Fn(&EdgeInfo) -> bool,
        v: VertexId,
        st: &mut State,
    ) {
        let vi = v.index();
        st.indices[vi] = st.next_index;
        st.lowlink[vi] = st.next_index;
        st.next_index += 1;
        st.stack.push(v);
        st.on_stack[vi] = true;

        for e in g.out_edges(v) {
            let Some(info) = followed(g, e, follow) else {
                continue;
            };
            let wi = info.to.index();
            if st.indices[wi] == UNSET {
                connect(g, follow, info.to, st);
                st.lowlink[vi] = st.lowlink[vi].min(st.lowlink[wi]);
            } else if st.on_stack[wi] {
                st.lowlink[vi] = st.lowlink[vi].min(st.indices[wi]);
            }
        }

        if st.lowlink[vi] == st.indices[vi] {
            let mut scc: Vec<VertexId> = Vec::new();
            loop {
                let Some(w) = st.stack.pop() else {
                    debug_assert!(false, "tarjan stack underflow");
                    break;
                };
                st.on_stack[w.index()] = false;
                scc.push(w);
                if w == v {
                    break;
                }
            }
            st.sccs.push(scc);
        }
    }

    let limit = g.vertex_limit();
    let mut st = State {
        next_index: 0,
        indices: vec![UNSET; limit],
        lowlink: vec![UNSET; limit],
        on_stack: vec![false; limit],
        stack: Vec::new(),
        sccs: Vec::new(),
    };

    for v in g.vertex_ids() {
        if st.indices[v.index()] == UNSET {
            connect(g, &follow, v, &mut st);
        }
    }

    for v in g.vertex_ids() {
        g.set_color(v, 0);
    }

    let mut cyclic: Vec<Vec<VertexId>> = st
        .sccs
        .into_iter()
        .filter(|scc| scc.len() > 1 || has_followed_self_loop(g, scc[0], &follow))
        .collect();
    cyclic.sort_by_key(|scc| scc.iter().copied().min());
    for (i, scc) in cyclic.iter().enumerate() {
        for &v in scc {
            g.set_color(v, i as u32 + 1);
        }
    }
}

fn has_followed_self_loop<N, E>(
    g: &Graph<N, E>,
    v: VertexId,
    follow: &impl Fn(&EdgeInfo) -> bool,
) -> bool {
    g.out_edges(v)
        .into_iter()
        .any(|e| followed(g, e, follow).is_some_and(|info| info.to == v))
}

/// Assigns ranks so that `rank(to) >= rank(from) + 1` holds along every
/// followed edge. Every live vertex ends with rank >= 1.
///
/// If the followed subgraph contains a cycle, ranks are still assigned
/// best-effort: the edges closing detected cycles are excluded from
/// propagation, so the invariant holds on every other followed edge, and an
/// error naming a vertex on a cycle is returned.
pub fn rank<N, E>(g: &mut Graph<N, E>, follow: impl Fn(&EdgeInfo) -> bool) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        OnPath,
        Done,
    }

    fn visit<N, E>(
        g: &Graph<N, E>,
        follow: &impl Fn(&EdgeInfo) -> bool,
        v: VertexId,
        marks: &mut [Mark],
        order: &mut Vec<VertexId>,
        back_edges: &mut [bool],
        cycle_at: &mut Option<VertexId>,
    ) {
        if marks[v.index()] != Mark::New {
            return;
        }
        marks[v.index()] = Mark::OnPath;
        for e in g.out_edges(v) {
            let Some(info) = followed(g, e, follow) else {
                continue;
            };
            match marks[info.to.index()] {
                Mark::OnPath => {
                    // This edge closes a cycle; propagation must not walk it.
                    back_edges[e.index()] = true;
                    cycle_at.get_or_insert(info.to);
                }
                Mark::New => visit(g, follow, info.to, marks, order, back_edges, cycle_at),
                Mark::Done => {}
            }
        }
        marks[v.index()] = Mark::Done;
        order.push(v);
    }

    let mut marks = vec![Mark::New; g.vertex_limit()];
    let mut order: Vec<VertexId> = Vec::with_capacity(g.vertex_count());
    let mut back_edges = vec![false; g.edge_limit()];
    let mut cycle_at: Option<VertexId> = None;
    for v in g.vertex_ids() {
        visit(
            g,
            &follow,
            v,
            &mut marks,
            &mut order,
            &mut back_edges,
            &mut cycle_at,
        );
    }
    order.reverse();

    for v in g.vertex_ids() {
        g.set_rank(v, 1);
    }
    for v in order {
        let next = g.rank(v) + 1;
        for e in g.out_edges(v) {
            if back_edges[e.index()] {
                continue;
            }
            if let Some(info) = followed(g, e, &follow) {
                if g.rank(info.to) < next {
                    g.set_rank(info.to, next);
                }
            }
        }
    }

    match cycle_at {
        None => Ok(()),
        Some(v) => Err(Error::RankCycle {
            vertex: v,
            name: g.name(v).into_owned(),
        }),
    }
}

/// Returns a human-readable description of one cycle through `origin` on the
/// followed subgraph, for error reporting.
pub fn report_loops<N, E>(
    g: &Graph<N, E>,
    follow: impl Fn(&EdgeInfo) -> bool,
    origin: VertexId,
) -> String {
    fn search<N, E>(
        g: &Graph<N, E>,
        follow: &impl Fn(&EdgeInfo) -> bool,
        origin: VertexId,
        v: VertexId,
        visited: &mut [bool],
        path: &mut Vec<VertexId>,
    ) -> bool {
        for e in g.out_edges(v) {
            let Some(info) = followed(g, e, follow) else {
                continue;
            };
            if info.to == origin {
                return true;
            }
            if visited[info.to.index()] {
                continue;
            }
            visited[info.to.index()] = true;
            path.push(info.to);
            if search(g, follow, origin, info.to, visited, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut visited = vec![false; g.vertex_limit()];
    let mut path: Vec<VertexId> = vec![origin];
    if search(g, &follow, origin, origin, &mut visited, &mut path) {
        let mut names: Vec<String> = path.iter().map(|&v| g.name(v).into_owned()).collect();
        names.push(g.name(origin).into_owned());
        format!("loop through {}: {}", g.name(origin), names.join(" -> "))
    } else {
        format!("no loop found through {}", g.name(origin))
    }
}
