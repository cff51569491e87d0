use orca_graph::alg::{rank, report_loops, strongly_connected};
use orca_graph::{EdgeInfo, Error, Graph, follow_always, follow_not_cutable};

#[test]
fn scc_colors_nothing_on_a_dag() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    g.add_edge(a, b, 1, true, ());
    g.add_edge(a, c, 1, true, ());
    g.add_edge(b, c, 1, true, ());

    strongly_connected(&mut g, follow_always);

    for v in [a, b, c] {
        assert_eq!(g.color(v), 0);
    }
}

#[test]
fn scc_colors_each_cycle_distinctly() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    let d = g.add_vertex(());
    let e = g.add_vertex(());
    g.add_edge(a, b, 1, true, ());
    g.add_edge(b, a, 1, true, ());
    g.add_edge(c, d, 1, true, ());
    g.add_edge(d, c, 1, true, ());
    g.add_edge(b, c, 1, true, ());

    strongly_connected(&mut g, follow_always);

    assert_ne!(g.color(a), 0);
    assert_eq!(g.color(a), g.color(b));
    assert_ne!(g.color(c), 0);
    assert_eq!(g.color(c), g.color(d));
    assert_ne!(g.color(a), g.color(c));
    assert_eq!(g.color(e), 0);

    // Components are numbered by smallest member, so the a/b component
    // comes first.
    assert_eq!(g.color(a), 1);
    assert_eq!(g.color(c), 2);
}

#[test]
fn scc_colors_a_followed_self_loop() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    g.add_edge(a, a, 1, true, ());
    g.add_edge(a, b, 1, true, ());

    strongly_connected(&mut g, follow_always);

    assert_ne!(g.color(a), 0);
    assert_eq!(g.color(b), 0);
}

#[test]
fn scc_respects_the_predicate_and_the_weight_gate() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    g.add_edge(a, b, 1, true, ());
    let ba = g.add_edge(b, a, 1, true, ());
    g.add_edge(b, c, 1, true, ());
    g.add_edge(c, b, 0, true, ());

    // The b/c cycle runs over a zero-weight edge, the a/b cycle over an
    // edge the predicate refuses; neither may be colored.
    strongly_connected(&mut g, move |e: &EdgeInfo| e.id != ba);

    for v in [a, b, c] {
        assert_eq!(g.color(v), 0);
    }
}

#[test]
fn scc_recolors_on_each_call() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    g.add_edge(a, b, 1, true, ());
    let ba = g.add_edge(b, a, 1, true, ());

    strongly_connected(&mut g, follow_always);
    assert_ne!(g.color(a), 0);

    g.cut(ba);
    strongly_connected(&mut g, follow_always);
    assert_eq!(g.color(a), 0);
    assert_eq!(g.color(b), 0);
}

#[test]
fn rank_is_monotone_along_followed_edges() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    let d = g.add_vertex(());
    g.add_edge(a, b, 1, true, ());
    g.add_edge(a, c, 1, true, ());
    g.add_edge(b, d, 1, true, ());
    g.add_edge(c, d, 1, true, ());

    rank(&mut g, follow_always).unwrap();

    assert_eq!(g.rank(a), 1);
    assert_eq!(g.rank(b), 2);
    assert_eq!(g.rank(c), 2);
    assert_eq!(g.rank(d), 3);
}

#[test]
fn rank_takes_the_longest_path() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    g.add_edge(a, b, 1, true, ());
    g.add_edge(b, c, 1, true, ());
    g.add_edge(a, c, 1, true, ());

    rank(&mut g, follow_always).unwrap();

    assert_eq!(g.rank(c), 3);
}

#[test]
fn rank_skips_unfollowed_edges() {
    let mut g: Graph = Graph::new();
    let a = g.add_vertex(());
    let b = g.add_vertex(());
    let c = g.add_vertex(());
    g.add_edge(a, b, 1, false, ());
    g.add_edge(b, c, 1, true, ());

    rank(&mut g, follow_not_cutable).unwrap();

    assert_eq!(g.rank(a), 1);
    assert_eq!(g.rank(b), 2);
    // Only reachable over a cutable edge, so it keeps the base rank.
    assert_eq!(g.rank(c), 1);
}

#[test]
fn rank_reports_a_cycle_and_still_ranks_the_rest() {
    let mut g: Graph = Graph::new();
    let a = g.add_named_vertex("a", ());
    let b = g.add_named_vertex("b", ());
    g.add_edge(a, b, 1, true, ());
    g.add_edge(b, a, 1, true, ());

    let err = rank(&mut g, follow_always).unwrap_err();
    match err {
        Error::RankCycle { name, .. } => assert!(name == "a" || name == "b"),
    }

    // The walk starts at `a`, so `b -> a` is the edge closing the cycle; it
    // must be left out of propagation while `a -> b` stays monotone.
    assert_eq!(g.rank(a), 1);
    assert_eq!(g.rank(b), 2);
}

#[test]
fn report_loops_names_the_cycle() {
    let mut g: Graph = Graph::new();
    let a = g.add_named_vertex("a", ());
    let b = g.add_named_vertex("b", ());
    let c = g.add_named_vertex("c", ());
    g.add_edge(a, b, 1, true, ());
    g.add_edge(b, c, 1, true, ());
    g.add_edge(c, a, 1, true, ());

    let report = report_loops(&g, follow_always, a);
    assert_eq!(report, "loop through a: a -> b -> c -> a");
}

#[test]
fn report_loops_handles_a_loop_free_vertex() {
    let mut g: Graph = Graph::new();
    let a = g.add_named_vertex("a", ());
    let b = g.add_named_vertex("b", ());
    g.add_edge(a, b, 1, true, ());

    let report = report_loops(&g, follow_always, a);
    assert_eq!(report, "no loop found through a");
}

#[test]
fn dot_dump_lists_vertices_and_edges() {
    let mut g: Graph = Graph::new();
    let a = g.add_named_vertex("a", ());
    let b = g.add_named_vertex("b", ());
    let ab = g.add_edge(a, b, 2, true, ());
    g.add_edge(b, a, 1, false, ());
    g.cut(ab);

    let mut out: Vec<u8> = Vec::new();
    g.dump_dot(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("digraph"));
    assert!(text.contains("v0 [label=\"a"));
    assert!(text.contains("v0 -> v1"));
    assert!(text.contains("color=red style=dashed"));
    assert!(text.contains("color=black"));
}
