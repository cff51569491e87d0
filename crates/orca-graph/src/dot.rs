//! Graphviz output for debugging the scheduling passes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::graph::Graph;

impl<N, E> Graph<N, E> {
    /// Writes the graph in Graphviz dot syntax. Cut edges render red and
    /// dashed, still-cutable edges yellow, uncutable edges black. Vertex
    /// labels carry the rank and color so staged dumps can be compared.
    pub fn dump_dot(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "digraph G {{")?;
        for v in self.vertex_ids() {
            writeln!(
                out,
                "\t{} [label=\"{}\\nr{} c{}\"];",
                v,
                self.name(v),
                self.rank(v),
                self.color(v)
            )?;
        }
        for e in self.edge_ids() {
            let Some(info) = self.edge(e) else {
                continue;
            };
            let color = if info.cut {
                "red"
            } else if info.cutable {
                "yellow"
            } else {
                "black"
            };
            let style = if info.cut { " style=dashed" } else { "" };
            writeln!(
                out,
                "\t{} -> {} [label=\"{}\" color={}{}];",
                info.from, info.to, info.weight, color, style
            )?;
        }
        writeln!(out, "}}")
    }

    pub fn dump_dot_file(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.dump_dot(&mut out)?;
        out.flush()
    }

    /// Writes `{dir}/{prefix}.dot` and returns the path written.
    pub fn dump_dot_file_prefixed(&self, dir: &Path, prefix: &str) -> io::Result<PathBuf> {
        let path = dir.join(format!("{prefix}.dot"));
        self.dump_dot_file(&path)?;
        Ok(path)
    }
}
