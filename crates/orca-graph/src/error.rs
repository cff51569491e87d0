use crate::graph::VertexId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("ranking found a cycle through vertex {name} ({vertex})")]
    RankCycle { vertex: VertexId, name: String },
}
