use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Unknown source node {0}")]
    UnknownSource(NodeId),
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    #[error("No path from {from} to {goal}")]
    NoPath { from: NodeId, goal: NodeId },
    #[error("Invalid visit set: {0}")]
    InvalidVisitSet(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
