//! Error types for the traffic simulation core

use thiserror::Error;

use super::types::JunctionId;

/// Which kind of identifier failed range validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Junction,
    Vehicle,
    Phase,
}

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("{kind:?} id {id} is out of range")]
    InvalidId { kind: IdKind, id: usize },

    #[error("cannot remove from an empty priority queue")]
    EmptyQueue,

    #[error("cannot extract from an empty heap")]
    EmptyHeap,

    #[error("heap is full (capacity {0})")]
    HeapFull(usize),

    #[error("no route from junction {from} to junction {to}")]
    NoPath { from: JunctionId, to: JunctionId },

    #[error("no road from junction {from} to junction {to}")]
    NoRoad { from: JunctionId, to: JunctionId },

    #[error("vehicle capacity of {max} exceeded")]
    CapacityExceeded { max: usize },

    #[error("invalid road: {0}")]
    InvalidRoad(String),

    #[error("invalid route weights: {0}")]
    InvalidWeights(String),

    #[error("traffic volume must be greater than zero (got {0})")]
    InvalidTrafficVolume(usize),

    #[error("random traffic needs at least two junctions")]
    NotEnoughJunctions,
}

impl SimError {
    pub fn junction(id: usize) -> Self {
        SimError::InvalidId {
            kind: IdKind::Junction,
            id,
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
