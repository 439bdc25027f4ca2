//! Error types for building and running a simulation.
//!
//! The per-cycle movement protocol never fails; anomalies there are resolved by
//! parking the vehicle. These errors cover configuration and run budgets only.

use thiserror::Error;

use super::types::{AgentId, SegmentId};

/// Invalid map, agent or scenario setup
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("road segment {0} already exists")]
    DuplicateSegment(SegmentId),

    #[error("road segment {0} not found")]
    UnknownSegment(SegmentId),

    #[error("edge {from} -> {to} points outside the map")]
    DanglingEdge { from: SegmentId, to: SegmentId },

    #[error("agent {0} already exists")]
    DuplicateAgent(AgentId),

    #[error("recompute interval must be at least 1 (got {0})")]
    InvalidRecompute(u32),

    #[error("vehicle {vehicle} cannot start at cycle {cycle}: {reason}")]
    InvalidSchedule {
        vehicle: AgentId,
        cycle: u64,
        reason: &'static str,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Failure to finish a run
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("simulation did not finish within {0} cycles")]
    CycleBudgetExhausted(u64),
}
