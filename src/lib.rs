//! Congestion Simulation Library
//!
//! A traffic simulation where vehicles hop between road segments in discrete
//! cycles and route around congestion they can see.

pub mod simulation;
