//! Urban Air Mobility Simulation Library
//!
//! A discrete-time simulation of vehicles shuttling between remote ports
//! and a shared hub, with first-come-first-served pad arbitration.

pub mod simulation;
