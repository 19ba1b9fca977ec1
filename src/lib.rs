//! # Simulation Results Analyzer
//!
//! Reads the PnL, trade and order-book exports of a market-making simulation
//! and turns them into performance metrics, charts and a text report.
//!
//! The work is split across the workspace crates (`loader`, `analytics`,
//! `presentation`, `configuration`); this crate only wires them together.

pub mod pipeline;

pub use pipeline::{Pipeline, RunOutcome};
