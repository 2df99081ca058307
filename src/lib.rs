//! samtool: strategic asset-allocation analyzer.
//!
//! Hexagonal architecture: return, risk, and sampling logic in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`], and
//! command dispatch in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
