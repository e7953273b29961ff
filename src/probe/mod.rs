//! Probe module wrapping the external collaborators of a unit
//!
//! This module contains:
//! - Name resolution behind the `Resolver` trait
//! - Trace utility execution behind the `Prober` trait
//!
//! Both traits are the seams the runner is generic over, so tests can swap
//! in deterministic implementations.

mod prober;
mod resolver;

pub use prober::{CommandProber, Prober};
pub use resolver::{Resolver, SystemResolver};
