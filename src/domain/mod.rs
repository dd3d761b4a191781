//! Domain layer containing the engagement rules and persona state.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, confidence, randomness, errors)
//! - `persona` - The simulated victim and its per-conversation store
//! - `engagement` - Routing, exit conditions, prompts and reply shaping

pub mod engagement;
pub mod foundation;
pub mod persona;
