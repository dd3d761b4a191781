//! Honeypot Engagement - decision core of a scam-baiting honeypot
//!
//! Plays a naive victim against suspected scammers: keeps per-conversation
//! persona state, routes each message by detector confidence, shapes the
//! generated reply to draw out payment details, and decides when to stop.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

pub use application::{EngagementOrchestrator, ProcessTurnCommand};
