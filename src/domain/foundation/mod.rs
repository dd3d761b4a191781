//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the randomness seam, and error
//! types that form the vocabulary of the engagement domain.

mod confidence;
mod errors;
mod ids;
mod randomness;
mod timestamp;

pub use confidence::Confidence;
pub use errors::ValidationError;
pub use ids::ConversationId;
pub use randomness::{choose, FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use timestamp::Timestamp;
