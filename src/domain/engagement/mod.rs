//! Engagement Domain Module
//!
//! Decides whether and how intensely to engage a suspected scammer, when to
//! stop, and how the persona's reply is worded.
//!
//! - `policy` - confidence routing and exit conditions
//! - `prompts` - prompt templates and canned phrases
//! - `reply` - reply post-processing and operator notes
//! - `values` - messages, detector output and turn results

mod errors;
mod policy;
pub mod prompts;
pub mod reply;
mod values;

pub use errors::PolicyError;
pub use policy::{
    EngagementMode, EngagementPolicy, EngagementState, ExitReason, PolicyThresholds,
};
pub use reply::ShapedReply;
pub use values::{
    ConversationMessage, DetectionResult, EngagementResult, EngagementSignals, MatchedPattern,
    MessageMetadata, Responder, ScamCategory, SenderType,
};
