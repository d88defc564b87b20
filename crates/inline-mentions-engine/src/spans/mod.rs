//! Decorated span identity and the registry of mounted spans.

pub mod id;
pub mod registry;

pub use id::{SpanId, TokenError};
pub use registry::{SpanLifecycle, SpanRegistry};
