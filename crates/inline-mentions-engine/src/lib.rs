pub mod decorate;
pub mod mention;
pub mod model;
pub mod session;
pub mod spans;

// Re-export key types for easier usage
pub use decorate::{DEFAULT_TRIGGER, MentionDecorator};
pub use mention::*;
pub use model::*;
pub use session::EditorSession;
pub use spans::*;
