//! # Mention Overlay Core
//!
//! On every document-state change the overlay is recomputed in three steps:
//!
//! 1. **`locate`**: find the mounted trigger span around the caret, looking
//!    only at spans in the caret's block
//! 2. **`query`**: cut the in-progress query out of that span, starting at
//!    the trigger
//! 3. **`position`**: measure a clone of the native selection, narrowed to
//!    start at the trigger, for the overlay's `{top, left}`
//!
//! [`TriggerOverlayController`] strings these together and only reads span
//! data after the editor's render pass has committed it.
//!
//! Every failure along the way hides the overlay; none of them reach the
//! editing surface.

pub mod controller;
pub mod layout;
pub mod locate;
pub mod position;
pub mod query;

pub use controller::{OFFSCREEN, OverlayOptions, OverlayState, TriggerOverlayController, Visibility};
pub use layout::{GridLayout, GridMetrics, GridRange, GridSelection, TextLayout};
pub use locate::{NotFound, locate};
pub use position::{NativeRange, NativeSelection, Rect, compute_rect};
pub use query::{ExtractedQuery, QueryMode, extract_query, without_trigger};
