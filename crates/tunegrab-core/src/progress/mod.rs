//! Progress domain types.
//!
//! Pure data: no I/O and no state machines. The stateful engine lives in
//! `tunegrab-progress`.
//!
//! # Structure
//!
//! - `raw` - loosely typed tick from the fetch engine (`RawProgressEvent`)
//! - `status` - folded status tag (`ProgressStatus`)
//! - `types` - strict records (`NormalizedFileProgress`, `CollectionState`)
//! - `events` - host-facing records (`OutwardProgressEvent`, `HostMessage`)

pub mod events;
pub mod raw;
pub mod status;
pub mod types;

pub use events::{HostMessage, OutwardProgressEvent, SessionResult};
pub use raw::RawProgressEvent;
pub use status::ProgressStatus;
pub use types::{CollectionPosition, CollectionState, NormalizedFileProgress, UNKNOWN_DISPLAY};
