#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod errors;
pub mod ports;
pub mod progress;
pub mod settings;

// Re-export commonly used types for convenience
pub use errors::{ProgressError, ProgressResult};
pub use ports::{FnProgressEmitter, NoopProgressEmitter, ProgressEmitterPort};
pub use progress::{
    CollectionPosition, CollectionState, HostMessage, NormalizedFileProgress,
    OutwardProgressEvent, ProgressStatus, RawProgressEvent, SessionResult, UNKNOWN_DISPLAY,
};
pub use settings::{
    DEFAULT_THROTTLE_MS, MAX_THROTTLE_MS, Settings, SettingsError, SettingsUpdate,
    validate_settings,
};
