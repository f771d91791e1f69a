#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod aggregate;
pub mod driver;
pub mod emit;
pub mod estimate;
pub mod format;
pub mod lifecycle;
pub mod normalize;
pub mod protocol;
pub mod session;
pub mod throttle;

// Re-export the public surface
pub use aggregate::{AggregateOutcome, CollectionProgressAggregator, ItemKey};
pub use driver::{BridgeDriver, DriverStats, LineOutcome};
pub use emit::{AssemblyOptions, ProgressEventEmitter};
pub use estimate::{FileProgressEstimator, compute_file_percent};
pub use lifecycle::ProgressStateLifecycle;
pub use normalize::normalize;
pub use protocol::{BridgeMessage, ProtocolError, parse_line};
pub use session::{ProgressSession, SessionOptions};
pub use throttle::ProgressThrottle;
