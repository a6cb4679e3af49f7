pub mod bridge;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod handle;
pub mod liveness;
pub mod payload;
pub mod stub;
pub mod tag;
pub mod value;
pub mod view_config;

// Re-export key types
pub use bridge::{
    FocusTracker, LayoutMeasurement, Measurement, ViewManager, WindowMeasurement,
};
pub use config::{HostConfig, init_tracing};
pub use context::HostContext;
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{HostError, Result};
pub use handle::{HostChild, HostHandle, RelativeTarget};
pub use liveness::{LivenessToken, mount_safe, mount_safe_unit};
pub use payload::{AttributePayload, PayloadBuilder, UpdatePayload};
pub use tag::ViewTag;
pub use value::{PropMap, PropValue, props};
pub use view_config::{AttributeConfig, AttributeMap, ViewConfig, ViewConfigRegistry};
