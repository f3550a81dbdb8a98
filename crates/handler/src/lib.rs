//! Dashboard lifecycle handler.
//!
//! This crate turns infrastructure lifecycle events (Create, Update,
//! Delete) into Grafana dashboard state: it fetches the dashboard
//! definition from its source, rewrites identity fields derived from the
//! resource's logical name, fingerprints the content to skip no-op
//! updates, applies the change through the Grafana API, and reports the
//! outcome back to the orchestrator.

pub mod error;
pub mod event;
pub mod fingerprint;
pub mod lifecycle;
pub mod normalize;
pub mod protocol;
pub mod source;

pub use error::HandlerError;
pub use event::{LifecycleEvent, LifecycleResponse, RequestType, ResponseStatus};
pub use fingerprint::{fingerprint, fingerprint_document};
pub use lifecycle::{HandlerContext, fallback_physical_id, handle};
pub use normalize::{NormalizedDashboard, derive_uid, normalize, normalize_slice};
pub use protocol::{
    CallbackContext, ProtocolError, RequestEnvelope, ResponseBody, deliver_response,
    handle_contained,
};
pub use source::{FetchError, SourceStore};
