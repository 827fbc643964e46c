//! Keyword-watch engine: live channel, reconnect timers and backend calls.
mod api;
mod engine;
mod link;
mod persist;
mod types;

pub use api::{BackendApi, EngineSettings, ReqwestApi};
pub use engine::EngineHandle;
pub use link::{run_link, ChannelLinkSink, LinkSink};
pub use persist::{ensure_state_dir, read_if_present, AtomicFileWriter, PersistError};
pub use types::{
    ApiError, AttemptId, EngineEvent, Epoch, FailureKind, LinkEvent, MutationRequest,
};
