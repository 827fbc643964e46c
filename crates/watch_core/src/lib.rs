//! Keyword-watch core: pure state machine for the operator console.
//!
//! Nothing in this crate performs IO. Callers feed [`Msg`] values through
//! [`update`] and execute the returned [`Effect`]s.
mod connection;
mod effect;
mod endpoint;
mod event;
mod msg;
mod state;
mod store;
mod update;
mod view;
mod view_model;

pub use connection::{
    AttemptId, ConnectionCommand, ConnectionManager, ConnectionStatus, LastMessage,
    TransportEvent, RECONNECT_DELAY,
};
pub use effect::{Effect, Mutation};
pub use endpoint::{Endpoint, EndpointError, ENDPOINT_HINT};
pub use event::{dispatch, ChatId, InboundEvent, Match, Rejection};
pub use msg::Msg;
pub use state::{AppState, Epoch};
pub use store::{StateStore, Stats, MATCH_LOG_CAP};
pub use update::update;
pub use view::{View, ViewRouter};
pub use view_model::AppViewModel;
