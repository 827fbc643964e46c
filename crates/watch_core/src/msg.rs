use crate::connection::{AttemptId, TransportEvent};
use crate::{ChatId, Endpoint, Epoch, Mutation, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Endpoint loaded from disk at startup.
    EndpointRestored(Endpoint),
    /// User pressed "Save and Connect" with the raw input text.
    EndpointSubmitted(String),
    /// User asked to forget the stored endpoint.
    EndpointCleared,
    /// User picked a screen.
    Navigate(View),
    KeywordAddRequested(String),
    KeywordDeleteRequested(String),
    /// Raw chat id text as typed.
    ChatAddRequested(String),
    ChatDeleteRequested(ChatId),
    /// Callback from the live channel transport.
    Transport {
        attempt: AttemptId,
        event: TransportEvent,
    },
    /// Reconnect delay for `attempt` elapsed.
    ReconnectDue { attempt: AttemptId },
    KeywordsLoaded {
        epoch: Epoch,
        result: Result<Vec<String>, String>,
    },
    ChatsLoaded {
        epoch: Epoch,
        result: Result<Vec<ChatId>, String>,
    },
    MutationFinished {
        epoch: Epoch,
        mutation: Mutation,
        result: Result<(), String>,
    },
    /// Console is exiting.
    Shutdown,
}
