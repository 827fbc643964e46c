use crate::connection::ConnectionCommand;
use crate::{ChatId, Endpoint, Epoch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Store the endpoint, or forget it when `None`.
    PersistEndpoint(Option<Endpoint>),
    /// Pull keywords and chats from `endpoint`; both results carry `epoch`.
    Bootstrap { epoch: Epoch, endpoint: Endpoint },
    /// Drive the live channel.
    Connection(ConnectionCommand),
    /// Keyword/chat management call; the outcome comes back tagged with `epoch`.
    Mutate {
        epoch: Epoch,
        endpoint: Endpoint,
        mutation: Mutation,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddKeyword(String),
    DeleteKeyword(String),
    AddChat(ChatId),
    DeleteChat(ChatId),
}

impl Mutation {
    /// Notice shown when the call fails.
    pub fn failure_notice(&self) -> &'static str {
        match self {
            Mutation::AddKeyword(_) => {
                "Failed to add keyword. Please check the backend connection."
            }
            Mutation::DeleteKeyword(_) => "Failed to delete keyword.",
            Mutation::AddChat(_) => "Failed to add chat. Please check the backend connection.",
            Mutation::DeleteChat(_) => "Failed to delete chat.",
        }
    }
}
