use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Connection attempt generation, assigned by the caller.
pub type AttemptId = u64;
/// Endpoint activation generation, assigned by the caller.
pub type Epoch = u64;

/// What happened on one live-channel attempt.
///
/// An attempt that ends on its own always reports `Closed` last, after any
/// `Failed`. An attempt ended by [`crate::EngineHandle::close`] reports nothing
/// further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Opened,
    Text(String),
    Failed(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Link {
        attempt: AttemptId,
        event: LinkEvent,
    },
    ReconnectDue {
        attempt: AttemptId,
    },
    KeywordsLoaded {
        epoch: Epoch,
        result: Result<Vec<String>, ApiError>,
    },
    ChatsLoaded {
        epoch: Epoch,
        result: Result<Vec<i64>, ApiError>,
    },
    MutationFinished {
        epoch: Epoch,
        request: MutationRequest,
        result: Result<(), ApiError>,
    },
}

/// Keyword/chat management call against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    AddKeyword(String),
    DeleteKeyword(String),
    AddChat(i64),
    DeleteChat(i64),
}

#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum MutationBody<'a> {
    Keyword { keyword: &'a str },
    /// The backend takes the id as text when adding.
    ChatText { chat_id: String },
    Chat { chat_id: i64 },
}

impl MutationRequest {
    pub(crate) fn resource(&self) -> &'static str {
        match self {
            MutationRequest::AddKeyword(_) | MutationRequest::DeleteKeyword(_) => "keywords",
            MutationRequest::AddChat(_) | MutationRequest::DeleteChat(_) => "chats",
        }
    }

    pub(crate) fn method(&self) -> reqwest::Method {
        match self {
            MutationRequest::AddKeyword(_) | MutationRequest::AddChat(_) => reqwest::Method::POST,
            MutationRequest::DeleteKeyword(_) | MutationRequest::DeleteChat(_) => {
                reqwest::Method::DELETE
            }
        }
    }

    pub(crate) fn body(&self) -> MutationBody<'_> {
        match self {
            MutationRequest::AddKeyword(keyword) | MutationRequest::DeleteKeyword(keyword) => {
                MutationBody::Keyword { keyword }
            }
            MutationRequest::AddChat(chat_id) => MutationBody::ChatText {
                chat_id: chat_id.to_string(),
            },
            MutationRequest::DeleteChat(chat_id) => MutationBody::Chat { chat_id: *chat_id },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64 },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureKind::Decode => write!(f, "undecodable body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
