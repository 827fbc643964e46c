use crate::{ChatId, ConnectionStatus, Match, Stats, View};

/// Everything a renderer needs, detached from [`crate::AppState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub view: View,
    pub status: ConnectionStatus,
    pub endpoint: Option<String>,
    /// Alphabetical.
    pub keywords: Vec<String>,
    pub chats: Vec<ChatId>,
    /// Newest first.
    pub matches: Vec<Match>,
    pub stats: Stats,
    pub settings_error: Option<String>,
    pub notice: Option<String>,
    pub dirty: bool,
}
