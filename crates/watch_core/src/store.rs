use std::collections::VecDeque;

use crate::event::{ChatId, InboundEvent, Match};

/// Maximum number of matches kept in the live feed.
pub const MATCH_LOG_CAP: usize = 100;

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub keywords: usize,
    pub chats: usize,
    pub matches: usize,
}

/// Canonical client-side copy of the backend state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateStore {
    keywords: Vec<String>,
    chats: Vec<ChatId>,
    /// Newest first.
    matches: VecDeque<Match>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::NewMatch(found) => self.push_match(found),
            InboundEvent::KeywordsSnapshot(keywords) => self.replace_keywords(keywords),
            InboundEvent::ChatsSnapshot(chats) => self.replace_chats(chats),
        }
    }

    pub fn push_match(&mut self, found: Match) {
        self.matches.push_front(found);
        self.matches.truncate(MATCH_LOG_CAP);
    }

    pub fn replace_keywords(&mut self, keywords: Vec<String>) {
        self.keywords = keywords;
    }

    pub fn replace_chats(&mut self, chats: Vec<ChatId>) {
        self.chats = chats;
    }

    pub fn reset(&mut self) {
        self.keywords.clear();
        self.chats.clear();
        self.matches.clear();
    }

    /// Keywords in storage (arrival) order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Keywords in display order.
    pub fn sorted_keywords(&self) -> Vec<String> {
        let mut sorted = self.keywords.clone();
        sorted.sort();
        sorted
    }

    pub fn chats(&self) -> &[ChatId] {
        &self.chats
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            keywords: self.keywords.len(),
            chats: self.chats.len(),
            matches: self.matches.len(),
        }
    }
}
