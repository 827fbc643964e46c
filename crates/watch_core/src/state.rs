use watch_logging::watch_info;

use crate::connection::{ConnectionCommand, ConnectionManager};
use crate::event;
use crate::store::StateStore;
use crate::view::ViewRouter;
use crate::view_model::AppViewModel;
use crate::{Effect, Endpoint};

/// Generation number of one endpoint activation.
pub type Epoch = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    endpoint: Option<Endpoint>,
    router: ViewRouter,
    connection: ConnectionManager,
    store: StateStore,
    epoch: Epoch,
    last_dispatched: Option<u64>,
    settings_error: Option<String>,
    notice: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_connection(ConnectionManager::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State with a custom connection manager, e.g. a shorter reconnect delay.
    pub fn with_connection(connection: ConnectionManager) -> Self {
        Self {
            endpoint: None,
            router: ViewRouter::new(false),
            connection,
            store: StateStore::new(),
            epoch: 0,
            last_dispatched: None,
            settings_error: None,
            notice: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let configured = self.is_configured();
        AppViewModel {
            view: self.router.current(configured),
            status: self.connection.status(),
            endpoint: self.endpoint.as_ref().map(|e| e.as_str().to_string()),
            keywords: self.store.sorted_keywords(),
            chats: self.store.chats().to_vec(),
            matches: self.store.matches().cloned().collect(),
            stats: self.store.stats(),
            settings_error: self.settings_error.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn router_mut(&mut self) -> &mut ViewRouter {
        &mut self.router
    }

    pub(crate) fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    pub(crate) fn connection_mut(&mut self) -> &mut ConnectionManager {
        &mut self.connection
    }

    pub(crate) fn set_settings_error(&mut self, error: Option<String>) {
        self.settings_error = error;
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    /// Makes `endpoint` the active one: clears local data, starts a fresh
    /// bootstrap and retargets the live channel.
    pub(crate) fn activate_endpoint(&mut self, endpoint: Endpoint) -> Vec<Effect> {
        watch_info!("Activating endpoint {}", endpoint);
        self.store.reset();
        self.notice = None;
        self.epoch += 1;
        self.endpoint = Some(endpoint.clone());

        let mut effects = vec![Effect::Bootstrap {
            epoch: self.epoch,
            endpoint: endpoint.clone(),
        }];
        effects.extend(wrap(self.connection.set_url(Some(endpoint.live_url()))));
        effects
    }

    /// Forgets the endpoint and everything loaded from it.
    pub(crate) fn deactivate_endpoint(&mut self) -> Vec<Effect> {
        watch_info!("Deactivating endpoint");
        self.store.reset();
        self.notice = None;
        self.epoch += 1;
        self.endpoint = None;
        wrap(self.connection.set_url(None))
    }

    /// Feeds the last-message slot to the dispatcher if it holds a payload
    /// that has not been dispatched yet.
    pub(crate) fn dispatch_latest(&mut self) {
        let Some(last) = self.connection.last_message() else {
            return;
        };
        if self.last_dispatched == Some(last.seq) {
            return;
        }
        self.last_dispatched = Some(last.seq);
        if let Some(event) = event::dispatch(&last.payload) {
            self.store.apply(event);
            self.dirty = true;
        }
    }
}

pub(crate) fn wrap(commands: Vec<ConnectionCommand>) -> Vec<Effect> {
    commands.into_iter().map(Effect::Connection).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::TransportEvent;

    #[test]
    fn same_payload_is_dispatched_once() {
        let mut state = AppState::new();
        state.activate_endpoint(Endpoint::parse("http://localhost:8000").unwrap());
        let attempt = state.connection().current_attempt().unwrap();
        state.connection_mut().handle_transport(
            attempt,
            TransportEvent::Message(r#"{"type":"chats","data":[1]}"#.to_string()),
        );

        state.dispatch_latest();
        state.store_mut().replace_chats(vec![9]);
        state.dispatch_latest();

        assert_eq!(state.store().chats(), [9]);
    }

    #[test]
    fn activation_bumps_epoch_and_resets() {
        let mut state = AppState::new();
        state.store_mut().replace_keywords(vec!["old".to_string()]);
        let effects = state.activate_endpoint(Endpoint::parse("https://a.example.com").unwrap());
        assert_eq!(state.epoch(), 1);
        assert!(state.store().keywords().is_empty());
        assert!(matches!(effects[0], Effect::Bootstrap { epoch: 1, .. }));
    }
}
