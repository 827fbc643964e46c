//! Sans-IO lifecycle of the live channel.
//!
//! [`ConnectionManager`] never touches a socket. It turns endpoint changes and
//! transport callbacks into [`ConnectionCommand`]s that the engine executes,
//! and it owns the observable status plus the last-message slot.
//!
//! Every connection attempt gets a fresh [`AttemptId`]. Callbacks and timer
//! expiries carrying any other id belong to a superseded attempt and are
//! ignored, which is what keeps a late close from an old endpoint from
//! scheduling a reconnect against the new one.

use std::time::Duration;

use watch_logging::{watch_debug, watch_info, watch_warn};

/// Delay between a close and the next connection attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Generation number of one connection attempt.
pub type AttemptId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Uninstantiated,
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Work the engine must perform on behalf of the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCommand {
    Open { attempt: AttemptId, url: String },
    Close { attempt: AttemptId },
    ScheduleReconnect { attempt: AttemptId, delay: Duration },
    CancelReconnect { attempt: AttemptId },
}

/// Callback from the transport for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Errored(String),
    Closed,
}

/// Content of the last-write-wins slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMessage {
    /// Increases by one per received payload, across attempts.
    pub seq: u64,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attempt {
    id: AttemptId,
    phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionManager {
    url: Option<String>,
    status: ConnectionStatus,
    attempt: Option<Attempt>,
    next_attempt: AttemptId,
    pending_reconnect: Option<AttemptId>,
    last_message: Option<LastMessage>,
    next_seq: u64,
    reconnect_delay: Duration,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(RECONNECT_DELAY)
    }
}

impl ConnectionManager {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            url: None,
            status: ConnectionStatus::Uninstantiated,
            attempt: None,
            next_attempt: 1,
            pending_reconnect: None,
            last_message: None,
            next_seq: 1,
            reconnect_delay,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_message(&self) -> Option<&LastMessage> {
        self.last_message.as_ref()
    }

    /// Id of the attempt whose callbacks are currently honoured.
    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.attempt.map(|attempt| attempt.id)
    }

    /// Points the manager at a new live-channel address, or at none.
    ///
    /// Setting the address it already targets is a no-op.
    pub fn set_url(&mut self, url: Option<String>) -> Vec<ConnectionCommand> {
        if url == self.url {
            return Vec::new();
        }

        let mut commands = self.teardown();
        match url {
            Some(url) => {
                watch_info!("Live channel target set to {}", url);
                self.url = Some(url);
                commands.extend(self.connect());
            }
            None => {
                watch_info!("Live channel target cleared");
                self.url = None;
                self.status = ConnectionStatus::Uninstantiated;
            }
        }
        commands
    }

    /// Stops producing transitions for the current target.
    pub fn shutdown(&mut self) -> Vec<ConnectionCommand> {
        let commands = self.teardown();
        self.url = None;
        commands
    }

    pub fn handle_transport(
        &mut self,
        attempt: AttemptId,
        event: TransportEvent,
    ) -> Vec<ConnectionCommand> {
        if self.current_attempt() != Some(attempt) {
            watch_debug!("Ignoring {:?} from superseded attempt {}", event, attempt);
            return Vec::new();
        }

        match event {
            TransportEvent::Opened => {
                self.set_phase(Phase::Open);
                self.status = ConnectionStatus::Open;
                watch_info!("Live channel open (attempt {})", attempt);
                Vec::new()
            }
            TransportEvent::Message(payload) => {
                self.store_message(payload);
                Vec::new()
            }
            TransportEvent::Errored(detail) => {
                watch_warn!("Live channel error (attempt {}): {}", attempt, detail);
                Vec::new()
            }
            TransportEvent::Closed => self.on_closed(attempt),
        }
    }

    /// Reconnect timer for `attempt` fired.
    pub fn reconnect_due(&mut self, attempt: AttemptId) -> Vec<ConnectionCommand> {
        if self.pending_reconnect != Some(attempt) {
            watch_debug!("Ignoring stale reconnect timer for attempt {}", attempt);
            return Vec::new();
        }
        self.pending_reconnect = None;
        self.connect()
    }

    fn on_closed(&mut self, attempt: AttemptId) -> Vec<ConnectionCommand> {
        if self.phase() == Some(Phase::Closed) {
            return Vec::new();
        }
        self.set_phase(Phase::Closed);
        self.status = ConnectionStatus::Closed;
        watch_info!(
            "Live channel closed (attempt {}), retrying in {:?}",
            attempt,
            self.reconnect_delay
        );
        self.pending_reconnect = Some(attempt);
        vec![ConnectionCommand::ScheduleReconnect {
            attempt,
            delay: self.reconnect_delay,
        }]
    }

    fn connect(&mut self) -> Vec<ConnectionCommand> {
        let Some(url) = self.url.clone() else {
            return Vec::new();
        };
        if matches!(self.phase(), Some(Phase::Connecting | Phase::Open)) {
            watch_debug!("Connect skipped, attempt still live");
            return Vec::new();
        }

        let id = self.next_attempt;
        self.next_attempt += 1;
        self.attempt = Some(Attempt {
            id,
            phase: Phase::Connecting,
        });
        self.status = ConnectionStatus::Connecting;
        vec![ConnectionCommand::Open { attempt: id, url }]
    }

    fn teardown(&mut self) -> Vec<ConnectionCommand> {
        let mut commands = Vec::new();
        if let Some(pending) = self.pending_reconnect.take() {
            commands.push(ConnectionCommand::CancelReconnect { attempt: pending });
        }
        if let Some(attempt) = self.attempt.take() {
            commands.push(ConnectionCommand::Close { attempt: attempt.id });
            self.status = ConnectionStatus::Closing;
        }
        commands
    }

    fn store_message(&mut self, payload: String) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.last_message = Some(LastMessage { seq, payload });
    }

    fn phase(&self) -> Option<Phase> {
        self.attempt.map(|attempt| attempt.phase)
    }

    fn set_phase(&mut self, phase: Phase) {
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.phase = phase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "wss://api.example.com/ws";

    fn open_manager() -> (ConnectionManager, AttemptId) {
        let mut manager = ConnectionManager::default();
        let commands = manager.set_url(Some(URL.to_string()));
        let attempt = manager.current_attempt().unwrap();
        assert_eq!(
            commands,
            vec![ConnectionCommand::Open {
                attempt,
                url: URL.to_string()
            }]
        );
        manager.handle_transport(attempt, TransportEvent::Opened);
        (manager, attempt)
    }

    #[test]
    fn starts_uninstantiated() {
        let manager = ConnectionManager::default();
        assert_eq!(manager.status(), ConnectionStatus::Uninstantiated);
        assert!(manager.last_message().is_none());
    }

    #[test]
    fn close_schedules_exactly_one_reconnect() {
        let (mut manager, attempt) = open_manager();
        assert_eq!(manager.status(), ConnectionStatus::Open);

        let commands = manager.handle_transport(attempt, TransportEvent::Closed);
        assert_eq!(manager.status(), ConnectionStatus::Closed);
        assert_eq!(
            commands,
            vec![ConnectionCommand::ScheduleReconnect {
                attempt,
                delay: RECONNECT_DELAY
            }]
        );

        assert!(manager
            .handle_transport(attempt, TransportEvent::Closed)
            .is_empty());

        let commands = manager.reconnect_due(attempt);
        assert_eq!(manager.status(), ConnectionStatus::Connecting);
        let next = manager.current_attempt().unwrap();
        assert_ne!(next, attempt);
        assert_eq!(
            commands,
            vec![ConnectionCommand::Open {
                attempt: next,
                url: URL.to_string()
            }]
        );
        assert!(manager.reconnect_due(attempt).is_empty());
    }

    #[test]
    fn error_alone_does_not_transition() {
        let (mut manager, attempt) = open_manager();
        let commands =
            manager.handle_transport(attempt, TransportEvent::Errored("reset".to_string()));
        assert!(commands.is_empty());
        assert_eq!(manager.status(), ConnectionStatus::Open);
    }

    #[test]
    fn failed_handshake_also_reconnects() {
        let mut manager = ConnectionManager::default();
        manager.set_url(Some(URL.to_string()));
        let attempt = manager.current_attempt().unwrap();
        manager.handle_transport(attempt, TransportEvent::Errored("refused".to_string()));
        assert_eq!(manager.status(), ConnectionStatus::Connecting);

        let commands = manager.handle_transport(attempt, TransportEvent::Closed);
        assert_eq!(manager.status(), ConnectionStatus::Closed);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn url_change_tears_down_and_ignores_old_callbacks() {
        let (mut manager, old) = open_manager();
        manager.handle_transport(old, TransportEvent::Closed);

        let commands = manager.set_url(Some("ws://other.example.com/ws".to_string()));
        let new = manager.current_attempt().unwrap();
        assert_eq!(
            commands,
            vec![
                ConnectionCommand::CancelReconnect { attempt: old },
                ConnectionCommand::Close { attempt: old },
                ConnectionCommand::Open {
                    attempt: new,
                    url: "ws://other.example.com/ws".to_string()
                },
            ]
        );
        assert_eq!(manager.status(), ConnectionStatus::Connecting);

        assert!(manager.handle_transport(old, TransportEvent::Opened).is_empty());
        assert!(manager.reconnect_due(old).is_empty());
        manager.handle_transport(old, TransportEvent::Message("late".to_string()));
        assert!(manager.last_message().is_none());
        assert_eq!(manager.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn same_url_is_a_noop() {
        let (mut manager, attempt) = open_manager();
        assert!(manager.set_url(Some(URL.to_string())).is_empty());
        assert_eq!(manager.current_attempt(), Some(attempt));
    }

    #[test]
    fn clearing_url_returns_to_uninstantiated() {
        let (mut manager, attempt) = open_manager();
        let commands = manager.set_url(None);
        assert_eq!(commands, vec![ConnectionCommand::Close { attempt }]);
        assert_eq!(manager.status(), ConnectionStatus::Uninstantiated);
        assert!(manager.handle_transport(attempt, TransportEvent::Closed).is_empty());
    }

    #[test]
    fn shutdown_marks_closing_and_stops_reconnects() {
        let (mut manager, attempt) = open_manager();
        let commands = manager.shutdown();
        assert_eq!(commands, vec![ConnectionCommand::Close { attempt }]);
        assert_eq!(manager.status(), ConnectionStatus::Closing);
        assert!(manager.handle_transport(attempt, TransportEvent::Closed).is_empty());
        assert_eq!(manager.status(), ConnectionStatus::Closing);
    }

    #[test]
    fn messages_overwrite_the_slot() {
        let (mut manager, attempt) = open_manager();
        manager.handle_transport(attempt, TransportEvent::Message("a".to_string()));
        manager.handle_transport(attempt, TransportEvent::Message("b".to_string()));
        let last = manager.last_message().unwrap();
        assert_eq!(last.payload, "b");
        assert_eq!(last.seq, 2);
    }
}
