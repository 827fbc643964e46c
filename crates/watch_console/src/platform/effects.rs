use std::path::PathBuf;

use watch_core::{ConnectionCommand, Effect, Msg, Mutation, TransportEvent};
use watch_engine::{EngineEvent, EngineHandle, EngineSettings, LinkEvent, MutationRequest};
use watch_logging::{watch_debug, watch_info};

use super::persistence;

/// Executes core effects and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    state_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, state_dir: PathBuf) -> Self {
        Self {
            engine: EngineHandle::new(settings),
            state_dir,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PersistEndpoint(endpoint) => {
                    persistence::save_endpoint(&self.state_dir, endpoint.as_ref());
                }
                Effect::Bootstrap { epoch, endpoint } => {
                    watch_info!("Bootstrap epoch={} endpoint={}", epoch, endpoint);
                    self.engine.bootstrap(epoch, endpoint.as_str());
                }
                Effect::Connection(command) => self.run_connection(command),
                Effect::Mutate {
                    epoch,
                    endpoint,
                    mutation,
                } => {
                    watch_info!("Mutate epoch={} {:?}", epoch, mutation);
                    self.engine
                        .mutate(epoch, endpoint.as_str(), to_request(mutation));
                }
            }
        }
    }

    /// Next engine event as a message, if one is waiting.
    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }

    fn run_connection(&self, command: ConnectionCommand) {
        watch_debug!("Connection command {:?}", command);
        match command {
            ConnectionCommand::Open { attempt, url } => self.engine.open(attempt, url),
            ConnectionCommand::Close { attempt } => self.engine.close(attempt),
            ConnectionCommand::ScheduleReconnect { attempt, delay } => {
                self.engine.schedule_reconnect(attempt, delay)
            }
            ConnectionCommand::CancelReconnect { attempt } => self.engine.cancel_reconnect(attempt),
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Link { attempt, event } => Msg::Transport {
            attempt,
            event: map_link(event),
        },
        EngineEvent::ReconnectDue { attempt } => Msg::ReconnectDue { attempt },
        EngineEvent::KeywordsLoaded { epoch, result } => Msg::KeywordsLoaded {
            epoch,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ChatsLoaded { epoch, result } => Msg::ChatsLoaded {
            epoch,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::MutationFinished {
            epoch,
            request,
            result,
        } => Msg::MutationFinished {
            epoch,
            mutation: from_request(request),
            result: result.map_err(|err| err.to_string()),
        },
    }
}

fn map_link(event: LinkEvent) -> TransportEvent {
    match event {
        LinkEvent::Opened => TransportEvent::Opened,
        LinkEvent::Text(text) => TransportEvent::Message(text),
        LinkEvent::Failed(detail) => TransportEvent::Errored(detail),
        LinkEvent::Closed => TransportEvent::Closed,
    }
}

fn to_request(mutation: Mutation) -> MutationRequest {
    match mutation {
        Mutation::AddKeyword(keyword) => MutationRequest::AddKeyword(keyword),
        Mutation::DeleteKeyword(keyword) => MutationRequest::DeleteKeyword(keyword),
        Mutation::AddChat(chat_id) => MutationRequest::AddChat(chat_id),
        Mutation::DeleteChat(chat_id) => MutationRequest::DeleteChat(chat_id),
    }
}

fn from_request(request: MutationRequest) -> Mutation {
    match request {
        MutationRequest::AddKeyword(keyword) => Mutation::AddKeyword(keyword),
        MutationRequest::DeleteKeyword(keyword) => Mutation::DeleteKeyword(keyword),
        MutationRequest::AddChat(chat_id) => Mutation::AddChat(chat_id),
        MutationRequest::DeleteChat(chat_id) => Mutation::DeleteChat(chat_id),
    }
}
