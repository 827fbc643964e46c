use watch_logging::{watch_debug, watch_info, watch_warn};

use crate::endpoint::ENDPOINT_HINT;
use crate::state::wrap;
use crate::{AppState, ChatId, Effect, Endpoint, Mutation, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::EndpointRestored(endpoint) => {
            state.router_mut().endpoint_saved();
            state.mark_dirty();
            state.activate_endpoint(endpoint)
        }
        Msg::EndpointSubmitted(raw) => match Endpoint::parse(&raw) {
            Ok(endpoint) => {
                state.set_settings_error(None);
                state.router_mut().endpoint_saved();
                state.mark_dirty();
                let mut effects = vec![Effect::PersistEndpoint(Some(endpoint.clone()))];
                effects.extend(state.activate_endpoint(endpoint));
                effects
            }
            Err(err) => {
                watch_info!("Rejected endpoint input {:?}: {}", raw, err);
                state.set_settings_error(Some(ENDPOINT_HINT.to_string()));
                state.mark_dirty();
                Vec::new()
            }
        },
        Msg::EndpointCleared => {
            if !state.is_configured() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            let mut effects = vec![Effect::PersistEndpoint(None)];
            effects.extend(state.deactivate_endpoint());
            effects
        }
        Msg::Navigate(view) => {
            state.router_mut().navigate(view);
            state.mark_dirty();
            Vec::new()
        }
        Msg::KeywordAddRequested(raw) => {
            let keyword = raw.trim();
            if keyword.is_empty() {
                return (state, Vec::new());
            }
            mutate(&mut state, Mutation::AddKeyword(keyword.to_string()))
        }
        Msg::KeywordDeleteRequested(keyword) => mutate(&mut state, Mutation::DeleteKeyword(keyword)),
        Msg::ChatAddRequested(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return (state, Vec::new());
            }
            match raw.parse::<ChatId>() {
                Ok(chat_id) => mutate(&mut state, Mutation::AddChat(chat_id)),
                Err(_) => {
                    state.set_notice(Some("Chat ID must be a number.".to_string()));
                    state.mark_dirty();
                    Vec::new()
                }
            }
        }
        Msg::ChatDeleteRequested(chat_id) => mutate(&mut state, Mutation::DeleteChat(chat_id)),
        Msg::Transport { attempt, event } => {
            let before = state.connection().status();
            let commands = state.connection_mut().handle_transport(attempt, event);
            if state.connection().status() != before {
                state.mark_dirty();
            }
            state.dispatch_latest();
            wrap(commands)
        }
        Msg::ReconnectDue { attempt } => {
            let commands = state.connection_mut().reconnect_due(attempt);
            if !commands.is_empty() {
                state.mark_dirty();
            }
            wrap(commands)
        }
        Msg::KeywordsLoaded { epoch, result } => {
            if is_current(&state, epoch, "keywords") {
                match result {
                    Ok(keywords) => state.store_mut().replace_keywords(keywords),
                    Err(err) => bootstrap_failed(&mut state, "keywords", &err),
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ChatsLoaded { epoch, result } => {
            if is_current(&state, epoch, "chats") {
                match result {
                    Ok(chats) => state.store_mut().replace_chats(chats),
                    Err(err) => bootstrap_failed(&mut state, "chats", &err),
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MutationFinished {
            epoch,
            mutation,
            result,
        } => {
            if is_current(&state, epoch, "mutation") {
                match result {
                    Ok(()) => state.set_notice(None),
                    Err(err) => {
                        watch_warn!("{:?} failed: {}", mutation, err);
                        state.set_notice(Some(mutation.failure_notice().to_string()));
                    }
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Shutdown => {
            let commands = state.connection_mut().shutdown();
            state.mark_dirty();
            wrap(commands)
        }
    };

    (state, effects)
}

fn mutate(state: &mut AppState, mutation: Mutation) -> Vec<Effect> {
    let Some(endpoint) = state.endpoint().cloned() else {
        watch_debug!("Ignoring {:?} without an endpoint", mutation);
        return Vec::new();
    };
    vec![Effect::Mutate {
        epoch: state.epoch(),
        endpoint,
        mutation,
    }]
}

fn is_current(state: &AppState, epoch: crate::Epoch, what: &str) -> bool {
    if epoch == state.epoch() && state.is_configured() {
        true
    } else {
        watch_debug!(
            "Discarding {} result from epoch {} (current {})",
            what,
            epoch,
            state.epoch()
        );
        false
    }
}

fn bootstrap_failed(state: &mut AppState, what: &str, err: &str) {
    watch_warn!("Bootstrap of {} failed: {}", what, err);
    state.router_mut().bootstrap_failed();
}
