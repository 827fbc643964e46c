use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use watch_logging::{watch_debug, watch_error};

use crate::api::{BackendApi, EngineSettings, ReqwestApi};
use crate::link::{run_link, ChannelLinkSink};
use crate::{AttemptId, EngineEvent, Epoch, MutationRequest};

enum EngineCommand {
    Open { attempt: AttemptId, url: String },
    Close { attempt: AttemptId },
    ScheduleReconnect { attempt: AttemptId, delay: Duration },
    CancelReconnect { attempt: AttemptId },
    Bootstrap { epoch: Epoch, base_url: String },
    Mutate {
        epoch: Epoch,
        base_url: String,
        request: MutationRequest,
    },
}

/// Front of the IO engine. Commands are executed on a tokio runtime owned by
/// a background thread; results come back as [`EngineEvent`]s.
///
/// Dropping the handle cancels every live attempt and pending timer.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Self {
        let api = Arc::new(ReqwestApi::new(settings.clone()));
        Self::with_api(settings, api)
    }

    pub fn with_api(settings: EngineSettings, api: Arc<dyn BackendApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    watch_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut worker = Worker {
                runtime: runtime.handle().clone(),
                api,
                settings,
                event_tx,
                links: HashMap::new(),
                timers: HashMap::new(),
            };
            while let Ok(command) = cmd_rx.recv() {
                worker.handle(command);
            }
            worker.cancel_all();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn open(&self, attempt: AttemptId, url: impl Into<String>) {
        self.send(EngineCommand::Open {
            attempt,
            url: url.into(),
        });
    }

    pub fn close(&self, attempt: AttemptId) {
        self.send(EngineCommand::Close { attempt });
    }

    pub fn schedule_reconnect(&self, attempt: AttemptId, delay: Duration) {
        self.send(EngineCommand::ScheduleReconnect { attempt, delay });
    }

    pub fn cancel_reconnect(&self, attempt: AttemptId) {
        self.send(EngineCommand::CancelReconnect { attempt });
    }

    pub fn bootstrap(&self, epoch: Epoch, base_url: impl Into<String>) {
        self.send(EngineCommand::Bootstrap {
            epoch,
            base_url: base_url.into(),
        });
    }

    pub fn mutate(&self, epoch: Epoch, base_url: impl Into<String>, request: MutationRequest) {
        self.send(EngineCommand::Mutate {
            epoch,
            base_url: base_url.into(),
            request,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            watch_error!("Engine thread is gone; command dropped");
        }
    }
}

struct Worker {
    runtime: tokio::runtime::Handle,
    api: Arc<dyn BackendApi>,
    settings: EngineSettings,
    event_tx: mpsc::Sender<EngineEvent>,
    links: HashMap<AttemptId, CancellationToken>,
    timers: HashMap<AttemptId, CancellationToken>,
}

impl Worker {
    fn handle(&mut self, command: EngineCommand) {
        // Finished tasks cancel their own token.
        self.links.retain(|_, token| !token.is_cancelled());
        self.timers.retain(|_, token| !token.is_cancelled());

        match command {
            EngineCommand::Open { attempt, url } => {
                if self.links.contains_key(&attempt) {
                    watch_debug!("Attempt {} already running", attempt);
                    return;
                }
                let token = CancellationToken::new();
                self.links.insert(attempt, token.clone());
                let sink = ChannelLinkSink::new(self.event_tx.clone());
                let connect_timeout = self.settings.connect_timeout;
                self.runtime.spawn(async move {
                    run_link(attempt, &url, connect_timeout, &sink, token.clone()).await;
                    token.cancel();
                });
            }
            EngineCommand::Close { attempt } => {
                if let Some(token) = self.links.remove(&attempt) {
                    token.cancel();
                }
            }
            EngineCommand::ScheduleReconnect { attempt, delay } => {
                let token = CancellationToken::new();
                if let Some(previous) = self.timers.insert(attempt, token.clone()) {
                    previous.cancel();
                }
                let event_tx = self.event_tx.clone();
                self.runtime.spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {}
                        _ = tokio::time::sleep(delay) => {
                            let _ = event_tx.send(EngineEvent::ReconnectDue { attempt });
                            token.cancel();
                        }
                    }
                });
            }
            EngineCommand::CancelReconnect { attempt } => {
                if let Some(token) = self.timers.remove(&attempt) {
                    token.cancel();
                }
            }
            EngineCommand::Bootstrap { epoch, base_url } => {
                let api = self.api.clone();
                let event_tx = self.event_tx.clone();
                self.runtime.spawn(async move {
                    let keywords = async {
                        let result = api.keywords(&base_url).await;
                        let _ = event_tx.send(EngineEvent::KeywordsLoaded { epoch, result });
                    };
                    let chats = async {
                        let result = api.chats(&base_url).await;
                        let _ = event_tx.send(EngineEvent::ChatsLoaded { epoch, result });
                    };
                    tokio::join!(keywords, chats);
                });
            }
            EngineCommand::Mutate {
                epoch,
                base_url,
                request,
            } => {
                let api = self.api.clone();
                let event_tx = self.event_tx.clone();
                self.runtime.spawn(async move {
                    let result = api.mutate(&base_url, &request).await;
                    let _ = event_tx.send(EngineEvent::MutationFinished {
                        epoch,
                        request,
                        result,
                    });
                });
            }
        }
    }

    fn cancel_all(&mut self) {
        for (_, token) in self.links.drain().chain(self.timers.drain()) {
            token.cancel();
        }
    }
}
