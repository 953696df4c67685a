use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scout_core::query::{resolve_failure, split_full_name};
use scout_core::{Panel, QueryError, RequestError};
use scout_logging::{scout_debug, scout_info, scout_warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::coordinator::{CallOptions, Outcome, RequestCoordinator};
use crate::debounce::Debouncer;
use crate::followers::FollowerBackfill;
use crate::health::{spawn_health_monitor, HealthSettings};
use crate::transport::{ClientSettings, ReqwestTransport, Transport};
use crate::{ContributorsResponse, RenderPayload, Renderer, UiEvent};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub client: ClientSettings,
    /// Watchdog for panel calls; `None` relies on the client timeout alone.
    pub watchdog: Option<Duration>,
    pub suggest_delay: Duration,
    pub suggest_limit: u32,
    /// Delay between follower lookups for one contributor list.
    pub follower_stagger: Duration,
    pub health_interval: Duration,
    pub health_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            watchdog: Some(Duration::from_secs(120)),
            suggest_delay: Duration::from_millis(300),
            suggest_limit: 5,
            follower_stagger: Duration::from_millis(200),
            health_interval: Duration::from_secs(30),
            health_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
enum EngineCommand {
    Analyze { owner: String, repo: String, limit: u32 },
    ResolveAndAnalyze { name: String, limit: u32 },
    Recommend { query: String, limit: u32 },
    Suggest { query: String },
    HideSuggestions,
    OpenProfile { username: String },
    ReconcileOverlay(Panel),
    Cancel(Panel),
    CancelAll,
}

/// Owns the engine thread. Commands are executed in order on a
/// single-threaded runtime; dropping the handle shuts the engine down.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::UnboundedSender<EngineCommand>>,
    coordinator: Arc<RequestCoordinator>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, renderer: Arc<dyn Renderer>) -> Result<Self, EngineError> {
        let transport = Arc::new(ReqwestTransport::new(settings.client.clone())?);
        Self::with_transport(settings, transport, renderer)
    }

    pub fn with_transport(
        settings: EngineSettings,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let coordinator = Arc::new(RequestCoordinator::new(renderer.clone()));
        let worker = Worker {
            transport,
            renderer,
            coordinator: coordinator.clone(),
            debouncer: Arc::new(Debouncer::new(settings.suggest_delay)),
            followers: Arc::new(FollowerBackfill::new(settings.follower_stagger)),
            shutdown: CancellationToken::new(),
            settings,
        };

        let handle = thread::Builder::new()
            .name("scout-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    worker.start_health_monitor();
                    while let Some(command) = cmd_rx.recv().await {
                        worker.dispatch(command);
                    }
                    worker.stop();
                });
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            coordinator,
            worker: Some(handle),
        })
    }

    pub fn coordinator(&self) -> &Arc<RequestCoordinator> {
        &self.coordinator
    }

    pub fn analyze(&self, owner: impl Into<String>, repo: impl Into<String>, limit: u32) {
        self.send(EngineCommand::Analyze {
            owner: owner.into(),
            repo: repo.into(),
            limit,
        });
    }

    pub fn resolve_and_analyze(&self, name: impl Into<String>, limit: u32) {
        self.send(EngineCommand::ResolveAndAnalyze {
            name: name.into(),
            limit,
        });
    }

    pub fn recommend(&self, query: impl Into<String>, limit: u32) {
        self.send(EngineCommand::Recommend {
            query: query.into(),
            limit,
        });
    }

    pub fn suggest(&self, query: impl Into<String>) {
        self.send(EngineCommand::Suggest {
            query: query.into(),
        });
    }

    pub fn hide_suggestions(&self) {
        self.send(EngineCommand::HideSuggestions);
    }

    pub fn open_profile(&self, username: impl Into<String>) {
        self.send(EngineCommand::OpenProfile {
            username: username.into(),
        });
    }

    pub fn reconcile_overlay(&self, panel: Panel) {
        self.send(EngineCommand::ReconcileOverlay(panel));
    }

    pub fn cancel(&self, panel: Panel) {
        self.send(EngineCommand::Cancel(panel));
    }

    pub fn cancel_all(&self) {
        self.send(EngineCommand::CancelAll);
    }

    fn send(&self, command: EngineCommand) {
        let delivered = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(command).is_ok());
        if !delivered {
            scout_debug!("engine already stopped, command dropped");
        }
    }

    /// Cancels all work and waits for the engine thread to exit.
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        // Closing the channel ends the command loop.
        self.cmd_tx = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

struct Worker {
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn Renderer>,
    coordinator: Arc<RequestCoordinator>,
    debouncer: Arc<Debouncer>,
    followers: Arc<FollowerBackfill>,
    shutdown: CancellationToken,
    settings: EngineSettings,
}

impl Worker {
    fn start_health_monitor(&self) {
        spawn_health_monitor(
            self.transport.clone(),
            self.renderer.clone(),
            HealthSettings {
                base_url: self.settings.client.base_url.clone(),
                interval: self.settings.health_interval,
                timeout: self.settings.health_timeout,
            },
            self.shutdown.child_token(),
        );
    }

    fn stop(&self) {
        scout_info!("engine stopping");
        self.shutdown.cancel();
        self.debouncer.cancel();
        self.followers.cancel();
        self.coordinator.cancel_all();
    }

    fn call_options(&self, label: &str) -> CallOptions {
        CallOptions::new(label).with_watchdog(self.settings.watchdog)
    }

    /// Renders contributor cards, then fills in their follower counts.
    fn contributors_sink(&self) -> impl FnOnce(ContributorsResponse) + Send + 'static {
        let transport = self.transport.clone();
        let renderer = self.renderer.clone();
        let followers = self.followers.clone();
        let parent = self.shutdown.clone();
        move |data| {
            let usernames = data
                .contributors
                .iter()
                .map(|contributor| contributor.username.clone())
                .collect();
            renderer.emit(UiEvent::Render {
                panel: Panel::Analyzer,
                payload: RenderPayload::Contributors(data),
            });
            followers.start(transport, renderer, usernames, &parent);
        }
    }

    fn dispatch(&self, command: EngineCommand) {
        scout_debug!("engine command {:?}", command);
        match command {
            EngineCommand::Analyze { owner, repo, limit } => {
                self.followers.cancel();
                let transport = self.transport.clone();
                let coordinator = self.coordinator.clone();
                let call = self.coordinator.start(
                    Panel::Analyzer,
                    self.call_options("Fetching repository data"),
                    move |token| async move {
                        let data = transport
                            .contributors(&owner, &repo, limit, token.cancellation())
                            .await?;
                        coordinator.report_progress(&token, "Analyzing contributors");
                        Ok::<_, RequestError>(data)
                    },
                );
                let show = self.contributors_sink();
                tokio::spawn(async move {
                    if let Outcome::Completed(data) = call.await {
                        show(data);
                    }
                });
            }
            EngineCommand::ResolveAndAnalyze { name, limit } => {
                self.followers.cancel();
                let transport = self.transport.clone();
                let coordinator = self.coordinator.clone();
                let call = self.coordinator.start(
                    Panel::Analyzer,
                    self.call_options("Resolving repository name"),
                    move |token| async move {
                        let found = match transport
                            .suggestions(&name, 1, token.cancellation())
                            .await
                        {
                            Ok(found) => found,
                            Err(err) => match resolve_failure(&err) {
                                Some(failure) => {
                                    scout_warn!("resolving {:?} failed: {}", name, err);
                                    return Ok(Err(failure));
                                }
                                None => return Err(err),
                            },
                        };
                        let Some((owner, repo)) = found
                            .suggestions
                            .first()
                            .and_then(|best| split_full_name(&best.name))
                        else {
                            return Ok(Err(QueryError::NoMatchingRepository));
                        };
                        coordinator.report_progress(&token, "Fetching repository data");
                        let data = transport
                            .contributors(&owner, &repo, limit, token.cancellation())
                            .await?;
                        coordinator.report_progress(&token, "Analyzing contributors");
                        Ok::<_, RequestError>(Ok(data))
                    },
                );
                let renderer = self.renderer.clone();
                let show = self.contributors_sink();
                tokio::spawn(async move {
                    match call.await {
                        Outcome::Completed(Ok(data)) => show(data),
                        Outcome::Completed(Err(failure)) => renderer.emit(UiEvent::Error {
                            panel: Panel::Analyzer,
                            message: failure.to_string(),
                        }),
                        Outcome::Failed(_) | Outcome::Cancelled => {}
                    }
                });
            }
            EngineCommand::Recommend { query, limit } => {
                let transport = self.transport.clone();
                let coordinator = self.coordinator.clone();
                let call = self.coordinator.start(
                    Panel::Recommender,
                    self.call_options("Analyzing your request"),
                    move |token| async move {
                        coordinator.report_progress(&token, "Searching for matching projects");
                        let data = transport
                            .recommendations(&query, limit, token.cancellation())
                            .await?;
                        coordinator.report_progress(&token, "Generating recommendations");
                        Ok::<_, RequestError>(data)
                    },
                );
                let renderer = self.renderer.clone();
                tokio::spawn(async move {
                    if let Outcome::Completed(data) = call.await {
                        renderer.emit(UiEvent::Render {
                            panel: Panel::Recommender,
                            payload: RenderPayload::Recommendations(data),
                        });
                    }
                });
            }
            EngineCommand::Suggest { query } => {
                let transport = self.transport.clone();
                let renderer = self.renderer.clone();
                let limit = self.settings.suggest_limit;
                self.debouncer.schedule(move |cancel| async move {
                    match transport.suggestions(&query, limit, &cancel).await {
                        Ok(found) if found.suggestions.is_empty() => {
                            renderer.emit(UiEvent::SuggestionsHidden);
                        }
                        Ok(found) => renderer.emit(UiEvent::Suggestions(found.suggestions)),
                        Err(RequestError::Cancelled) => {}
                        Err(RequestError::Remote { status, .. }) => {
                            scout_debug!("suggestions for {:?} returned {}", query, status);
                        }
                        Err(err) => {
                            scout_debug!("suggestions for {:?} failed: {}", query, err);
                            renderer.emit(UiEvent::SuggestionsHidden);
                        }
                    }
                });
            }
            EngineCommand::HideSuggestions => {
                self.debouncer.cancel();
                self.renderer.emit(UiEvent::SuggestionsHidden);
            }
            EngineCommand::OpenProfile { username } => {
                let transport = self.transport.clone();
                let renderer = self.renderer.clone();
                let cancel = self.shutdown.child_token();
                tokio::spawn(async move {
                    match transport.profile(&username, &cancel).await {
                        Ok(profile) => renderer.emit(UiEvent::Render {
                            panel: Panel::Analyzer,
                            payload: RenderPayload::Profile(profile),
                        }),
                        Err(RequestError::Cancelled) => {}
                        Err(err) => {
                            if let Some(message) = err.user_message() {
                                renderer.emit(UiEvent::Error {
                                    panel: Panel::Analyzer,
                                    message,
                                });
                            }
                        }
                    }
                });
            }
            EngineCommand::ReconcileOverlay(panel) => self.coordinator.reconcile_overlay(panel),
            EngineCommand::Cancel(panel) => {
                if panel == Panel::Analyzer {
                    self.followers.cancel();
                }
                self.coordinator.cancel(panel);
            }
            EngineCommand::CancelAll => {
                self.followers.cancel();
                self.coordinator.cancel_all();
            }
        }
    }
}
