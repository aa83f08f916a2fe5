use std::sync::mpsc;
use std::thread;

use brief_core::{NewProjectDraft, Project, ProjectId};

use crate::client::ApiClient;
use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::poller::{self, PollEvent, PollSink, PollerHandle, PollerSettings};

enum BackendCommand {
    LoadProjects,
    LoadProject(ProjectId),
    Create(NewProjectDraft),
    Delete(ProjectId),
    TriggerSearch(ProjectId),
    TriggerGenerate { id: ProjectId, urls: Vec<String> },
    StartWatch(ProjectId),
    StopWatch,
}

/// Completed backend work, delivered on the event channel in finish order.
#[derive(Debug)]
pub enum BackendEvent {
    ProjectsLoaded(Result<Vec<Project>, ApiError>),
    /// Snapshot of one project, from a direct load or a watch delivery.
    ProjectLoaded(Result<Project, ApiError>),
    ProjectCreated(Result<Project, ApiError>),
    ProjectDeleted {
        id: ProjectId,
        result: Result<(), ApiError>,
    },
    SearchTriggered(Result<(), ApiError>),
    GenerateTriggered(Result<(), ApiError>),
    /// The status watch gave up after repeated failures.
    WatchAbandoned { failures: u32 },
}

/// Bridge between the synchronous shell and the async HTTP client.
///
/// Commands are queued onto a dedicated thread that owns the tokio runtime;
/// results come back on the returned event channel. At most one status watch
/// is alive at a time; starting a new one replaces the old.
pub struct BackendHandle {
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl BackendHandle {
    pub fn spawn(
        settings: ApiSettings,
        poll: PollerSettings,
    ) -> (Self, mpsc::Receiver<BackendEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        thread::spawn(move || run_backend(settings, poll, cmd_rx, event_tx));
        (Self { cmd_tx }, event_rx)
    }

    pub fn load_projects(&self) {
        let _ = self.cmd_tx.send(BackendCommand::LoadProjects);
    }

    pub fn load_project(&self, id: ProjectId) {
        let _ = self.cmd_tx.send(BackendCommand::LoadProject(id));
    }

    pub fn create_project(&self, draft: NewProjectDraft) {
        let _ = self.cmd_tx.send(BackendCommand::Create(draft));
    }

    pub fn delete_project(&self, id: ProjectId) {
        let _ = self.cmd_tx.send(BackendCommand::Delete(id));
    }

    pub fn trigger_search(&self, id: ProjectId) {
        let _ = self.cmd_tx.send(BackendCommand::TriggerSearch(id));
    }

    pub fn trigger_generate(&self, id: ProjectId, urls: Vec<String>) {
        let _ = self.cmd_tx.send(BackendCommand::TriggerGenerate { id, urls });
    }

    pub fn start_watch(&self, id: ProjectId) {
        let _ = self.cmd_tx.send(BackendCommand::StartWatch(id));
    }

    pub fn stop_watch(&self) {
        let _ = self.cmd_tx.send(BackendCommand::StopWatch);
    }
}

fn run_backend(
    settings: ApiSettings,
    poll: PollerSettings,
    cmd_rx: mpsc::Receiver<BackendCommand>,
    event_tx: mpsc::Sender<BackendEvent>,
) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let client = ApiClient::new(settings);
    let mut active_watch: Option<PollerHandle> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            BackendCommand::StartWatch(id) => {
                // Replacing the handle cancels any previous watch.
                active_watch = Some(poller::spawn_status_watch(
                    runtime.handle(),
                    client.clone(),
                    id,
                    poll.clone(),
                    WatchSink {
                        events: event_tx.clone(),
                    },
                ));
            }
            BackendCommand::StopWatch => {
                active_watch = None;
            }
            command => {
                let client = client.clone();
                let events = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client, command, events).await;
                });
            }
        }
    }
    drop(active_watch);
}

async fn handle_command(
    client: ApiClient,
    command: BackendCommand,
    events: mpsc::Sender<BackendEvent>,
) {
    match command {
        BackendCommand::LoadProjects => {
            let _ = events.send(BackendEvent::ProjectsLoaded(client.projects().await));
        }
        BackendCommand::LoadProject(id) => {
            let _ = events.send(BackendEvent::ProjectLoaded(client.project(&id).await));
        }
        BackendCommand::Create(draft) => {
            let _ = events.send(BackendEvent::ProjectCreated(
                client.create_project(&draft).await,
            ));
        }
        BackendCommand::Delete(id) => {
            let result = client.delete_project(&id).await;
            let _ = events.send(BackendEvent::ProjectDeleted { id, result });
        }
        BackendCommand::TriggerSearch(id) => {
            let _ = events.send(BackendEvent::SearchTriggered(
                client.search_competitors(&id).await,
            ));
        }
        BackendCommand::TriggerGenerate { id, urls } => {
            let _ = events.send(BackendEvent::GenerateTriggered(
                client.generate_document(&id, &urls).await,
            ));
        }
        // Watch commands are handled by the command loop itself.
        BackendCommand::StartWatch(_) | BackendCommand::StopWatch => {}
    }
}

struct WatchSink {
    events: mpsc::Sender<BackendEvent>,
}

impl PollSink for WatchSink {
    fn deliver(&self, event: PollEvent) {
        let forwarded = match event {
            PollEvent::Snapshot(project) => BackendEvent::ProjectLoaded(Ok(project)),
            PollEvent::FetchFailed(err) => BackendEvent::ProjectLoaded(Err(err)),
            PollEvent::Abandoned { failures } => BackendEvent::WatchAbandoned { failures },
        };
        let _ = self.events.send(forwarded);
    }
}
