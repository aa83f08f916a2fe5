use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use brief_api::{ApiSettings, BackendEvent, BackendHandle, PollerSettings};
use brief_core::{Effect, Msg};
use brief_logging::{brief_error, brief_info, brief_warn};

use crate::export::DocumentExporter;
use crate::session::SessionEvent;

/// Executes reducer effects against the backend bridge and the filesystem.
/// Navigation and shutdown are session concerns and never reach the runner.
pub struct EffectRunner {
    backend: BackendHandle,
    exporter: DocumentExporter,
}

impl EffectRunner {
    /// Spawns the backend bridge and a pump that feeds its events into the
    /// session channel as messages.
    pub fn new(settings: ApiSettings, output_dir: PathBuf, events: mpsc::Sender<SessionEvent>) -> Self {
        let (backend, backend_rx) = BackendHandle::spawn(settings, PollerSettings::default());
        thread::spawn(move || {
            while let Ok(event) = backend_rx.recv() {
                if events.send(SessionEvent::Msg(msg_from_backend(event))).is_err() {
                    return;
                }
            }
        });
        Self {
            backend,
            exporter: DocumentExporter::new(output_dir),
        }
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::LoadProjects => {
                brief_info!("LoadProjects");
                self.backend.load_projects();
            }
            Effect::LoadProject(id) => {
                brief_info!("LoadProject id={}", id);
                self.backend.load_project(id);
            }
            Effect::CreateProject(draft) => {
                brief_info!("CreateProject title={}", draft.title);
                self.backend.create_project(draft);
            }
            Effect::DeleteProject(id) => {
                brief_info!("DeleteProject id={}", id);
                self.backend.delete_project(id);
            }
            Effect::TriggerSearch(id) => {
                brief_info!("TriggerSearch id={}", id);
                self.backend.trigger_search(id);
            }
            Effect::TriggerGenerate { id, urls } => {
                brief_info!("TriggerGenerate id={} urls={}", id, urls.len());
                self.backend.trigger_generate(id, urls);
            }
            Effect::StartStatusWatch(id) => {
                brief_info!("StartStatusWatch id={}", id);
                self.backend.start_watch(id);
            }
            Effect::StopStatusWatch => {
                brief_info!("StopStatusWatch");
                self.backend.stop_watch();
            }
            Effect::EmitDocument { content } => {
                println!("{content}");
            }
            Effect::PersistDocument { title, content } => self.persist(&title, &content),
            Effect::Navigate(_) | Effect::Quit => {
                // The session loop consumes these before effects reach the
                // runner.
            }
        }
    }

    fn persist(&self, title: &str, content: &str) {
        match self.exporter.write(title, content) {
            Ok(path) => {
                brief_info!("Saved document to {:?}", path);
                println!("Saved to {}", path.display());
            }
            Err(err) => {
                brief_error!("Failed to save the document: {}", err);
                eprintln!("Could not save the document: {err}");
            }
        }
    }
}

/// Maps one backend outcome onto the message the reducer understands.
/// Failures also land in the log with their full error.
fn msg_from_backend(event: BackendEvent) -> Msg {
    match event {
        BackendEvent::ProjectsLoaded(Ok(projects)) => Msg::ProjectsLoaded(projects),
        BackendEvent::ProjectsLoaded(Err(err)) => {
            brief_warn!("Project list load failed: {}", err);
            Msg::LoadFailed(err.to_string())
        }
        BackendEvent::ProjectLoaded(Ok(project)) => Msg::ProjectLoaded(project),
        BackendEvent::ProjectLoaded(Err(err)) => {
            brief_warn!("Project load failed: {}", err);
            Msg::LoadFailed(err.to_string())
        }
        BackendEvent::ProjectCreated(Ok(project)) => Msg::ProjectCreated(project),
        BackendEvent::ProjectCreated(Err(err)) => {
            brief_error!("Create failed: {}", err);
            Msg::CreateFailed(err.to_string())
        }
        BackendEvent::ProjectDeleted { id, result: Ok(()) } => Msg::ProjectDeleted(id),
        BackendEvent::ProjectDeleted { id, result: Err(err) } => {
            brief_warn!("Delete of {} failed: {}", id, err);
            Msg::DeleteFailed(err.to_string())
        }
        BackendEvent::SearchTriggered(Ok(())) => Msg::SearchAccepted,
        BackendEvent::SearchTriggered(Err(err)) => {
            brief_warn!("Search kickoff failed: {}", err);
            Msg::SearchFailed(err.to_string())
        }
        BackendEvent::GenerateTriggered(Ok(())) => Msg::GenerateAccepted,
        BackendEvent::GenerateTriggered(Err(err)) => {
            brief_warn!("Generate kickoff failed: {}", err);
            Msg::GenerateFailed(err.to_string())
        }
        BackendEvent::WatchAbandoned { failures } => Msg::WatchAbandoned { failures },
    }
}
