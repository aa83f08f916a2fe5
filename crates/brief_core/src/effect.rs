use crate::project::{NewProjectDraft, ProjectId};
use crate::state::Route;

/// Side effects requested by [`update`](crate::update). The reducer never
/// performs I/O itself; the shell's effect runner executes these.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the project list.
    LoadProjects,
    /// Fetch one project snapshot.
    LoadProject(ProjectId),
    /// Create a project from an already validated draft.
    CreateProject(NewProjectDraft),
    /// Delete a project.
    DeleteProject(ProjectId),
    /// Ask the backend to start the competitor search job.
    TriggerSearch(ProjectId),
    /// Ask the backend to start document generation for the given selection.
    TriggerGenerate { id: ProjectId, urls: Vec<String> },
    /// Start the periodic status watch for a project.
    StartStatusWatch(ProjectId),
    /// Cancel the active status watch, if any.
    StopStatusWatch,
    /// Replace the current screen with `route`.
    Navigate(Route),
    /// Print the generated document.
    EmitDocument { content: String },
    /// Save the generated document as a markdown file.
    PersistDocument { title: String, content: String },
    /// End the session.
    Quit,
}
