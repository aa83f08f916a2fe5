use crate::project::{Project, ProjectId};

/// Everything that can happen to the client: commands surfaced by the shell
/// and backend outcomes surfaced by the effect runner.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Project list response arrived.
    ProjectsLoaded(Vec<Project>),
    /// Fresh snapshot of the current project, from an initial load, an
    /// explicit reload or a status watch delivery.
    ProjectLoaded(Project),
    /// A load or watch fetch failed; the message lands in the error banner.
    LoadFailed(String),
    /// The status watch gave up after this many consecutive failed fetches.
    WatchAbandoned { failures: u32 },

    ProjectCreated(Project),
    CreateFailed(String),
    ProjectDeleted(ProjectId),
    DeleteFailed(String),
    /// Competitor search was accepted by the backend.
    SearchAccepted,
    SearchFailed(String),
    /// Document generation was accepted by the backend.
    GenerateAccepted,
    GenerateFailed(String),

    /// A candidate checkbox was toggled.
    ToggleCompetitor { url: String, selected: bool },
    /// Start generation with the current selection.
    GenerateRequested,
    /// Re-run the competitor search for the current project.
    SearchRequested,
    /// Open the projects-list row at `index`.
    OpenRequested(usize),
    /// Delete the projects-list row at `index`.
    DeleteRequested(usize),
    /// Re-fetch whatever the current screen shows.
    ReloadRequested,
    /// Jump from competitor selection straight to the result page.
    SkipToResult,
    /// Print the generated document.
    ShowDocument,
    /// Save the generated document to disk.
    SaveDocument,
    /// Leave the current screen for the projects list.
    BackToProjects,
    /// Clear the error banner.
    ErrorDismissed,
    QuitRequested,
}
