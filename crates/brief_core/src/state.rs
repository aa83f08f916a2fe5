use crate::effect::Effect;
use crate::project::{NewProjectDraft, Project, ProjectId};
use crate::selection::SelectionSet;
use crate::view_model::AppViewModel;

/// Which page of the client a session is on.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// The project list.
    Projects,
    /// Create a project from `draft`; when `then_search` is set, trigger the
    /// competitor search right after creation.
    Create {
        draft: NewProjectDraft,
        then_search: bool,
    },
    /// Competitor selection for one project.
    Competitors(ProjectId),
    /// The generated brief for one project.
    Result(ProjectId),
}

/// Busy indicator of a project-bound screen.
///
/// The dismissible error banner lives next to the phase rather than inside
/// it: polling survives a failed fetch, so an indicator and an error message
/// can be visible at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the first snapshot.
    #[default]
    Loading,
    /// Nothing in flight on the backend.
    Idle,
    /// The competitor search job is running.
    Searching,
    /// The analysis and generation job is running.
    Analyzing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectsScreen {
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateScreen {
    pub draft: NewProjectDraft,
    pub then_search: bool,
    /// Id of the created project, once the backend has acknowledged it.
    pub created: Option<ProjectId>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorsScreen {
    pub project_id: ProjectId,
    pub phase: Phase,
    pub error: Option<String>,
    pub project: Option<Project>,
    pub selection: SelectionSet,
    /// Whether a status watch is active for this screen.
    pub polling: bool,
    /// A generate call is in flight.
    pub generating: bool,
    /// Set once the screen has reacted to a `done` status; later snapshots
    /// must not navigate again.
    pub redirecting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultScreen {
    pub project_id: ProjectId,
    pub loading: bool,
    pub error: Option<String>,
    pub project: Option<Project>,
    /// A search re-trigger is in flight.
    pub search_pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Projects(ProjectsScreen),
    Create(CreateScreen),
    Competitors(CompetitorsScreen),
    Result(ResultScreen),
}

impl Screen {
    /// Fresh screen state for `route` plus the entry effects the shell must
    /// run. Nothing is carried over from a previous screen.
    fn enter(route: Route) -> (Self, Vec<Effect>) {
        match route {
            Route::Projects => (
                Screen::Projects(ProjectsScreen {
                    loading: true,
                    ..ProjectsScreen::default()
                }),
                vec![Effect::LoadProjects],
            ),
            Route::Create { draft, then_search } => (
                Screen::Create(CreateScreen {
                    draft: draft.clone(),
                    then_search,
                    created: None,
                    error: None,
                }),
                vec![Effect::CreateProject(draft)],
            ),
            Route::Competitors(id) => (
                Screen::Competitors(CompetitorsScreen {
                    project_id: id.clone(),
                    phase: Phase::Loading,
                    error: None,
                    project: None,
                    selection: SelectionSet::new(),
                    polling: false,
                    generating: false,
                    redirecting: false,
                }),
                vec![Effect::LoadProject(id)],
            ),
            Route::Result(id) => (
                Screen::Result(ResultScreen {
                    project_id: id.clone(),
                    loading: true,
                    error: None,
                    project: None,
                    search_pending: false,
                }),
                vec![Effect::LoadProject(id)],
            ),
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Projects(ProjectsScreen::default())
    }
}

/// Whole-client state: the active screen plus a render-dirty flag.
///
/// All mutation goes through [`update`](crate::update); the shell only ever
/// reads views and consumes the dirty flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    screen: Screen,
    dirty: bool,
}

impl AppState {
    /// Boots a session at `route` and returns the entry effects.
    pub fn enter(route: Route) -> (Self, Vec<Effect>) {
        let (screen, effects) = Screen::enter(route);
        (
            Self {
                screen,
                dirty: true,
            },
            effects,
        )
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub(crate) fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Renderer-facing projection of the current screen.
    pub fn view(&self) -> AppViewModel {
        AppViewModel::project(&self.screen)
    }

    /// Returns the dirty flag and clears it. The shell calls this once per
    /// dispatched message to decide whether to repaint.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
