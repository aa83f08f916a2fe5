//! Pure state machine for the brief client.
//!
//! This crate owns the screens, the reducer and the view models, and knows
//! nothing about HTTP, timers or terminals. The shell feeds [`Msg`] values
//! into [`update`] and executes the returned [`Effect`] list; rendering reads
//! [`AppState::view`].

mod effect;
mod msg;
mod project;
mod selection;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use project::{
    CompetitorCandidate, CompetitorSource, DraftError, NewProjectDraft, Project, ProjectDetails,
    ProjectId,
};
pub use selection::{display_host, filter_candidates, SelectionSet, MAX_SELECTED};
pub use state::{
    AppState, CompetitorsScreen, CreateScreen, Phase, ProjectsScreen, ResultScreen, Route, Screen,
};
pub use status::{ProjectStatus, StatusPresentation, StatusTone};
pub use update::update;
pub use view_model::{
    AppViewModel, CandidateView, CompetitorsView, CreateView, InfoRowView, ProjectRowView,
    ProjectsView, ResultView, SourceColumnView,
};
