use crate::effect::Effect;
use crate::msg::Msg;
use crate::project::Project;
use crate::state::{AppState, CompetitorsScreen, CreateScreen, Phase, ProjectsScreen, ResultScreen, Route, Screen};
use crate::status::ProjectStatus;

/// Applies one message to the state and returns the effects the shell must
/// run. Messages that do not apply to the active screen are ignored.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let (effects, changed) = match state.screen_mut() {
        Screen::Projects(screen) => update_projects(screen, msg),
        Screen::Create(screen) => update_create(screen, msg),
        Screen::Competitors(screen) => update_competitors(screen, msg),
        Screen::Result(screen) => update_result(screen, msg),
    };
    if changed {
        state.mark_dirty();
    }
    (state, effects)
}

type Step = (Vec<Effect>, bool);

fn ignored() -> Step {
    (Vec::new(), false)
}

fn changed() -> Step {
    (Vec::new(), true)
}

fn update_projects(screen: &mut ProjectsScreen, msg: Msg) -> Step {
    match msg {
        Msg::ProjectsLoaded(rows) => {
            screen.loading = false;
            screen.rows = rows;
            changed()
        }
        Msg::LoadFailed(message) | Msg::DeleteFailed(message) => {
            screen.loading = false;
            screen.error = Some(message);
            changed()
        }
        Msg::ProjectDeleted(id) => {
            // The row disappears locally; no refetch needed.
            screen.rows.retain(|project| project.id != id);
            changed()
        }
        Msg::OpenRequested(index) => match screen.rows.get(index) {
            Some(project) => (
                vec![Effect::Navigate(Route::Result(project.id.clone()))],
                false,
            ),
            None => ignored(),
        },
        Msg::DeleteRequested(index) => match screen.rows.get(index) {
            Some(project) => (vec![Effect::DeleteProject(project.id.clone())], false),
            None => ignored(),
        },
        Msg::ReloadRequested => {
            screen.loading = true;
            (vec![Effect::LoadProjects], true)
        }
        Msg::ErrorDismissed => dismiss(&mut screen.error),
        Msg::QuitRequested => (vec![Effect::Quit], false),
        _ => ignored(),
    }
}

fn update_create(screen: &mut CreateScreen, msg: Msg) -> Step {
    match msg {
        Msg::ProjectCreated(project) => {
            screen.created = Some(project.id.clone());
            if screen.then_search {
                (vec![Effect::TriggerSearch(project.id)], true)
            } else {
                (vec![Effect::Navigate(Route::Result(project.id))], true)
            }
        }
        Msg::CreateFailed(message) => {
            // Nothing was created; there is nowhere to go but out.
            screen.error = Some(message);
            (vec![Effect::Quit], true)
        }
        Msg::SearchAccepted => match &screen.created {
            Some(id) => (
                vec![Effect::Navigate(Route::Competitors(id.clone()))],
                false,
            ),
            None => ignored(),
        },
        Msg::SearchFailed(message) => {
            // The project exists even though the search kickoff failed; land
            // on its result page so the search can be retried from there.
            screen.error = Some(message);
            match &screen.created {
                Some(id) => (vec![Effect::Navigate(Route::Result(id.clone()))], true),
                None => changed(),
            }
        }
        Msg::QuitRequested => (vec![Effect::Quit], false),
        _ => ignored(),
    }
}

fn update_competitors(screen: &mut CompetitorsScreen, msg: Msg) -> Step {
    match msg {
        Msg::ProjectLoaded(project) => {
            if screen.redirecting {
                // Already leaving for the result page; a late snapshot must
                // not re-trigger anything.
                return ignored();
            }
            apply_snapshot(screen, project)
        }
        Msg::LoadFailed(message) => {
            // Polling, if active, keeps its cadence; only the banner changes.
            // A failed initial load still settles the screen so the loading
            // line does not sit under the banner forever.
            if screen.phase == Phase::Loading {
                screen.phase = Phase::Idle;
            }
            screen.error = Some(message);
            changed()
        }
        Msg::WatchAbandoned { failures } => {
            screen.polling = false;
            screen.error = Some(format!(
                "Status updates stopped after {failures} failed checks; reload to retry"
            ));
            (vec![Effect::StopStatusWatch], true)
        }
        Msg::ToggleCompetitor { url, selected } => {
            if selected && !offers_candidate(screen.project.as_ref(), &url) {
                return ignored();
            }
            let switched = screen.selection.toggle(&url, selected);
            (Vec::new(), switched)
        }
        Msg::GenerateRequested => {
            if screen.selection.is_empty() {
                screen.error = Some("Select at least one competitor".to_string());
                return changed();
            }
            screen.generating = true;
            screen.error = None;
            (
                vec![Effect::TriggerGenerate {
                    id: screen.project_id.clone(),
                    urls: screen.selection.to_vec(),
                }],
                true,
            )
        }
        Msg::GenerateAccepted => {
            let mut effects = Vec::new();
            effects.extend(release_watch(screen));
            effects.push(Effect::Navigate(Route::Result(screen.project_id.clone())));
            (effects, false)
        }
        Msg::GenerateFailed(message) => {
            screen.generating = false;
            screen.error = Some(message);
            changed()
        }
        Msg::ReloadRequested => (vec![Effect::LoadProject(screen.project_id.clone())], false),
        Msg::SkipToResult => {
            let mut effects = Vec::new();
            effects.extend(release_watch(screen));
            effects.push(Effect::Navigate(Route::Result(screen.project_id.clone())));
            (effects, false)
        }
        Msg::ErrorDismissed => dismiss(&mut screen.error),
        Msg::QuitRequested => quit_competitors(screen),
        _ => ignored(),
    }
}

/// Folds a fresh snapshot into the competitors screen: sets the indicator
/// phase, starts or stops the status watch, and redirects once on `done`.
fn apply_snapshot(screen: &mut CompetitorsScreen, project: Project) -> Step {
    let status = project.status.clone();
    screen.project = Some(project);
    let mut effects = Vec::new();
    match status {
        ProjectStatus::Searching | ProjectStatus::Analyzing => {
            screen.phase = if status == ProjectStatus::Searching {
                Phase::Searching
            } else {
                Phase::Analyzing
            };
            if !screen.polling {
                screen.polling = true;
                effects.push(Effect::StartStatusWatch(screen.project_id.clone()));
            }
        }
        ProjectStatus::Done => {
            screen.redirecting = true;
            effects.extend(release_watch(screen));
            effects.push(Effect::Navigate(Route::Result(screen.project_id.clone())));
        }
        _ => {
            // competitors_found, draft, error and anything unrecognized all
            // settle the screen; candidate lists render as they are.
            screen.phase = Phase::Idle;
            effects.extend(release_watch(screen));
        }
    }
    (effects, true)
}

/// Stops the status watch if one is running. Every path that leaves the
/// competitors screen goes through this so a watch never outlives it.
fn release_watch(screen: &mut CompetitorsScreen) -> Option<Effect> {
    if screen.polling {
        screen.polling = false;
        Some(Effect::StopStatusWatch)
    } else {
        None
    }
}

fn quit_competitors(screen: &mut CompetitorsScreen) -> Step {
    let mut effects = Vec::new();
    effects.extend(release_watch(screen));
    effects.push(Effect::Quit);
    (effects, false)
}

fn offers_candidate(project: Option<&Project>, url: &str) -> bool {
    project.is_some_and(|project| {
        project
            .competitors_google
            .iter()
            .chain(project.competitors_yandex.iter())
            .any(|candidate| candidate.url == url)
    })
}

fn update_result(screen: &mut ResultScreen, msg: Msg) -> Step {
    match msg {
        Msg::ProjectLoaded(project) => {
            screen.loading = false;
            screen.project = Some(project);
            changed()
        }
        Msg::LoadFailed(message) => {
            screen.loading = false;
            screen.error = Some(message);
            changed()
        }
        Msg::ReloadRequested => {
            screen.loading = true;
            (vec![Effect::LoadProject(screen.project_id.clone())], true)
        }
        Msg::SearchRequested => {
            if screen.search_pending {
                return ignored();
            }
            screen.search_pending = true;
            (vec![Effect::TriggerSearch(screen.project_id.clone())], true)
        }
        Msg::SearchAccepted => {
            screen.search_pending = false;
            (
                vec![Effect::Navigate(Route::Competitors(
                    screen.project_id.clone(),
                ))],
                true,
            )
        }
        Msg::SearchFailed(message) => {
            screen.search_pending = false;
            screen.error = Some(message);
            changed()
        }
        Msg::ShowDocument => match document(screen) {
            Some(content) => (vec![Effect::EmitDocument { content }], false),
            None => ignored(),
        },
        Msg::SaveDocument => match document(screen) {
            Some(content) => {
                // Raw title on purpose; the file namer applies its own
                // fallback stem for untitled projects.
                let title = screen
                    .project
                    .as_ref()
                    .map(|p| p.title.clone())
                    .unwrap_or_default();
                (vec![Effect::PersistDocument { title, content }], false)
            }
            None => ignored(),
        },
        Msg::BackToProjects => (vec![Effect::Navigate(Route::Projects)], false),
        Msg::ErrorDismissed => dismiss(&mut screen.error),
        Msg::QuitRequested => (vec![Effect::Quit], false),
        _ => ignored(),
    }
}

fn document(screen: &ResultScreen) -> Option<String> {
    screen
        .project
        .as_ref()
        .filter(|project| project.has_document())
        .and_then(|project| project.tz_content.clone())
}

fn dismiss(error: &mut Option<String>) -> Step {
    if error.take().is_some() {
        changed()
    } else {
        ignored()
    }
}
