use std::sync::Once;

use brief_core::{
    update, AppState, AppViewModel, CompetitorCandidate, CompetitorsView, Effect, Msg, Phase,
    Project, ProjectStatus, Route, Screen,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(brief_logging::initialize_for_tests);
}

fn candidate(url: &str) -> CompetitorCandidate {
    CompetitorCandidate {
        url: url.to_string(),
        title: Some(format!("Page at {url}")),
        snippet: None,
    }
}

fn snapshot(status: ProjectStatus) -> Project {
    Project {
        id: "p-1".to_string(),
        title: "Oak tables".to_string(),
        main_keyword: "oak table".to_string(),
        status,
        competitors_google: vec![
            candidate("https://g1.example/"),
            candidate("https://g2.example/"),
        ],
        competitors_yandex: vec![candidate("https://y1.example/")],
        ..Project::default()
    }
}

fn enter() -> AppState {
    let (state, effects) = AppState::enter(Route::Competitors("p-1".to_string()));
    assert_eq!(effects, vec![Effect::LoadProject("p-1".to_string())]);
    state
}

fn competitors_view(state: &AppState) -> CompetitorsView {
    match state.view() {
        AppViewModel::Competitors(view) => view,
        other => panic!("expected competitors view, got {other:?}"),
    }
}

fn polling(state: &AppState) -> bool {
    match state.screen() {
        Screen::Competitors(screen) => screen.polling,
        other => panic!("expected competitors screen, got {other:?}"),
    }
}

#[test]
fn searching_snapshot_starts_the_watch_once() {
    init_logging();
    let state = enter();

    let (state, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));
    assert_eq!(effects, vec![Effect::StartStatusWatch("p-1".to_string())]);
    let view = competitors_view(&state);
    assert_eq!(
        view.busy_note,
        Some("Searching for competitors in Google and Yandex...")
    );
    assert!(!view.columns_visible);

    // The next pending snapshot keeps the existing watch.
    let (state, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));
    assert_eq!(effects, vec![]);
    assert!(polling(&state));
}

#[test]
fn analyzing_snapshot_shows_columns_under_the_indicator() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (state, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Analyzing)));
    assert_eq!(effects, vec![]);
    let view = competitors_view(&state);
    assert_eq!(
        view.busy_note,
        Some("Analyzing competitor pages and generating the brief...")
    );
    assert!(view.columns_visible);
    assert_eq!(view.columns[0].source_label, "Google");
    assert_eq!(view.columns[0].candidates.len(), 2);
    assert_eq!(view.columns[1].source_label, "Yandex");
    assert_eq!(view.columns[1].candidates.len(), 1);
}

#[test]
fn done_snapshot_redirects_once_and_stops_the_watch() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (state, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Done)));
    assert_eq!(
        effects,
        vec![
            Effect::StopStatusWatch,
            Effect::Navigate(Route::Result("p-1".to_string())),
        ]
    );

    // A late delivery of the same terminal status must not navigate again.
    let (state, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Done)));
    assert_eq!(effects, vec![]);
    let (_, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Analyzing)));
    assert_eq!(effects, vec![]);
}

#[test]
fn done_on_first_load_navigates_without_a_watch() {
    init_logging();
    let state = enter();
    let (_, effects) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Done)));
    assert_eq!(
        effects,
        vec![Effect::Navigate(Route::Result("p-1".to_string()))]
    );
}

#[test]
fn competitors_found_settles_the_screen() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (state, effects) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::CompetitorsFound)),
    );
    assert_eq!(effects, vec![Effect::StopStatusWatch]);
    assert!(!polling(&state));
    let view = competitors_view(&state);
    assert_eq!(view.busy_note, None);
    assert!(view.columns_visible);
}

#[test]
fn unknown_status_is_treated_as_idle() {
    init_logging();
    let state = enter();
    let (state, effects) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::Other("archived".to_string()))),
    );
    assert_eq!(effects, vec![]);
    match state.screen() {
        Screen::Competitors(screen) => assert_eq!(screen.phase, Phase::Idle),
        other => panic!("expected competitors screen, got {other:?}"),
    }
}

#[test]
fn toggling_tracks_pick_order_and_ignores_unknown_urls() {
    init_logging();
    let state = enter();
    let (state, _) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::CompetitorsFound)),
    );

    let (state, _) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://g2.example/".to_string(),
            selected: true,
        },
    );
    let (state, _) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://y1.example/".to_string(),
            selected: true,
        },
    );
    let (state, effects) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://nowhere.example/".to_string(),
            selected: true,
        },
    );
    assert_eq!(effects, vec![]);
    assert_eq!(competitors_view(&state).selected_count, 2);

    let (_, effects) = update(state, Msg::GenerateRequested);
    assert_eq!(
        effects,
        vec![Effect::TriggerGenerate {
            id: "p-1".to_string(),
            urls: vec![
                "https://g2.example/".to_string(),
                "https://y1.example/".to_string(),
            ],
        }]
    );
}

#[test]
fn eighth_pick_is_rejected_and_controls_disable() {
    init_logging();
    let mut wide = snapshot(ProjectStatus::CompetitorsFound);
    wide.competitors_google = (0..8)
        .map(|n| candidate(&format!("https://g{n}.example/")))
        .collect();
    let state = enter();
    let (mut state, _) = update(state, Msg::ProjectLoaded(wide));

    for n in 0..7 {
        let (next, _) = update(
            state,
            Msg::ToggleCompetitor {
                url: format!("https://g{n}.example/"),
                selected: true,
            },
        );
        state = next;
    }
    let view = competitors_view(&state);
    assert_eq!(view.selected_count, 7);
    assert_eq!(view.selection_cap, 7);
    let eighth = &view.columns[0].candidates[7];
    assert!(!eighth.selected);
    assert!(!eighth.selectable);

    let (state, effects) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://g7.example/".to_string(),
            selected: true,
        },
    );
    assert_eq!(effects, vec![]);
    assert_eq!(competitors_view(&state).selected_count, 7);
}

#[test]
fn generate_with_empty_selection_is_a_local_error() {
    init_logging();
    let state = enter();
    let (state, _) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::CompetitorsFound)),
    );

    let (state, effects) = update(state, Msg::GenerateRequested);
    assert_eq!(effects, vec![]);
    assert_eq!(
        competitors_view(&state).error,
        Some("Select at least one competitor".to_string())
    );
}

#[test]
fn generate_failure_restores_the_action() {
    init_logging();
    let state = enter();
    let (state, _) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::CompetitorsFound)),
    );
    let (state, _) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://g1.example/".to_string(),
            selected: true,
        },
    );
    let (state, _) = update(state, Msg::GenerateRequested);
    assert!(competitors_view(&state).generating);

    let (state, effects) = update(state, Msg::GenerateFailed("HTTP 502: bad gateway".to_string()));
    assert_eq!(effects, vec![]);
    let view = competitors_view(&state);
    assert!(!view.generating);
    assert!(view.can_generate);
    assert_eq!(view.error, Some("HTTP 502: bad gateway".to_string()));

    let (state, _) = update(state, Msg::ErrorDismissed);
    assert_eq!(competitors_view(&state).error, None);
}

#[test]
fn generate_accepted_navigates_to_the_result() {
    init_logging();
    let state = enter();
    let (state, _) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::CompetitorsFound)),
    );
    let (state, _) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://g1.example/".to_string(),
            selected: true,
        },
    );
    let (state, _) = update(state, Msg::GenerateRequested);
    let (_, effects) = update(state, Msg::GenerateAccepted);
    assert_eq!(
        effects,
        vec![Effect::Navigate(Route::Result("p-1".to_string()))]
    );
}

#[test]
fn fetch_failure_keeps_the_watch_running() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (state, effects) = update(state, Msg::LoadFailed("connection refused".to_string()));
    assert_eq!(effects, vec![]);
    assert!(polling(&state));
    assert_eq!(
        competitors_view(&state).error,
        Some("connection refused".to_string())
    );

    // The indicator survives the banner.
    assert!(competitors_view(&state).busy_note.is_some());
}

#[test]
fn abandoned_watch_surfaces_the_failure_count() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (state, effects) = update(state, Msg::WatchAbandoned { failures: 5 });
    assert_eq!(effects, vec![Effect::StopStatusWatch]);
    assert!(!polling(&state));
    assert_eq!(
        competitors_view(&state).error,
        Some("Status updates stopped after 5 failed checks; reload to retry".to_string())
    );
}

#[test]
fn excluded_domains_are_hidden_from_the_columns() {
    init_logging();
    let mut project = snapshot(ProjectStatus::CompetitorsFound);
    project.excluded_domains = vec!["g1.example".to_string()];
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(project));

    let view = competitors_view(&state);
    let urls: Vec<&str> = view.columns[0]
        .candidates
        .iter()
        .map(|c| c.url.as_str())
        .collect();
    assert_eq!(urls, vec!["https://g2.example/"]);
}

#[test]
fn exclusions_hide_candidates_but_never_unpick_them() {
    init_logging();
    let state = enter();
    let (state, _) = update(
        state,
        Msg::ProjectLoaded(snapshot(ProjectStatus::CompetitorsFound)),
    );
    let (state, _) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://g1.example/".to_string(),
            selected: true,
        },
    );

    // A refresh arrives with a new exclusion covering the picked URL.
    let mut refreshed = snapshot(ProjectStatus::CompetitorsFound);
    refreshed.excluded_domains = vec!["g1.example".to_string()];
    let (state, _) = update(state, Msg::ProjectLoaded(refreshed));

    let view = competitors_view(&state);
    let offered: Vec<&str> = view.columns[0]
        .candidates
        .iter()
        .map(|c| c.url.as_str())
        .collect();
    assert_eq!(offered, vec!["https://g2.example/"]);
    assert_eq!(view.selected_count, 1);

    // The hidden pick still goes into the generate call.
    let (_, effects) = update(state, Msg::GenerateRequested);
    assert_eq!(
        effects,
        vec![Effect::TriggerGenerate {
            id: "p-1".to_string(),
            urls: vec!["https://g1.example/".to_string()],
        }]
    );
}

#[test]
fn failed_initial_load_settles_the_screen() {
    init_logging();
    let state = enter();
    let (state, effects) = update(state, Msg::LoadFailed("connection refused".to_string()));
    assert_eq!(effects, vec![]);
    let view = competitors_view(&state);
    assert!(!view.loading);
    assert_eq!(view.error, Some("connection refused".to_string()));
    assert!(!polling(&state));
}

#[test]
fn quitting_releases_an_active_watch() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (_, effects) = update(state, Msg::QuitRequested);
    assert_eq!(effects, vec![Effect::StopStatusWatch, Effect::Quit]);
}

#[test]
fn skipping_to_the_result_releases_an_active_watch() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Searching)));

    let (_, effects) = update(state, Msg::SkipToResult);
    assert_eq!(
        effects,
        vec![
            Effect::StopStatusWatch,
            Effect::Navigate(Route::Result("p-1".to_string())),
        ]
    );
}

#[test]
fn generation_started_mid_analysis_releases_the_watch_on_accept() {
    init_logging();
    let state = enter();
    let (state, _) = update(state, Msg::ProjectLoaded(snapshot(ProjectStatus::Analyzing)));
    let (state, _) = update(
        state,
        Msg::ToggleCompetitor {
            url: "https://g1.example/".to_string(),
            selected: true,
        },
    );
    let (state, _) = update(state, Msg::GenerateRequested);

    let (_, effects) = update(state, Msg::GenerateAccepted);
    assert_eq!(
        effects,
        vec![
            Effect::StopStatusWatch,
            Effect::Navigate(Route::Result("p-1".to_string())),
        ]
    );
}
