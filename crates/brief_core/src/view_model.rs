use crate::project::{CompetitorSource, Project};
use crate::selection::{display_host, filter_candidates, MAX_SELECTED};
use crate::state::{
    CompetitorsScreen, CreateScreen, Phase, ProjectsScreen, ResultScreen, Screen,
};
use crate::status::StatusTone;

/// Renderer-facing projection of the current screen. Everything is owned and
/// pre-massaged so the shell never touches domain types.
#[derive(Debug, Clone, PartialEq)]
pub enum AppViewModel {
    Projects(ProjectsView),
    Create(CreateView),
    Competitors(CompetitorsView),
    Result(ResultView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectsView {
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<ProjectRowView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRowView {
    pub title: String,
    pub main_keyword: String,
    /// Timestamp as the backend sent it; the shell formats it.
    pub created_at: Option<String>,
    pub status_label: String,
    pub status_tone: StatusTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateView {
    pub title: String,
    pub then_search: bool,
    pub created: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorsView {
    pub loading: bool,
    pub title: String,
    pub main_keyword: String,
    pub error: Option<String>,
    /// One line describing the backend job in flight, if any.
    pub busy_note: Option<&'static str>,
    /// Candidate columns are hidden while the search job runs.
    pub columns_visible: bool,
    pub columns: Vec<SourceColumnView>,
    pub selected_count: usize,
    pub selection_cap: usize,
    pub generating: bool,
    pub can_generate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceColumnView {
    pub source_label: &'static str,
    pub candidates: Vec<CandidateView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateView {
    pub url: String,
    pub host: String,
    pub title: String,
    pub snippet: Option<String>,
    pub selected: bool,
    /// Cleared when the cap is reached and this candidate is not part of the
    /// selection.
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub loading: bool,
    pub error: Option<String>,
    pub title: String,
    pub status_label: String,
    pub status_tone: StatusTone,
    /// Generation is still running and no document has arrived yet.
    pub analyzing: bool,
    pub document: Option<String>,
    pub info: Vec<InfoRowView>,
    pub selected_hosts: Vec<String>,
    pub search_pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoRowView {
    pub label: &'static str,
    pub value: String,
}

impl AppViewModel {
    pub(crate) fn project(screen: &Screen) -> Self {
        match screen {
            Screen::Projects(screen) => Self::Projects(projects_view(screen)),
            Screen::Create(screen) => Self::Create(create_view(screen)),
            Screen::Competitors(screen) => Self::Competitors(competitors_view(screen)),
            Screen::Result(screen) => Self::Result(result_view(screen)),
        }
    }
}

fn projects_view(screen: &ProjectsScreen) -> ProjectsView {
    ProjectsView {
        loading: screen.loading,
        error: screen.error.clone(),
        rows: screen
            .rows
            .iter()
            .map(|project| {
                let presentation = project.status.presentation();
                ProjectRowView {
                    title: project.display_title().to_string(),
                    main_keyword: project.main_keyword.clone(),
                    created_at: project.created_at.clone(),
                    status_label: presentation.label.to_string(),
                    status_tone: presentation.tone,
                }
            })
            .collect(),
    }
}

fn create_view(screen: &CreateScreen) -> CreateView {
    CreateView {
        title: screen.draft.title.clone(),
        then_search: screen.then_search,
        created: screen.created.is_some(),
        error: screen.error.clone(),
    }
}

fn competitors_view(screen: &CompetitorsScreen) -> CompetitorsView {
    let busy_note = if screen.phase == Phase::Searching {
        Some("Searching for competitors in Google and Yandex...")
    } else if screen.phase == Phase::Analyzing || screen.generating {
        Some("Analyzing competitor pages and generating the brief...")
    } else {
        None
    };
    let columns = match &screen.project {
        Some(project) => CompetitorSource::ALL
            .iter()
            .map(|&source| source_column(project, source, screen))
            .collect(),
        None => Vec::new(),
    };
    CompetitorsView {
        loading: screen.phase == Phase::Loading,
        title: header_title(screen.project.as_ref()),
        main_keyword: screen
            .project
            .as_ref()
            .map(|p| p.main_keyword.clone())
            .unwrap_or_default(),
        error: screen.error.clone(),
        busy_note,
        columns_visible: !matches!(screen.phase, Phase::Loading | Phase::Searching),
        columns,
        selected_count: screen.selection.len(),
        selection_cap: MAX_SELECTED,
        generating: screen.generating,
        can_generate: !screen.generating && !screen.selection.is_empty(),
    }
}

fn source_column(
    project: &Project,
    source: CompetitorSource,
    screen: &CompetitorsScreen,
) -> SourceColumnView {
    let cap_reached = screen.selection.is_full();
    let candidates = filter_candidates(project.candidates(source), &project.excluded_domains)
        .into_iter()
        .map(|candidate| {
            let host = display_host(&candidate.url);
            let selected = screen.selection.contains(&candidate.url);
            CandidateView {
                title: candidate.title.unwrap_or_else(|| host.clone()),
                snippet: candidate.snippet,
                selected,
                selectable: selected || !cap_reached,
                url: candidate.url,
                host,
            }
        })
        .collect();
    SourceColumnView {
        source_label: source.label(),
        candidates,
    }
}

fn result_view(screen: &ResultScreen) -> ResultView {
    let project = screen.project.as_ref();
    let (status_label, status_tone) = match project {
        Some(project) => {
            let presentation = project.status.presentation();
            (presentation.label.to_string(), presentation.tone)
        }
        None => (String::new(), StatusTone::Muted),
    };
    ResultView {
        loading: screen.loading,
        error: screen.error.clone(),
        title: header_title(project),
        status_label,
        status_tone,
        analyzing: project.is_some_and(|p| {
            p.status == crate::status::ProjectStatus::Analyzing && !p.has_document()
        }),
        document: project.and_then(|p| p.tz_content.clone()).filter(|c| !c.is_empty()),
        info: project.map(info_rows).unwrap_or_default(),
        selected_hosts: project
            .map(|p| {
                p.selected_competitors
                    .iter()
                    .map(|url| display_host(url))
                    .collect()
            })
            .unwrap_or_default(),
        search_pending: screen.search_pending,
    }
}

fn header_title(project: Option<&Project>) -> String {
    project
        .map(|p| p.display_title().to_string())
        .unwrap_or_default()
}

/// Sidebar rows for the result page. Empty fields are skipped.
fn info_rows(project: &Project) -> Vec<InfoRowView> {
    let details = &project.details;
    let mut rows = Vec::new();
    let mut push = |label: &'static str, value: String| {
        if !value.is_empty() {
            rows.push(InfoRowView { label, value });
        }
    };
    push("Main keyword", project.main_keyword.clone());
    push("Text type", details.text_type.clone());
    if details.text_volume > 0 {
        push("Volume", format!("{} words", details.text_volume));
    }
    push("Region", details.region.clone());
    push("Language", details.language.clone());
    push("Client", details.client_name.clone());
    push("Niche", details.client_niche.clone());
    if details.faq_enabled {
        push("FAQ", format!("{} questions", details.faq_count));
    }
    rows
}
