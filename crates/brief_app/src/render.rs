//! Renders view models as plain-text frames for the terminal.
//!
//! Frames are rebuilt from scratch on every dirty dispatch and printed as a
//! block; there is no cursor addressing. Status tones map to ANSI colors.

use std::fmt::Write;

use brief_core::{
    AppViewModel, CandidateView, CompetitorsView, CreateView, ProjectsView, ResultView, StatusTone,
};
use chrono::{DateTime, NaiveDateTime};

const RESET: &str = "\x1b[0m";

/// Renders the current screen as a full frame.
pub fn render(view: &AppViewModel) -> String {
    match view {
        AppViewModel::Projects(view) => projects_screen(view),
        AppViewModel::Create(view) => create_screen(view),
        AppViewModel::Competitors(view) => competitors_screen(view),
        AppViewModel::Result(view) => result_screen(view),
    }
}

/// Candidate URLs with their pickability, in the order the competitors
/// screen numbers them. Input indices resolve against this list.
pub fn candidate_urls(view: &CompetitorsView) -> Vec<(String, bool)> {
    view.columns
        .iter()
        .flat_map(|column| &column.candidates)
        .map(|candidate| (candidate.url.clone(), candidate.selectable))
        .collect()
}

fn projects_screen(view: &ProjectsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Projects ==");
    push_banner(&mut out, view.error.as_deref());
    if view.loading {
        let _ = writeln!(out, "Loading projects...");
        return out;
    }
    if view.rows.is_empty() {
        let _ = writeln!(out, "No projects yet. Type 'new' to create one.");
    }
    for (number, row) in view.rows.iter().enumerate() {
        let keyword = if row.main_keyword.is_empty() {
            String::new()
        } else {
            format!(" ({})", row.main_keyword)
        };
        let date = row
            .created_at
            .as_deref()
            .map(format_created_at)
            .unwrap_or_default();
        let _ = write!(
            out,
            "{:>2}. {}{}  {}",
            number + 1,
            row.title,
            keyword,
            status_cell(&row.status_label, row.status_tone)
        );
        if date.is_empty() {
            let _ = writeln!(out);
        } else {
            let _ = writeln!(out, "  {date}");
        }
    }
    let _ = writeln!(out, "Commands: open N, delete N, new, reload, dismiss, quit");
    out
}

fn create_screen(view: &CreateView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== New project: {} ==", view.title);
    push_banner(&mut out, view.error.as_deref());
    if view.error.is_some() {
        return out;
    }
    if !view.created {
        let _ = writeln!(out, "Creating the project...");
    } else if view.then_search {
        let _ = writeln!(out, "Project created; starting the competitor search...");
    }
    out
}

fn competitors_screen(view: &CompetitorsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Competitors: {} ==", header(&view.title));
    if !view.main_keyword.is_empty() {
        let _ = writeln!(out, "Keyword: {}", view.main_keyword);
    }
    push_banner(&mut out, view.error.as_deref());
    if view.loading {
        let _ = writeln!(out, "Loading the project...");
        return out;
    }
    if let Some(note) = view.busy_note {
        let _ = writeln!(out, "{}{note}{RESET}", tone_color(StatusTone::Info));
    }
    if view.columns_visible {
        let mut number = 0;
        for column in &view.columns {
            let _ = writeln!(
                out,
                "-- {} ({}) --",
                column.source_label,
                column.candidates.len()
            );
            if column.candidates.is_empty() {
                let _ = writeln!(out, "    (no results)");
            }
            for candidate in &column.candidates {
                number += 1;
                push_candidate(&mut out, number, candidate);
            }
        }
        let _ = writeln!(out, "Selected: {}/{}", view.selected_count, view.selection_cap);
    }
    let footer = if view.can_generate {
        "Commands: pick N, drop N, generate, skip, reload, dismiss, quit"
    } else {
        "Commands: pick N, drop N, skip, reload, dismiss, quit"
    };
    let _ = writeln!(out, "{footer}");
    out
}

fn push_candidate(out: &mut String, number: usize, candidate: &CandidateView) {
    let mark = if candidate.selected {
        "[x]"
    } else if candidate.selectable {
        "[ ]"
    } else {
        "[-]"
    };
    let _ = writeln!(out, "{number:>2}. {mark} {}  {}", candidate.host, candidate.title);
    let _ = writeln!(out, "        {}", candidate.url);
    if let Some(snippet) = &candidate.snippet {
        let _ = writeln!(out, "        {snippet}");
    }
}

fn result_screen(view: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", header(&view.title));
    push_banner(&mut out, view.error.as_deref());
    if view.loading {
        let _ = writeln!(out, "Loading the project...");
        return out;
    }
    if !view.status_label.is_empty() {
        let _ = writeln!(
            out,
            "Status: {}",
            status_cell(&view.status_label, view.status_tone)
        );
    }
    for row in &view.info {
        let _ = writeln!(out, "{}: {}", row.label, row.value);
    }
    if !view.selected_hosts.is_empty() {
        let _ = writeln!(out, "Competitors: {}", view.selected_hosts.join(", "));
    }
    if view.analyzing {
        let _ = writeln!(
            out,
            "{}Analyzing competitor pages and generating the brief...{RESET}",
            tone_color(StatusTone::Info)
        );
    }
    match &view.document {
        Some(document) => {
            let _ = writeln!(
                out,
                "Brief ready: {} characters. 'show' prints it, 'save' writes the markdown file.",
                document.chars().count()
            );
        }
        None if !view.analyzing => {
            let _ = writeln!(
                out,
                "The brief has not been generated yet. 'search' re-runs the competitor search."
            );
        }
        None => {}
    }
    if view.search_pending {
        let _ = writeln!(out, "Restarting the competitor search...");
    }
    let _ = writeln!(out, "Commands: show, save, search, back, reload, dismiss, quit");
    out
}

fn header(title: &str) -> &str {
    if title.is_empty() {
        "Project"
    } else {
        title
    }
}

fn push_banner(out: &mut String, error: Option<&str>) {
    if let Some(message) = error {
        let _ = writeln!(
            out,
            "{}!{RESET} {message} (type 'dismiss' to clear)",
            tone_color(StatusTone::Danger)
        );
    }
}

fn status_cell(label: &str, tone: StatusTone) -> String {
    format!("{}[{label}]{RESET}", tone_color(tone))
}

fn tone_color(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Muted => "\x1b[90m",
        StatusTone::Info => "\x1b[36m",
        StatusTone::Success => "\x1b[32m",
        StatusTone::Warning => "\x1b[33m",
        StatusTone::Danger => "\x1b[31m",
    }
}

/// Backend timestamps arrive in whatever shape the workflow stored; RFC 3339
/// values render as dd.mm.yyyy, anything else passes through unchanged.
fn format_created_at(raw: &str) -> String {
    if let Ok(moment) = DateTime::parse_from_rfc3339(raw) {
        return moment.format("%d.%m.%Y").to_string();
    }
    if let Ok(moment) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return moment.format("%d.%m.%Y").to_string();
    }
    raw.to_string()
}
