//! Interactive session loop.
//!
//! One thread reads stdin lines, another pumps backend events; both feed the
//! same channel so the state machine runs strictly single-threaded. Each
//! dispatched message repaints the screen when the reducer marked it dirty,
//! then its effects run, with navigation and shutdown handled here.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use brief_api::ApiSettings;
use brief_core::{
    update, AppState, AppViewModel, Effect, Msg, NewProjectDraft, Route,
};
use brief_logging::{brief_debug, brief_info};

use crate::effects::EffectRunner;
use crate::input::{self, Command};
use crate::render;

/// Feed of the session loop.
pub(crate) enum SessionEvent {
    /// Backend outcome, already mapped to a reducer message.
    Msg(Msg),
    /// One line typed by the user.
    Line(String),
    /// Stdin reached end of file.
    InputClosed,
}

/// A question whose answer is the next input line.
enum PendingPrompt {
    ConfirmDelete { index: usize },
    NewTitle,
    NewKeyword { title: String },
    NewSearch { title: String, keyword: String },
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs an interactive session starting at `route`. Returns when the user
/// quits or stdin closes.
pub fn run(route: Route, settings: ApiSettings, output_dir: PathBuf) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel();
    let runner = EffectRunner::new(settings, output_dir, event_tx.clone());
    spawn_input_reader(event_tx);

    let (state, entry) = AppState::enter(route);
    brief_info!("Session started on {:?}", state.screen());

    let mut session = Session {
        state,
        runner,
        pending: None,
    };
    session.paint_if_dirty();
    if session.run_effects(entry) == Flow::Quit {
        return Ok(());
    }

    while let Ok(event) = event_rx.recv() {
        let flow = match event {
            SessionEvent::Msg(msg) => session.dispatch(msg),
            SessionEvent::Line(line) => session.handle_line(line.trim()),
            SessionEvent::InputClosed => session.dispatch(Msg::QuitRequested),
        };
        if flow == Flow::Quit {
            break;
        }
    }
    brief_info!("Session ended");
    Ok(())
}

fn spawn_input_reader(events: mpsc::Sender<SessionEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(SessionEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = events.send(SessionEvent::InputClosed);
    });
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    pending: Option<PendingPrompt>,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) -> Flow {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.paint_if_dirty();
        self.run_effects(effects)
    }

    /// Runs effects in order. Navigation replaces the screen and queues its
    /// entry effects; `Quit` ends the session and drops whatever follows.
    fn run_effects(&mut self, effects: Vec<Effect>) -> Flow {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Navigate(route) => {
                    brief_debug!("Navigate to {:?}", route);
                    let (state, entry) = AppState::enter(route);
                    self.state = state;
                    self.paint_if_dirty();
                    queue.extend(entry);
                }
                Effect::Quit => return Flow::Quit,
                other => self.runner.run(other),
            }
        }
        Flow::Continue
    }

    fn paint_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            print!("{}", render::render(&self.state.view()));
            let _ = io::stdout().flush();
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        if let Some(prompt) = self.pending.take() {
            return self.answer_prompt(prompt, line);
        }
        if line.is_empty() {
            return Flow::Continue;
        }
        match input::parse(line) {
            Some(command) => self.apply(command),
            None => {
                println!("Unknown command; type 'help' for the list.");
                Flow::Continue
            }
        }
    }

    fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Open(index) => self.dispatch(Msg::OpenRequested(index)),
            Command::Delete(index) => self.confirm_delete(index),
            Command::New => {
                // The creation form only starts from the project list.
                if matches!(self.state.view(), AppViewModel::Projects(_)) {
                    ask("Title: ");
                    self.pending = Some(PendingPrompt::NewTitle);
                }
                Flow::Continue
            }
            Command::Pick(index) => self.toggle(index, true),
            Command::Drop(index) => self.toggle(index, false),
            Command::Generate => self.dispatch(Msg::GenerateRequested),
            Command::Skip => self.dispatch(Msg::SkipToResult),
            Command::Show => self.dispatch(Msg::ShowDocument),
            Command::Save => self.dispatch(Msg::SaveDocument),
            Command::Search => self.dispatch(Msg::SearchRequested),
            Command::Back => self.dispatch(Msg::BackToProjects),
            Command::Reload => self.dispatch(Msg::ReloadRequested),
            Command::Dismiss => self.dispatch(Msg::ErrorDismissed),
            Command::Help => {
                self.repaint();
                Flow::Continue
            }
            Command::Quit => self.dispatch(Msg::QuitRequested),
        }
    }

    /// Resolves a display index against the candidate numbering and toggles
    /// the selection.
    fn toggle(&mut self, index: usize, selected: bool) -> Flow {
        let AppViewModel::Competitors(view) = self.state.view() else {
            return Flow::Continue;
        };
        let candidates = render::candidate_urls(&view);
        let Some((url, selectable)) = candidates.into_iter().nth(index) else {
            println!("No candidate {} on screen.", index + 1);
            return Flow::Continue;
        };
        if selected && !selectable {
            println!(
                "Selection is full ({}/{}); drop one first.",
                view.selected_count, view.selection_cap
            );
            return Flow::Continue;
        }
        self.dispatch(Msg::ToggleCompetitor { url, selected })
    }

    fn confirm_delete(&mut self, index: usize) -> Flow {
        let AppViewModel::Projects(view) = self.state.view() else {
            return Flow::Continue;
        };
        let Some(row) = view.rows.get(index) else {
            println!("No project {} in the list.", index + 1);
            return Flow::Continue;
        };
        ask(&format!("Delete \"{}\"? [y/N] ", row.title));
        self.pending = Some(PendingPrompt::ConfirmDelete { index });
        Flow::Continue
    }

    fn answer_prompt(&mut self, prompt: PendingPrompt, line: &str) -> Flow {
        match prompt {
            PendingPrompt::ConfirmDelete { index } => {
                if is_yes(line) {
                    self.dispatch(Msg::DeleteRequested(index))
                } else {
                    println!("Kept.");
                    Flow::Continue
                }
            }
            PendingPrompt::NewTitle => {
                if line.is_empty() {
                    println!("Cancelled.");
                    return Flow::Continue;
                }
                ask("Main keyword: ");
                self.pending = Some(PendingPrompt::NewKeyword {
                    title: line.to_string(),
                });
                Flow::Continue
            }
            PendingPrompt::NewKeyword { title } => {
                if line.is_empty() {
                    println!("Cancelled.");
                    return Flow::Continue;
                }
                ask("Search competitors right away? [Y/n] ");
                self.pending = Some(PendingPrompt::NewSearch {
                    title,
                    keyword: line.to_string(),
                });
                Flow::Continue
            }
            PendingPrompt::NewSearch { title, keyword } => {
                let draft = NewProjectDraft {
                    title,
                    main_keyword: keyword,
                    ..NewProjectDraft::default()
                };
                let then_search = !is_no(line);
                self.run_effects(vec![Effect::Navigate(Route::Create { draft, then_search })])
            }
        }
    }

    fn repaint(&mut self) {
        print!("{}", render::render(&self.state.view()));
        let _ = io::stdout().flush();
    }
}

fn ask(question: &str) {
    print!("{question}");
    let _ = io::stdout().flush();
}

fn is_yes(line: &str) -> bool {
    matches!(line, "y" | "Y" | "yes")
}

fn is_no(line: &str) -> bool {
    matches!(line, "n" | "N" | "no")
}
