//! Parses command lines typed into the session.
//!
//! The grammar is shared by every screen; whether a parsed command applies
//! to the active screen is the session's call, and the reducer ignores
//! messages that do not fit anyway. Indices are 1-based on screen and
//! 0-based in messages.

/// One recognized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open(usize),
    Delete(usize),
    New,
    Pick(usize),
    Drop(usize),
    Generate,
    Skip,
    Show,
    Save,
    Search,
    Back,
    Reload,
    Dismiss,
    Help,
    Quit,
}

/// Parses one input line; `None` means the line is not a command.
pub fn parse(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let arg = words.next();

    let command = match verb {
        "open" | "o" => Command::Open(index(arg)?),
        "delete" | "del" => Command::Delete(index(arg)?),
        "new" => Command::New,
        "pick" | "p" => Command::Pick(index(arg)?),
        "drop" | "u" => Command::Drop(index(arg)?),
        "generate" | "g" => Command::Generate,
        "skip" => Command::Skip,
        "show" | "cat" => Command::Show,
        "save" | "w" => Command::Save,
        "search" => Command::Search,
        "back" | "b" | "projects" => Command::Back,
        "reload" | "r" => Command::Reload,
        "dismiss" | "x" => Command::Dismiss,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// 1-based display index to 0-based message index.
fn index(arg: Option<&str>) -> Option<usize> {
    let shown: usize = arg?.parse().ok()?;
    shown.checked_sub(1)
}
