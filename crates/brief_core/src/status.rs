use std::fmt;

/// Backend-assigned lifecycle stage of a project.
///
/// The known set is closed, but the backend is free to grow new values;
/// anything unrecognized is carried verbatim in [`ProjectStatus::Other`] so
/// the client renders it instead of hiding it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    #[default]
    Draft,
    Searching,
    CompetitorsFound,
    Analyzing,
    Done,
    Error,
    /// Unrecognized wire value, kept verbatim.
    Other(String),
}

impl ProjectStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "draft" => Self::Draft,
            "searching" => Self::Searching,
            "competitors_found" => Self::CompetitorsFound,
            "analyzing" => Self::Analyzing,
            "done" => Self::Done,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Searching => "searching",
            Self::CompetitorsFound => "competitors_found",
            Self::Analyzing => "analyzing",
            Self::Done => "done",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }

    /// Whether backend work is still in progress and the status is worth
    /// polling again.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Searching | Self::Analyzing)
    }

    /// Inverse of [`ProjectStatus::is_pending`]; a terminal status ends a
    /// polling loop.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Display metadata for this status. Unknown values fall back to the raw
    /// wire string with a muted tone.
    pub fn presentation(&self) -> StatusPresentation<'_> {
        match self {
            Self::Draft => StatusPresentation::known("Draft", StatusTone::Muted),
            Self::Searching => StatusPresentation::known("Searching...", StatusTone::Info),
            Self::CompetitorsFound => {
                StatusPresentation::known("Competitors found", StatusTone::Success)
            }
            Self::Analyzing => StatusPresentation::known("Analyzing...", StatusTone::Warning),
            Self::Done => StatusPresentation::known("Done", StatusTone::Success),
            Self::Error => StatusPresentation::known("Error", StatusTone::Danger),
            Self::Other(raw) => StatusPresentation {
                label: if raw.is_empty() { "-" } else { raw },
                tone: StatusTone::Muted,
            },
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label and tone a status is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation<'a> {
    pub label: &'a str,
    pub tone: StatusTone,
}

impl StatusPresentation<'_> {
    fn known(label: &'static str, tone: StatusTone) -> StatusPresentation<'static> {
        StatusPresentation { label, tone }
    }
}

/// Severity-style hint for rendering a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Muted,
    Info,
    Success,
    Warning,
    Danger,
}
