use std::fmt;

use crate::status::ProjectStatus;

/// Backend-assigned project identifier. Treated as opaque text; the backend
/// has been observed to send both strings and numbers for it.
pub type ProjectId = String;

/// Which search engine produced a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitorSource {
    Google,
    Yandex,
}

impl CompetitorSource {
    pub const ALL: [CompetitorSource; 2] = [CompetitorSource::Google, CompetitorSource::Yandex];

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Yandex => "Yandex",
        }
    }
}

/// One competitor page offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompetitorCandidate {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

/// Client-side snapshot of one backend project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub main_keyword: String,
    pub status: ProjectStatus,
    /// Creation timestamp as the backend sent it; formatting is left to the
    /// shell.
    pub created_at: Option<String>,
    pub competitors_google: Vec<CompetitorCandidate>,
    pub competitors_yandex: Vec<CompetitorCandidate>,
    /// Domain fragments whose matches are hidden from the candidate lists.
    pub excluded_domains: Vec<String>,
    /// Selection the backend has stored from an earlier generate call.
    pub selected_competitors: Vec<String>,
    /// Generated brief in markdown, once the analysis has produced one.
    pub tz_content: Option<String>,
    pub details: ProjectDetails,
}

impl Project {
    pub fn candidates(&self, source: CompetitorSource) -> &[CompetitorCandidate] {
        match source {
            CompetitorSource::Google => &self.competitors_google,
            CompetitorSource::Yandex => &self.competitors_yandex,
        }
    }

    pub fn has_candidates(&self) -> bool {
        !self.competitors_google.is_empty() || !self.competitors_yandex.is_empty()
    }

    /// Whether a non-empty generated document is present.
    pub fn has_document(&self) -> bool {
        self.tz_content.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

/// Brief parameters captured on the creation form and echoed back by the
/// backend. All of them are optional free text as far as the client is
/// concerned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectDetails {
    pub client_name: String,
    pub client_website: String,
    pub client_niche: String,
    pub client_description: String,
    pub text_type: String,
    pub text_volume: u32,
    pub text_style: String,
    pub target_audience: String,
    pub region: String,
    pub language: String,
    pub faq_enabled: bool,
    pub faq_count: u32,
    pub additional_requirements: String,
}

/// Creation parameters for a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectDraft {
    pub title: String,
    pub main_keyword: String,
    pub excluded_competitors: Vec<String>,
    pub details: ProjectDetails,
}

impl Default for NewProjectDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            main_keyword: String::new(),
            excluded_competitors: Vec::new(),
            details: ProjectDetails {
                text_type: "article".to_string(),
                text_volume: 3000,
                text_style: "neutral".to_string(),
                region: "Moscow".to_string(),
                language: "ru".to_string(),
                faq_enabled: false,
                faq_count: 5,
                ..ProjectDetails::default()
            },
        }
    }
}

impl NewProjectDraft {
    /// Local check of the required fields; every violation is reported.
    pub fn validate(&self) -> Result<(), Vec<DraftError>> {
        let mut violations = Vec::new();
        if self.title.trim().is_empty() {
            violations.push(DraftError::MissingTitle);
        }
        if self.main_keyword.trim().is_empty() {
            violations.push(DraftError::MissingKeyword);
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Validation failure for a creation draft. Never reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    MissingTitle,
    MissingKeyword,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "a project title is required"),
            Self::MissingKeyword => write!(f, "a main keyword is required"),
        }
    }
}

impl std::error::Error for DraftError {}

#[cfg(test)]
mod tests {
    use super::{DraftError, NewProjectDraft, Project};

    #[test]
    fn draft_defaults_match_the_creation_form() {
        let draft = NewProjectDraft::default();
        assert_eq!(draft.details.text_type, "article");
        assert_eq!(draft.details.text_volume, 3000);
        assert_eq!(draft.details.faq_count, 5);
        assert!(!draft.details.faq_enabled);
    }

    #[test]
    fn validation_reports_all_missing_fields() {
        let draft = NewProjectDraft::default();
        assert_eq!(
            draft.validate(),
            Err(vec![DraftError::MissingTitle, DraftError::MissingKeyword])
        );

        let draft = NewProjectDraft {
            title: "Oak furniture".to_string(),
            main_keyword: "oak table".to_string(),
            ..NewProjectDraft::default()
        };
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn whitespace_only_fields_do_not_validate() {
        let draft = NewProjectDraft {
            title: "   ".to_string(),
            main_keyword: "\t".to_string(),
            ..NewProjectDraft::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn empty_document_does_not_count() {
        let mut project = Project {
            tz_content: Some(String::new()),
            ..Project::default()
        };
        assert!(!project.has_document());
        project.tz_content = Some("# Brief".to_string());
        assert!(project.has_document());
    }
}
