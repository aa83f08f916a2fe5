use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use brief_core::{NewProjectDraft, Project, ProjectStatus};

use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::wire::{parse_body, CreateProjectBody, ProjectList, RawProject, StatusPayload};

/// Typed wrapper over the webhook endpoints. Cheap to clone; clones share
/// one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ApiError> {
        let body = self
            .request(Method::GET, "/api/projects", None, None::<&()>, None)
            .await?;
        let envelope: ProjectList = parse_body(&body)?;
        Ok(envelope
            .list
            .into_iter()
            .map(RawProject::into_project)
            .collect())
    }

    pub async fn project(&self, id: &str) -> Result<Project, ApiError> {
        let body = self
            .request(Method::GET, "/api/project", Some(("id", id)), None::<&()>, None)
            .await?;
        Ok(parse_body::<RawProject>(&body)?.into_project())
    }

    pub async fn create_project(&self, draft: &NewProjectDraft) -> Result<Project, ApiError> {
        let payload = CreateProjectBody::from(draft);
        let body = self
            .request(Method::POST, "/api/projects", None, Some(&payload), None)
            .await?;
        Ok(parse_body::<RawProject>(&body)?.into_project())
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ApiError> {
        self.request(
            Method::DELETE,
            "/api/project",
            Some(("id", id)),
            None::<&()>,
            None,
        )
        .await?;
        Ok(())
    }

    /// Kicks off the competitor search job. The response body is an ack and
    /// is ignored.
    pub async fn search_competitors(&self, id: &str) -> Result<(), ApiError> {
        self.request(
            Method::POST,
            "/api/project/search-competitors",
            None,
            Some(&IdBody { id }),
            None,
        )
        .await?;
        Ok(())
    }

    /// Kicks off document generation for the selected competitor pages. This
    /// is the only bounded call; past the deadline the request is dropped
    /// and [`ApiError::Timeout`] is raised.
    pub async fn generate_document(&self, id: &str, urls: &[String]) -> Result<(), ApiError> {
        self.request(
            Method::POST,
            "/api/project/generate",
            None,
            Some(&GenerateBody { id, urls }),
            Some(self.settings.generate_timeout),
        )
        .await?;
        Ok(())
    }

    pub async fn project_status(&self, id: &str) -> Result<ProjectStatus, ApiError> {
        let body = self
            .request(
                Method::GET,
                "/api/project/status",
                Some(("id", id)),
                None::<&()>,
                None,
            )
            .await?;
        let payload: StatusPayload = parse_body(&body)?;
        Ok(ProjectStatus::parse(&payload.status))
    }

    async fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: Option<(&str, &str)>,
        body: Option<&B>,
        deadline: Option<Duration>,
    ) -> Result<String, ApiError> {
        let url = self.settings.endpoint(path);
        let mut builder = self.http.request(method, &url);
        // The id is opaque text; let the query builder encode it.
        if let Some(pair) = query {
            builder = builder.query(&[pair]);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(deadline) = deadline {
            builder = builder.timeout(deadline);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| map_send_error(err, deadline))?;
        let code = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| map_send_error(err, deadline))?;
        if !code.is_success() {
            return Err(ApiError::status(code.as_u16(), &text));
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct IdBody<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    id: &'a str,
    urls: &'a [String],
}

fn map_send_error(err: reqwest::Error, deadline: Option<Duration>) -> ApiError {
    match deadline {
        Some(limit) if err.is_timeout() => ApiError::Timeout { limit },
        _ => ApiError::Transport(err.to_string()),
    }
}
