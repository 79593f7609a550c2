//! Conjunctive list filters. Every active criterion must hold; results keep
//! insertion order.

use crate::model::{Client, ClientKind, ParseEnumError, Project, ProjectStatus};

/// Interpret a status query string from a link or flag.
///
/// Blank and `all` clear the filter, `active` means in progress, anything
/// else must be a status tag.
pub fn parse_status_query(query: &str) -> Result<Option<ProjectStatus>, ParseEnumError> {
    match query.trim().to_ascii_lowercase().as_str() {
        "" | "all" => Ok(None),
        "active" => Ok(Some(ProjectStatus::InProgress)),
        _ => query.parse::<ProjectStatus>().map(Some),
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Filter over the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    /// Exact client name, as denormalized on the project.
    pub client: Option<String>,
    /// Selected-project scope: keep only this project id.
    pub scope: Option<String>,
    /// Case-insensitive substring over name, client, location, description.
    pub search: String,
}

impl ProjectFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.client.is_none()
            && self.scope.is_none()
            && self.search.trim().is_empty()
    }

    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        if self.status.is_some_and(|s| project.status != s) {
            return false;
        }
        if self
            .client
            .as_deref()
            .is_some_and(|c| project.client_name != c)
        {
            return false;
        }
        if self.scope.as_deref().is_some_and(|id| project.id != id) {
            return false;
        }
        let q = self.search.trim().to_lowercase();
        if !q.is_empty()
            && !contains_ci(&project.name, &q)
            && !contains_ci(&project.client_name, &q)
            && !contains_ci(&project.location, &q)
            && !project
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, &q))
        {
            return false;
        }
        true
    }

    #[must_use]
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Filter over the client list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub kind: Option<ClientKind>,
    /// Case-insensitive substring over name, email, phone, contact person.
    pub search: String,
    /// Keep clients whose project list contains this project id.
    pub project_scope: Option<String>,
}

impl ClientFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.project_scope.is_none() && self.search.trim().is_empty()
    }

    #[must_use]
    pub fn matches(&self, client: &Client) -> bool {
        if self.kind.is_some_and(|k| client.kind != k) {
            return false;
        }
        if let Some(scope) = self.project_scope.as_deref() {
            if !client.projects.iter().any(|p| p == scope) {
                return false;
            }
        }
        let q = self.search.trim().to_lowercase();
        if !q.is_empty()
            && !contains_ci(&client.name, &q)
            && !contains_ci(&client.email, &q)
            && !contains_ci(&client.phone, &q)
            && !client
                .contact_person
                .as_deref()
                .is_some_and(|c| contains_ci(c, &q))
        {
            return false;
        }
        true
    }

    #[must_use]
    pub fn apply<'a>(&self, clients: &'a [Client]) -> Vec<&'a Client> {
        clients.iter().filter(|c| self.matches(c)).collect()
    }
}
