//! Project use-case service.
//!
//! # Responsibility
//! - Provide the shell's only entry points into the core.
//! - Turn "no row matched" outcomes into a distinct not-found error.
//!
//! # Invariants
//! - The service never retries and never swallows a repository error.
//! - `NotFound` is recoverable for callers; every other error is fatal
//!   for the current operation.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError, WriteOutcome};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain-level error surface for shell callers.
#[derive(Debug)]
pub enum ServiceError {
    /// The requested id matches no project row.
    NotFound(ProjectId),
    /// The data-access layer failed; see the wrapped cause.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(project_id) => {
                write!(f, "project with ID={project_id} does not exist")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for project CRUD operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one project and returns it with its store-assigned id.
    pub fn add_project(&self, project: &Project) -> ServiceResult<Project> {
        Ok(self.repo.insert_project(project)?)
    }

    /// Fetches all projects ordered by name, child collections empty.
    pub fn fetch_all_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Fetches one project with children, failing when the id is absent.
    pub fn fetch_project_by_id(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ServiceError::NotFound(project_id))
    }

    /// Overwrites the scalar fields of the project keyed by `project_id`.
    pub fn modify_project_details(
        &self,
        project_id: ProjectId,
        project: &Project,
    ) -> ServiceResult<()> {
        match self.repo.modify_project_details(project_id, project)? {
            WriteOutcome::Applied => Ok(()),
            WriteOutcome::NotFound => Err(ServiceError::NotFound(project_id)),
        }
    }

    /// Deletes the project keyed by `project_id`.
    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        match self.repo.delete_project(project_id)? {
            WriteOutcome::Applied => Ok(()),
            WriteOutcome::NotFound => Err(ServiceError::NotFound(project_id)),
        }
    }
}
