//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide transactional CRUD over the `project` table family.
//! - Aggregate child records inside the same transaction as the parent
//!   read.
//!
//! # Invariants
//! - One connection and one transaction per public operation; commit on
//!   success, rollback on any failure, then propagate.
//! - Only `project` rows are written; category/material/step rows are
//!   read-only joins.
//! - Child collections come back in query order, unreordered.

use crate::db::{open_db, DbError};
use crate::model::project::{Category, Material, Project, ProjectId, Step};
use crate::repo::mapper::{
    category_from_row, decimal_to_db, material_from_row, project_from_row, step_from_row,
    MappingError,
};
use log::warn;
use rusqlite::{params, Connection, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure taxonomy of the data-access layer.
///
/// `Connection` means no connection could be established, `Storage` wraps
/// any statement or transaction-control failure after rollback, and
/// `Mapping` reports a row that would not convert to an entity.
#[derive(Debug)]
pub enum RepoError {
    Connection(DbError),
    Storage(rusqlite::Error),
    Mapping(MappingError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "cannot open database: {err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::Mapping(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Mapping(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Connection(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<MappingError> for RepoError {
    fn from(value: MappingError) -> Self {
        Self::Mapping(value)
    }
}

/// Outcome of an UPDATE or DELETE keyed by id.
///
/// Keeps "no row had that id" distinguishable from a storage failure; the
/// service layer decides how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Exactly one row was affected.
    Applied,
    /// No row matched the id. Nothing was written.
    NotFound,
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    /// Inserts one project row and returns the entity with its
    /// store-assigned id. Child collections stay empty.
    fn insert_project(&self, project: &Project) -> RepoResult<Project>;
    /// Fetches one project with all three child collections aggregated,
    /// or `None` when no row matches.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Fetches all projects ordered by name ascending, children empty.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Overwrites all five scalar fields of the row keyed by id.
    fn modify_project_details(
        &self,
        project_id: ProjectId,
        project: &Project,
    ) -> RepoResult<WriteOutcome>;
    /// Deletes the row keyed by id. Child cleanup is the store's cascade.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<WriteOutcome>;
}

/// SQLite-backed project repository.
///
/// Holds connection parameters only; every operation opens its own
/// connection and drops it on return.
pub struct SqliteProjectRepository {
    db_path: PathBuf,
}

impl SqliteProjectRepository {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn connect(&self) -> RepoResult<Connection> {
        open_db(&self.db_path).map_err(RepoError::Connection)
    }
}

impl ProjectRepository for SqliteProjectRepository {
    fn insert_project(&self, project: &Project) -> RepoResult<Project> {
        let mut conn = self.connect()?;
        with_tx(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO project
                    (project_name, estimated_hours, actual_hours, difficulty, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    project.project_name.as_str(),
                    decimal_to_db(project.estimated_hours),
                    decimal_to_db(project.actual_hours),
                    project.difficulty,
                    project.notes.as_deref(),
                ],
            )?;

            let mut created = project.clone();
            created.project_id = Some(tx.last_insert_rowid());
            created.categories.clear();
            created.materials.clear();
            created.steps.clear();
            Ok(created)
        })
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        let mut conn = self.connect()?;
        with_tx(&mut conn, |tx| {
            let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"))?;
            let mut rows = stmt.query(params![project_id])?;

            let Some(row) = rows.next()? else {
                return Ok(None);
            };
            let mut project = project_from_row(row)?;

            // Parent row first, then children, all on one snapshot.
            project.categories = categories_for_project(tx, project_id)?;
            project.materials = materials_for_project(tx, project_id)?;
            project.steps = steps_for_project(tx, project_id)?;
            Ok(Some(project))
        })
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        let mut conn = self.connect()?;
        with_tx(&mut conn, |tx| {
            let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_name;"))?;
            let mut rows = stmt.query([])?;

            let mut projects = Vec::new();
            while let Some(row) = rows.next()? {
                projects.push(project_from_row(row)?);
            }
            Ok(projects)
        })
    }

    fn modify_project_details(
        &self,
        project_id: ProjectId,
        project: &Project,
    ) -> RepoResult<WriteOutcome> {
        let mut conn = self.connect()?;
        with_tx(&mut conn, |tx| {
            let changed = tx.execute(
                "UPDATE project
                 SET
                    project_name = ?1,
                    estimated_hours = ?2,
                    actual_hours = ?3,
                    difficulty = ?4,
                    notes = ?5
                 WHERE project_id = ?6;",
                params![
                    project.project_name.as_str(),
                    decimal_to_db(project.estimated_hours),
                    decimal_to_db(project.actual_hours),
                    project.difficulty,
                    project.notes.as_deref(),
                    project_id,
                ],
            )?;

            Ok(write_outcome(changed))
        })
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<WriteOutcome> {
        let mut conn = self.connect()?;
        with_tx(&mut conn, |tx| {
            let changed = tx.execute(
                "DELETE FROM project WHERE project_id = ?1;",
                params![project_id],
            )?;

            Ok(write_outcome(changed))
        })
    }
}

/// Runs one operation inside a scoped transaction.
///
/// Commits when the operation returns `Ok`, rolls back and propagates the
/// error otherwise. Every public repository method goes through here, so
/// the transaction block exists exactly once.
fn with_tx<T>(
    conn: &mut Connection,
    operation: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.transaction()?;
    match operation(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx_rollback module=repo status=error error={}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

fn write_outcome(rows_affected: usize) -> WriteOutcome {
    if rows_affected == 1 {
        WriteOutcome::Applied
    } else {
        WriteOutcome::NotFound
    }
}

fn categories_for_project(
    tx: &Transaction<'_>,
    project_id: ProjectId,
) -> RepoResult<Vec<Category>> {
    let mut stmt = tx.prepare(
        "SELECT c.category_id, c.category_name
         FROM category c
         JOIN project_category pc USING (category_id)
         WHERE pc.project_id = ?1;",
    )?;
    let mut rows = stmt.query(params![project_id])?;

    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(category_from_row(row)?);
    }
    Ok(categories)
}

fn materials_for_project(tx: &Transaction<'_>, project_id: ProjectId) -> RepoResult<Vec<Material>> {
    let mut stmt = tx.prepare(
        "SELECT material_id, project_id, material_name, cost, quantity
         FROM material
         WHERE project_id = ?1;",
    )?;
    let mut rows = stmt.query(params![project_id])?;

    let mut materials = Vec::new();
    while let Some(row) = rows.next()? {
        materials.push(material_from_row(row)?);
    }
    Ok(materials)
}

fn steps_for_project(tx: &Transaction<'_>, project_id: ProjectId) -> RepoResult<Vec<Step>> {
    let mut stmt = tx.prepare(
        "SELECT step_id, project_id, step_text, step_order
         FROM step
         WHERE project_id = ?1;",
    )?;
    let mut rows = stmt.query(params![project_id])?;

    let mut steps = Vec::new();
    while let Some(row) = rows.next()? {
        steps.push(step_from_row(row)?);
    }
    Ok(steps)
}
