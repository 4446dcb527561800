//! CRUD over the board file.
//!
//! Every mutation re-reads the whole file, edits the parsed list and writes
//! the whole file back. There is no locking; the last write wins.

use std::path::{Path, PathBuf};
use time::{OffsetDateTime, UtcOffset};

use crate::board::{group_by_status, Column};
use crate::error::{Error, Result};
use crate::parser::load_tasks;
use crate::task::{Category, NewTask, Status, Task, TaskPatch};
use crate::writer::write_tasks;

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    offset: UtcOffset,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>, offset: UtcOffset) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Vec<Task> {
        load_tasks(&self.path)
    }

    pub fn list_by_category(&self, category: Option<Category>) -> Vec<Task> {
        let tasks = self.list();
        match category {
            Some(category) => tasks.into_iter().filter(|t| t.category == category).collect(),
            None => tasks,
        }
    }

    pub fn board(&self, category: Option<Category>) -> Vec<Column> {
        group_by_status(self.list(), category)
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        self.list()
            .into_iter()
            .find(|t| t.matches_id(id))
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    pub fn create(&self, new_task: NewTask) -> Result<Task> {
        let task = new_task.into_task()?;
        let mut tasks = self.list();
        tasks.push(task.clone());
        self.save(&tasks)?;
        tracing::info!(id = %task.id, status = %task.status, "created task");
        Ok(task)
    }

    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut tasks = self.list();
        let task = tasks
            .iter_mut()
            .find(|t| t.matches_id(id))
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        patch.apply(task)?;
        let updated = task.clone();
        self.save(&tasks)?;
        tracing::info!(id, new_id = %updated.id, status = %updated.status, "updated task");
        Ok(updated)
    }

    pub fn move_task(&self, id: &str, status: Status) -> Result<Task> {
        self.update(id, TaskPatch::status(status))
    }

    /// Removes every task matching `id`. Unknown ids still rewrite the file.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut tasks = self.list();
        let before = tasks.len();
        tasks.retain(|t| !t.matches_id(id));
        self.save(&tasks)?;
        tracing::info!(id, removed = before - tasks.len(), "deleted task");
        Ok(())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        write_tasks(&self.path, tasks, now)?;
        Ok(())
    }
}
