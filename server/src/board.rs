use serde::Serialize;

use crate::task::{Category, Status, Task};

#[derive(Debug, Serialize, Clone)]
pub struct Column {
    pub status: Status,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub label: &'static str,
}

pub fn categories() -> Vec<CategoryInfo> {
    Category::ALL
        .into_iter()
        .map(|id| CategoryInfo { id, label: id.label() })
        .collect()
}

/// Groups tasks into the four fixed columns, optionally keeping one category.
pub fn group_by_status(tasks: Vec<Task>, category: Option<Category>) -> Vec<Column> {
    let mut columns: Vec<Column> = Status::ALL
        .into_iter()
        .map(|status| Column {
            status,
            title: status.title(),
            tasks: Vec::new(),
        })
        .collect();
    for task in tasks {
        if category.is_some_and(|c| c != task.category) {
            continue;
        }
        if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
            column.tasks.push(task);
        }
    }
    columns
}
