use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    InProgress,
    Queued,
    Done,
    Backlog,
}

impl Status {
    /// Column order on the board and section order in the file.
    pub const ALL: [Status; 4] = [Status::InProgress, Status::Queued, Status::Done, Status::Backlog];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::InProgress => "in-progress",
            Status::Queued => "queued",
            Status::Done => "done",
            Status::Backlog => "backlog",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Status::InProgress => "In Progress",
            Status::Queued => "Queued",
            Status::Done => "Done",
            Status::Backlog => "Backlog",
        }
    }

    /// Literal prefix of the level-2 heading that opens this status' section.
    pub fn marker(self) -> &'static str {
        match self {
            Status::InProgress => "## 🔴 In Progress",
            Status::Queued => "## 🟡 Queued",
            Status::Done => "## ✅ Done",
            Status::Backlog => "## 📋 Backlog",
        }
    }

    /// Full heading written for this section.
    pub fn heading(self) -> &'static str {
        match self {
            Status::InProgress => "## 🔴 In Progress",
            Status::Queued => "## 🟡 Queued",
            Status::Done => "## ✅ Done (Recent)",
            Status::Backlog => "## 📋 Backlog (Ideas)",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Konsensys,
    Tadmanhome,
    Admin,
    Mcfly,
}

// Checked top to bottom; the first category with a keyword in the body wins.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 3] = [
    (Category::Tadmanhome, &["sonos", "tadmanhome"]),
    (Category::Konsensys, &["konsensys"]),
    (Category::Mcfly, &["mcfly", "heartbeat", "compaction"]),
];

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Konsensys,
        Category::Tadmanhome,
        Category::Admin,
        Category::Mcfly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Konsensys => "konsensys",
            Category::Tadmanhome => "tadmanhome",
            Category::Admin => "admin",
            Category::Mcfly => "mcfly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Konsensys => "Konsensys",
            Category::Tadmanhome => "TadmanHome",
            Category::Admin => "Admin",
            Category::Mcfly => "McFly",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::InvalidCategory(value.to_string()))
    }
}

/// Infers a category from free text. Category is never written to the
/// file, so this runs again on every parse.
pub fn categorize(body: &str) -> Category {
    let lowered = body.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Admin)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Task {
    /// Matches both identifier forms: the one a reparse computes and the
    /// stripped one handed out on creation.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || slug_id(&self.title) == id
    }
}

/// Identifier recomputed from the title on every parse.
pub fn task_id(title: &str) -> String {
    let mut out = String::new();
    let mut in_space = false;
    for ch in title.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Identifier assigned on creation: `task_id` limited to `[a-z0-9-]`.
pub fn slug_id(title: &str) -> String {
    task_id(title)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub blocker: Option<String>,
    pub started: Option<String>,
    pub project: Option<String>,
}

impl NewTask {
    pub fn into_task(self) -> crate::Result<Task> {
        let title = single_line(&self.title);
        if title.is_empty() {
            return Err(Error::InvalidTask("title is required".to_string()));
        }
        let description = self.description.unwrap_or_default();
        let category = self.category.unwrap_or_else(|| categorize(&description));
        Ok(Task {
            id: slug_id(&title),
            title,
            description,
            status: self.status.unwrap_or(Status::Queued),
            category,
            blocker: non_empty(self.blocker),
            started: non_empty(self.started),
            project: non_empty(self.project),
        })
    }
}

/// Partial update. Present fields overwrite; an empty string clears an
/// optional label.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub blocker: Option<String>,
    pub started: Option<String>,
    pub project: Option<String>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, task: &mut Task) -> crate::Result<()> {
        if let Some(title) = self.title {
            let title = single_line(&title);
            if title.is_empty() {
                return Err(Error::InvalidTask("title cannot be empty".to_string()));
            }
            task.id = task_id(&title);
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(blocker) = self.blocker {
            task.blocker = non_empty(Some(blocker));
        }
        if let Some(started) = self.started {
            task.started = non_empty(Some(started));
        }
        if let Some(project) = self.project {
            task.project = non_empty(Some(project));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| single_line(&v)).filter(|v| !v.is_empty())
}

/// Titles and labels occupy one line of the file; line breaks fold to spaces.
fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Board shown when the file is missing, empty or unreadable.
///
/// These short ids only exist until the first write; after that every id
/// is recomputed from the title.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "bbc-proxy".to_string(),
            title: "BBC Sounds Proxy for Sonos".to_string(),
            description: "Blocked on NordVPN setup. Need proxy server.".to_string(),
            status: Status::InProgress,
            category: Category::Tadmanhome,
            blocker: Some("NordVPN not configured".to_string()),
            started: None,
            project: Some("TadmanHome".to_string()),
        },
        Task {
            id: "nest-integration".to_string(),
            title: "Nest Integration".to_string(),
            description: "Connect Nest thermostat to TadmanHome".to_string(),
            status: Status::Queued,
            category: Category::Tadmanhome,
            blocker: None,
            started: None,
            project: None,
        },
        Task {
            id: "mcfly-improvements".to_string(),
            title: "McFly Improvements".to_string(),
            description: "Phase 3: Behavioral & Tooling updates".to_string(),
            status: Status::Done,
            category: Category::Mcfly,
            blocker: None,
            started: None,
            project: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_lowercases_and_collapses_whitespace() {
        assert_eq!(task_id("BBC Sounds  Proxy\tfor Sonos"), "bbc-sounds-proxy-for-sonos");
        assert_eq!(task_id("Fix: login"), "fix:-login");
    }

    #[test]
    fn slug_id_strips_punctuation() {
        assert_eq!(slug_id("Fix: login (v2)!"), "fix-login-v2");
        assert_eq!(slug_id("Nest Integration"), "nest-integration");
    }

    #[test]
    fn matches_id_accepts_both_forms() {
        let mut task = default_tasks().remove(1);
        task.title = "Fix: login".to_string();
        task.id = task_id(&task.title);
        assert!(task.matches_id("fix:-login"));
        assert!(task.matches_id("fix-login"));
        assert!(!task.matches_id("fix"));
    }

    #[test]
    fn categorize_respects_priority() {
        assert_eq!(categorize("Konsensys demo on the Sonos"), Category::Tadmanhome);
        assert_eq!(categorize("KONSENSYS and heartbeat"), Category::Konsensys);
        assert_eq!(categorize("context compaction"), Category::Mcfly);
        assert_eq!(categorize("renew passport"), Category::Admin);
    }

    #[test]
    fn new_task_defaults() {
        let task = NewTask {
            title: "  Renew Passport ".to_string(),
            ..NewTask::default()
        }
        .into_task()
        .unwrap();
        assert_eq!(task.id, "renew-passport");
        assert_eq!(task.title, "Renew Passport");
        assert_eq!(task.status, Status::Queued);
        assert_eq!(task.category, Category::Admin);
        assert_eq!(task.blocker, None);
    }

    #[test]
    fn line_breaks_fold_in_title_and_labels() {
        let task = NewTask {
            title: "Line one\nLine two".to_string(),
            blocker: Some("waiting\r\non vendor".to_string()),
            ..NewTask::default()
        }
        .into_task()
        .unwrap();
        assert_eq!(task.title, "Line one Line two");
        assert_eq!(task.id, "line-one-line-two");
        assert_eq!(task.blocker.as_deref(), Some("waiting on vendor"));
    }

    #[test]
    fn fallback_ids_do_not_survive_a_reparse() {
        for task in default_tasks() {
            assert_ne!(task.id, task_id(&task.title));
        }
        let proxy = default_tasks().remove(0);
        assert!(proxy.matches_id("bbc-proxy"));
        let reparsed = Task {
            id: task_id(&proxy.title),
            ..proxy
        };
        assert!(!reparsed.matches_id("bbc-proxy"));
        assert!(reparsed.matches_id("bbc-sounds-proxy-for-sonos"));
    }

    #[test]
    fn new_task_requires_title() {
        let err = NewTask::default().into_task().unwrap_err();
        assert!(matches!(err, Error::InvalidTask(_)));
    }

    #[test]
    fn patch_merges_and_clears() {
        let mut task = default_tasks().remove(0);
        TaskPatch {
            status: Some(Status::Done),
            blocker: Some(String::new()),
            ..TaskPatch::default()
        }
        .apply(&mut task)
        .unwrap();
        assert_eq!(task.status, Status::Done);
        assert_eq!(task.blocker, None);
        assert_eq!(task.project.as_deref(), Some("TadmanHome"));
    }

    #[test]
    fn patch_title_recomputes_id() {
        let mut task = default_tasks().remove(0);
        TaskPatch {
            title: Some("BBC Sounds Relay".to_string()),
            ..TaskPatch::default()
        }
        .apply(&mut task)
        .unwrap();
        assert_eq!(task.id, "bbc-sounds-relay");
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let parsed: Status = serde_json::from_str("\"backlog\"").unwrap();
        assert_eq!(parsed, Status::Backlog);
    }

    #[test]
    fn category_from_str_is_case_insensitive() {
        assert_eq!("McFly".parse::<Category>().unwrap(), Category::Mcfly);
        assert!("chores".parse::<Category>().is_err());
    }
}
