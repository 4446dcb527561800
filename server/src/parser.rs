use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use crate::task::{categorize, default_tasks, task_id, Status, Task};

const DESCRIPTION_LINES: usize = 3;

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^###[ \t]+([^\r\n]+)\r?$").unwrap())
}

fn label_re(label: &str) -> Regex {
    // Matches a whole line: `Label: value` or the writer's `- **Label:** value`.
    Regex::new(&format!(
        r"(?m)^[ \t]*(?:[-*][ \t]+)?(?:\*\*)?{}:(?:\*\*)?[ \t]*([^\r\n]+)",
        label
    ))
    .unwrap()
}

fn blocker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| label_re("Blocker"))
}

fn project_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| label_re("Project"))
}

fn started_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| label_re("Started"))
}

/// Reads the board file. A missing or unreadable file yields the default
/// board, never an error.
pub fn load_tasks(path: &Path) -> Vec<Task> {
    match fs::read_to_string(path) {
        Ok(content) => parse_tasks(&content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "tasks file missing, using defaults");
            default_tasks()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read tasks file, using defaults");
            default_tasks()
        }
    }
}

pub fn parse_tasks(content: &str) -> Vec<Task> {
    if content.trim().is_empty() {
        return default_tasks();
    }
    let mut tasks = Vec::new();
    for status in Status::ALL {
        tasks.extend(parse_section(section_text(content, status), status));
    }
    tasks
}

/// Text between a status marker and whichever marker follows it.
fn section_text(content: &str, status: Status) -> &str {
    let Some(start) = content.find(status.marker()) else {
        return "";
    };
    let rest = &content[start + status.marker().len()..];
    let end = Status::ALL
        .iter()
        .filter_map(|s| rest.find(s.marker()))
        .min()
        .unwrap_or(rest.len());
    &rest[..end]
}

fn parse_section(text: &str, status: Status) -> Vec<Task> {
    let headings: Vec<_> = heading_re().captures_iter(text).collect();
    let mut tasks = Vec::with_capacity(headings.len());
    for (index, caps) in headings.iter().enumerate() {
        let (Some(line), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_start = (line.end() + 1).min(text.len());
        let body_end = headings
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let body = &text[body_start..body_end.max(body_start)];
        let title = title.as_str().trim().to_string();
        tasks.push(Task {
            id: task_id(&title),
            category: categorize(body),
            description: description(body),
            status,
            blocker: capture_label(blocker_re(), body),
            started: capture_label(started_re(), body),
            project: capture_label(project_re(), body),
            title,
        });
    }
    tasks
}

fn capture_label(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_label_line(line: &str) -> bool {
    blocker_re().is_match(line) || project_re().is_match(line) || started_re().is_match(line)
}

/// Lines the parser would read as structure rather than description text.
/// The writer escapes these with a leading `\`.
pub(crate) fn needs_escape(line: &str) -> bool {
    line.starts_with('\\')
        || heading_re().is_match(line)
        || line.trim() == "---"
        || is_label_line(line)
}

// A `---` rule closes the section, not the task.
fn description(body: &str) -> String {
    body.lines()
        .take_while(|line| line.trim() != "---")
        .take(DESCRIPTION_LINES)
        .filter(|line| !is_label_line(line))
        .map(|line| line.strip_prefix('\\').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
