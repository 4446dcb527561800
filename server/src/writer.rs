use std::fs;
use std::io;
use std::path::Path;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::parser::needs_escape;
use crate::task::{Status, Task};

const BANNER: &str = "# TASKS.md — Kanban Board

> **Read this every session.** This is the source of truth for active work.
";

pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[month]/[day]/[year], [hour repr:12]:[minute] [period] UTC[offset_hour sign:mandatory]:[offset_minute]"
    );
    at.format(&format).unwrap_or_default()
}

fn format_task(task: &Task) -> String {
    let mut output = format!("### {}\n", task.title);
    if !task.description.is_empty() {
        for line in task.description.split('\n') {
            if needs_escape(line) {
                output.push('\\');
            }
            output.push_str(line);
            output.push('\n');
        }
    }
    if let Some(blocker) = &task.blocker {
        output.push_str(&format!("- **Blocker:** {}\n", blocker));
    }
    if let Some(project) = &task.project {
        output.push_str(&format!("- **Project:** {}\n", project));
    }
    if let Some(started) = &task.started {
        output.push_str(&format!("- **Started:** {}\n", started));
    }
    output.push('\n');
    output
}

/// Renders the whole board file. Anything the parser does not model is
/// dropped, so a hand-edited file is normalised on the next write.
pub fn render_tasks(tasks: &[Task], updated_at: OffsetDateTime) -> String {
    let mut content = String::from(BANNER);
    for status in Status::ALL {
        content.push_str(&format!("\n---\n\n{}\n\n", status.heading()));
        for task in tasks.iter().filter(|t| t.status == status) {
            content.push_str(&format_task(task));
        }
    }
    content.push_str(&format!(
        "\n---\n\n*Last updated: {}*\n",
        format_timestamp(updated_at)
    ));
    content
}

pub fn write_tasks(path: &Path, tasks: &[Task], updated_at: OffsetDateTime) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_tasks(tasks, updated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::default_tasks;
    use time::macros::datetime;

    #[test]
    fn timestamp_is_twelve_hour_with_offset() {
        let at = datetime!(2026-10-17 14:05 -07:00);
        assert_eq!(format_timestamp(at), "10/17/2026, 02:05 PM UTC-07:00");
    }

    #[test]
    fn renders_fixed_template() {
        let content = render_tasks(&default_tasks(), datetime!(2026-01-02 09:30 UTC));
        let expected = "\
# TASKS.md — Kanban Board

> **Read this every session.** This is the source of truth for active work.

---

## 🔴 In Progress

### BBC Sounds Proxy for Sonos
Blocked on NordVPN setup. Need proxy server.
- **Blocker:** NordVPN not configured
- **Project:** TadmanHome


---

## 🟡 Queued

### Nest Integration
Connect Nest thermostat to TadmanHome


---

## ✅ Done (Recent)

### McFly Improvements
Phase 3: Behavioral & Tooling updates


---

## 📋 Backlog (Ideas)


---

*Last updated: 01/02/2026, 09:30 AM UTC+00:00*
";
        assert_eq!(content, expected);
    }

    #[test]
    fn structural_description_lines_are_escaped() {
        let mut task = default_tasks().remove(1);
        task.description = "### not a task\nProject: later\n---\nplain".to_string();
        assert_eq!(
            format_task(&task),
            "### Nest Integration\n\\### not a task\n\\Project: later\n\\---\nplain\n\n"
        );
    }

    #[test]
    fn write_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace").join("TASKS.md");
        write_tasks(&path, &[], datetime!(2026-01-02 09:30 UTC)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# TASKS.md"));
        assert!(written.contains("## 📋 Backlog (Ideas)"));
    }
}
