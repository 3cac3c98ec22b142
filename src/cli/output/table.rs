//! Table output for tasks and metrics using comfy-table.

use std::env;

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::truncate;
use crate::domain::models::{AggregateMetrics, Task, TaskPriority, TaskStatus};

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn format_tasks(&self, tasks: &[Task]) -> String {
        let mut table = base_table();
        table.set_header(header(&[
            "ID", "Category", "Priority", "Status", "Description", "Est (h)", "Actual (h)", "Deps",
        ]));

        for task in tasks {
            let status = if self.use_colors {
                Cell::new(task.status).fg(status_color(task.status))
            } else {
                Cell::new(format!("{} {}", status_icon(task.status), task.status))
            };
            let priority = if self.use_colors {
                Cell::new(task.priority.as_str()).fg(priority_color(task.priority))
            } else {
                Cell::new(task.priority.as_str())
            };
            let actual = task
                .actual_duration_hours
                .map_or_else(|| "-".to_string(), |h| format!("{h:.1}"));

            table.add_row(vec![
                Cell::new(truncate(task.id.as_str(), 24)),
                Cell::new(task.category),
                priority,
                status,
                Cell::new(truncate(&task.description, 44)),
                Cell::new(format!("{:.0}", task.estimated_duration_hours))
                    .set_alignment(CellAlignment::Right),
                Cell::new(actual).set_alignment(CellAlignment::Right),
                Cell::new(task.dependencies.len()).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }

    pub fn format_metrics(&self, metrics: &AggregateMetrics) -> String {
        let mut table = base_table();
        table.set_header(header(&["Metric", "Value"]));

        let rows = [
            ("Total tasks", metrics.total_tasks.to_string()),
            ("Completed", metrics.completed_tasks.to_string()),
            ("Failed", metrics.failed_tasks.to_string()),
            ("In progress", metrics.in_progress_tasks.to_string()),
            (
                "Avg duration (h)",
                format!("{:.1}", metrics.average_task_duration_hours),
            ),
            ("Code quality", percent(metrics.code_quality)),
            ("Test coverage", percent(metrics.test_coverage)),
            ("Deployment success", percent(metrics.deployment_success)),
            ("Security score", percent(metrics.security_score)),
            (
                "Last deployment",
                metrics
                    .last_deployment
                    .map_or_else(|| "-".to_string(), |t| t.to_rfc3339()),
            ),
        ];
        for (name, value) in rows {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Respect `NO_COLOR` and dumb terminals.
fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::White,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Completed => Color::Green,
        TaskStatus::Failed => Color::Red,
    }
}

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "○",
        TaskStatus::InProgress => "⟳",
        TaskStatus::Completed => "✓",
        TaskStatus::Failed => "✗",
    }
}

fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Critical => Color::Red,
        TaskPriority::High => Color::Yellow,
        TaskPriority::Medium => Color::White,
        TaskPriority::Low => Color::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{TaskCategory, TaskDraft, TaskId};
    use chrono::Utc;

    #[test]
    fn test_task_table_without_colors() {
        let task = Task::from_draft(
            TaskId::from("task-1"),
            TaskDraft::new(TaskCategory::Security, "Implement security and compliance measures", 96.0)
                .with_priority(TaskPriority::Critical),
            Utc::now(),
        );
        let rendered = TableFormatter::with_colors(false).format_tasks(&[task]);
        assert!(rendered.contains("task-1"));
        assert!(rendered.contains("security"));
        assert!(rendered.contains("○ pending"));
    }

    #[test]
    fn test_metrics_table() {
        let metrics = AggregateMetrics {
            completed_tasks: 3,
            code_quality: 0.72,
            ..AggregateMetrics::default()
        };
        let rendered = TableFormatter::with_colors(false).format_metrics(&metrics);
        assert!(rendered.contains("Code quality"));
        assert!(rendered.contains("72.0%"));
    }
}
