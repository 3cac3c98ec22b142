//! SQLite implementation of the persistence sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::models::{
    SystemEvent, SystemEventKind, Task, TaskCategory, TaskId, TaskOrigin, TaskPriority, TaskStatus,
};
use crate::domain::ports::{PersistenceSink, SinkError};

#[derive(Clone)]
pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a task record back.
    pub async fn fetch_task(&self, id: &TaskId) -> Result<Option<Task>, SinkError> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM development_tasks WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(read_failed)?;
        row.map(Task::try_from).transpose()
    }

    pub async fn count_tasks(&self) -> Result<i64, SinkError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM development_tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(read_failed)?;
        Ok(count)
    }

    /// All events, oldest first.
    pub async fn fetch_events(&self) -> Result<Vec<SystemEvent>, SinkError> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT event_type, message, timestamp FROM system_events ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(read_failed)?;

        rows.into_iter()
            .map(|(kind, message, timestamp)| {
                Ok(SystemEvent {
                    kind: parse_event_kind(&kind)?,
                    message,
                    timestamp: parse_datetime(&timestamp)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PersistenceSink for SqliteSink {
    async fn persist_task(&self, task: &Task) -> Result<(), SinkError> {
        let requirements = serde_json::to_string(&task.requirements)?;
        let dependencies = serde_json::to_string(&task.dependencies)?;
        let errors = serde_json::to_string(&task.errors)?;

        sqlx::query(
            r"INSERT INTO development_tasks (id, category, priority, description, requirements,
               assigned_agent, status, dependencies, estimated_duration, actual_duration, errors,
               origin, created_at, updated_at, started_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                 priority = excluded.priority,
                 description = excluded.description,
                 requirements = excluded.requirements,
                 assigned_agent = excluded.assigned_agent,
                 status = excluded.status,
                 dependencies = excluded.dependencies,
                 actual_duration = excluded.actual_duration,
                 errors = excluded.errors,
                 updated_at = excluded.updated_at,
                 started_at = excluded.started_at",
        )
        .bind(task.id.as_str())
        .bind(task.category.as_str())
        .bind(task.priority.as_str())
        .bind(&task.description)
        .bind(&requirements)
        .bind(&task.assigned_agent)
        .bind(task.status.as_str())
        .bind(&dependencies)
        .bind(task.estimated_duration_hours)
        .bind(task.actual_duration_hours)
        .bind(&errors)
        .bind(task.origin.as_str())
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .bind(task.started_at.map(|t| t.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(write_failed)?;

        Ok(())
    }

    async fn persist_event(&self, event: &SystemEvent) -> Result<(), SinkError> {
        sqlx::query("INSERT INTO system_events (event_type, message, timestamp) VALUES (?, ?, ?)")
            .bind(event.kind.as_str())
            .bind(&event.message)
            .bind(event.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(write_failed)?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    category: String,
    priority: String,
    description: String,
    requirements: String,
    assigned_agent: String,
    status: String,
    dependencies: String,
    estimated_duration: f64,
    actual_duration: Option<f64>,
    errors: String,
    origin: String,
    created_at: String,
    updated_at: String,
    started_at: Option<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = SinkError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            category: TaskCategory::from_str(&row.category)
                .ok_or_else(|| invalid("category", &row.category))?,
            priority: TaskPriority::from_str(&row.priority)
                .ok_or_else(|| invalid("priority", &row.priority))?,
            status: TaskStatus::from_str(&row.status)
                .ok_or_else(|| invalid("status", &row.status))?,
            origin: TaskOrigin::from_str(&row.origin).ok_or_else(|| invalid("origin", &row.origin))?,
            requirements: serde_json::from_str(&row.requirements)?,
            dependencies: serde_json::from_str(&row.dependencies)?,
            errors: serde_json::from_str(&row.errors)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            started_at: row.started_at.as_deref().map(parse_datetime).transpose()?,
            id: TaskId::from(row.id),
            description: row.description,
            assigned_agent: row.assigned_agent,
            estimated_duration_hours: row.estimated_duration,
            actual_duration_hours: row.actual_duration,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SinkError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SinkError::Unavailable(format!("invalid timestamp {s:?}: {e}")))
}

fn parse_event_kind(s: &str) -> Result<SystemEventKind, SinkError> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(SinkError::from)
}

fn invalid(field: &str, value: &str) -> SinkError {
    SinkError::Unavailable(format!("invalid {field} {value:?} in stored task"))
}

fn write_failed(e: sqlx::Error) -> SinkError {
    SinkError::WriteFailed(e.to_string())
}

fn read_failed(e: sqlx::Error) -> SinkError {
    SinkError::Unavailable(e.to_string())
}
