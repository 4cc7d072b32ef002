/// Task model and database operations
///
/// A task owns its checklist and attachment list (JSONB columns) and holds
/// non-owning references to users: an `assigned_to` UUID array and a
/// `created_by` UUID. Deleting a user never cascades here; readers resolve
/// the references by lookup and tolerate dangling ids.
///
/// # Status and progress
///
/// Two independent transition rules coexist, on purpose:
///
/// - Editing the checklist derives progress from the completion ratio and
///   then status from progress (0 -> Pending, 1-99 -> In Progress,
///   100 -> Completed). See [`progress_from_checklist`] and
///   [`status_from_progress`].
/// - Setting the status directly applies the inverse rule: Completed marks
///   every item complete and sets progress 100; In Progress resets every
///   item and sets 50; Pending resets every item and sets 0. See
///   [`apply_status_rule`].
///
/// The two rules do not agree (setting In Progress then reading the
/// checklist back yields progress 0 by the first rule). Both are preserved
/// exactly; callers pick the rule matching the endpoint they serve.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('Pending', 'In Progress', 'Completed');
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     priority task_priority NOT NULL DEFAULT 'Medium',
///     status task_status NOT NULL DEFAULT 'Pending',
///     due_date TIMESTAMPTZ,
///     progress INTEGER NOT NULL DEFAULT 0,
///     assigned_to UUID[] NOT NULL DEFAULT '{}',
///     created_by UUID NOT NULL,
///     checklist JSONB NOT NULL DEFAULT '[]',
///     attachments JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started
    #[sqlx(rename = "Pending")]
    Pending,

    /// Some but not all work done
    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,

    /// All work done
    #[sqlx(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// Wire/database string form ("Pending", "In Progress", "Completed")
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Key form without spaces, used in dashboard distribution maps
    pub fn chart_key(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// All statuses, in display order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    #[sqlx(rename = "Low")]
    Low,
    #[sqlx(rename = "Medium")]
    Medium,
    #[sqlx(rename = "High")]
    High,
}

impl TaskPriority {
    /// Wire/database string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    /// All priorities, in display order
    pub const ALL: [TaskPriority; 3] =
        [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];
}

/// A single checklist entry, owned by its task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Sub-task text
    pub text: String,

    /// Completion flag contributing to task progress
    #[serde(default)]
    pub completed: bool,
}

/// Attachment metadata, owned by its task
///
/// The binary itself lives on an external asset host; only the URL and a
/// few descriptive fields are stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// URL of the asset (or the raw link for `fileType == "link"`)
    pub file_url: String,

    /// Detected category ("link", "image", "pdf", "doc", ...)
    pub file_type: String,

    /// Original file name, or the link itself for link attachments
    pub original_name: String,

    /// Storage-side identifier on the asset host, absent for links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_id: Option<String>,
}

impl Attachment {
    /// Builds a link attachment from a bare URL string
    pub fn link(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            file_url: url.clone(),
            file_type: "link".to_string(),
            original_name: url,
            storage_id: None,
        }
    }
}

const TASK_COLUMNS: &str = "id, title, description, priority, status, due_date, progress, \
                            assigned_to, created_by, checklist, attachments, created_at, updated_at";

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Description, empty string when unset
    pub description: String,

    /// Priority
    pub priority: TaskPriority,

    /// Current status
    pub status: TaskStatus,

    /// Due date, None when open-ended
    pub due_date: Option<DateTime<Utc>>,

    /// Checklist completion percentage, 0-100
    pub progress: i32,

    /// Assignee user ids (non-owning references, may dangle)
    pub assigned_to: Vec<Uuid>,

    /// Creator user id (non-owning reference)
    pub created_by: Uuid,

    /// Ordered checklist items
    #[serde(rename = "todoChecklist")]
    pub checklist: Json<Vec<ChecklistItem>>,

    /// Attachment metadata
    pub attachments: Json<Vec<Attachment>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether `user_id` is among the assignees
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_to.contains(&user_id)
    }

    /// Number of completed checklist items
    pub fn completed_checklist_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.completed).count()
    }
}

/// Derives progress from the checklist completion ratio
///
/// `round(100 * completed / total)`, 0 for an empty checklist.
pub fn progress_from_checklist(items: &[ChecklistItem]) -> i32 {
    if items.is_empty() {
        return 0;
    }

    let completed = items.iter().filter(|item| item.completed).count();
    ((completed as f64 / items.len() as f64) * 100.0).round() as i32
}

/// Derives status from progress (the checklist-edit rule)
pub fn status_from_progress(progress: i32) -> TaskStatus {
    if progress == 100 {
        TaskStatus::Completed
    } else if progress > 0 {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    }
}

/// Applies the status-set rule (inverse of [`status_from_progress`])
///
/// Mutates the checklist in place and returns the derived progress:
/// Completed marks every item complete (progress 100); In Progress resets
/// every item (progress 50); Pending resets every item (progress 0).
pub fn apply_status_rule(status: TaskStatus, checklist: &mut [ChecklistItem]) -> i32 {
    match status {
        TaskStatus::Completed => {
            for item in checklist.iter_mut() {
                item.completed = true;
            }
            100
        }
        TaskStatus::InProgress => {
            for item in checklist.iter_mut() {
                item.completed = false;
            }
            50
        }
        TaskStatus::Pending => {
            for item in checklist.iter_mut() {
                item.completed = false;
            }
            0
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Assignee ids (callers must reject on-hold users first)
    pub assigned_to: Vec<Uuid>,

    /// Creator id
    pub created_by: Uuid,

    /// Initial checklist
    pub checklist: Vec<ChecklistItem>,

    /// Initial attachments
    pub attachments: Vec<Attachment>,
}

/// Input for a partial field update (creator/manager edit path)
///
/// Only `Some` fields are written. Status and progress are NOT updatable
/// here; they move only through the status and checklist endpoints.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Replacement assignee list
    pub assigned_to: Option<Vec<Uuid>>,

    /// Replacement checklist
    pub checklist: Option<Vec<ChecklistItem>>,

    /// Replacement attachment list
    pub attachments: Option<Vec<Attachment>>,
}

/// Multi-criteria filter for the task list endpoint
///
/// Composed at the route boundary; every criterion is ANDed. Department
/// filtering arrives pre-resolved to a set of member ids so this module
/// stays free of user-table lookups.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Exact status match
    pub status: Option<TaskStatus>,

    /// Tasks with at least one assignee from this set (department filter)
    pub assignee_pool: Option<Vec<Uuid>>,

    /// Case-insensitive search over title, description, and checklist text
    pub search: Option<String>,

    /// Only tasks created by this user (createdByMe flag)
    pub created_by: Option<Uuid>,

    /// Role scope: members only ever see tasks assigned to them.
    /// ANDed with `assignee_pool`, so a member filtering on a department
    /// they don't belong to gets an empty result.
    pub scoped_assignee: Option<Uuid>,
}

/// Role-scoped status counters for the task list response
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    /// All tasks in scope
    pub all: i64,

    /// Pending tasks in scope
    pub pending_tasks: i64,

    /// In Progress tasks in scope
    pub in_progress_tasks: i64,

    /// Completed tasks in scope
    pub completed_tasks: i64,
}

/// Escapes LIKE/ILIKE metacharacters in user-supplied search text
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Task {
    /// Creates a new task
    ///
    /// Status and progress start at their defaults (Pending, 0) even when
    /// the initial checklist has completed items; derivation only runs on
    /// the checklist endpoint, matching the documented behavior.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, priority, due_date, assigned_to,
                               created_by, checklist, attachments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.assigned_to)
        .bind(data.created_by)
        .bind(Json(data.checklist))
        .bind(Json(data.attachments))
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, None if absent
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks matching a filter, newest first
    ///
    /// Builds one dynamic query; see [`TaskFilter`] for the composition
    /// rules.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1=1");
        let mut bind_count = 0;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${bind_count}"));
        }
        if filter.assignee_pool.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND assigned_to && ${bind_count}"));
        }
        if filter.search.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (title ILIKE ${n} OR description ILIKE ${n} OR EXISTS (\
                   SELECT 1 FROM jsonb_array_elements(checklist) AS item \
                   WHERE item->>'text' ILIKE ${n}))",
                n = bind_count
            ));
        }
        if filter.created_by.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND created_by = ${bind_count}"));
        }
        if filter.scoped_assignee.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND ${bind_count} = ANY(assigned_to)"));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Task>(&query);

        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(ref pool_ids) = filter.assignee_pool {
            q = q.bind(pool_ids);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", escape_like(search)));
        }
        if let Some(created_by) = filter.created_by {
            q = q.bind(created_by);
        }
        if let Some(scoped) = filter.scoped_assignee {
            q = q.bind(scoped);
        }

        q.fetch_all(pool).await
    }

    /// Computes the status summary counters in one round trip
    ///
    /// Unscoped by search and department on purpose; only the role scope
    /// applies (members count their own tasks, privileged roles count
    /// everything).
    pub async fn status_summary(
        pool: &PgPool,
        scoped_assignee: Option<Uuid>,
    ) -> Result<StatusSummary, sqlx::Error> {
        let summary = sqlx::query_as::<_, StatusSummary>(
            r#"
            SELECT COUNT(*) AS "all",
                   COUNT(*) FILTER (WHERE status = 'Pending') AS pending_tasks,
                   COUNT(*) FILTER (WHERE status = 'In Progress') AS in_progress_tasks,
                   COUNT(*) FILTER (WHERE status = 'Completed') AS completed_tasks
            FROM tasks
            WHERE ($1::uuid IS NULL OR $1 = ANY(assigned_to))
            "#,
        )
        .bind(scoped_assignee)
        .fetch_one(pool)
        .await?;

        Ok(summary)
    }

    /// Lists tasks assigned to a user, newest first
    pub async fn list_assigned_to(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE $1 = ANY(assigned_to) ORDER BY created_at DESC",
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks created by a user, newest first
    pub async fn list_created_by(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE created_by = $1 ORDER BY created_at DESC",
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts a user's non-completed tasks
    ///
    /// Zero means an on-hold user is eligible for automatic release.
    pub async fn count_open_for_assignee(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE $1 = ANY(assigned_to) AND status <> 'Completed'",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Applies a partial field update (creator/manager edit path)
    ///
    /// Returns the updated task, or None if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${bind_count}"));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${bind_count}"));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${bind_count}"));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${bind_count}"));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to = ${bind_count}"));
        }
        if data.checklist.is_some() {
            bind_count += 1;
            query.push_str(&format!(", checklist = ${bind_count}"));
        }
        if data.attachments.is_some() {
            bind_count += 1;
            query.push_str(&format!(", attachments = ${bind_count}"));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(checklist) = data.checklist {
            q = q.bind(Json(checklist));
        }
        if let Some(attachments) = data.attachments {
            q = q.bind(Json(attachments));
        }

        q.fetch_optional(pool).await
    }

    /// Writes status, progress, and checklist together
    ///
    /// Used by both the status endpoint (inverse rule) and the checklist
    /// endpoint (direct rule) after the respective rule has been applied
    /// in memory.
    pub async fn set_state(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
        progress: i32,
        checklist: Vec<ChecklistItem>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2, progress = $3, checklist = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .bind(progress)
        .bind(Json(checklist))
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// No cascade to referenced users.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(flags: &[bool]) -> Vec<ChecklistItem> {
        flags
            .iter()
            .enumerate()
            .map(|(i, &completed)| ChecklistItem {
                text: format!("item {i}"),
                completed,
            })
            .collect()
    }

    #[test]
    fn test_progress_from_empty_checklist_is_zero() {
        assert_eq!(progress_from_checklist(&[]), 0);
    }

    #[test]
    fn test_progress_from_checklist_rounds() {
        // 1 of 3 complete -> 33, 2 of 3 -> 67
        assert_eq!(progress_from_checklist(&items(&[true, false, false])), 33);
        assert_eq!(progress_from_checklist(&items(&[true, true, false])), 67);
        assert_eq!(progress_from_checklist(&items(&[true, false])), 50);
    }

    #[test]
    fn test_progress_all_complete_is_100() {
        assert_eq!(progress_from_checklist(&items(&[true, true, true])), 100);
    }

    #[test]
    fn test_status_from_progress_thresholds() {
        assert_eq!(status_from_progress(0), TaskStatus::Pending);
        assert_eq!(status_from_progress(1), TaskStatus::InProgress);
        assert_eq!(status_from_progress(99), TaskStatus::InProgress);
        assert_eq!(status_from_progress(100), TaskStatus::Completed);
    }

    #[test]
    fn test_checklist_rule_half_complete() {
        // 1 of 2 items complete -> progress 50, In Progress
        let checklist = items(&[true, false]);
        let progress = progress_from_checklist(&checklist);
        assert_eq!(progress, 50);
        assert_eq!(status_from_progress(progress), TaskStatus::InProgress);
    }

    #[test]
    fn test_status_rule_completed_marks_all_items() {
        let mut checklist = items(&[false, false, true]);
        let progress = apply_status_rule(TaskStatus::Completed, &mut checklist);
        assert_eq!(progress, 100);
        assert!(checklist.iter().all(|item| item.completed));
    }

    #[test]
    fn test_status_rule_in_progress_resets_items_to_50() {
        // Regardless of prior checklist state
        let mut checklist = items(&[true, true]);
        let progress = apply_status_rule(TaskStatus::InProgress, &mut checklist);
        assert_eq!(progress, 50);
        assert!(checklist.iter().all(|item| !item.completed));
    }

    #[test]
    fn test_status_rule_pending_resets_items_to_0() {
        let mut checklist = items(&[true]);
        let progress = apply_status_rule(TaskStatus::Pending, &mut checklist);
        assert_eq!(progress, 0);
        assert!(!checklist[0].completed);
    }

    #[test]
    fn test_rules_are_not_inverses() {
        // The documented drift: set In Progress (items reset, progress 50),
        // then re-derive from the checklist and you get 0/Pending.
        let mut checklist = items(&[true, true]);
        let set_progress = apply_status_rule(TaskStatus::InProgress, &mut checklist);
        assert_eq!(set_progress, 50);

        let derived = progress_from_checklist(&checklist);
        assert_eq!(derived, 0);
        assert_eq!(status_from_progress(derived), TaskStatus::Pending);
    }

    #[test]
    fn test_status_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"Pending\"").unwrap();
        assert_eq!(parsed, TaskStatus::Pending);
    }

    #[test]
    fn test_attachment_from_link() {
        let att = Attachment::link("https://example.com/doc");
        assert_eq!(att.file_type, "link");
        assert_eq!(att.original_name, "https://example.com/doc");
        assert!(att.storage_id.is_none());
    }

    #[test]
    fn test_attachment_serde_camel_case() {
        let att = Attachment {
            file_url: "https://cdn.example.com/a.pdf".to_string(),
            file_type: "pdf".to_string(),
            original_name: "a.pdf".to_string(),
            storage_id: Some("assets/a".to_string()),
        };
        let json = serde_json::to_value(&att).unwrap();
        assert_eq!(json["fileUrl"], "https://cdn.example.com/a.pdf");
        assert_eq!(json["originalName"], "a.pdf");
        assert_eq!(json["storageId"], "assets/a");
    }

    #[test]
    fn test_checklist_item_completed_defaults_false() {
        let item: ChecklistItem = serde_json::from_str(r#"{"text": "write docs"}"#).unwrap();
        assert!(!item.completed);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% done_now"), "50\\% done\\_now");
        assert_eq!(escape_like("plain"), "plain");
    }
}
