/// Task registry and dashboard endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks` - Filtered task list with status summary
/// - `GET /api/tasks/dashboard-data` - Org dashboard aggregation
/// - `GET /api/tasks/user-dashboard-data` - Per-user dashboard
/// - `GET /api/tasks/:id` - Single task
/// - `POST /api/tasks` - Create a task
/// - `PUT /api/tasks/:id` - Update task fields
/// - `DELETE /api/tasks/:id` - Delete a task
/// - `PUT /api/tasks/:id/status` - Move a task through its lifecycle
/// - `PUT /api/tasks/:id/todo` - Replace the checklist
///
/// Status and checklist move through their own endpoints because the
/// two derivation directions differ: the checklist endpoint derives
/// status FROM completion, the status endpoint forces completion FROM
/// status. The rules are not inverses of each other and are kept that
/// way deliberately.

use crate::{
    app::AppState,
    boundary::{AssigneesField, AttachmentsField, ChecklistField},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use taskdeck_shared::{
    auth::{
        authorization::{self, Action},
        middleware::CurrentUser,
    },
    events::TaskCompleted,
    models::{
        stats,
        task::{
            self, CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask,
        },
        user::{Role, User, UserSummary},
    },
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Task list query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    /// Exact status filter (wire name, e.g. "In Progress")
    pub status: Option<TaskStatus>,

    /// Department filter, resolved to that department's member ids
    pub department: Option<String>,

    /// Case-insensitive search over title, description, checklist text
    pub search: Option<String>,

    /// Only tasks the requester created
    pub created_by_me: Option<bool>,
}

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Priority, defaults to Medium
    pub priority: Option<TaskPriority>,

    /// Due date
    pub due_date: Option<DateTime<Utc>>,

    /// Assignees in any accepted transport shape
    pub assigned_to: Option<AssigneesField>,

    /// Checklist in any accepted transport shape
    pub todo_checklist: Option<ChecklistField>,

    /// Attachments in any accepted transport shape
    pub attachments: Option<AttachmentsField>,
}

/// Task field update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Replacement assignee list
    pub assigned_to: Option<AssigneesField>,

    /// Replacement checklist
    pub todo_checklist: Option<ChecklistField>,

    /// Replacement attachment list
    pub attachments: Option<AttachmentsField>,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status (wire name)
    pub status: TaskStatus,
}

/// Checklist replacement request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChecklistRequest {
    /// Replacement checklist
    pub todo_checklist: ChecklistField,
}

/// Serializes a task with its completed-item count appended
fn task_with_todo_count(task: &Task) -> Value {
    let completed = task.completed_checklist_count();
    let mut value = serde_json::to_value(task).unwrap_or_default();
    if let Value::Object(ref mut map) = value {
        map.insert("completedTodoCount".to_string(), json!(completed));
    }
    value
}

/// Serializes a task with assignee ids expanded to user summaries
///
/// Dangling assignee ids (users deleted since assignment) are dropped
/// from the response; the stored array keeps them.
fn task_response(task: &Task, summaries: &[UserSummary]) -> Value {
    let mut value = task_with_todo_count(task);
    if let Value::Object(ref mut map) = value {
        let assignees: Vec<Value> = task
            .assigned_to
            .iter()
            .filter_map(|id| summaries.iter().find(|s| s.id == *id))
            .filter_map(|summary| serde_json::to_value(summary).ok())
            .collect();
        map.insert("assignedTo".to_string(), Value::Array(assignees));
    }
    value
}

/// Expands assignees for a batch of tasks in one summary lookup
async fn tasks_with_assignees(pool: &PgPool, tasks: &[Task]) -> Result<Vec<Value>, sqlx::Error> {
    let mut ids: Vec<Uuid> = tasks
        .iter()
        .flat_map(|task| task.assigned_to.iter().copied())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let summaries = User::summaries(pool, &ids).await?;

    Ok(tasks.iter().map(|task| task_response(task, &summaries)).collect())
}

/// Expands assignees for a single task
async fn task_with_assignees(pool: &PgPool, task: &Task) -> Result<Value, sqlx::Error> {
    let summaries = User::summaries(pool, &task.assigned_to).await?;
    Ok(task_response(task, &summaries))
}

/// Members are scoped to their own assignments, everyone else sees all
fn role_scope(current: &CurrentUser) -> Option<Uuid> {
    match current.0.role {
        Role::Member => Some(current.0.id),
        Role::Admin | Role::Manager => None,
    }
}

/// List tasks matching the query filters
///
/// Every criterion is ANDed. Members additionally get an assignment
/// scope conjunct, so filtering on a department they don't belong to
/// yields an empty list rather than leaking other teams' tasks.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Value>> {
    let scope = role_scope(&current);

    let assignee_pool = match query.department.as_deref().filter(|d| !d.is_empty()) {
        Some(department) => Some(User::ids_in_department(&state.db, department).await?),
        None => None,
    };

    let filter = TaskFilter {
        status: query.status,
        assignee_pool,
        search: query.search.filter(|s| !s.is_empty()),
        created_by: query
            .created_by_me
            .unwrap_or(false)
            .then_some(current.0.id),
        scoped_assignee: scope,
    };

    let tasks = Task::list(&state.db, &filter).await?;
    let status_summary = Task::status_summary(&state.db, scope).await?;

    let tasks = tasks_with_assignees(&state.db, &tasks).await?;

    Ok(Json(json!({
        "tasks": tasks,
        "statusSummary": status_summary,
    })))
}

/// Get a single task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if !authorization::can_view_task(current.0.role, current.0.id, &task) {
        return Err(ApiError::Forbidden(
            "Not authorized to access this resource".to_string(),
        ));
    }

    Ok(Json(task_with_assignees(&state.db, &task).await?))
}

/// Create a task
///
/// Rejects the whole request when any requested assignee is on hold;
/// the error message names them so the client can fix the selection.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    authorization::require(current.0.role, Action::CreateTask)?;
    req.validate()?;

    let assigned_to = req.assigned_to.map(AssigneesField::normalize).unwrap_or_default();
    let checklist = req
        .todo_checklist
        .map(ChecklistField::normalize)
        .unwrap_or_default();
    let attachments = req
        .attachments
        .map(AttachmentsField::normalize)
        .unwrap_or_default();

    if !assigned_to.is_empty() {
        let on_hold = User::find_on_hold(&state.db, &assigned_to).await?;
        if !on_hold.is_empty() {
            let names: Vec<&str> = on_hold.iter().map(|u| u.name.as_str()).collect();
            return Err(ApiError::BadRequest(format!(
                "Cannot assign tasks to users on hold: {}",
                names.join(", ")
            )));
        }
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            due_date: req.due_date,
            assigned_to,
            created_by: current.0.id,
            checklist,
            attachments,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "task": task_with_assignees(&state.db, &task).await?,
        })),
    ))
}

/// Update task fields
///
/// Managers edit any task, others only tasks they created. Checklist,
/// assignee, and attachment payloads replace their lists wholesale.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Value>> {
    authorization::require(current.0.role, Action::EditTask)?;
    req.validate()?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if !authorization::can_edit_task(current.0.role, current.0.id, &task) {
        return Err(ApiError::Forbidden(
            "Not authorized to update this task".to_string(),
        ));
    }

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        priority: req.priority,
        due_date: req.due_date,
        assigned_to: req.assigned_to.map(AssigneesField::normalize),
        checklist: req.todo_checklist.map(ChecklistField::normalize),
        attachments: req.attachments.map(AttachmentsField::normalize),
    };

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": task_with_assignees(&state.db, &task).await?,
    })))
}

/// Delete a task
///
/// No cascade: assignees and creator records are untouched.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    authorization::require(current.0.role, Action::DeleteTask)?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if !authorization::can_delete_task(current.0.role, current.0.id, &task) {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this task".to_string(),
        ));
    }

    Task::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// Update a task's status
///
/// Applies the inverse derivation rule: the chosen status forces the
/// checklist and progress (Completed completes every item, In Progress
/// resets items and pins progress to 50, Pending resets to zero). On a
/// transition into Completed the `TaskCompleted` event runs hold
/// release for the assignees.
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Value>> {
    let existing = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if !authorization::can_update_status(current.0.role, current.0.id, &existing) {
        return Err(ApiError::Forbidden(
            "Not authorized to update this task".to_string(),
        ));
    }

    let mut checklist = existing.checklist.0.clone();
    let progress = task::apply_status_rule(req.status, &mut checklist);

    let task = Task::set_state(&state.db, id, req.status, progress, checklist)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if req.status == TaskStatus::Completed {
        let event = TaskCompleted {
            task_id: task.id,
            assignees: task.assigned_to.clone(),
        };
        event.release_holds(&state.db).await;
    }

    Ok(Json(json!({
        "message": "Task status updated",
        "task": task_with_assignees(&state.db, &task).await?,
    })))
}

/// Replace a task's checklist
///
/// Applies the direct derivation rule: progress is the rounded share of
/// completed items, and status follows progress (100 completes, any
/// progress means In Progress, zero resets to Pending).
pub async fn update_task_checklist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateChecklistRequest>,
) -> ApiResult<Json<Value>> {
    let existing = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if !authorization::can_update_status(current.0.role, current.0.id, &existing) {
        return Err(ApiError::Forbidden(
            "Not authorized to update checklist".to_string(),
        ));
    }

    let checklist = req.todo_checklist.normalize();
    let progress = task::progress_from_checklist(&checklist);
    let status = task::status_from_progress(progress);

    // No hold release here: the status endpoint is the only place the
    // completion side effect fires, even when the derived status lands
    // on Completed.
    let task = Task::set_state(&state.db, id, status, progress, checklist)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(json!({
        "message": "Task checklist updated",
        "task": task_with_assignees(&state.db, &task).await?,
    })))
}

/// Org-wide dashboard aggregation
///
/// Overview counters are intentionally unscoped for every caller;
/// chart distributions scope down for members. Degenerate inputs (no
/// tasks, no users) yield zero-filled structures, never errors.
pub async fn dashboard_data(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let scope = role_scope(&current);

    let statistics = stats::overview(&state.db, None).await?;
    let task_distribution = stats::status_distribution(&state.db, scope).await?;
    let task_priority_levels = stats::priority_distribution(&state.db, scope).await?;
    let last7_days = stats::completed_last_seven_days(&state.db, scope).await?;
    let recent_tasks = stats::recent_tasks(&state.db, None, 10).await?;
    let tasks_by_department = stats::tasks_by_department(&state.db).await?;
    let active_workload = stats::active_workload(&state.db, 10).await?;
    let top_performers = stats::top_performers(&state.db, 5).await?;

    Ok(Json(json!({
        "statistics": statistics,
        "charts": {
            "taskDistribution": task_distribution,
            "taskPriorityLevels": task_priority_levels,
            "last7Days": last7_days,
            "topPerformers": top_performers,
            "tasksByDepartment": tasks_by_department,
            "activeWorkload": active_workload,
        },
        "recentTasks": recent_tasks,
    })))
}

/// Per-user dashboard aggregation
///
/// The same chart shapes scoped entirely to the requesting user. No
/// department, workload, or performer sections.
pub async fn user_dashboard_data(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    let scope = Some(current.0.id);

    let statistics = stats::overview(&state.db, scope).await?;
    let task_distribution = stats::status_distribution(&state.db, scope).await?;
    let task_priority_levels = stats::priority_distribution(&state.db, scope).await?;
    let last7_days = stats::completed_last_seven_days(&state.db, scope).await?;
    let recent_tasks = stats::recent_tasks(&state.db, scope, 10).await?;

    Ok(Json(json!({
        "statistics": statistics,
        "charts": {
            "taskDistribution": task_distribution,
            "taskPriorityLevels": task_priority_levels,
            "last7Days": last7_days,
        },
        "recentTasks": recent_tasks,
    })))
}
