/// User management endpoints
///
/// # Endpoints
///
/// - `GET /api/users` - All users with assigned-task counts
/// - `GET /api/users/manager-dashboard-stats` - Org-wide stats (manager)
/// - `GET /api/users/:id` - User detail with role-dependent task view
/// - `PUT /api/users/:id` - Update a user
/// - `DELETE /api/users/:id` - Delete a user
///
/// All routes require authentication; everything except `GET /:id` for
/// your own account additionally requires a privileged role.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use taskdeck_shared::{
    auth::{
        authorization::{self, Action},
        middleware::CurrentUser,
    },
    models::{
        stats,
        task::Task,
        user::{Role, UpdateUser, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// User update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New role (manager only)
    pub role: Option<Role>,

    /// New department
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,

    /// Set or clear the hold flag
    pub is_on_hold: Option<bool>,

    /// New profile image URL
    pub profile_image_url: Option<String>,
}

/// List all users with their assigned-task counts
///
/// Counts are fetched in one aggregate query and stitched onto the
/// serialized user objects.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    authorization::require(current.0.role, Action::ManageUsers)?;

    let users = User::list(&state.db).await?;
    let counts = stats::user_task_counts(&state.db).await?;

    let enriched: Vec<Value> = users
        .into_iter()
        .map(|user| {
            let user_counts = counts.iter().find(|c| c.id == user.id);
            let mut value = serde_json::to_value(&user).unwrap_or_default();

            if let Value::Object(ref mut map) = value {
                let (pending, in_progress, completed) = user_counts
                    .map(|c| (c.pending_tasks, c.in_progress_tasks, c.completed_tasks))
                    .unwrap_or((0, 0, 0));
                map.insert("pendingTasks".to_string(), json!(pending));
                map.insert("inProgressTasks".to_string(), json!(in_progress));
                map.insert("completedTasks".to_string(), json!(completed));
            }

            value
        })
        .collect();

    Ok(Json(Value::Array(enriched)))
}

/// Get one user with a role-dependent task view
///
/// For admin and manager targets the detail shows the tasks they
/// created, a created-task rollup, and their completed-count rank. For
/// members it shows the tasks assigned to them and the distinct people
/// who created those tasks. The response shape is fixed: `admins` and
/// `adminStats` are always present, empty or null when the role does
/// not use them.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    // Users may always view themselves
    if current.0.id != id {
        authorization::require(current.0.role, Action::ManageUsers)?;
    }

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let body = match user.role {
        Role::Admin | Role::Manager => {
            let tasks = Task::list_created_by(&state.db, id).await?;
            let admin_stats = stats::creator_stats(&state.db, id).await?;
            json!({
                "user": user,
                "tasks": tasks,
                "admins": [],
                "adminStats": admin_stats,
            })
        }
        Role::Member => {
            let tasks = Task::list_assigned_to(&state.db, id).await?;
            let admins = stats::creators_for_assignee(&state.db, id).await?;
            json!({
                "user": user,
                "tasks": tasks,
                "admins": admins,
                "adminStats": Value::Null,
            })
        }
    };

    Ok(Json(body))
}

/// Update a user
///
/// Privileged roles may edit profile fields and the hold flag; changing
/// a role is manager-only and returns 403 for admins.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    authorization::require(current.0.role, Action::ManageUsers)?;
    req.validate()?;

    if req.role.is_some() {
        authorization::require(current.0.role, Action::ChangeRole)?;
    }

    let update = UpdateUser {
        name: req.name,
        email: req.email,
        role: req.role,
        department: req.department,
        is_on_hold: req.is_on_hold,
        profile_image_url: req.profile_image_url,
        ..UpdateUser::default()
    };

    let user = User::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Delete a user
///
/// Managers can delete anyone; admins only members. Tasks referencing
/// the deleted user keep their dangling id.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    authorization::require(current.0.role, Action::ManageUsers)?;

    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !authorization::can_delete_user(current.0.role, target.role) {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this user".to_string(),
        ));
    }

    User::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// Manager dashboard statistics
///
/// Org-wide totals plus a per-user performance table.
pub async fn manager_dashboard_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Value>> {
    authorization::require(current.0.role, Action::ViewManagerDashboard)?;

    let counts = stats::manager_counts(&state.db).await?;
    let user_performance = stats::user_performance(&state.db).await?;

    Ok(Json(json!({
        "counts": counts,
        "userPerformance": user_performance,
    })))
}
