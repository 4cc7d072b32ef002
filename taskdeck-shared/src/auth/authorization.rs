/// Authorization rules for roles and task access
///
/// Role-based access control is a single capability table: each
/// [`Action`] maps to the set of roles allowed to perform it. Task-level
/// access adds one resource check on top — members only see and act on
/// tasks they are assigned to.
///
/// Rules that depend on the resource (assignment, the target user's
/// role) are free functions here so route handlers stay declarative.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::Action;
/// use taskdeck_shared::models::user::Role;
///
/// assert!(Role::Admin.allows(Action::EditTask));
/// assert!(!Role::Member.allows(Action::EditTask));
/// assert!(!Role::Admin.allows(Action::ChangeRole));
/// ```

use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The actor's role does not permit the action
    #[error("Access denied: {0} role required")]
    RoleRequired(&'static str),

    /// The actor may not touch this specific resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Everything a role can be granted wholesale
///
/// Actions that also need a resource check (viewing a particular task,
/// deleting a particular user) pair an entry here with one of the
/// predicate functions below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// See every task, not just assigned ones
    ViewAllTasks,

    /// Create tasks and assign them
    CreateTask,

    /// Edit task fields (title, assignees, due date, ...)
    EditTask,

    /// Delete tasks
    DeleteTask,

    /// List users and view user details
    ManageUsers,

    /// Change another user's role
    ChangeRole,

    /// View the org-wide manager dashboard
    ViewManagerDashboard,

    /// Download spreadsheet exports
    ExportReports,
}

impl Role {
    /// The capability table
    ///
    /// Admins and managers are privileged for task and user operations;
    /// role changes and the manager dashboard are manager-only.
    pub fn allows(self, action: Action) -> bool {
        match action {
            Action::ViewAllTasks
            | Action::CreateTask
            | Action::EditTask
            | Action::DeleteTask
            | Action::ManageUsers
            | Action::ExportReports => matches!(self, Role::Admin | Role::Manager),

            Action::ChangeRole | Action::ViewManagerDashboard => matches!(self, Role::Manager),
        }
    }

    /// True for roles that see all tasks without an assignment check
    pub fn is_privileged(self) -> bool {
        self.allows(Action::ViewAllTasks)
    }
}

/// Requires a capability, for use with `?` in handlers
pub fn require(role: Role, action: Action) -> Result<(), AuthzError> {
    if role.allows(action) {
        return Ok(());
    }

    match action {
        Action::ChangeRole | Action::ViewManagerDashboard => {
            Err(AuthzError::RoleRequired("manager"))
        }
        _ => Err(AuthzError::RoleRequired("admin")),
    }
}

/// Can this user see this task?
///
/// Privileged roles see everything; members only tasks they are
/// assigned to.
pub fn can_view_task(role: Role, user_id: Uuid, task: &Task) -> bool {
    role.is_privileged() || task.is_assigned_to(user_id)
}

/// Can this user edit this task's fields?
///
/// Managers edit anything; otherwise only the task's creator may.
/// Handlers gate these routes on [`Action::EditTask`] first, so a
/// member creator never reaches this check.
pub fn can_edit_task(role: Role, user_id: Uuid, task: &Task) -> bool {
    matches!(role, Role::Manager) || task.created_by == user_id
}

/// Can this user delete this task? Same rule as editing.
pub fn can_delete_task(role: Role, user_id: Uuid, task: &Task) -> bool {
    can_edit_task(role, user_id, task)
}

/// Can this user move this task through its status lifecycle?
///
/// Looser than editing: assigned members may also update status and
/// checklist progress on their own tasks.
pub fn can_update_status(role: Role, user_id: Uuid, task: &Task) -> bool {
    role.is_privileged() || task.is_assigned_to(user_id)
}

/// Can `acting` delete the account with role `target`?
///
/// Managers can delete anyone. Admins can only delete members; removing
/// another admin or a manager requires a manager. Members delete nobody.
pub fn can_delete_user(acting: Role, target: Role) -> bool {
    match acting {
        Role::Manager => true,
        Role::Admin => matches!(target, Role::Member),
        Role::Member => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;
    use sqlx::types::Json;

    fn task_assigned_to(user_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Ship the release".to_string(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            due_date: None,
            progress: 0,
            assigned_to: vec![user_id],
            created_by: Uuid::new_v4(),
            checklist: Json(vec![]),
            attachments: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_capability_table_tasks() {
        for action in [
            Action::ViewAllTasks,
            Action::CreateTask,
            Action::EditTask,
            Action::DeleteTask,
            Action::ManageUsers,
            Action::ExportReports,
        ] {
            assert!(Role::Admin.allows(action), "admin should allow {:?}", action);
            assert!(Role::Manager.allows(action), "manager should allow {:?}", action);
            assert!(!Role::Member.allows(action), "member should deny {:?}", action);
        }
    }

    #[test]
    fn test_capability_table_manager_only() {
        for action in [Action::ChangeRole, Action::ViewManagerDashboard] {
            assert!(Role::Manager.allows(action));
            assert!(!Role::Admin.allows(action), "admin should deny {:?}", action);
            assert!(!Role::Member.allows(action));
        }
    }

    #[test]
    fn test_require_names_the_missing_role() {
        let err = require(Role::Member, Action::EditTask).unwrap_err();
        assert!(err.to_string().contains("admin"));

        let err = require(Role::Admin, Action::ChangeRole).unwrap_err();
        assert!(err.to_string().contains("manager"));

        assert!(require(Role::Manager, Action::ChangeRole).is_ok());
    }

    #[test]
    fn test_member_sees_only_assigned_tasks() {
        let user_id = Uuid::new_v4();
        let mine = task_assigned_to(user_id);
        let theirs = task_assigned_to(Uuid::new_v4());

        assert!(can_view_task(Role::Member, user_id, &mine));
        assert!(!can_view_task(Role::Member, user_id, &theirs));

        // Privileged roles see everything
        assert!(can_view_task(Role::Admin, user_id, &theirs));
        assert!(can_view_task(Role::Manager, user_id, &theirs));
    }

    #[test]
    fn test_editing_requires_creator_or_manager() {
        let user_id = Uuid::new_v4();
        let assigned = task_assigned_to(user_id);

        // Assignment alone grants nothing
        assert!(!can_edit_task(Role::Member, user_id, &assigned));
        assert!(!can_delete_task(Role::Member, user_id, &assigned));

        // Admins edit only what they created
        assert!(!can_edit_task(Role::Admin, user_id, &assigned));
        let mut created = task_assigned_to(Uuid::new_v4());
        created.created_by = user_id;
        assert!(can_edit_task(Role::Admin, user_id, &created));
        assert!(can_delete_task(Role::Admin, user_id, &created));

        // Managers edit everything
        assert!(can_edit_task(Role::Manager, user_id, &assigned));
    }

    #[test]
    fn test_status_updates_allow_assigned_members() {
        let user_id = Uuid::new_v4();
        let mine = task_assigned_to(user_id);
        let theirs = task_assigned_to(Uuid::new_v4());

        assert!(can_update_status(Role::Member, user_id, &mine));
        assert!(!can_update_status(Role::Member, user_id, &theirs));
        assert!(can_update_status(Role::Admin, user_id, &theirs));
    }

    #[test]
    fn test_delete_user_matrix() {
        // Managers can delete anyone
        assert!(can_delete_user(Role::Manager, Role::Member));
        assert!(can_delete_user(Role::Manager, Role::Admin));
        assert!(can_delete_user(Role::Manager, Role::Manager));

        // Admins can only delete members
        assert!(can_delete_user(Role::Admin, Role::Member));
        assert!(!can_delete_user(Role::Admin, Role::Admin));
        assert!(!can_delete_user(Role::Admin, Role::Manager));

        // Members delete nobody
        assert!(!can_delete_user(Role::Member, Role::Member));
    }
}
