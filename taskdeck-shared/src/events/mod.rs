/// Domain events raised by task state transitions
///
/// The only event today is [`TaskCompleted`], raised after a task's
/// status reaches Completed. Its handler releases the hold flag on
/// assignees whose last open task just closed.
///
/// Handlers run in-process after the triggering write commits, with no
/// surrounding transaction. A crash between the status write and the
/// hold release leaves the hold in place until the user's next task
/// completes; that is accepted over coupling unrelated writes.

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::User;

/// Raised when a task transitions into the Completed status
///
/// Carries the assignee set as of the transition; later edits to the
/// task do not retroactively change who gets a hold check.
#[derive(Debug, Clone)]
pub struct TaskCompleted {
    /// The task that completed
    pub task_id: Uuid,

    /// Assignees at completion time
    pub assignees: Vec<Uuid>,
}

impl TaskCompleted {
    /// Releases holds for assignees with no remaining open tasks
    ///
    /// Each assignee is handled independently: a failure for one is
    /// logged and skipped, the rest still get their check. Returns the
    /// ids whose holds were released.
    pub async fn release_holds(&self, pool: &PgPool) -> Vec<Uuid> {
        let on_hold = match User::find_on_hold(pool, &self.assignees).await {
            Ok(users) => users,
            Err(e) => {
                warn!(task_id = %self.task_id, error = %e, "Hold release lookup failed");
                return Vec::new();
            }
        };

        let mut released = Vec::new();

        for user in on_hold {
            let open = match Task::count_open_for_assignee(pool, user.id).await {
                Ok(count) => count,
                Err(e) => {
                    warn!(user_id = %user.id, error = %e, "Open task count failed");
                    continue;
                }
            };

            if open > 0 {
                continue;
            }

            match User::release_hold(pool, user.id).await {
                Ok(true) => {
                    info!(user_id = %user.id, task_id = %self.task_id, "Released user hold");
                    released.push(user.id);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(user_id = %user.id, error = %e, "Hold release failed");
                }
            }
        }

        released
    }
}
