/// Dashboard aggregation queries
///
/// Read-only rollups over the `users` and `tasks` tables backing the
/// dashboard and manager-stats endpoints. Everything here degrades to
/// zero-filled structures on empty input; no query in this module errors
/// on "no tasks" or "no assignees".
///
/// Scoping convention: functions taking `scoped_assignee` count all tasks
/// when given `None` (privileged viewers) and only tasks assigned to the
/// given user otherwise.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::{TaskPriority, TaskStatus};

/// Headline counters for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCounts {
    /// All tasks in scope
    pub total_tasks: i64,

    /// Pending tasks
    pub pending_tasks: i64,

    /// Completed tasks
    pub completed_tasks: i64,

    /// Due date passed and not completed
    pub overdue_tasks: i64,
}

/// One entry of the last-7-days completion chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCount {
    /// Weekday label ("Mon", "Tue", ...)
    pub name: String,

    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    /// Tasks completed on that day
    pub count: i64,
}

/// Trimmed task row for the recent-tasks panel
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentTask {
    /// Task ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Due date
    pub due_date: Option<chrono::DateTime<Utc>>,

    /// Creation time
    pub created_at: chrono::DateTime<Utc>,
}

/// Per-user count for workload rankings, enriched with the display name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntry {
    /// Assignee display name
    pub name: String,

    /// Task count in the ranked category
    pub count: i64,
}

/// Top-performer row with full display enrichment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformer {
    /// Assignee user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email
    pub email: String,

    /// Profile picture URL
    pub profile_image_url: Option<String>,

    /// Department
    pub department: String,

    /// Completed-task count
    pub count: i64,
}

/// Assigned-task counters for one user (user list enrichment)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserTaskCounts {
    /// User ID
    pub id: Uuid,

    /// Pending assigned tasks
    pub pending_tasks: i64,

    /// In Progress assigned tasks
    pub in_progress_tasks: i64,

    /// Completed assigned tasks
    pub completed_tasks: i64,
}

/// Headline counters for the manager dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ManagerCounts {
    /// All users
    pub total_users: i64,

    /// Users with the admin role
    pub total_admins: i64,

    /// Users with the manager role
    pub total_managers: i64,

    /// All tasks
    pub total_tasks: i64,

    /// Completed tasks
    pub completed_tasks: i64,

    /// Pending tasks
    pub pending_tasks: i64,

    /// In Progress tasks
    pub in_progress_tasks: i64,
}

/// Per-user performance row for the manager dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserPerformance {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email
    pub email: String,

    /// Role as wire string
    pub role: super::user::Role,

    /// Profile picture URL
    pub profile_image_url: Option<String>,

    /// Tasks assigned to the user
    pub assigned_count: i64,

    /// Tasks created by the user
    pub created_count: i64,

    /// Assigned tasks the user completed
    pub completed_assigned: i64,

    /// `round(100 * completed_assigned / assigned_count)`, 0 when nothing assigned
    pub completion_rate: i64,
}

/// Created-task rollup for an admin/manager detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorStats {
    /// Tasks the user created
    pub total_created: i64,

    /// Created tasks currently Pending
    pub pending: i64,

    /// Created tasks currently In Progress
    pub in_progress: i64,

    /// Created tasks currently Completed
    pub completed: i64,

    /// 1-based rank among creators by completed-task count (last place
    /// when the user has no completed created tasks)
    pub rank: i64,
}

/// Computes the headline counters
///
/// Overdue means the due date has passed and the task is not Completed.
pub async fn overview(
    pool: &PgPool,
    scoped_assignee: Option<Uuid>,
) -> Result<OverviewCounts, sqlx::Error> {
    let counts = sqlx::query_as::<_, OverviewCounts>(
        r#"
        SELECT COUNT(*) AS total_tasks,
               COUNT(*) FILTER (WHERE status = 'Pending') AS pending_tasks,
               COUNT(*) FILTER (WHERE status = 'Completed') AS completed_tasks,
               COUNT(*) FILTER (WHERE status <> 'Completed' AND due_date < NOW()) AS overdue_tasks
        FROM tasks
        WHERE ($1::uuid IS NULL OR $1 = ANY(assigned_to))
        "#,
    )
    .bind(scoped_assignee)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

/// Status distribution as a chart map
///
/// Keys are the status names without spaces ("Pending", "InProgress",
/// "Completed") plus an "All" total; every key is present even at zero.
pub async fn status_distribution(
    pool: &PgPool,
    scoped_assignee: Option<Uuid>,
) -> Result<Map<String, Value>, sqlx::Error> {
    let rows: Vec<(TaskStatus, i64)> = sqlx::query_as(
        r#"
        SELECT status, COUNT(*) FROM tasks
        WHERE ($1::uuid IS NULL OR $1 = ANY(assigned_to))
        GROUP BY status
        "#,
    )
    .bind(scoped_assignee)
    .fetch_all(pool)
    .await?;

    Ok(status_distribution_map(&rows))
}

/// Priority distribution as a chart map, every priority present
pub async fn priority_distribution(
    pool: &PgPool,
    scoped_assignee: Option<Uuid>,
) -> Result<Map<String, Value>, sqlx::Error> {
    let rows: Vec<(TaskPriority, i64)> = sqlx::query_as(
        r#"
        SELECT priority, COUNT(*) FROM tasks
        WHERE ($1::uuid IS NULL OR $1 = ANY(assigned_to))
        GROUP BY priority
        "#,
    )
    .bind(scoped_assignee)
    .fetch_all(pool)
    .await?;

    Ok(priority_distribution_map(&rows))
}

/// Zero-fills a status count map from grouped rows
pub fn status_distribution_map(rows: &[(TaskStatus, i64)]) -> Map<String, Value> {
    let mut map = Map::new();
    let mut total = 0i64;

    for status in TaskStatus::ALL {
        let count = rows
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, c)| *c)
            .unwrap_or(0);
        total += count;
        map.insert(status.chart_key().to_string(), Value::from(count));
    }

    map.insert("All".to_string(), Value::from(total));
    map
}

/// Zero-fills a priority count map from grouped rows
pub fn priority_distribution_map(rows: &[(TaskPriority, i64)]) -> Map<String, Value> {
    let mut map = Map::new();

    for priority in TaskPriority::ALL {
        let count = rows
            .iter()
            .find(|(p, _)| *p == priority)
            .map(|(_, c)| *c)
            .unwrap_or(0);
        map.insert(priority.as_str().to_string(), Value::from(count));
    }

    map
}

/// Completed-task counts per calendar day over the last 7 days
///
/// Always returns exactly 7 entries ending today, chronologically
/// ordered and zero-filled. Completion day is the task's last update.
pub async fn completed_last_seven_days(
    pool: &PgPool,
    scoped_assignee: Option<Uuid>,
) -> Result<Vec<DayCount>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT to_char(updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS day, COUNT(*)
        FROM tasks
        WHERE status = 'Completed'
          AND updated_at >= NOW() - INTERVAL '7 days'
          AND ($1::uuid IS NULL OR $1 = ANY(assigned_to))
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(scoped_assignee)
    .fetch_all(pool)
    .await?;

    Ok(fill_last_seven_days(&rows, Utc::now().date_naive()))
}

/// Zero-fills the 7-day window ending at `today`
pub fn fill_last_seven_days(rows: &[(String, i64)], today: NaiveDate) -> Vec<DayCount> {
    (0..7)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let date = day.format("%Y-%m-%d").to_string();
            let count = rows
                .iter()
                .find(|(d, _)| *d == date)
                .map(|(_, c)| *c)
                .unwrap_or(0);

            DayCount {
                name: day.format("%a").to_string(),
                date,
                count,
            }
        })
        .collect()
}

/// The most recently created tasks in scope
pub async fn recent_tasks(
    pool: &PgPool,
    scoped_assignee: Option<Uuid>,
    limit: i64,
) -> Result<Vec<RecentTask>, sqlx::Error> {
    let tasks = sqlx::query_as::<_, RecentTask>(
        r#"
        SELECT id, title, status, priority, due_date, created_at
        FROM tasks
        WHERE ($1::uuid IS NULL OR $1 = ANY(assigned_to))
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(scoped_assignee)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Task counts per department
///
/// Each task counts once per assignee; assignees are resolved to their
/// department, empty departments grouped under "Other". Tasks with no
/// assignees (or only dangling assignee ids) do not appear.
pub async fn tasks_by_department(pool: &PgPool) -> Result<Map<String, Value>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT COALESCE(NULLIF(u.department, ''), 'Other') AS department, COUNT(*)
        FROM tasks t
        CROSS JOIN LATERAL unnest(t.assigned_to) AS a(user_id)
        JOIN users u ON u.id = a.user_id
        GROUP BY 1
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut map = Map::new();
    for (department, count) in rows {
        map.insert(department, Value::from(count));
    }
    Ok(map)
}

/// Top active workloads: assignees ranked by Pending/In Progress count
pub async fn active_workload(pool: &PgPool, limit: i64) -> Result<Vec<WorkloadEntry>, sqlx::Error> {
    let entries = sqlx::query_as::<_, WorkloadEntry>(
        r#"
        SELECT u.name, COUNT(*) AS count
        FROM tasks t
        CROSS JOIN LATERAL unnest(t.assigned_to) AS a(user_id)
        JOIN users u ON u.id = a.user_id
        WHERE t.status IN ('Pending', 'In Progress')
        GROUP BY u.id, u.name
        ORDER BY count DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Top performers: assignees ranked by completed-task count
pub async fn top_performers(pool: &PgPool, limit: i64) -> Result<Vec<TopPerformer>, sqlx::Error> {
    let performers = sqlx::query_as::<_, TopPerformer>(
        r#"
        SELECT u.id, u.name, u.email, u.profile_image_url, u.department, COUNT(*) AS count
        FROM tasks t
        CROSS JOIN LATERAL unnest(t.assigned_to) AS a(user_id)
        JOIN users u ON u.id = a.user_id
        WHERE t.status = 'Completed'
        GROUP BY u.id
        ORDER BY count DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(performers)
}

/// Assigned-task counters for every user, in one round trip
pub async fn user_task_counts(pool: &PgPool) -> Result<Vec<UserTaskCounts>, sqlx::Error> {
    let counts = sqlx::query_as::<_, UserTaskCounts>(
        r#"
        SELECT u.id,
               COUNT(t.id) FILTER (WHERE t.status = 'Pending') AS pending_tasks,
               COUNT(t.id) FILTER (WHERE t.status = 'In Progress') AS in_progress_tasks,
               COUNT(t.id) FILTER (WHERE t.status = 'Completed') AS completed_tasks
        FROM users u
        LEFT JOIN tasks t ON u.id = ANY(t.assigned_to)
        GROUP BY u.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

/// Headline counters for the manager dashboard
pub async fn manager_counts(pool: &PgPool) -> Result<ManagerCounts, sqlx::Error> {
    let counts = sqlx::query_as::<_, ManagerCounts>(
        r#"
        SELECT (SELECT COUNT(*) FROM users) AS total_users,
               (SELECT COUNT(*) FROM users WHERE role = 'admin') AS total_admins,
               (SELECT COUNT(*) FROM users WHERE role = 'manager') AS total_managers,
               (SELECT COUNT(*) FROM tasks) AS total_tasks,
               (SELECT COUNT(*) FROM tasks WHERE status = 'Completed') AS completed_tasks,
               (SELECT COUNT(*) FROM tasks WHERE status = 'Pending') AS pending_tasks,
               (SELECT COUNT(*) FROM tasks WHERE status = 'In Progress') AS in_progress_tasks
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

/// Per-user performance rows for the manager dashboard
pub async fn user_performance(pool: &PgPool) -> Result<Vec<UserPerformance>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserPerformance>(
        r#"
        SELECT u.id, u.name, u.email, u.role, u.profile_image_url,
               (SELECT COUNT(*) FROM tasks WHERE u.id = ANY(assigned_to)) AS assigned_count,
               (SELECT COUNT(*) FROM tasks WHERE created_by = u.id) AS created_count,
               (SELECT COUNT(*) FROM tasks
                WHERE u.id = ANY(assigned_to) AND status = 'Completed') AS completed_assigned,
               CASE
                   WHEN (SELECT COUNT(*) FROM tasks WHERE u.id = ANY(assigned_to)) = 0 THEN 0
                   ELSE ROUND(
                       100.0 * (SELECT COUNT(*) FROM tasks
                                WHERE u.id = ANY(assigned_to) AND status = 'Completed')
                       / (SELECT COUNT(*) FROM tasks WHERE u.id = ANY(assigned_to))
                   )::bigint
               END AS completion_rate
        FROM users u
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Created-task rollup and completed-count rank for one creator
pub async fn creator_stats(pool: &PgPool, user_id: Uuid) -> Result<CreatorStats, sqlx::Error> {
    let (total_created, pending, in_progress, completed): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COUNT(*) FILTER (WHERE status = 'Pending'),
               COUNT(*) FILTER (WHERE status = 'In Progress'),
               COUNT(*) FILTER (WHERE status = 'Completed')
        FROM tasks
        WHERE created_by = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    // Creators with completed tasks, best first
    let ranking: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT created_by FROM tasks
        WHERE status = 'Completed'
        GROUP BY created_by
        ORDER BY COUNT(*) DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let rank = ranking
        .iter()
        .position(|(id,)| *id == user_id)
        .map(|index| index as i64 + 1)
        .unwrap_or(ranking.len() as i64 + 1);

    Ok(CreatorStats {
        total_created,
        pending,
        in_progress,
        completed,
        rank,
    })
}

/// Distinct creators of the tasks assigned to a user
pub async fn creators_for_assignee(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<super::user::UserSummary>, sqlx::Error> {
    let creators = sqlx::query_as::<_, super::user::UserSummary>(
        r#"
        SELECT DISTINCT u.id, u.name, u.email, u.profile_image_url, u.department
        FROM tasks t
        JOIN users u ON u.id = t.created_by
        WHERE $1 = ANY(t.assigned_to)
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(creators)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_last_seven_days_empty_input() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let days = fill_last_seven_days(&[], today);

        assert_eq!(days.len(), 7);
        assert!(days.iter().all(|d| d.count == 0));
        assert_eq!(days[0].date, "2025-06-09");
        assert_eq!(days[6].date, "2025-06-15");
    }

    #[test]
    fn test_fill_last_seven_days_chronological_and_matched() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let rows = vec![
            ("2025-06-10".to_string(), 3),
            ("2025-06-15".to_string(), 1),
        ];
        let days = fill_last_seven_days(&rows, today);

        assert_eq!(days.len(), 7);
        assert_eq!(days[1].date, "2025-06-10");
        assert_eq!(days[1].count, 3);
        assert_eq!(days[6].count, 1);
        // Strictly ascending dates
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_fill_last_seven_days_weekday_names() {
        // 2025-06-15 is a Sunday
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let days = fill_last_seven_days(&[], today);
        assert_eq!(days[6].name, "Sun");
        assert_eq!(days[0].name, "Mon");
    }

    #[test]
    fn test_status_distribution_map_zero_fills() {
        let map = status_distribution_map(&[(TaskStatus::Completed, 4)]);
        assert_eq!(map["Pending"], 0);
        assert_eq!(map["InProgress"], 0);
        assert_eq!(map["Completed"], 4);
        assert_eq!(map["All"], 4);
    }

    #[test]
    fn test_status_distribution_map_empty() {
        let map = status_distribution_map(&[]);
        assert_eq!(map["All"], 0);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_priority_distribution_map_zero_fills() {
        let map = priority_distribution_map(&[(TaskPriority::High, 2), (TaskPriority::Low, 1)]);
        assert_eq!(map["Low"], 1);
        assert_eq!(map["Medium"], 0);
        assert_eq!(map["High"], 2);
    }
}
