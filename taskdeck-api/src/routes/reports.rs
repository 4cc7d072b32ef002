/// Spreadsheet export endpoints
///
/// # Endpoints
///
/// - `GET /api/reports/export/tasks` - One row per task
/// - `GET /api/reports/export/users` - One row per user with task counts
///
/// Both return a generated `.xlsx` as an attachment. Workbooks are
/// built in memory; these exports are small enough that streaming
/// would buy nothing.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Extension,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use taskdeck_shared::{
    auth::{
        authorization::{self, Action},
        middleware::CurrentUser,
    },
    models::{
        stats::{self, UserTaskCounts},
        task::Task,
        user::{User, UserSummary},
    },
};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Builds the headers for an xlsx attachment download
fn attachment_headers(filename: &str) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(XLSX_CONTENT_TYPE),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .map_err(|e| ApiError::InternalError(format!("Invalid header: {}", e)))?,
    );
    Ok(headers)
}

/// Writes the bold header row
fn write_header_row(worksheet: &mut Worksheet, columns: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, title) in columns.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *title, &bold)?;
    }
    Ok(())
}

/// Writes one row per task, assignees rendered as "Name (email)"
fn write_task_rows(
    worksheet: &mut Worksheet,
    tasks: &[Task],
    summaries: &[UserSummary],
) -> Result<(), XlsxError> {
    for (row, task) in tasks.iter().enumerate() {
        let row = (row + 1) as u32;

        let assigned: Vec<String> = task
            .assigned_to
            .iter()
            .filter_map(|id| summaries.iter().find(|s| s.id == *id))
            .map(|s| format!("{} ({})", s.name, s.email))
            .collect();
        let assigned = if assigned.is_empty() {
            "Unassigned".to_string()
        } else {
            assigned.join(", ")
        };

        worksheet.write(row, 0, task.id.to_string())?;
        worksheet.write(row, 1, task.title.as_str())?;
        worksheet.write(row, 2, task.description.as_str())?;
        worksheet.write(row, 3, task.priority.as_str())?;
        worksheet.write(row, 4, task.status.as_str())?;
        worksheet.write(
            row,
            5,
            task.due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        )?;
        worksheet.write(row, 6, assigned)?;
    }

    Ok(())
}

/// Writes one row per user with their assigned-task counters
fn write_user_rows(
    worksheet: &mut Worksheet,
    users: &[User],
    counts: &[UserTaskCounts],
) -> Result<(), XlsxError> {
    for (row, user) in users.iter().enumerate() {
        let row = (row + 1) as u32;
        let (pending, in_progress, completed) = counts
            .iter()
            .find(|c| c.id == user.id)
            .map(|c| (c.pending_tasks, c.in_progress_tasks, c.completed_tasks))
            .unwrap_or((0, 0, 0));

        worksheet.write(row, 0, user.name.as_str())?;
        worksheet.write(row, 1, user.email.as_str())?;
        worksheet.write(row, 2, user.role.as_str())?;
        worksheet.write(row, 3, pending + in_progress + completed)?;
        worksheet.write(row, 4, pending)?;
        worksheet.write(row, 5, in_progress)?;
        worksheet.write(row, 6, completed)?;
    }

    Ok(())
}

/// Export all tasks as a spreadsheet
///
/// Assignees render as a comma-separated "Name (email)" list, falling
/// back to "Unassigned" for tasks with no resolvable assignee.
pub async fn export_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<(HeaderMap, Vec<u8>)> {
    authorization::require(current.0.role, Action::ExportReports)?;

    let tasks = Task::list(&state.db, &Default::default()).await?;

    // Resolve every assignee id in one query
    let assignee_ids: Vec<uuid::Uuid> = tasks
        .iter()
        .flat_map(|t| t.assigned_to.iter().copied())
        .collect();
    let summaries = User::summaries(&state.db, &assignee_ids).await?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name("Tasks Report")
        .and_then(|ws| {
            write_header_row(
                ws,
                &["Task ID", "Title", "Description", "Priority", "Status", "Due Date", "Assigned To"],
            )
        })
        .map_err(|e| ApiError::InternalError(format!("Spreadsheet error: {}", e)))?;
    write_task_rows(worksheet, &tasks, &summaries)
        .map_err(|e| ApiError::InternalError(format!("Spreadsheet error: {}", e)))?;

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ApiError::InternalError(format!("Spreadsheet error: {}", e)))?;

    Ok((attachment_headers("tasks_report.xlsx")?, buffer))
}

/// Export all users with their assigned-task counts
pub async fn export_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<(HeaderMap, Vec<u8>)> {
    authorization::require(current.0.role, Action::ExportReports)?;

    let users = User::list(&state.db).await?;
    let counts = stats::user_task_counts(&state.db).await?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name("Users Report")
        .and_then(|ws| {
            write_header_row(
                ws,
                &["Name", "Email", "Role", "Total Assigned Tasks", "Pending Tasks", "In Progress Tasks", "Completed Tasks"],
            )
        })
        .map_err(|e| ApiError::InternalError(format!("Spreadsheet error: {}", e)))?;
    write_user_rows(worksheet, &users, &counts)
        .map_err(|e| ApiError::InternalError(format!("Spreadsheet error: {}", e)))?;

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ApiError::InternalError(format!("Spreadsheet error: {}", e)))?;

    Ok((attachment_headers("users_report.xlsx")?, buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_headers() {
        let headers = attachment_headers("tasks_report.xlsx").unwrap();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            XLSX_CONTENT_TYPE
        );
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"tasks_report.xlsx\""
        );
    }

    #[test]
    fn test_empty_workbook_builds() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        write_header_row(worksheet, &["A", "B"]).unwrap();
        write_task_rows(worksheet, &[], &[]).unwrap();
        assert!(!workbook.save_to_buffer().unwrap().is_empty());
    }
}
