/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, profile)
/// - `users`: User management endpoints
/// - `tasks`: Task registry and dashboard endpoints
/// - `reports`: Spreadsheet exports

pub mod health;
pub mod auth;
pub mod users;
pub mod tasks;
pub mod reports;
