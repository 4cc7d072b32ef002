//! Common test utilities for integration tests
//!
//! Shared infrastructure for integration tests:
//! - Test database setup (assumes a dedicated, disposable database)
//! - Test user creation per role
//! - JWT token generation
//! - Request helpers
//!
//! Tests using this module require `DATABASE_URL` and `JWT_SECRET` to
//! be set and are marked `#[ignore]` so the default test run stays
//! database-free.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::auth::jwt::{create_token, Claims};
use taskdeck_shared::auth::password::hash_password;
use taskdeck_shared::models::task::{ChecklistItem, CreateTask, Task, TaskPriority};
use taskdeck_shared::models::user::{CreateUser, Role, UpdateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Admin invite token wired into every test context
pub const ADMIN_INVITE: &str = "test-admin-invite";

/// Manager invite token wired into every test context
pub const MANAGER_INVITE: &str = "test-manager-invite";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context on a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let mut config = Config::from_env()?;

        // Fixed invite tokens so registration elevation is testable
        // regardless of the environment
        config.invites.admin_token = Some(ADMIN_INVITE.to_string());
        config.invites.manager_token = Some(MANAGER_INVITE.to_string());

        let db = PgPool::connect(&config.database.url).await?;

        // Path is relative to this crate's Cargo.toml
        sqlx::migrate!("../taskdeck-shared/migrations").run(&db).await?;

        // Start from a clean slate; the test database is disposable
        sqlx::query("TRUNCATE tasks, users").execute(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Creates a user with the given role and returns it with a token
    pub async fn create_user(&self, role: Role) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                name: format!("Test {:?}", role),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password("integration-password")?,
                role,
                profile_image_url: None,
            },
        )
        .await?;

        let token = create_token(&Claims::new(user.id), &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Puts a user on hold
    pub async fn put_on_hold(&self, user_id: Uuid) -> anyhow::Result<()> {
        User::update(
            &self.db,
            user_id,
            UpdateUser {
                is_on_hold: Some(true),
                ..UpdateUser::default()
            },
        )
        .await?;
        Ok(())
    }

    /// Creates a task directly in the database
    pub async fn create_task(
        &self,
        title: &str,
        created_by: Uuid,
        assigned_to: Vec<Uuid>,
        checklist: Vec<ChecklistItem>,
    ) -> anyhow::Result<Task> {
        let task = Task::create(
            &self.db,
            CreateTask {
                title: title.to_string(),
                description: String::new(),
                priority: TaskPriority::Medium,
                due_date: None,
                assigned_to,
                created_by,
                checklist,
                attachments: Vec::new(),
            },
        )
        .await?;

        Ok(task)
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app.clone().call(request).await?;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok((status, json))
    }

    /// Sends a request and returns status, content type, and raw body
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
    ) -> anyhow::Result<(StatusCode, Option<String>, Vec<u8>)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let response = self.app.clone().call(builder.body(Body::empty())?).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok((status, content_type, bytes.to_vec()))
    }
}
