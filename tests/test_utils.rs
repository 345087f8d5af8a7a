#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use portfolio_api::{
    db::postgres::{create_pool, run_migrations},
    routes::{configure_routes, json_config},
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use sqlx::PgPool;
use std::{net::TcpListener, time::Duration};
use uuid::Uuid;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "test-admin-pass";

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub client: Client,
}

impl TestApp {
    /// Spawns the API against `APP_TEST_DATABASE_URL`; `None` when it is not set.
    pub async fn spawn() -> Option<Self> {
        let Ok(database_url) = std::env::var("APP_TEST_DATABASE_URL") else {
            eprintln!("APP_TEST_DATABASE_URL not set; skipping database test");
            return None;
        };
        let config = test_config(database_url);

        let db_pool = create_pool(&config.database_url)
            .await
            .expect("Failed to create test DB pool");

        run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = web::Data::new(AppState::new(&config, db_pool.clone(), Client::new()));
        let json_limit = config.json_limit_bytes;

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(json_config(json_limit))
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .disable_signals()
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Some(Self {
            address,
            db_pool,
            client,
        })
    }

    pub fn admin(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(ADMIN_USER, Some(ADMIN_PASS))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Creates a project through the admin API and returns its JSON.
    pub async fn create_project(&self, slug: &str) -> Value {
        let response = self
            .admin(self.client.post(self.url("/admin/projects")))
            .json(&serde_json::json!({
                "title": format!("Project {}", slug),
                "slug": slug,
                "summary": "Integration fixture",
                "techStack": "Rust, Postgres",
            }))
            .send()
            .await
            .expect("Failed to create project");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("Invalid project response");
        body["project"].clone()
    }

    pub async fn add_media(&self, project_id: &str, url: &str) -> Value {
        let response = self
            .admin(self.client.post(self.url(&format!("/admin/projects/{}/media", project_id))))
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .expect("Failed to add media");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("Invalid media response");
        body["media"].clone()
    }

    pub async fn media_count(&self, project_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM media WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count media")
    }
}

/// Slug unique to one test run, so tests can share a database.
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio-API Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url,
        cors_allowed_origins: vec!["*".to_string()],
        admin_user: ADMIN_USER.to_string(),
        admin_pass: ADMIN_PASS.to_string(),
        supabase_url: None,
        supabase_service_role: None,
        supabase_bucket: None,
        json_limit_bytes: 2 * 1024 * 1024,
    }
}

pub fn basic_header(user: &str, pass: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", user, pass)))
}
