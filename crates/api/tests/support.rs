//! Shared fixtures for API route tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use helmdesk_api::{router, AppContext};
use helmdesk_domain::{Config, DatabaseConfig, DebitPolicy, ServerConfig};
use helmdesk_infra::DbManager;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

/// Router plus the context and tempdir backing it.
pub struct TestApp {
    pub router: Router,
    pub ctx: AppContext,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("helmdesk.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.to_string_lossy().into_owned(),
                pool_size: 4,
            },
            server: ServerConfig { bind_addr: "127.0.0.1:0".to_string() },
            debit: DebitPolicy::default(),
        };

        let db = Arc::new(
            DbManager::new(&config.database.path, config.database.pool_size)
                .expect("db manager created"),
        );
        db.run_migrations().expect("migrations run");

        let ctx = AppContext::with_db(db, &config).expect("context wired");

        Self {
            router: router(ctx.clone()),
            ctx,
            tenant_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            _temp_dir: temp_dir,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-tenant-id", self.tenant_id.to_string())
            .header("x-user-id", self.user_id.to_string());

        let request = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                builder
                    .body(Body::from(serde_json::to_vec(&json).expect("body serialises")))
                    .expect("request built")
            }
            None => builder.body(Body::empty()).expect("request built"),
        };

        self.router.clone().oneshot(request).await.expect("handler ran")
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collected");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
