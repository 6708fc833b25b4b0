//! Common test utilities for codex-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use codex_core::{Role, StorePack, User, UserId};
use codex_service::{create_router, AppState, ServiceConfig};
use codex_store::{RocksStore, Store};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store handle for seeding and assertions.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_base_url: "http://localhost".into(),
            auth_audience: "codex".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            store,
            _temp_dir: temp_dir,
            test_user_id,
        }
    }

    /// Get the authorization header for user authentication.
    pub fn user_auth_header(&self) -> String {
        format!("Bearer test-token:{}", self.test_user_id)
    }

    /// Get the authorization header for an arbitrary user.
    pub fn auth_header_for(user_id: &UserId) -> String {
        format!("Bearer test-token:{user_id}")
    }

    /// Sync the test user so progression mutations can resolve them.
    pub async fn sync_test_user(&self) {
        self.server
            .post("/api/users/sync")
            .add_header("authorization", self.user_auth_header())
            .json(&serde_json::json!({ "handle": "kaz" }))
            .await
            .assert_status_ok();
    }

    /// Seed an admin user directly in the store.
    pub fn seed_admin(&self) -> UserId {
        let mut admin = User::new(UserId::generate(), "overseer".into());
        admin.role = Role::Admin;
        self.store.put_user(&admin).expect("Failed to seed admin");
        admin.id
    }

    /// Seed a coin-priced store pack.
    pub fn seed_pack(&self, id: &str, price_coins: i64) {
        let pack = StorePack::priced_in_coins(id.to_string(), format!("{id} pack"), price_coins, 5);
        self.store.put_pack(&pack).expect("Failed to seed pack");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
