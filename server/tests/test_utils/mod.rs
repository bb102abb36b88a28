use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use uuid::Uuid;

use cirrus_server_lib::account_service;
use cirrus_server_lib::config::{Config, FilesDbConfig, IndexDbConf, ServerConfig};
use cirrus_server_lib::content::file_content_client::InMemoryStore;
use cirrus_server_lib::schema::DriveDb;
use cirrus_server_lib::session_service::{Session, SessionStore};
use cirrus_server_lib::ServerState;
use cirrus_shared::api::SignupRequest;

pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

pub fn test_state() -> (ServerState, Arc<InMemoryStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_location = dir.path().join("index_db").to_string_lossy().to_string();
    let log_path = dir.path().join("logs").to_string_lossy().to_string();

    let config = Config {
        index_db: IndexDbConf { db_location: db_location.clone() },
        files_db: FilesDbConfig {
            scheme: None,
            host: None,
            port: None,
            region: "test".to_string(),
            bucket: "cirrus".to_string(),
            access_key: "unused".to_string(),
            secret_key: "unused".to_string(),
            public_endpoint: "https://storage.test".to_string(),
        },
        server: ServerConfig {
            port: 0,
            log_path,
            session_ttl_secs: SESSION_TTL.as_secs(),
            session_sweep_secs: 60 * 60,
            credential_ttl_secs: 60 * 30,
        },
        billing: None,
    };

    let index_db = DriveDb::init(&db_location).unwrap();
    let files_db = Arc::new(InMemoryStore::default());

    let state = ServerState {
        config,
        index_db,
        sessions: Arc::new(SessionStore::new(SESSION_TTL)),
        files_db: files_db.clone(),
        stripe_client: None,
    };

    (state, files_db, dir)
}

pub async fn signed_up_user(state: &ServerState, email: &str) -> (Uuid, String, Session) {
    let (identity, token) = account_service::signup(
        state,
        SignupRequest {
            name: "probe".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        },
    )
    .await
    .unwrap();

    let session = state.sessions.get(&token).unwrap();
    (identity.id, token, session)
}

pub fn random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}
