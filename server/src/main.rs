use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use cirrus_server_lib::config::Config;
use cirrus_server_lib::content::file_content_client;
use cirrus_server_lib::session_service::{self, SessionStore};
use cirrus_server_lib::{loggers, router_service, schema, ServerState};

#[tokio::main]
async fn main() {
    let config = Config::from_env_vars();
    loggers::init(&config);

    let index_db = schema::DriveDb::init(&config.index_db.db_location)
        .expect("Failed to load index_db");

    let files_db =
        file_content_client::create_client(&config.files_db).expect("Failed to create files_db client");

    let sessions = Arc::new(SessionStore::new(Duration::from_secs(
        config.server.session_ttl_secs,
    )));

    let stripe_client = config
        .billing
        .as_ref()
        .map(|billing| stripe::Client::new(billing.stripe_secret.clone()));

    let port = config.server.port;
    let server_state = Arc::new(ServerState {
        config,
        index_db,
        sessions,
        files_db: Arc::new(files_db),
        stripe_client,
    });

    session_service::spawn_sweeper(&server_state);

    let routes = router_service::routes(&server_state);

    info!("cirrus server {} serving on port {}", cirrus_server_lib::get_build_info(), port);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}
