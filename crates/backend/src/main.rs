pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::shared::config::{get_database_path, get_uploads_path, load_config};
use crate::shared::context::AppContext;
use crate::shared::crm::CrmUrlResolver;
use crate::shared::uploads::UploadStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;

    let db_path = get_database_path(&config);
    let db_path_str = db_path.to_string_lossy().to_string();
    shared::data::db::initialize_database(Some(&db_path_str))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Ensure admin user exists
    system::initialization::ensure_admin_user_exists().await?;

    let uploads = UploadStore::new(get_uploads_path(&config), config.uploads.max_bytes());
    uploads.ensure_dir()?;
    tracing::info!("Uploads directory: {}", uploads.dir().display());

    let crm = CrmUrlResolver::from_config(&config.crm)?;
    let port = config.server.port;
    let ctx = AppContext::new(config, uploads, crm);

    let app = routes::configure_routes(ctx);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
