/**
 * Notes Collaboration Server Entry Point
 *
 * Loads `.env`, configures tracing from `RUST_LOG` (default `info`) and
 * serves the collaboration router on the configured address.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = notes_collab::backend::server::ServerConfig::load()?;
    let addr = config.socket_addr()?;

    let app = notes_collab::backend::server::create_app(config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on port {}", addr.port());
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin notes-collab-server --features ssr");
    std::process::exit(1);
}
