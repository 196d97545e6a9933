use clap::Parser;
use tally::config::{build_pool, create_app, prepare_database};

/// Hackathon judging and leaderboard service.
#[derive(Parser)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "tally.db".to_string());
    tracing::info!("database location = {db_url}");

    let pool = build_pool(&db_url);
    prepare_database(&pool);

    let app = create_app(pool);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
