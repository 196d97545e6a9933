use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{delete, get, post},
};
use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool},
};
use diesel_migrations::MigrationHarness;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    MIGRATIONS,
    admin::{clear_all_data, debug_db},
    criteria::{
        create_criterion, delete_criterion, list_criteria,
        seed_default_criteria,
    },
    judges::{create_judge, list_judges},
    leaderboard::get_leaderboard,
    mailer::{LogMailer, Mailer},
    state::{AppState, DbPool},
    teams::{create_team, list_teams},
    votes::{cast_vote, list_votes, submit::submit_votes},
};

pub fn build_pool(db_url: &str) -> DbPool {
    Pool::builder()
        .max_size(if db_url == ":memory:" { 1 } else { 10 })
        .build(ConnectionManager::<SqliteConnection>::new(db_url))
        .expect("failed to build connection pool")
}

/// Runs pending migrations and seeds the default criteria when the table is
/// empty.
pub fn prepare_database(pool: &DbPool) {
    let mut conn = pool.get().expect("failed to check out a connection");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("failed to run migrations");
    seed_default_criteria(&mut *conn)
        .expect("failed to seed default criteria");
}

pub fn create_app(pool: DbPool) -> Router {
    create_app_with_mailer(pool, Arc::new(LogMailer))
}

pub fn create_app_with_mailer(
    pool: DbPool,
    mailer: Arc<dyn Mailer>,
) -> Router {
    let state = AppState::new(pool, mailer);

    let api = Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route("/judges", get(list_judges).post(create_judge))
        .route("/criteria", get(list_criteria).post(create_criterion))
        .route("/criteria/:id", delete(delete_criterion))
        .route("/vote", post(cast_vote))
        .route("/submit-votes", post(submit_votes))
        .route("/votes", get(list_votes))
        .route("/leaderboard", get(get_leaderboard))
        .route("/clear-sample-data", post(clear_all_data))
        .route("/debug-db", get(debug_db));

    // Every route is also reachable under /api, which is what the hosted
    // frontends call.
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(86400))
}
