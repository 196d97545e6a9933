use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod admin;
pub mod config;
pub mod criteria;
pub mod judges;
pub mod leaderboard;
pub mod mailer;
pub mod schema;
pub mod state;
pub mod teams;
pub mod util_resp;
pub mod validation;
pub mod votes;

#[cfg(test)]
mod test;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
