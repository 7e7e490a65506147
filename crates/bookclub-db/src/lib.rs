//! # bookclub-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `bookclub-core`. It handles:
//!
//! - Connection pool management and the embedded schema
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations, with multi-table writes in one transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookclub_db::{create_pool, run_migrations, DatabaseConfig, PgClubRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let clubs = PgClubRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use migrations::run_migrations;
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgClubMemberRepository, PgClubMessageRepository, PgClubRepository, PgConversationRepository,
    PgDirectMessageRepository, PgInvitationRepository, PgNotificationRepository,
    PgUserRepository,
};
