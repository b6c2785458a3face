//! # Reflect CLI
//!
//! Administrative helpers used by the `reflect-cli` binary: creating an
//! administrator and filling a development database with fake data.
//!
//! ```ignore
//! use reflect_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::new(20, 5, 100)).await?;
//! ```

pub mod admin;
pub mod seeder;

pub use admin::{NewAdmin, create_admin};
