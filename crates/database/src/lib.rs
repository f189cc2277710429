//! # Ledgerlens Database Crate
//!
//! This crate is the storage boundary of the system. Everything the analytics
//! engine reduces and the goal endpoints update comes through here.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all database-specific
//!   logic. It provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL and database implementation details.
//! - **Read-Only for Analytics:** The analytics path only ever lists records. The only
//!   writes are the goal updates behind the savings endpoints.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and the PostgreSQL
//!   implementation uses a connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Creates the schema and seeds the reference categories.
//! - `FinanceRepository`: The trait every storage backend implements.
//! - `DbRepository`: The PostgreSQL implementation.
//! - `InMemoryRepository`: The in-memory implementation used by tests.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::InMemoryRepository;
pub use repository::{DbRepository, FinanceRepository};
