//! # Karo Core Library
//!
//! The view logic of the Karo personal task tracker: a session-gated task
//! grid whose rows live in a hosted backend (a Supabase project).
//!
//! ## Features
//!
//! - **Session Guard**: redirects to the login view whenever no session is
//!   active, for as long as the guarded view is mounted
//! - **Task Loader**: fetches every row with its tags in creation order and
//!   normalizes missing columns
//! - **Editable Grid**: a state machine for inline row creation and
//!   per-cell editing that always refetches after a mutation
//! - **Tag Colors**: deterministic palette selection from a tag's text
//! - **Backend Port**: narrow async traits for auth and data, with an HTTP
//!   implementation for Supabase
//!
//! ## Core Modules
//!
//! - [`backend`]: Auth and task-store traits the rest of the crate talks to
//! - [`supabase`]: `reqwest` implementation of the backend traits
//! - [`session`]: Session-change broadcasting and the Session Guard
//! - [`grid`]: Editable grid, draft row and edit cursor
//! - [`loader`]: Task loading and row normalization
//! - [`forms`]: Login and signup form state
//! - [`routes`]: Client-visible routes and navigation history
//! - [`app`]: Composition of router, guard and grid
//! - [`tags`]: Tag color mapping
//! - [`models`]: Core data structures and transfer objects
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use karo_core::{
//!     app::App,
//!     routes::Route,
//!     supabase::{SupabaseClient, SupabaseConfig},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SupabaseConfig::new("https://project.supabase.co", "anon-key");
//!     let client = SupabaseClient::new(config)?;
//!
//!     let mut app = App::new(client);
//!     app.visit(Route::Tasks).await;
//!
//!     if app.current_route() == Route::Login {
//!         println!("Please sign in first.");
//!     } else {
//!         for row in app.grid().rows() {
//!             println!("{} {}", row.time, row.name);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod backend;
pub mod error;
pub mod forms;
pub mod grid;
pub mod loader;
pub mod models;
pub mod routes;
pub mod session;
pub mod supabase;
pub mod tags;
