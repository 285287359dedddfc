//! # miniblog
//!
//! A small blog post service: posts live in memory, listings are searchable,
//! sortable and paginated. Meant to sit behind a reverse proxy, which owns TLS,
//! rate limiting and body-size limits.
//!
//! The crate has two halves:
//!
//! - A minimal HTTP toolkit: radix-tree [`Router`] via [`matchit`], sealed
//!   [`Handler`]s, [`Response`] / [`IntoResponse`], and a hyper-based
//!   [`Server`] with graceful shutdown.
//! - The blog itself: the [`Post`] model, [`validation`], the in-memory
//!   [`PostStore`], the pure [`paginate`] engine, and the routes in [`api`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use miniblog::{api, PostStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), miniblog::Error> {
//!     let store = Arc::new(PostStore::seeded());
//!     Server::bind("127.0.0.1:8000".parse().unwrap())
//!         .serve(api::router(store))
//!         .await
//! }
//! ```
//!
//! Routes can also be driven in-process, without a socket:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use miniblog::{api, PostStore};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let app = api::router(Arc::new(PostStore::seeded()));
//! let req = http::Request::get("/posts?search=segundo")
//!     .body(bytes::Bytes::new())
//!     .unwrap();
//! let res = app.handle(req).await;
//! assert_eq!(res.status_code(), http::StatusCode::OK);
//! # }
//! ```

mod error;
mod request;
mod response;
mod router;
mod server;

pub mod api;
pub mod config;
pub mod health;
pub mod pagination;
pub mod post;
pub mod store;
pub mod validation;

pub use api::ApiError;
pub use config::Config;
pub use error::Error;
pub use pagination::{paginate, Direction, OrderBy, Page, PageQuery};
pub use post::{Author, Post, PostCreate, PostSummary, PostUpdate, PostView, Tag};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Handler, Router};
pub use server::Server;
pub use store::{PostStore, SharedStore, StoreError};
pub use validation::{validate_create, validate_update, FieldViolation, Validated, ValidationError};
