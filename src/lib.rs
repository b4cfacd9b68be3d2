//! # backlog
//!
//! A small user-story backlog service and the router it runs on.
//!
//! ## The router
//!
//! A [`RouteTable`] is an ordered list of `(method, pattern, handler)` rules.
//! Requests are resolved by scanning the rules in registration order; the
//! first rule with an equal method and a matching pattern wins. Patterns are
//! regular expressions anchored at the end of the path only. See
//! [`RouteTable`] for exactly what that accepts.
//!
//! Everything around the router is host plumbing:
//!
//! - [`Server`]: tokio + hyper, HTTP/1.1 and HTTP/2, graceful shutdown
//! - [`Request`] / [`Response`]: what handlers see and return
//! - [`Config`]: layered file + environment configuration
//! - [`stories`]: the backlog application itself
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use backlog::stories::{self, Datastore};
//! use backlog::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), backlog::Error> {
//!     let config = Config::load()?;
//!     let table = stories::routes(Arc::new(Datastore::default()));
//!
//!     Server::bind(config.socket_addr()?).serve(table).await
//! }
//! ```

mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod stories;

pub use crate::config::{Config, LoggingConfig, ServerConfig};
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{RouteTable, Rule};
pub use server::Server;

pub use http::StatusCode;
