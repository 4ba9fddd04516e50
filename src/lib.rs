//! Serving a GraphQL execution server on top of a hyper-based host server.
//!
//! The adapter registers the GraphQL route on the host, intercepts browser
//! requests to serve the GraphQL Playground and coordinates the startup of
//! the host listener so that the socket is bound exactly once, when
//! `listen` is called.
//!
//! # Example
//!
//! ```
//! # extern crate graphql_hyper;
//! # #[macro_use]
//! # extern crate juniper;
//! use std::sync::Arc;
//!
//! use graphql_hyper::execution::JuniperServer;
//! use graphql_hyper::{register_server, ServerRegistration};
//! use juniper::{EmptyMutation, RootNode};
//!
//! struct Context;
//! impl juniper::Context for Context {}
//!
//! struct Query;
//! graphql_object!(Query: Context |&self| {
//!     field apiVersion() -> &str { "1.0" }
//! });
//!
//! # fn main() -> Result<(), graphql_hyper::Error> {
//! let schema = RootNode::new(Query, EmptyMutation::<Context>::new());
//! let server = JuniperServer::builder(schema, |_: &http::request::Parts| Context).build();
//!
//! let graphql = register_server(ServerRegistration::new(Arc::new(server)))?;
//! # drop(move || {
//! // spawn on the tokio runtime:
//! // tokio::run(graphql.listen(ListenOptions::from_args()) ...)
//! # drop(graphql);
//! # });
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/graphql-hyper/0.1.0")]
#![warn(
    missing_docs,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    unused,
)]
#![cfg_attr(graphql_hyper_deny_warnings, deny(warnings))]
#![cfg_attr(graphql_hyper_deny_warnings, doc(test(attr(deny(warnings)))))]

extern crate bytes;
#[macro_use]
extern crate failure;
extern crate futures; // 0.1
extern crate http;
extern crate hyper;
extern crate hyperx;
#[cfg_attr(test, macro_use)]
extern crate juniper;
#[macro_use]
extern crate log;
extern crate mime;
#[macro_use]
extern crate serde;
extern crate serde_json;
extern crate serde_qs;
extern crate structopt;
extern crate tokio;

#[cfg(test)]
#[macro_use]
extern crate matches;

pub mod accept;
pub mod config;
pub mod error;
pub mod execution;
pub mod host;
pub mod interceptor;
pub mod listen;
pub mod playground;
pub mod registration;

#[cfg(test)]
mod testing;

pub use crate::config::{HostOptions, ListenOptions};
pub use crate::error::{ConfigError, Error, HttpError, Result};
pub use crate::execution::{ExecutionServer, ServerInfo};
pub use crate::interceptor::{Decision, Interceptor};
pub use crate::listen::ListenCoordinator;
pub use crate::registration::{register_server, GraphQLServer, ServerRegistration};
