//! The GraphQL execution server served by the adapter.

mod juniper;
pub mod request;

pub use self::juniper::{JuniperServer, JuniperServerBuilder};

use std::net::SocketAddr;
use std::sync::Arc;

use http::Request;
use hyper::Body;

use crate::config::ListenOptions;
use crate::error::Result;
use crate::host::{Handler, Listener, ResponseFuture};

/// Trait representing a GraphQL execution server.
pub trait ExecutionServer: Send + Sync + 'static {
    /// Returns `true` if the interactive tools (the GraphQL Playground) are disabled.
    fn disable_tools(&self) -> bool {
        false
    }

    /// Returns the path of the endpoint for subscriptions.
    fn subscriptions_path(&self) -> String;

    /// Handles a GraphQL request routed by the host server.
    fn handle(&self, request: Request<Body>) -> ResponseFuture;

    /// Attaches this server to the listener of the host server which serves `path`.
    ///
    /// The listener is a shared handle, so the server observes the socket
    /// once the host binds it.
    fn attach(&self, path: &str, listener: Listener);

    /// Completes the setup after the host listener has been bound.
    fn listen(&self, options: &ListenOptions) -> Result<ServerInfo>;
}

/// The information about a server which started listening.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    /// The address the listener is bound to.
    pub address: SocketAddr,
    /// The URL of the GraphQL endpoint.
    pub url: String,
    /// The URL of the endpoint for subscriptions.
    pub subscriptions_url: String,
}

impl ServerInfo {
    /// Creates a `ServerInfo` for the endpoints served at `address`.
    ///
    /// An unspecified address (e.g. `0.0.0.0`) is reported as `localhost`.
    pub fn new(address: SocketAddr, path: &str, subscriptions_path: &str) -> ServerInfo {
        let host = if address.ip().is_unspecified() {
            format!("localhost:{}", address.port())
        } else {
            address.to_string()
        };
        ServerInfo {
            address,
            url: format!("http://{}{}", host, path),
            subscriptions_url: format!("ws://{}{}", host, subscriptions_path),
        }
    }
}

/// A route handler which forwards the requests to an `ExecutionServer`.
#[derive(Debug)]
pub struct ExecutionHandler<E> {
    server: Arc<E>,
}

impl<E: ExecutionServer> ExecutionHandler<E> {
    #[allow(missing_docs)]
    pub fn new(server: Arc<E>) -> ExecutionHandler<E> {
        ExecutionHandler { server }
    }
}

impl<E: ExecutionServer> Handler for ExecutionHandler<E> {
    fn call(&self, request: Request<Body>) -> ResponseFuture {
        self.server.handle(request)
    }
}
