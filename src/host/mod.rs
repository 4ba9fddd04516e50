//! The host HTTP server into which the GraphQL route is installed.
//!
//! This module provides a minimal server on top of hyper which exposes the
//! facilities the adapter relies on: pre-routing hooks, exact-path routes
//! with optional CORS handling, a `start` routine and a shared handle to the
//! underlying listener.

mod cors;
mod listener;
mod server;

pub use self::listener::Listener;
pub use self::server::{DispatchFuture, Server};

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use futures::Future;
use http::{Request, Response};
use hyper::Body;

use crate::error::Error;

/// A boxed future which resolves to an HTTP response.
pub type ResponseFuture = Box<dyn Future<Item = Response<Body>, Error = Error> + Send>;

/// A boxed future returned from `Host::start`.
pub type StartFuture = Box<dyn Future<Item = (), Error = Error> + Send>;

/// Trait representing the startup contract of a host server.
pub trait Host {
    /// Starts the host server, binding its listener to `addr` unless the
    /// listener is already bound.
    fn start(&self, addr: &SocketAddr) -> StartFuture;

    /// Returns the handle of the underlying listener.
    fn listener(&self) -> &Listener;

    /// Returns the address to listen on when the listen options leave it unset.
    fn default_host(&self) -> Option<IpAddr> {
        None
    }
}

impl<H: Host + ?Sized> Host for Arc<H> {
    fn start(&self, addr: &SocketAddr) -> StartFuture {
        (**self).start(addr)
    }

    fn listener(&self) -> &Listener {
        (**self).listener()
    }

    fn default_host(&self) -> Option<IpAddr> {
        (**self).default_host()
    }
}

/// The result of a pre-routing hook.
#[derive(Debug)]
pub enum Outcome {
    /// Proceed with the next hook and then the ordinary routing.
    Continue,
    /// Respond with the given response, skipping the remaining routing.
    Takeover(Response<Body>),
}

/// Trait representing a hook evaluated before the route dispatch.
pub trait OnRequest: Send + Sync + 'static {
    #[allow(missing_docs)]
    fn on_request(&self, request: &Request<Body>) -> Outcome;
}

impl<F> OnRequest for F
where
    F: Fn(&Request<Body>) -> Outcome + Send + Sync + 'static,
{
    fn on_request(&self, request: &Request<Body>) -> Outcome {
        (*self)(request)
    }
}

/// Trait representing the handler of a route.
pub trait Handler: Send + Sync + 'static {
    #[allow(missing_docs)]
    fn call(&self, request: Request<Body>) -> ResponseFuture;
}

impl<F> Handler for F
where
    F: Fn(Request<Body>) -> ResponseFuture + Send + Sync + 'static,
{
    fn call(&self, request: Request<Body>) -> ResponseFuture {
        (*self)(request)
    }
}

/// A route registered on the host server.
#[derive(Clone)]
pub struct Route {
    path: String,
    cors: bool,
    handler: Arc<dyn Handler>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("cors", &self.cors)
            .finish()
    }
}

impl Route {
    /// Creates a route which dispatches the requests to `path` to the handler.
    pub fn new(path: impl Into<String>, handler: impl Handler) -> Route {
        Route {
            path: path.into(),
            cors: false,
            handler: Arc::new(handler),
        }
    }

    /// Sets whether cross-origin requests are allowed on this route.
    pub fn cors(self, enabled: bool) -> Route {
        Route {
            cors: enabled,
            ..self
        }
    }

    #[allow(missing_docs)]
    pub fn path(&self) -> &str {
        &self.path
    }
}
