//! Registration of an execution server on a host server.

use std::sync::Arc;

use http::Request;
use hyper::Body;

use crate::config::{HostOptions, ListenOptions};
use crate::error::{ConfigError, Result};
use crate::execution::{ExecutionHandler, ExecutionServer, ServerInfo};
use crate::host::{DispatchFuture, Route, Server};
use crate::interceptor::Interceptor;
use crate::listen::{ListenCoordinator, ListenFuture, Phase};

/// The path of the GraphQL endpoint used when none is given.
pub const DEFAULT_PATH: &str = "/graphql";

type ListenRoutine = Box<dyn Fn(ListenOptions) -> Result<ServerInfo> + Send + Sync>;

/// The inputs of `register_server`.
#[derive(Debug)]
pub struct ServerRegistration<E> {
    server: Arc<E>,
    app: Option<Server>,
    options: Option<HostOptions>,
    path: Option<String>,
}

impl<E: ExecutionServer> ServerRegistration<E> {
    /// Creates a registration of `server`, on a new host server with the
    /// default options and at the default path.
    pub fn new(server: Arc<E>) -> ServerRegistration<E> {
        ServerRegistration {
            server,
            app: None,
            options: None,
            path: None,
        }
    }

    /// Sets an existing host server on which the endpoint is registered.
    ///
    /// The host server must be constructed with `auto_listen` disabled.
    pub fn app(self, app: Server) -> ServerRegistration<E> {
        ServerRegistration {
            app: Some(app),
            ..self
        }
    }

    /// Sets the options used to construct a new host server.
    ///
    /// These options are ignored if a host server is given by `app`.
    pub fn options(self, options: HostOptions) -> ServerRegistration<E> {
        ServerRegistration {
            options: Some(options),
            ..self
        }
    }

    /// Sets the path of the GraphQL endpoint.
    pub fn path(self, path: impl Into<String>) -> ServerRegistration<E> {
        ServerRegistration {
            path: Some(path.into()),
            ..self
        }
    }
}

/// Registers the execution server on a host server.
///
/// The GraphQL endpoint is routed to the execution server with CORS enabled,
/// and a hook serving the GraphQL Playground to browsers is installed in
/// front of the routing. No socket is bound until `GraphQLServer::listen`
/// is called.
///
/// # Errors
///
/// Returns `ConfigError::PortInRegistration` if the host options specify a
/// port. The port must be given to `GraphQLServer::listen` instead.
pub fn register_server<E>(registration: ServerRegistration<E>) -> Result<GraphQLServer<E>>
where
    E: ExecutionServer,
{
    let ServerRegistration {
        server,
        app,
        options,
        path,
    } = registration;
    let path = path.unwrap_or_else(|| DEFAULT_PATH.to_owned());

    let mut app = match (app, options) {
        (Some(app), options) => {
            if options.is_some() {
                warn!("a host server was passed in, so the options are ignored");
            }
            app
        }
        (None, Some(options)) => {
            if options.port.is_some() {
                return Err(ConfigError::PortInRegistration.into());
            }
            Server::new(HostOptions {
                auto_listen: false,
                ..options
            })?
        }
        (None, None) => Server::new(HostOptions {
            auto_listen: false,
            ..HostOptions::default()
        })?,
    };

    app.on_request(Interceptor::new(path.clone(), server.clone()));
    app.route(Route::new(path.clone(), ExecutionHandler::new(server.clone())).cors(true));
    server.attach(&path, app.listener().clone());
    debug!("registered the GraphQL endpoint at {}", path);

    let listen: ListenRoutine = {
        let server = server.clone();
        Box::new(move |options: ListenOptions| server.listen(&options))
    };

    Ok(GraphQLServer {
        path,
        server,
        coordinator: ListenCoordinator::new(Arc::new(app), listen),
    })
}

/// An execution server registered on a host server.
#[derive(Debug)]
pub struct GraphQLServer<E> {
    path: String,
    server: Arc<E>,
    coordinator: ListenCoordinator<Arc<Server>, ListenRoutine>,
}

impl<E: ExecutionServer> GraphQLServer<E> {
    /// Starts the host server and completes the setup of the execution server.
    ///
    /// The returned future must be run within a tokio runtime.
    /// See `ListenCoordinator::listen` for the errors.
    pub fn listen(&self, options: ListenOptions) -> ListenFuture {
        self.coordinator.listen(options)
    }

    /// Processes a request with the host server, without any socket.
    pub fn dispatch(&self, request: Request<Body>) -> DispatchFuture {
        self.app().dispatch(request)
    }

    /// Returns the host server.
    pub fn app(&self) -> &Server {
        &**self.coordinator.host()
    }

    /// Returns the path of the GraphQL endpoint.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the execution server.
    pub fn server(&self) -> &Arc<E> {
        &self.server
    }

    /// Returns the lifecycle phase of the listener.
    pub fn phase(&self) -> Phase {
        self.coordinator.phase()
    }
}
