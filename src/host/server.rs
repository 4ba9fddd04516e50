use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use futures::{future, Future};
use http::{Request, Response};
use hyper::service::service_fn;
use hyper::Body;

use super::cors;
use super::{Host, Listener, OnRequest, Outcome, Route, StartFuture};
use crate::config::HostOptions;
use crate::error::{self, Result};

/// A boxed future returned from `Server::dispatch`.
///
/// Failures of the handlers are already converted into responses.
pub type DispatchFuture = Box<dyn Future<Item = Response<Body>, Error = io::Error> + Send>;

/// A minimal HTTP server built on hyper.
#[derive(Debug)]
pub struct Server {
    options: HostOptions,
    router: Router,
    listener: Listener,
}

impl Server {
    /// Creates a new server from the specified options.
    ///
    /// If `options.auto_listen` is `true`, the listener is bound immediately.
    pub fn new(options: HostOptions) -> Result<Server> {
        let listener = Listener::new();
        if options.auto_listen {
            let addr = options.bind_addr();
            listener.bind_std(&addr)?;
            debug!("bound the listener at construction: {:?}", listener.local_addr());
        }
        Ok(Server {
            options,
            router: Router::default(),
            listener,
        })
    }

    /// Returns the options used to construct this server.
    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Registers a hook evaluated before the route dispatch of every request.
    ///
    /// The hooks are evaluated in the order of registration.
    pub fn on_request(&mut self, hook: impl OnRequest) -> &mut Server {
        self.router.hooks.push(Arc::new(hook));
        self
    }

    /// Registers a route.
    pub fn route(&mut self, route: Route) -> &mut Server {
        self.router.routes.push(route);
        self
    }

    /// Returns the handle of the listener.
    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Processes a request through the hooks and the routes, without any socket.
    pub fn dispatch(&self, request: Request<Body>) -> DispatchFuture {
        self.router.dispatch(request)
    }
}

/// A `Server` can also be started on its own, without `register_server`.
///
/// In that case a listener bound at construction (`auto_listen`) is served
/// as is and `addr` is ignored. Starting a server whose listener is already
/// serving fails with `io::ErrorKind::AddrInUse`.
impl Host for Server {
    fn start(&self, addr: &SocketAddr) -> StartFuture {
        let router = Arc::new(self.router.clone());
        let listener = self.listener.clone();
        let addr = *addr;

        Box::new(future::lazy(move || -> Result<()> {
            let incoming = listener.acquire(&addr)?.incoming();

            let server = hyper::Server::builder(incoming)
                .serve(move || {
                    let router = router.clone();
                    service_fn(move |request| router.dispatch(request))
                })
                .map_err(|err| error!("server error: {}", err));
            tokio::spawn(server);

            info!("Listening on http://{}", listener.local_addr().unwrap_or(addr));
            Ok(())
        }))
    }

    fn listener(&self) -> &Listener {
        &self.listener
    }

    fn default_host(&self) -> Option<IpAddr> {
        self.options.host
    }
}

#[derive(Clone, Default)]
struct Router {
    hooks: Vec<Arc<dyn OnRequest>>,
    routes: Vec<Route>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("hooks", &self.hooks.len())
            .field("routes", &self.routes)
            .finish()
    }
}

impl Router {
    fn dispatch(&self, request: Request<Body>) -> DispatchFuture {
        for hook in &self.hooks {
            if let Outcome::Takeover(response) = hook.on_request(&request) {
                trace!("a hook took over the request to {}", request.uri().path());
                return Box::new(future::ok(response));
            }
        }

        let route = match self.routes.iter().find(|r| r.path == request.uri().path()) {
            Some(route) => route,
            None => {
                return Box::new(future::ok(error::to_response(&error::not_found().into())));
            }
        };

        if !route.cors {
            return Box::new(route.handler.call(request).then(into_response));
        }

        if cors::is_preflight(&request) {
            return Box::new(future::ok(cors::preflight_response(&request)));
        }
        let origin = request.headers().get(http::header::ORIGIN).cloned();
        Box::new(route.handler.call(request).then(move |result| {
            into_response(result).map(|mut response| {
                cors::apply_allow_origin(origin.as_ref(), response.headers_mut());
                response
            })
        }))
    }
}

fn into_response(result: Result<Response<Body>>) -> io::Result<Response<Body>> {
    Ok(result.unwrap_or_else(|err| error::to_response(&err)))
}
