//! Coordination of the host startup with the listen routine of the
//! execution server.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{future, Future};

use crate::config::ListenOptions;
use crate::error::{ConfigError, Error, Result};
use crate::execution::ServerInfo;
use crate::host::Host;

/// A boxed future returned from `ListenCoordinator::listen`.
pub type ListenFuture = Box<dyn Future<Item = ServerInfo, Error = Error> + Send>;

/// The lifecycle phase of a `ListenCoordinator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The adapter is registered and `listen` has not been called yet.
    Prepared,
    /// `listen` has been called. This phase is terminal.
    Listening,
}

/// Composes the startup of a host server with the listen routine of the
/// execution server.
///
/// The host listener is bound exactly once, when `listen` is called, and
/// the listen routine runs only after the listener is bound.
pub struct ListenCoordinator<H, F> {
    inner: Arc<Inner<H, F>>,
}

struct Inner<H, F> {
    host: H,
    listen: F,
    phase: Mutex<Phase>,
}

impl<H, F> fmt::Debug for ListenCoordinator<H, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenCoordinator")
            .field("phase", &*self.inner.phase())
            .finish()
    }
}

impl<H, F> Inner<H, F> {
    fn phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H, F> ListenCoordinator<H, F>
where
    H: Host + Send + Sync + 'static,
    F: Fn(ListenOptions) -> Result<ServerInfo> + Send + Sync + 'static,
{
    /// Creates a coordinator from a host and the listen routine which is
    /// invoked after the host has started.
    pub fn new(host: H, listen: F) -> ListenCoordinator<H, F> {
        ListenCoordinator {
            inner: Arc::new(Inner {
                host,
                listen,
                phase: Mutex::new(Phase::Prepared),
            }),
        }
    }

    #[allow(missing_docs)]
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> Phase {
        *self.inner.phase()
    }

    /// Starts the host at the address given by `options`, and then invokes
    /// the listen routine with `options`.
    ///
    /// If `options` does not specify the host, the default host of the host
    /// server is used.
    ///
    /// The returned future must be run within a tokio runtime, since the
    /// host spawns its server onto the current executor.
    ///
    /// # Errors
    ///
    /// * `ConfigError::ListenCalledTwice` if this method has already been called.
    /// * `ConfigError::PrematureBind` if the host listener was bound before
    ///   this call.
    /// * `ConfigError::ListenerNotStarted` if the host listener is not
    ///   listening after the host started.
    pub fn listen(&self, options: ListenOptions) -> ListenFuture {
        {
            let mut phase = self.inner.phase();
            if *phase == Phase::Listening {
                return Box::new(future::err(ConfigError::ListenCalledTwice.into()));
            }
            *phase = Phase::Listening;
        }

        if self.inner.host.listener().is_listening() {
            return Box::new(future::err(ConfigError::PrematureBind.into()));
        }

        let options = ListenOptions {
            host: options.host.or_else(|| self.inner.host.default_host()),
            ..options
        };
        let addr = options.bind_addr();
        debug!("start the host server at {}", addr);

        let inner = self.inner.clone();
        Box::new(self.inner.host.start(&addr).and_then(move |()| {
            if !inner.host.listener().is_listening() {
                return Err(ConfigError::ListenerNotStarted.into());
            }
            trace!("the host listener is bound; invoke the listen routine");
            (inner.listen)(options)
        }))
    }
}
