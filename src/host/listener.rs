use std::io;
use std::net::{self, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::net::TcpListener;
use tokio::reactor::Handle;

/// A shared handle to the listener owned by a host server.
///
/// Cloning the handle does not duplicate the socket; every clone observes
/// the same listener.
#[derive(Debug, Clone, Default)]
pub struct Listener {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    local_addr: Option<SocketAddr>,
    // a socket bound at construction and not yet adopted by the runtime.
    pending: Option<net::TcpListener>,
}

impl Listener {
    /// Creates a handle of an unbound listener.
    pub fn new() -> Listener {
        Listener::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if the listener is bound to a socket.
    pub fn is_listening(&self) -> bool {
        self.state().local_addr.is_some()
    }

    /// Returns the local address of the listener, if bound.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.state().local_addr
    }

    /// Binds the listener immediately without registering it to the reactor.
    pub(crate) fn bind_std(&self, addr: &SocketAddr) -> io::Result<()> {
        let listener = net::TcpListener::bind(addr)?;
        let mut state = self.state();
        state.local_addr = Some(listener.local_addr()?);
        state.pending = Some(listener);
        Ok(())
    }

    /// Acquires the socket to be served on the current reactor.
    ///
    /// A socket bound at construction is adopted as is, otherwise a new
    /// socket is bound to `addr`.
    pub(crate) fn acquire(&self, addr: &SocketAddr) -> io::Result<TcpListener> {
        let mut state = self.state();
        if let Some(listener) = state.pending.take() {
            debug!("adopt the listener bound at construction");
            return TcpListener::from_std(listener, &Handle::default());
        }
        if state.local_addr.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::AddrInUse,
                "the listener is already serving",
            ));
        }
        let listener = TcpListener::bind(addr)?;
        state.local_addr = Some(listener.local_addr()?);
        Ok(listener)
    }

    #[cfg(test)]
    pub(crate) fn mark_listening(&self, addr: SocketAddr) {
        self.state().local_addr = Some(addr);
    }
}
