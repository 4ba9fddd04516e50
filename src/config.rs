//! Configuration of the host server and of the listener address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use structopt::StructOpt;

/// The default port used by `listen` when none is given.
pub const DEFAULT_PORT: u16 = 4000;

/// Options used to construct a host server.
#[derive(Debug, Clone, PartialEq)]
pub struct HostOptions {
    /// The address the host server binds to.
    ///
    /// When the host server is started by `listen`, this address is used if
    /// the listen options leave the host unset.
    pub host: Option<IpAddr>,

    /// The port the host server binds to when listening automatically.
    ///
    /// This field must be left unset when the options are passed to
    /// `register_server`; the port is chosen by `listen` instead.
    pub port: Option<u16>,

    /// Whether the host server binds its listener as soon as it is constructed.
    pub auto_listen: bool,
}

impl Default for HostOptions {
    fn default() -> HostOptions {
        HostOptions {
            host: None,
            port: None,
            auto_listen: true,
        }
    }
}

impl HostOptions {
    /// Returns the address used when listening automatically.
    ///
    /// An unset port selects an ephemeral one.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or_else(|| Ipv4Addr::LOCALHOST.into()),
            self.port.unwrap_or(0),
        )
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "graphql-hyper")]
struct Cli {
    /// The host of listener address.
    #[structopt(short = "H", long = "host")]
    host: Option<IpAddr>,

    /// The port of listener address.
    #[structopt(short = "p", long = "port", default_value = "4000")]
    port: u16,
}

/// Options passed to `listen`, which determine the address actually bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListenOptions {
    /// The address of the listener.
    ///
    /// When unset, the host of the host server is used, or `127.0.0.1`.
    pub host: Option<IpAddr>,
    /// The port of the listener, `4000` when unset. `0` selects an ephemeral port.
    pub port: Option<u16>,
}

impl ListenOptions {
    /// Creates a `ListenOptions` from the command line arguments.
    pub fn from_args() -> ListenOptions {
        let cli = Cli::from_args();
        ListenOptions {
            host: cli.host,
            port: Some(cli.port),
        }
    }

    #[allow(missing_docs)]
    pub fn host(self, host: impl Into<IpAddr>) -> ListenOptions {
        ListenOptions {
            host: Some(host.into()),
            ..self
        }
    }

    #[allow(missing_docs)]
    pub fn port(self, port: u16) -> ListenOptions {
        ListenOptions {
            port: Some(port),
            ..self
        }
    }

    /// Returns the socket address to be bound by the host server.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or_else(|| Ipv4Addr::LOCALHOST.into()),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }
}
