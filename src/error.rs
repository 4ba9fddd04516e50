//! Error primitives.

use std::borrow::Cow;

use http::header::HeaderValue;
use http::{header, Response, StatusCode};
use hyper::Body;

/// The error type used throughout this crate.
pub type Error = failure::Error;

/// A specialized `Result` type whose error type is `failure::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Misconfigurations detected while registering the adapter or starting
/// the listener.
///
/// These errors are never recovered internally. Callers may inspect them
/// with `Error::downcast_ref::<ConfigError>()`.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    /// The host options passed to the registration specify a port.
    #[fail(
        display = "the host options for registration must not include a port, since \
                   automatic listening is turned off. Set the port in the options \
                   passed to listen instead:\n\n    \
                   graphql.listen(ListenOptions::default().port(YOUR_PORT_HERE))"
    )]
    PortInRegistration,

    /// The host listener was already bound when `listen` was called.
    #[fail(
        display = "the host listener is already bound. Construct the host server with \
                   automatic listening disabled:\n\n    \
                   Server::new(HostOptions {{ auto_listen: false, ..Default::default() }})"
    )]
    PrematureBind,

    /// The host listener did not report itself as listening after the host started.
    #[fail(
        display = "the host listener is not listening after the host server started. \
                   Ensure that the host server is constructed with automatic listening \
                   disabled and binds its listener in start()"
    )]
    ListenerNotStarted,

    /// `listen` was called more than once on the same adapter.
    #[fail(display = "listen has already been called on this server")]
    ListenCalledTwice,

    /// The execution server was asked to listen before being attached to a host.
    #[fail(display = "the execution server is not attached to any host server; call register_server first")]
    NotAttached,
}

/// An error which is converted into an HTTP response with a specific status code.
#[derive(Debug, Fail)]
#[fail(display = "{}", message)]
pub struct HttpError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl HttpError {
    #[allow(missing_docs)]
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> HttpError {
        HttpError {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code associated with this error.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

/// Creates an `HttpError` which will be rendered as `400 Bad Request`.
pub fn bad_request(message: impl Into<Cow<'static, str>>) -> HttpError {
    HttpError::new(StatusCode::BAD_REQUEST, message)
}

/// Creates an `HttpError` which will be rendered as `405 Method Not Allowed`.
pub fn method_not_allowed(message: impl Into<Cow<'static, str>>) -> HttpError {
    HttpError::new(StatusCode::METHOD_NOT_ALLOWED, message)
}

/// Creates an `HttpError` which will be rendered as `404 Not Found`.
pub fn not_found() -> HttpError {
    HttpError::new(StatusCode::NOT_FOUND, "not found")
}

/// Converts an error into a plain-text HTTP response.
///
/// Errors other than `HttpError` are reported as `500 Internal Server Error`
/// without exposing their message to the client.
pub fn to_response(err: &Error) -> Response<Body> {
    let (status, message) = match err.downcast_ref::<HttpError>() {
        Some(err) => (err.status, err.message.to_string()),
        None => {
            error!("failed to handle the request: {}", err);
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, status.canonical_reason().unwrap_or("").to_owned())
        }
    };
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status() {
        let response = to_response(&bad_request("missing query string").into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn other_errors_are_internal() {
        let response = to_response(&format_err!("database is gone"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn config_error_is_downcastable() {
        let err: Error = ConfigError::PortInRegistration.into();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::PortInRegistration)
        );
        assert!(err.to_string().contains("must not include a port"));
    }
}
