//! The pre-routing hook which serves the GraphQL Playground to browsers.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, Request, Response};
use hyper::Body;
use mime::{self, Mime};

use crate::accept;
use crate::execution::ExecutionServer;
use crate::host::{OnRequest, Outcome};
use crate::playground::{render_playground_page, PlaygroundConfig};

/// A read-only view of the request inspected by `Interceptor`.
#[derive(Debug, Clone, Copy)]
pub struct RequestView<'a> {
    /// The path of the request URI.
    pub path: &'a str,
    /// The method of the request.
    pub method: &'a Method,
    /// The header map of the request.
    pub headers: &'a HeaderMap,
}

impl<'a> RequestView<'a> {
    #[allow(missing_docs)]
    pub fn from_request<T>(request: &'a Request<T>) -> RequestView<'a> {
        RequestView {
            path: request.uri().path(),
            method: request.method(),
            headers: request.headers(),
        }
    }
}

/// A generated page served in place of the ordinary routing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The content of the page.
    pub body: Bytes,
    /// The media type of the content.
    pub content_type: Mime,
}

impl Page {
    /// Converts this page into an HTTP response.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        if let Ok(value) = HeaderValue::from_str(self.content_type.as_ref()) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }
}

/// The decision made by `Interceptor` for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The request is not addressed to the GraphQL endpoint.
    NotMatched,
    /// The request is addressed to the GraphQL endpoint and is left to the
    /// execution server.
    PassThrough,
    /// The request is answered with the GraphQL Playground page.
    ServeDocumentationPage(Page),
}

/// Decides whether a request to the GraphQL endpoint should be answered
/// with the GraphQL Playground instead of being executed.
#[derive(Debug)]
pub struct Interceptor<E> {
    path: String,
    server: Arc<E>,
}

impl<E: ExecutionServer> Interceptor<E> {
    /// Creates an interceptor for the endpoint at `path`.
    pub fn new(path: impl Into<String>, server: Arc<E>) -> Interceptor<E> {
        Interceptor {
            path: path.into(),
            server,
        }
    }

    #[allow(missing_docs)]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Makes the decision for a request.
    ///
    /// This function has no side effects, so the same request always
    /// yields the same decision.
    pub fn decide(&self, request: &RequestView<'_>) -> Decision {
        if request.path != self.path {
            return Decision::NotMatched;
        }

        if self.server.disable_tools() || *request.method != Method::GET {
            return Decision::PassThrough;
        }

        let preferred = accept::preferred(request.headers, &[("text", "html"), ("application", "json")]);
        match preferred {
            Some(("text", "html")) => {
                let subscriptions_path = self.server.subscriptions_path();
                let source =
                    render_playground_page(&PlaygroundConfig::new(&self.path, &subscriptions_path));
                Decision::ServeDocumentationPage(Page {
                    body: Bytes::from(source),
                    content_type: mime::TEXT_HTML_UTF_8,
                })
            }
            _ => Decision::PassThrough,
        }
    }
}

impl<E: ExecutionServer> OnRequest for Interceptor<E> {
    fn on_request(&self, request: &Request<Body>) -> Outcome {
        match self.decide(&RequestView::from_request(request)) {
            Decision::ServeDocumentationPage(page) => {
                debug!("serve the GraphQL Playground at {}", self.path);
                Outcome::Takeover(page.into_response())
            }
            Decision::PassThrough => {
                trace!("pass through the request to the GraphQL endpoint");
                Outcome::Continue
            }
            Decision::NotMatched => Outcome::Continue,
        }
    }
}
