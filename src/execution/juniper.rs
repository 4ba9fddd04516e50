use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::Future;
use http::request::Parts;
use http::Request;
use hyper::Body;
use juniper::{GraphQLType, RootNode};

use super::request::parse_request;
use super::{ExecutionServer, ServerInfo};
use crate::config::ListenOptions;
use crate::error::{ConfigError, Result};
use crate::host::{Listener, ResponseFuture};

/// An `ExecutionServer` which executes the GraphQL queries with Juniper.
///
/// The queries are executed on the current task, with a context created
/// from the request by the context factory.
pub struct JuniperServer<QueryT, MutationT, F>
where
    QueryT: GraphQLType,
    MutationT: GraphQLType,
{
    schema: Arc<RootNode<'static, QueryT, MutationT>>,
    context: F,
    disable_tools: bool,
    subscriptions_path: Option<String>,
    attachment: Mutex<Option<Attachment>>,
}

#[derive(Debug)]
struct Attachment {
    path: String,
    listener: Listener,
}

impl<QueryT, MutationT, F> fmt::Debug for JuniperServer<QueryT, MutationT, F>
where
    QueryT: GraphQLType,
    MutationT: GraphQLType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JuniperServer")
            .field("disable_tools", &self.disable_tools)
            .field("subscriptions_path", &self.subscriptions_path)
            .field("attachment", &self.attachment)
            .finish()
    }
}

impl<QueryT, MutationT, CtxT, F> JuniperServer<QueryT, MutationT, F>
where
    QueryT: GraphQLType<Context = CtxT>,
    MutationT: GraphQLType<Context = CtxT>,
    F: Fn(&Parts) -> CtxT,
{
    /// Starts building a server from a schema and a factory of the contextual
    /// value passed to the resolvers.
    pub fn builder(
        schema: RootNode<'static, QueryT, MutationT>,
        context: F,
    ) -> JuniperServerBuilder<QueryT, MutationT, F> {
        JuniperServerBuilder {
            schema,
            context,
            disable_tools: false,
            subscriptions_path: None,
        }
    }

    fn attachment(&self) -> MutexGuard<'_, Option<Attachment>> {
        self.attachment.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A builder of `JuniperServer`.
pub struct JuniperServerBuilder<QueryT, MutationT, F>
where
    QueryT: GraphQLType,
    MutationT: GraphQLType,
{
    schema: RootNode<'static, QueryT, MutationT>,
    context: F,
    disable_tools: bool,
    subscriptions_path: Option<String>,
}

impl<QueryT, MutationT, F> fmt::Debug for JuniperServerBuilder<QueryT, MutationT, F>
where
    QueryT: GraphQLType,
    MutationT: GraphQLType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JuniperServerBuilder")
            .field("disable_tools", &self.disable_tools)
            .field("subscriptions_path", &self.subscriptions_path)
            .finish()
    }
}

impl<QueryT, MutationT, F> JuniperServerBuilder<QueryT, MutationT, F>
where
    QueryT: GraphQLType,
    MutationT: GraphQLType,
{
    /// Sets whether the GraphQL Playground is disabled.
    pub fn disable_tools(self, disabled: bool) -> Self {
        JuniperServerBuilder {
            disable_tools: disabled,
            ..self
        }
    }

    /// Sets the path of the endpoint for subscriptions.
    ///
    /// By default, the path of the GraphQL endpoint is used.
    pub fn subscriptions_path(self, path: impl Into<String>) -> Self {
        JuniperServerBuilder {
            subscriptions_path: Some(path.into()),
            ..self
        }
    }

    #[allow(missing_docs)]
    pub fn build(self) -> JuniperServer<QueryT, MutationT, F> {
        JuniperServer {
            schema: Arc::new(self.schema),
            context: self.context,
            disable_tools: self.disable_tools,
            subscriptions_path: self.subscriptions_path,
            attachment: Mutex::new(None),
        }
    }
}

impl<QueryT, MutationT, CtxT, F> ExecutionServer for JuniperServer<QueryT, MutationT, F>
where
    QueryT: GraphQLType<Context = CtxT> + Send + Sync + 'static,
    MutationT: GraphQLType<Context = CtxT> + Send + Sync + 'static,
    QueryT::TypeInfo: Send + Sync + 'static,
    MutationT::TypeInfo: Send + Sync + 'static,
    CtxT: Send + 'static,
    F: Fn(&Parts) -> CtxT + Send + Sync + 'static,
{
    fn disable_tools(&self) -> bool {
        self.disable_tools
    }

    fn subscriptions_path(&self) -> String {
        match self.subscriptions_path {
            Some(ref path) => path.clone(),
            None => self
                .attachment()
                .as_ref()
                .map(|attachment| attachment.path.clone())
                .unwrap_or_default(),
        }
    }

    fn handle(&self, request: Request<Body>) -> ResponseFuture {
        let (parts, body) = request.into_parts();
        let context = (self.context)(&parts);
        let schema = self.schema.clone();
        Box::new(parse_request(&parts, body).and_then(move |request| {
            trace!("execute a GraphQL request (batch = {})", request.is_batch());
            request.execute(&*schema, &context).into_response()
        }))
    }

    fn attach(&self, path: &str, listener: Listener) {
        let mut attachment = self.attachment();
        if attachment.is_some() {
            warn!("the GraphQL server is attached again; the previous host is detached");
        }
        *attachment = Some(Attachment {
            path: path.to_owned(),
            listener,
        });
    }

    fn listen(&self, options: &ListenOptions) -> Result<ServerInfo> {
        let subscriptions_path = self.subscriptions_path();
        let attachment = self.attachment();
        let attachment = attachment.as_ref().ok_or(ConfigError::NotAttached)?;
        let address = attachment
            .listener
            .local_addr()
            .ok_or(ConfigError::ListenerNotStarted)?;

        if address.port() != options.bind_addr().port() {
            debug!("the listener was bound to the port {}", address.port());
        }

        let info = ServerInfo::new(address, &attachment.path, &subscriptions_path);
        info!("Server ready at {}", info.url);
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{schema, Context, Schema};
    use futures::Stream;
    use http::{header, StatusCode};
    use tokio::runtime::current_thread::Runtime;

    type Server = JuniperServer<
        crate::testing::Query,
        juniper::EmptyMutation<Context>,
        fn(&Parts) -> Context,
    >;

    fn server() -> Server {
        fn context(_: &Parts) -> Context {
            Context
        }
        let schema: Schema = schema();
        JuniperServer::builder(schema, context as fn(&Parts) -> Context).build()
    }

    fn execute(server: &Server, request: Request<Body>) -> (StatusCode, String) {
        let mut rt = Runtime::new().unwrap();
        let response = rt.block_on(server.handle(request)).unwrap();
        let status = response.status();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = rt.block_on(response.into_body().concat2()).unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn executes_get_requests() {
        let (status, body) = execute(
            &server(),
            Request::get("/graphql?query=%7BapiVersion%7D")
                .body(Body::empty())
                .unwrap(),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"data":{"apiVersion":"1.0"}}"#);
    }

    #[test]
    fn executes_post_requests() {
        let (status, body) = execute(
            &server(),
            Request::post("/graphql")
                .header("content-type", "application/json")
                .body(Body::from(r#"{ "query": "{ apiVersion }" }"#))
                .unwrap(),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"data":{"apiVersion":"1.0"}}"#);
    }

    #[test]
    fn invalid_queries_are_bad_requests() {
        let (status, body) = execute(
            &server(),
            Request::post("/graphql")
                .header("content-type", "application/graphql")
                .body(Body::from("{ unknownField }"))
                .unwrap(),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("errors"));
    }

    #[test]
    fn subscriptions_path_defaults_to_attached_path() {
        let server = server();
        assert_eq!(server.subscriptions_path(), "");
        server.attach("/api", Listener::new());
        assert_eq!(server.subscriptions_path(), "/api");

        let server = JuniperServer::builder(schema(), |_: &Parts| Context)
            .subscriptions_path("/subscriptions")
            .build();
        server.attach("/api", Listener::new());
        assert_eq!(server.subscriptions_path(), "/subscriptions");
    }

    #[test]
    fn listen_requires_attachment() {
        let server = server();
        let err = server.listen(&ListenOptions::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::NotAttached));
    }

    #[test]
    fn listen_reports_the_bound_address() {
        let server = server();
        let listener = Listener::new();
        server.attach("/graphql", listener.clone());

        let err = server.listen(&ListenOptions::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::ListenerNotStarted));

        listener.mark_listening("127.0.0.1:4000".parse().unwrap());
        let info = server.listen(&ListenOptions::default()).unwrap();
        assert_eq!(info.url, "http://127.0.0.1:4000/graphql");
        assert_eq!(info.subscriptions_url, "ws://127.0.0.1:4000/graphql");
    }
}
