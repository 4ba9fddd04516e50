//! Collaborators shared by the unit tests.

use std::sync::Mutex;

use futures::future;
use http::{Request, Response};
use hyper::Body;
use juniper::{EmptyMutation, RootNode};

use crate::config::ListenOptions;
use crate::error::{ConfigError, Result};
use crate::execution::{ExecutionServer, ServerInfo};
use crate::host::{Listener, ResponseFuture};

pub struct Context;

impl juniper::Context for Context {}

pub struct Query;

graphql_object!(Query: Context |&self| {
    field apiVersion() -> &str {
        "1.0"
    }
});

pub type Schema = RootNode<'static, Query, EmptyMutation<Context>>;

pub fn schema() -> Schema {
    RootNode::new(Query, EmptyMutation::new())
}

/// An execution server which records the calls from the adapter.
#[derive(Debug, Default)]
pub struct MockServer {
    disable_tools: bool,
    subscriptions_path: String,
    attached: Mutex<Option<(String, Listener)>>,
    listened: Mutex<Vec<ListenOptions>>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            subscriptions_path: "/graphql".into(),
            ..MockServer::default()
        }
    }

    pub fn disable_tools(self, disabled: bool) -> MockServer {
        MockServer {
            disable_tools: disabled,
            ..self
        }
    }

    pub fn subscriptions_path(self, path: &str) -> MockServer {
        MockServer {
            subscriptions_path: path.into(),
            ..self
        }
    }

    pub fn attached_path(&self) -> Option<String> {
        self.attached
            .lock()
            .unwrap()
            .as_ref()
            .map(|&(ref path, _)| path.clone())
    }

    pub fn listen_calls(&self) -> Vec<ListenOptions> {
        self.listened.lock().unwrap().clone()
    }
}

impl ExecutionServer for MockServer {
    fn disable_tools(&self) -> bool {
        self.disable_tools
    }

    fn subscriptions_path(&self) -> String {
        self.subscriptions_path.clone()
    }

    fn handle(&self, _: Request<Body>) -> ResponseFuture {
        Box::new(future::ok(Response::new(Body::from("executed"))))
    }

    fn attach(&self, path: &str, listener: Listener) {
        *self.attached.lock().unwrap() = Some((path.to_owned(), listener));
    }

    fn listen(&self, options: &ListenOptions) -> Result<ServerInfo> {
        self.listened.lock().unwrap().push(options.clone());
        let attached = self.attached.lock().unwrap();
        let &(ref path, ref listener) = attached.as_ref().ok_or(ConfigError::NotAttached)?;
        let address = listener.local_addr().ok_or(ConfigError::ListenerNotStarted)?;
        Ok(ServerInfo::new(address, path, &self.subscriptions_path))
    }
}
