#[macro_use]
extern crate juniper;
#[macro_use]
extern crate log;

use std::sync::Arc;

use futures::Future;
use graphql_hyper::execution::JuniperServer;
use graphql_hyper::{register_server, ListenOptions, ServerRegistration};
use http::request::Parts;
use juniper::{EmptyMutation, RootNode};

#[derive(Default)]
struct Context {
    _priv: (),
}

impl juniper::Context for Context {}

struct Query {
    _priv: (),
}

graphql_object!(Query: Context |&self| {
    field apiVersion() -> &str {
        "1.0"
    }
});

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let schema = RootNode::new(Query { _priv: () }, EmptyMutation::<Context>::new());
    let server = JuniperServer::builder(schema, |_: &Parts| Context::default()).build();

    let graphql = match register_server(ServerRegistration::new(Arc::new(server))) {
        Ok(graphql) => graphql,
        Err(err) => return error!("{}", err),
    };

    tokio::run(
        graphql
            .listen(ListenOptions::from_args())
            .map(|info| info!("Open {} in a browser to use the GraphQL Playground", info.url))
            .map_err(|err| error!("{}", err)),
    );
}
