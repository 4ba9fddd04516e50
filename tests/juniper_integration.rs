extern crate futures;
extern crate graphql_hyper;
extern crate http;
extern crate hyper;
extern crate juniper;
#[macro_use]
extern crate percent_encoding;
extern crate tokio;

use std::cell::RefCell;
use std::sync::Arc;

use futures::Stream;
use graphql_hyper::execution::JuniperServer;
use graphql_hyper::{register_server, ExecutionServer, GraphQLServer, ServerRegistration};
use http::request::Parts;
use http::{Request, Response};
use hyper::Body;
use juniper::http::tests as http_tests;
use juniper::tests::model::Database;
use juniper::{EmptyMutation, RootNode};
use percent_encoding::{utf8_percent_encode, QUERY_ENCODE_SET};
use tokio::runtime::current_thread::Runtime;

struct TestHyperIntegration<E> {
    graphql: GraphQLServer<E>,
    rt: RefCell<Runtime>,
}

impl<E: ExecutionServer> http_tests::HTTPIntegration for TestHyperIntegration<E> {
    fn get(&self, url: &str) -> http_tests::TestResponse {
        let request = Request::get(custom_url_encode(url))
            .body(Body::empty())
            .unwrap();
        self.perform(request)
    }

    fn post(&self, url: &str, body: &str) -> http_tests::TestResponse {
        let request = Request::post(custom_url_encode(url))
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        self.perform(request)
    }
}

impl<E: ExecutionServer> TestHyperIntegration<E> {
    fn perform(&self, request: Request<Body>) -> http_tests::TestResponse {
        let mut rt = self.rt.borrow_mut();
        let response = rt.block_on(self.graphql.dispatch(request)).unwrap();
        make_test_response(&mut *rt, response)
    }
}

fn custom_url_encode(url: &str) -> String {
    define_encode_set!{
        pub CUSTOM_ENCODE_SET = [QUERY_ENCODE_SET] | {'{', '}'}
    }
    utf8_percent_encode(url, CUSTOM_ENCODE_SET).to_string()
}

fn make_test_response(rt: &mut Runtime, response: Response<Body>) -> http_tests::TestResponse {
    let status_code = response.status().as_u16() as i32;
    let content_type = response
        .headers()
        .get("content-type")
        .expect("No content type header from endpoint")
        .to_str()
        .expect("failed to convert the header value to string")
        .to_owned();
    let body = rt.block_on(response.into_body().concat2()).unwrap();
    http_tests::TestResponse {
        status_code,
        content_type,
        body: Some(String::from_utf8(body.to_vec()).unwrap()),
    }
}

#[test]
fn test_hyper_integration() {
    let schema = RootNode::new(Database::new(), EmptyMutation::<Database>::new());
    let server = JuniperServer::builder(schema, |_: &Parts| Database::new()).build();
    let graphql = register_server(ServerRegistration::new(Arc::new(server)).path("/")).unwrap();

    let integration = TestHyperIntegration {
        graphql,
        rt: RefCell::new(Runtime::new().unwrap()),
    };
    http_tests::run_http_test_suite(&integration);
}
