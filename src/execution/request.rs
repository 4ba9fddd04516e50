//! Parsing GraphQL requests and rendering their results.

use std::fmt;

use futures::future::{self, Either};
use futures::{Future, Stream};
use http::request::Parts;
use http::{header, Method, Response, StatusCode};
use hyper::Body;
use juniper::{GraphQLType, InputValue, RootNode};
use mime::{self, Mime};

use crate::error::{bad_request, method_not_allowed, Error, Result};

/// Parses a GraphQL request from the parts and the body of an HTTP request.
///
/// * If the method is `GET`, the query string is parsed as a single GraphQL
///   query (`query`, `operationName` and `variables`).
///   If the query string is missing, it will return an error.
/// * If the method is `POST`, receives the whole body and then converts it
///   according to `content-type`:
///   - `application/json`: a JSON object (or an array of objects for batch
///     requests) which contains the query and supplemental fields.
///   - `application/graphql`: a single GraphQL query.
///
/// Other methods are rejected with `405 Method Not Allowed`.
pub fn parse_request(
    parts: &Parts,
    body: Body,
) -> impl Future<Item = GraphQLRequest, Error = Error> + Send {
    if parts.method == Method::GET {
        let result = match parts.uri.query() {
            Some(query) => parse_query_str(query),
            None => Err(bad_request("missing query string").into()),
        };
        Either::A(future::result(result))
    } else if parts.method == Method::POST {
        let content_type = content_type(parts);
        Either::B(
            body.concat2()
                .from_err::<Error>()
                .and_then(move |data| -> Result<GraphQLRequest> {
                    parse_body(content_type?.as_ref(), &*data)
                }),
        )
    } else {
        Either::A(future::err(
            method_not_allowed("GraphQL requests must be sent by GET or POST").into(),
        ))
    }
}

fn invalid(err: impl fmt::Display) -> Error {
    bad_request(err.to_string()).into()
}

fn content_type(parts: &Parts) -> Result<Option<Mime>> {
    match parts.headers.get(header::CONTENT_TYPE) {
        Some(raw) => {
            let raw = raw.to_str().map_err(invalid)?;
            raw.parse().map(Some).map_err(invalid)
        }
        None => Ok(None),
    }
}

fn parse_body(content_type: Option<&Mime>, data: &[u8]) -> Result<GraphQLRequest> {
    match content_type {
        Some(m) if m.type_() == mime::APPLICATION && m.subtype() == mime::JSON => {
            serde_json::from_slice(data).map_err(invalid)
        }
        Some(m) if m.type_() == mime::APPLICATION && m.subtype() == "graphql" => {
            let query = String::from_utf8(data.to_vec()).map_err(invalid)?;
            Ok(GraphQLRequest::single(query, None, None))
        }
        Some(..) => Err(bad_request("unsupported content-type.").into()),
        None => Err(bad_request("missing content-type.").into()),
    }
}

fn parse_query_str(s: &str) -> Result<GraphQLRequest> {
    #[derive(Debug, Deserialize)]
    struct ParsedQuery {
        query: String,
        #[serde(rename = "operationName")]
        operation_name: Option<String>,
        variables: Option<String>,
    }

    let parsed: ParsedQuery = serde_qs::from_str(s).map_err(invalid)?;

    let variables: Option<InputValue> = match parsed.variables {
        Some(ref variables) => Some(serde_json::from_str(variables).map_err(invalid)?),
        None => None,
    };

    Ok(GraphQLRequest::single(
        parsed.query,
        parsed.operation_name,
        variables,
    ))
}

// ==== GraphQLRequest ====

/// A type representing the decoded GraphQL query obtained by parsing an HTTP request.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest(GraphQLRequestKind);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphQLRequestKind {
    Single(juniper::http::GraphQLRequest),
    Batch(Vec<juniper::http::GraphQLRequest>),
}

impl GraphQLRequest {
    fn single(
        query: String,
        operation_name: Option<String>,
        variables: Option<InputValue>,
    ) -> GraphQLRequest {
        GraphQLRequest(GraphQLRequestKind::Single(
            juniper::http::GraphQLRequest::new(query, operation_name, variables),
        ))
    }

    /// Returns `true` if this request contains multiple queries.
    pub fn is_batch(&self) -> bool {
        match self.0 {
            GraphQLRequestKind::Single(..) => false,
            GraphQLRequestKind::Batch(..) => true,
        }
    }

    /// Executes a GraphQL query represented by this value using the specified schema and context.
    pub fn execute<QueryT, MutationT, CtxT>(
        &self,
        root_node: &RootNode<'static, QueryT, MutationT>,
        context: &CtxT,
    ) -> GraphQLResponse
    where
        QueryT: GraphQLType<Context = CtxT>,
        MutationT: GraphQLType<Context = CtxT>,
    {
        match self.0 {
            GraphQLRequestKind::Single(ref request) => {
                let response = request.execute(root_node, context);
                GraphQLResponse {
                    is_ok: response.is_ok(),
                    body: serde_json::to_vec(&response),
                }
            }
            GraphQLRequestKind::Batch(ref requests) => {
                let responses: Vec<_> = requests
                    .iter()
                    .map(|request| request.execute(root_node, context))
                    .collect();
                GraphQLResponse {
                    is_ok: responses.iter().all(|response| response.is_ok()),
                    body: serde_json::to_vec(&responses),
                }
            }
        }
    }
}

/// A type representing the result from executing a GraphQL query.
#[derive(Debug)]
pub struct GraphQLResponse {
    is_ok: bool,
    body: serde_json::Result<Vec<u8>>,
}

impl GraphQLResponse {
    /// Converts this value into an HTTP response.
    ///
    /// The status code is `200 OK` only if all of the queries succeeded.
    pub fn into_response(self) -> Result<Response<Body>> {
        let status = if self.is_ok {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        let body = self.body?;
        Ok(Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?)
    }
}
