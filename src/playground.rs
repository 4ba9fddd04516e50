//! Rendering of the GraphQL Playground page.

/// The version of the GraphQL Playground bundle served by default.
pub const DEFAULT_VERSION: &str = "1.4.0";

/// The parameters of a generated GraphQL Playground page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundConfig<'a> {
    /// The URL of the GraphQL endpoint.
    pub endpoint: &'a str,
    /// The URL of the endpoint for subscriptions.
    pub subscriptions_endpoint: &'a str,
    /// The version of the Playground bundle loaded from the CDN.
    #[serde(skip)]
    pub version: &'a str,
}

impl<'a> PlaygroundConfig<'a> {
    #[allow(missing_docs)]
    pub fn new(endpoint: &'a str, subscriptions_endpoint: &'a str) -> PlaygroundConfig<'a> {
        PlaygroundConfig {
            endpoint,
            subscriptions_endpoint,
            version: DEFAULT_VERSION,
        }
    }
}

/// Generates the HTML source of the GraphQL Playground page.
pub fn render_playground_page(config: &PlaygroundConfig<'_>) -> String {
    // serializing to JSON escapes quotes; `<` is escaped as well so that the
    // options cannot close the surrounding script element.
    let options = serde_json::to_string(config)
        .unwrap_or_else(|_| String::from("{}"))
        .replace('<', "\\u003c");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset=utf-8/>
  <meta name="viewport" content="user-scalable=no, initial-scale=1.0, minimum-scale=1.0, maximum-scale=1.0, minimal-ui">
  <title>GraphQL Playground</title>
  <link rel="stylesheet" href="//cdn.jsdelivr.net/npm/graphql-playground-react@{version}/build/static/css/index.css" />
  <link rel="shortcut icon" href="//cdn.jsdelivr.net/npm/graphql-playground-react@{version}/build/favicon.png" />
  <script src="//cdn.jsdelivr.net/npm/graphql-playground-react@{version}/build/static/js/middleware.js"></script>
</head>
<body>
  <div id="root">
    <div class="loading">Loading <span class="title">GraphQL Playground</span></div>
  </div>
  <script>
    window.addEventListener('load', function (event) {{
      GraphQLPlayground.init(document.getElementById('root'), {options})
    }})
  </script>
</body>
</html>
"#,
        version = config.version,
        options = options,
    )
}
