// SPDX-License-Identifier: Apache-2.0

//! Authenticated Bugsnag API client.
//!
//! Issues GET requests against the configured API endpoint using either
//! HTTP Basic credentials or a `token` authorization header, and maps
//! every non-200 response to [`BugsnagError::UnexpectedResponse`].
//!
//! Request futures are cancel-safe: dropping one aborts the in-flight call.

use std::fmt::Write as _;
use std::time::Duration;

use bon::Builder;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Request, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{ApiError, BugsnagError, ErrorBody};
use crate::types::{AuthType, Organization, User};

/// Default connect timeout of the client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Width of the separator printed under debug headings.
const SEPARATOR_WIDTH: usize = 60;

/// Settings for constructing a [`Client`].
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// API base URL.
    #[builder(into)]
    pub api_endpoint: String,
    /// Login, used as the Basic auth user name.
    #[builder(into, default)]
    pub login: String,
    /// API token.
    #[builder(default = SecretString::from(String::new()))]
    pub api_token: SecretString,
    /// Authentication scheme.
    #[builder(default)]
    pub auth_type: AuthType,
    /// Accept invalid TLS certificates.
    #[builder(default)]
    pub insecure: bool,
    /// Dump requests and responses to stdout.
    #[builder(default)]
    pub debug: bool,
    /// Connect timeout.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

/// Bugsnag API client.
///
/// Build it once per process and pass it to whatever needs it.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_endpoint: String,
    login: String,
    api_token: SecretString,
    auth_type: AuthType,
    debug: bool,
}

impl Client {
    /// Creates a new client.
    ///
    /// Strips a trailing `/` from the endpoint. Proxy settings are taken
    /// from the standard `HTTP(S)_PROXY` environment variables.
    pub fn new(config: ClientConfig) -> Result<Self, BugsnagError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        let api_endpoint = config
            .api_endpoint
            .strip_suffix('/')
            .unwrap_or(&config.api_endpoint)
            .to_string();

        Ok(Self {
            http,
            api_endpoint,
            login: config.login,
            api_token: config.api_token,
            auth_type: config.auth_type,
            debug: config.debug,
        })
    }

    /// API base URL without trailing slash.
    #[must_use]
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Sends an authenticated GET request.
    ///
    /// `path` must start with `/` and may carry a query string. Headers
    /// are applied verbatim before authentication.
    #[instrument(skip(self, headers), fields(endpoint = %self.api_endpoint))]
    pub async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response, BugsnagError> {
        let url = format!("{}{path}", self.api_endpoint);

        let mut builder = self.http.get(&url);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder = match self.auth_type {
            AuthType::Basic => {
                builder.basic_auth(&self.login, Some(self.api_token.expose_secret()))
            }
            AuthType::Token => builder.header(
                AUTHORIZATION,
                format!("token {}", self.api_token.expose_secret()),
            ),
        };

        let request = builder.build()?;
        let request_dump = self.debug.then(|| dump_request(&request));

        debug!(url = %url, "Sending request");
        let result = self.http.execute(request).await;

        if let Some(request_dump) = request_dump {
            let response_dump = result.as_ref().map(dump_response).unwrap_or_default();
            print_dump("Request Details", &request_dump);
            print_dump("Response Details", &response_dump);
        }

        Ok(result?)
    }

    /// Fetches the authenticated user from `/user`.
    pub async fn me(&self) -> Result<User, BugsnagError> {
        let res = expect_ok(self.get("/user", &[]).await?).await?;
        decode(res).await
    }

    /// Fetches the organizations the user belongs to from `/user/organizations`.
    pub async fn organizations(&self) -> Result<Vec<Organization>, BugsnagError> {
        let res = expect_ok(self.get("/user/organizations", &[]).await?).await?;
        let body = res.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(BugsnagError::EmptyResponse);
        }
        serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, "Failed to decode organizations");
            BugsnagError::UnexpectedResponseFormat
        })
    }
}

/// Passes 200 responses through and converts everything else to an [`ApiError`].
async fn expect_ok(res: Response) -> Result<Response, BugsnagError> {
    if res.status() == StatusCode::OK {
        return Ok(res);
    }
    Err(BugsnagError::UnexpectedResponse(unexpected_response(res).await))
}

/// Builds an [`ApiError`], ignoring body decoding failures.
async fn unexpected_response(res: Response) -> ApiError {
    let status = res.status();
    let status_text = match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    };

    let body = match res.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes).unwrap_or_default(),
        Err(_) => ErrorBody::default(),
    };

    ApiError {
        status_text,
        status_code: status.as_u16(),
        body,
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, BugsnagError> {
    let body = res.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Failed to decode response body");
        BugsnagError::UnexpectedResponseFormat
    })
}

fn dump_request(req: &Request) -> String {
    let url = req.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = format!("{} {target} HTTP/1.1\r\n", req.method());
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => {
                let _ = write!(out, "Host: {host}:{port}\r\n");
            }
            None => {
                let _ = write!(out, "Host: {host}\r\n");
            }
        }
    }
    write_headers(&mut out, req.headers());
    out.push_str("\r\n");
    if let Some(body) = req.body().and_then(reqwest::Body::as_bytes) {
        out.push_str(&String::from_utf8_lossy(body));
    }
    out
}

fn dump_response(res: &Response) -> String {
    let mut out = format!("{:?} {}\r\n", res.version(), res.status());
    write_headers(&mut out, res.headers());
    out.push_str("\r\n");
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if name == AUTHORIZATION {
            "[REDACTED]"
        } else {
            value.to_str().unwrap_or("[binary]")
        };
        let _ = write!(out, "{name}: {value}\r\n");
    }
}

fn format_dump(heading: &str, data: &str) -> String {
    format!(
        "\n\n{}\n{}\n\n{data}",
        heading.to_uppercase(),
        "-".repeat(SEPARATOR_WIDTH)
    )
}

fn print_dump(heading: &str, data: &str) {
    print!("{}", format_dump(heading, data));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, auth_type: AuthType) -> Client {
        Client::new(
            ClientConfig::builder()
                .api_endpoint(format!("{}/", server.uri()))
                .login("alice@example.com")
                .api_token(SecretString::from("secret"))
                .auth_type(auth_type)
                .timeout(Duration::from_secs(3))
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let client = Client::new(
            ClientConfig::builder()
                .api_endpoint("https://api.example.com/")
                .build(),
        )
        .unwrap();
        assert_eq!(client.api_endpoint(), "https://api.example.com");
    }

    #[tokio::test]
    async fn test_get_applies_path_query_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/organizations"))
            .and(query_param("per_page", "1"))
            .and(header("Content-Type", "application/json"))
            .and(header("Authorization", "token secret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthType::Token);
        let res = client
            .get(
                "/user/organizations?per_page=1",
                &[("Content-Type", "application/json")],
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_uses_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header(
                "Authorization",
                "Basic YWxpY2VAZXhhbXBsZS5jb206c2VjcmV0",
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, AuthType::Basic);
        let res = client.get("/user", &[]).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_me_decodes_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"displayName": "User A", "email": "user@bugsnag.com"})),
            )
            .mount(&server)
            .await;

        let user = client_for(&server, AuthType::Token).me().await.unwrap();
        assert_eq!(
            user,
            User {
                display_name: "User A".to_string(),
                email: "user@bugsnag.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_me_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let err = client_for(&server, AuthType::Token).me().await.unwrap_err();
        match err {
            BugsnagError::UnexpectedResponse(api) => {
                assert_eq!(api.status_code, 400);
                assert_eq!(api.status_text, "400 Bad Request");
                assert!(api.body.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_organizations_decodes_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/organizations"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error_messages": ["invalid token"]})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, AuthType::Token)
            .organizations()
            .await
            .unwrap_err();
        match err {
            BugsnagError::UnexpectedResponse(api) => {
                assert_eq!(api.status_text, "401 Unauthorized");
                assert_eq!(api.body.error_messages, vec!["invalid token"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_organizations_decodes_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "o1", "name": "Acme", "slug": "acme", "projects_url": "https://api.example.com/organizations/o1/projects"},
                {"id": "o2", "name": "Globex", "slug": "globex", "projects_url": "https://api.example.com/organizations/o2/projects"}
            ])))
            .mount(&server)
            .await;

        let orgs = client_for(&server, AuthType::Token)
            .organizations()
            .await
            .unwrap();
        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[0].name, "Acme");
        assert_eq!(orgs[1].slug, "globex");
    }

    #[tokio::test]
    async fn test_organizations_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/organizations"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client_for(&server, AuthType::Token)
            .organizations()
            .await
            .unwrap_err();
        assert!(matches!(err, BugsnagError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_organizations_unexpected_format() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "o1"})))
            .mount(&server)
            .await;

        let err = client_for(&server, AuthType::Token)
            .organizations()
            .await
            .unwrap_err();
        assert!(matches!(err, BugsnagError::UnexpectedResponseFormat));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let client = Client::new(
            ClientConfig::builder()
                .api_endpoint("http://127.0.0.1:1")
                .timeout(Duration::from_secs(1))
                .build(),
        )
        .unwrap();

        let err = client.me().await.unwrap_err();
        assert!(matches!(err, BugsnagError::Network(_)));
    }

    #[test]
    fn test_dump_request_redacts_token() {
        let http = reqwest::Client::new();
        let request = http
            .get("https://api.example.com/user?per_page=1")
            .header(AUTHORIZATION, "token secret")
            .build()
            .unwrap();

        let dump = dump_request(&request);
        assert!(dump.starts_with("GET /user?per_page=1 HTTP/1.1\r\n"));
        assert!(dump.contains("Host: api.example.com\r\n"));
        assert!(dump.contains("authorization: [REDACTED]"));
        assert!(!dump.contains("secret"));
    }

    #[tokio::test]
    async fn test_dump_response_has_status_line_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).insert_header("x-request-id", "r-1"))
            .mount(&server)
            .await;

        let response = reqwest::get(server.uri()).await.unwrap();
        let dump = dump_response(&response);

        assert!(dump.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(dump.contains("x-request-id: r-1\r\n"));
        assert!(dump.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_format_dump_heading_and_separator() {
        let out = format_dump("Request Details", "GET / HTTP/1.1\r\n");
        let expected = format!(
            "\n\nREQUEST DETAILS\n{}\n\nGET / HTTP/1.1\r\n",
            "-".repeat(60)
        );
        assert_eq!(out, expected);
    }
}
