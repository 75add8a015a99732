use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::envelope::ApiEnvelope;
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::navigation::{Destination, Navigator};
use crate::session::SessionStore;

/// Query parameters for a request, in send order
pub type QueryParams = Vec<(String, String)>;

/// Gateway for every outbound call to the admin API.
///
/// Attaches the bearer token when one is stored and owns the only central
/// handling of authorization failures: on 401 the session is cleared first,
/// then the navigator is sent to the login entry point.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        Self::with_user_agent(
            base_url,
            timeout,
            concat!("jobboard-admin/", env!("CARGO_PKG_VERSION")),
            session,
            navigator,
        )
    }

    pub fn from_config(
        config: &AppConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        Self::with_user_agent(
            config.api.base_url.as_str(),
            Duration::from_secs(config.api.request_timeout_secs),
            config.api.user_agent.as_str(),
            session,
            navigator,
        )
    }

    pub fn with_user_agent(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> ClientResult<T> {
        let builder = self.request(Method::GET, path).query(query);
        self.send(Method::GET, path, builder).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let builder = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, builder).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, builder).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, builder).await
    }

    /// Local logout: forget the session and go to the login entry point
    pub fn logout(&self) {
        self.session.clear_session();
        self.navigator.navigate(Destination::Login);
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match self.session.get_token() {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, builder: RequestBuilder) -> ClientResult<T> {
        tracing::debug!("{} {}", method, path);

        let request = builder.build()?;
        let sent_token = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        let response = self.http.execute(request).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path, sent_token.as_deref());
            return Err(ClientError::AuthExpired);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        envelope.into_result()
    }

    /// Clears the session and redirects once per session. A 401 for a token
    /// that is no longer the stored one (an earlier 401 in the same batch
    /// already cleared it, or a new login replaced it) changes nothing.
    fn handle_unauthorized(&self, path: &str, sent_token: Option<&str>) {
        if self.session.get_token().as_deref() != sent_token {
            tracing::debug!("401 from {} for a session that is already gone", path);
            return;
        }
        tracing::warn!("401 from {}; clearing session and redirecting to login", path);
        self.session.clear_session();
        self.navigator.navigate(Destination::Login);
    }

    /// Client errors that carry a failed envelope are logical failures with
    /// the server's message. Anything else is a transport-level failure.
    fn status_error(status: StatusCode, body: &str) -> ClientError {
        let envelope = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body).ok();
        let reason = envelope.as_ref().and_then(|e| e.reason()).map(str::to_string);

        if status.is_client_error() {
            if let Some(message) = reason.clone() {
                return ClientError::logical_failure(message);
            }
        }

        let message = reason.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
        ClientError::request_failed(Some(status.as_u16()), message)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejection_is_logical() {
        let err = ApiClient::status_error(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"Title is required"}"#,
        );
        assert!(matches!(err, ClientError::LogicalFailure { .. }));
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn server_errors_are_request_failures() {
        let err = ApiClient::status_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success":false,"message":"boom"}"#,
        );
        assert_eq!(err.status_code(), Some(500));
        assert!(matches!(err, ClientError::RequestFailed { .. }));
    }

    #[test]
    fn non_json_bodies_fall_back_to_reason_phrase() {
        let err = ApiClient::status_error(StatusCode::NOT_FOUND, "<html>missing</html>");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "Request failed: Not Found");
    }

    #[test]
    fn from_config_goes_through_the_shared_builder() {
        use crate::navigation::RecordingNavigator;

        let mut config = crate::config::config().clone();
        config.api.base_url = "http://api.example.test/api/".to_string();
        config.api.user_agent = "jobboard-test".to_string();

        let client = ApiClient::from_config(
            &config,
            SessionStore::in_memory(),
            Arc::new(RecordingNavigator::new()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://api.example.test/api");

        let client = ApiClient::new(
            "http://localhost:5000/api",
            Duration::from_secs(1),
            SessionStore::in_memory(),
            Arc::new(RecordingNavigator::new()),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }
}
