use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::{
    auth::Credentials,
    domain::{CourseClass, Post, UserStatus},
};

const PIAZZA_API_URL: &str = "https://piazza.com/logic/api";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client for the Piazza JSON-RPC API.
///
/// Piazza exposes a single endpoint; every call posts an envelope of
/// `{"method": ..., "params": ...}` and authentication is a session cookie
/// set by `user.login`. The cookie jar lives in the underlying reqwest
/// client, so one `PiazzaClient` holds one session.
#[derive(Clone)]
pub struct PiazzaClient {
    http: reqwest::Client,
}

impl PiazzaClient {
    pub fn new() -> Result<Self, PiazzaError> {
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::new(reqwest::cookie::Jar::default()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PiazzaError::Request(e.to_string()))?;

        Ok(Self { http })
    }

    /// Authenticate and store the session cookie for subsequent calls.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), PiazzaError> {
        // A successful login carries a null result, so only the error
        // field of the envelope matters here.
        let _ = self
            .call::<serde_json::Value>(
                "user.login",
                json!({
                    "email": credentials.email,
                    "pass": credentials.password,
                }),
            )
            .await?;

        tracing::debug!(email = %credentials.email, "logged in to Piazza");
        Ok(())
    }

    /// Classes the logged-in user is enrolled in.
    pub async fn user_classes(&self) -> Result<Vec<CourseClass>, PiazzaError> {
        let status: UserStatus = self
            .call("user.status", json!({}))
            .await?
            .ok_or_else(|| PiazzaError::Parsing("user.status returned no result".into()))?;

        Ok(status.networks)
    }

    /// Fetch a single post by its number within a class network.
    ///
    /// Returns `Ok(None)` when the post number does not exist.
    pub async fn post(&self, nid: &str, post_number: i32) -> Result<Option<Post>, PiazzaError> {
        let result = self
            .call::<Post>("content.get", json!({ "cid": post_number, "nid": nid }))
            .await;

        match result {
            Ok(post) => Ok(post),
            Err(PiazzaError::Api { message, .. }) if message.contains("does not exist") => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, PiazzaError> {
        let envelope = RpcRequest { method, params };

        let resp = self
            .http
            .post(format!("{}?method={}", PIAZZA_API_URL, method))
            .json(&envelope)
            .send()
            .await
            .map_err(|e| PiazzaError::Request(e.to_string()))?;

        if resp.status() == 401 || resp.status() == 403 {
            return Err(PiazzaError::Unauthorized);
        }

        let response: RpcResponse<T> = resp.json().await.map_err(|e| {
            PiazzaError::Parsing(format!("failed to parse {} response: {}", method, e))
        })?;

        response.into_result(method)
    }
}

#[derive(Debug, Error)]
pub enum PiazzaError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("RequestError: {0}")]
    Request(String),
    #[error("ApiError from {method}: {message}")]
    Api { method: String, message: String },
    #[error("ParsingError: {0}")]
    Parsing(String),
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    params: serde_json::Value,
}

/// Generic response envelope: exactly one of `result` and `error` is set,
/// except for calls like `user.login` where success is a null result.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> RpcResponse<T> {
    fn into_result(self, method: &str) -> Result<Option<T>, PiazzaError> {
        match self.error {
            Some(message) => Err(PiazzaError::Api {
                method: method.to_string(),
                message,
            }),
            None => Ok(self.result),
        }
    }
}
