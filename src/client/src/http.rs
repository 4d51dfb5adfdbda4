// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use crate::error::Error;
use sdrs_auth::AuthorizationProvider;
use std::sync::Arc;
use std::time::Duration;

/// The status and body of a response, before any interpretation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns an error for any non-2xx status.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(Error::http(self.status, self.body))
    }

    /// Parses the body, treating an empty body as the default value.
    pub fn into_json<O: serde::de::DeserializeOwned + Default>(self) -> Result<O> {
        if self.status == 204 || self.body.trim().is_empty() {
            return Ok(O::default());
        }
        serde_json::from_str::<O>(&self.body).map_err(Error::deser)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ReqwestClient {
    inner: reqwest::Client,
    endpoint: String,
    audience: String,
    auth: Arc<dyn AuthorizationProvider>,
    timeout: Duration,
}

impl ReqwestClient {
    pub fn new(
        endpoint: String,
        audience: String,
        auth: Arc<dyn AuthorizationProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            inner: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            audience,
            auth,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn builder(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .request(method, format!("{}{path}", &self.endpoint))
    }

    /// Sends the request with the authorization header and the timeout.
    ///
    /// Only transport, timeout and authentication failures are errors, the
    /// caller decides how to interpret the HTTP status.
    pub async fn execute<I: serde::ser::Serialize>(
        &self,
        mut builder: reqwest::RequestBuilder,
        body: Option<I>,
    ) -> Result<RawResponse> {
        if let Some(body) = body {
            let payload = serde_json::to_vec(&body).map_err(Error::ser)?;
            tracing::debug!(body = %String::from_utf8_lossy(&payload), "request payload");
            builder = builder
                .header(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                )
                .body(payload);
        }
        let header = self
            .auth
            .authorization_header(&self.audience)
            .await
            .map_err(Error::authentication)?;
        builder = builder
            .header(reqwest::header::AUTHORIZATION, header)
            .timeout(self.timeout);

        let response = builder.send().await.map_err(Self::map_send_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::map_send_error)?;
        tracing::debug!(status, %body, "response");
        Ok(RawResponse { status, body })
    }

    fn map_send_error(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error::timeout(e),
            e => Error::io(e),
        }
    }
}
