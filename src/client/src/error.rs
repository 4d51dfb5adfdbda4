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

//! The error type returned by the clients.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error returned by all the clients in this crate.
///
/// The clients report errors from multiple sources: the token machinery may
/// fail to sign a token, the transport may be unable to connect, the request
/// may time out, or the service may return an unexpected HTTP status. This
/// type offers predicates to tell these apart.
///
/// # Example
/// ```
/// use sdrs_client::Error;
/// fn report(e: &Error) {
///     match e {
///         e if e.is_timeout() => println!("not enough time {e}"),
///         e if e.http_status_code().is_some() => println!("service error {e}"),
///         e => println!("some other error {e}"),
///     }
/// }
/// ```
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// Creates an error representing an incomplete client configuration.
    pub fn configuration<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Configuration(source.into()))
    }

    /// The client builder is missing a required setting.
    pub fn is_configuration(&self) -> bool {
        matches!(self.0, ErrorKind::Configuration(_))
    }

    /// Creates an error representing a failure to obtain the bearer token.
    pub fn authentication(source: sdrs_auth::errors::Error) -> Self {
        Self(ErrorKind::Authentication(source))
    }

    /// The client could not create the `Authorization:` header.
    ///
    /// Query the [source][std::error::Error::source] for details, it is a
    /// [sdrs_auth::errors::Error].
    pub fn is_authentication(&self) -> bool {
        matches!(self.0, ErrorKind::Authentication(_))
    }

    /// Creates an error representing a timeout.
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Timeout(source.into()))
    }

    /// The request could not be completed before its deadline.
    ///
    /// The request may or may not have reached the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.0, ErrorKind::Timeout(_))
    }

    /// Creates an error representing a network problem.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Io(source.into()))
    }

    /// The request could not be sent, or the response could not be read.
    pub fn is_io(&self) -> bool {
        matches!(self.0, ErrorKind::Io(_))
    }

    /// Creates an error representing an unexpected HTTP status.
    pub fn http(status_code: u16, body: String) -> Self {
        Self(ErrorKind::Http { status_code, body })
    }

    /// The HTTP status code, if the service returned an unexpected status.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.0 {
            ErrorKind::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The response body, if the service returned an unexpected status.
    pub fn http_payload(&self) -> Option<&str> {
        match &self.0 {
            ErrorKind::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Creates an error representing a serialization problem.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Serialization(source.into()))
    }

    /// The request could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.0, ErrorKind::Serialization(_))
    }

    /// Creates an error representing a deserialization problem.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Deserialization(source.into()))
    }

    /// The response could not be deserialized.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.0, ErrorKind::Deserialization(_))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("invalid client configuration: {0}")]
    Configuration(#[source] BoxError),
    #[error("cannot create the authorization header: {0}")]
    Authentication(#[source] sdrs_auth::errors::Error),
    #[error("the request timed out: {0}")]
    Timeout(#[source] BoxError),
    #[error("cannot send the request or receive the response: {0}")]
    Io(#[source] BoxError),
    #[error("the service returned HTTP status {status_code}: {body}")]
    Http { status_code: u16, body: String },
    #[error("cannot serialize the request: {0}")]
    Serialization(#[source] BoxError),
    #[error("cannot deserialize the response: {0}")]
    Deserialization(#[source] BoxError),
}
