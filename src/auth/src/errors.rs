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

//! Errors returned while obtaining bearer tokens.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents an error creating or signing a token.
///
/// The library never retries these errors. A signing failure is fatal for the
/// request that needed the token, the caller decides whether to try again.
///
/// # Example
/// ```
/// # use sdrs_auth::errors::Error;
/// fn report(e: &Error) {
///     if e.is_timeout() {
///         println!("the credentials service is slow: {e}");
///     } else {
///         println!("cannot get a token: {e}");
///     }
/// }
/// ```
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// The signing service (or the local key) refused to sign the claims.
    pub fn is_signing(&self) -> bool {
        matches!(self.0, ErrorKind::Signing(_))
    }

    /// The credentials service could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self.0, ErrorKind::Transport(_))
    }

    /// The request to the credentials service did not complete in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self.0, ErrorKind::Timeout(_))
    }

    /// The credentials service returned something we cannot parse.
    pub fn is_parsing(&self) -> bool {
        matches!(self.0, ErrorKind::Parsing(_))
    }

    /// The service account key file is missing, unreadable or invalid.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self.0, ErrorKind::InvalidKey(_))
    }

    /// Creates an error representing a signing failure.
    ///
    /// Custom [TokenProvider][crate::token::TokenProvider] and
    /// [AuthorizationProvider][crate::AuthorizationProvider]
    /// implementations use this to report their own failures.
    pub fn signing<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Signing(source.into()))
    }

    pub(crate) fn parsing<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Parsing(source.into()))
    }

    pub(crate) fn invalid_key<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::InvalidKey(source.into()))
    }

    /// Classifies a `reqwest` failure as a timeout or a transport problem.
    pub(crate) fn send(err: reqwest::Error) -> Error {
        match err {
            e if e.is_timeout() => Error(ErrorKind::Timeout(e.into())),
            e if e.is_decode() => Error(ErrorKind::Parsing(e.into())),
            e => Error(ErrorKind::Transport(e.into())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("failed to sign the token claims: {0}")]
    Signing(#[source] BoxError),
    #[error("cannot reach the credentials service: {0}")]
    Transport(#[source] BoxError),
    #[error("the credentials request timed out: {0}")]
    Timeout(#[source] BoxError),
    #[error("cannot parse the credentials response: {0}")]
    Parsing(#[source] BoxError),
    #[error("invalid service account key: {0}")]
    InvalidKey(#[source] BoxError),
}
