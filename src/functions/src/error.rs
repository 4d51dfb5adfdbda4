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

/// A malformed inbound event.
///
/// Object names that match none of the known patterns are not errors, the
/// handlers ignore them.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct EventError(EventErrorKind);

impl EventError {
    /// The payload is not valid JSON, or has an unknown shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self.0, EventErrorKind::Malformed(_))
    }

    /// A required pub/sub attribute or field is absent.
    pub fn is_missing_attribute(&self) -> bool {
        matches!(self.0, EventErrorKind::MissingAttribute(_))
    }

    /// The message data is not valid base64 or not valid UTF-8.
    pub fn is_bad_data(&self) -> bool {
        matches!(
            self.0,
            EventErrorKind::Base64(_) | EventErrorKind::Utf8(_)
        )
    }

    pub(crate) fn malformed(source: serde_json::Error) -> Self {
        Self(EventErrorKind::Malformed(source))
    }

    pub(crate) fn missing_attribute(name: &'static str) -> Self {
        Self(EventErrorKind::MissingAttribute(name))
    }

    pub(crate) fn base64(source: base64::DecodeError) -> Self {
        Self(EventErrorKind::Base64(source))
    }

    pub(crate) fn utf8(source: std::string::FromUtf8Error) -> Self {
        Self(EventErrorKind::Utf8(source))
    }
}

#[derive(thiserror::Error, Debug)]
enum EventErrorKind {
    #[error("cannot parse the event payload: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("the event is missing the `{0}` attribute")]
    MissingAttribute(&'static str),
    #[error("the message data is not valid base64: {0}")]
    Base64(#[source] base64::DecodeError),
    #[error("the message data is not valid UTF-8: {0}")]
    Utf8(#[source] std::string::FromUtf8Error),
}

/// The error returned by the handlers.
///
/// Unexpected statuses from the policy API are logged and do not surface
/// here. Transport, timeout, and signing failures do.
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Client(#[from] sdrs_client::Error),
}
