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

//! Handlers for the events that drive the SDRS policy API.
//!
//! Users signal their intent through specially named objects:
//!
//! - An RPO object, e.g. `dataset/.rpo/20260101_30`, sets the retention
//!   period of `gs://bucket/dataset/` to 30 days.
//! - A delete marker, e.g. `dataset/.delete_this_folder`, requests the
//!   deletion of `gs://bucket/dataset/` right away.
//! - A success marker, e.g. `dataset/_SUCCESS`, is tracked on deletion.
//!
//! The handlers parse the storage notifications, derive a
//! [RetentionEvent][event::RetentionEvent] from the object name, and use a
//! [RuleReconciler][reconciler::RuleReconciler] to update the policy API.
//! Scheduler ticks trigger the policy executor and validator.

pub mod config;
pub mod error;
pub mod event;
pub mod handlers;
pub mod reconciler;

pub use error::{EventError, HandlerError};

/// A `Result` alias where the `Err` case is [HandlerError].
pub type Result<T> = std::result::Result<T, HandlerError>;
