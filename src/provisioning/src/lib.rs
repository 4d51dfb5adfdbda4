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

//! Provisions the pools of storage transfer jobs used by the SDRS policy
//! engine.
//!
//! For each source bucket the tool creates 25 disabled transfer jobs, see
//! [plan], and registers them with the policy API. A failure undoes the
//! completed steps, see [saga].

pub mod config;
pub mod plan;
pub mod saga;
