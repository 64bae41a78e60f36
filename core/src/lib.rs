// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Core components for signing transports.
//!
//! This crate provides the foundational types and traits shared by every
//! reqsign-transport crate.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Transport traits**: [`RoundTrip`], [`Provision`] and [`TlsTransport`],
//!   combined into [`Transport`] for host pipelines
//! - **Signing**: [`SignRequest`] implementations are bound to the inputs of
//!   one request by a [`Signer`]
//! - **Replacer**: expands `{placeholder}` templates per request
//! - **Block configuration**: [`block::Dispenser`] and [`block::UnmarshalBlock`]
//! - **Context**: file reading and environment access used at provisioning
//!
//! ## Example
//!
//! ```
//! use reqsign_transport_core::{Replacer, StaticEnv};
//! use std::collections::HashMap;
//!
//! let repl = Replacer::new().with_env(StaticEnv {
//!     envs: HashMap::from([("AWS_KEY".to_string(), "ABC123".to_string())]),
//! });
//! assert_eq!(repl.replace_known("{env.AWS_KEY}", ""), "ABC123");
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod block;
pub mod body;
pub use body::Body;
pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, FileRead, NoopEnv, NoopFileRead, OsEnv, StaticEnv};

mod replacer;
pub use replacer::Replacer;

mod transport;
pub use transport::{Provision, RoundTrip, TlsConfig, TlsTransport, Transport};

mod api;
pub use api::{SignRequest, SigningContext, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;

pub mod module;
pub use module::{ModuleInfo, Registry};
