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

use crate::block::UnmarshalBlock;
use crate::{Body, Context, Replacer, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

/// RoundTrip executes a single HTTP request and returns its response.
///
/// The replacer carries the per-request placeholder values supplied by the
/// host pipeline. Transports that have nothing to resolve simply ignore it.
///
/// Implementations must be safe to call concurrently: the host pipeline
/// shares one provisioned transport between all in-flight requests.
/// Dropping the returned future cancels the round trip.
#[async_trait]
pub trait RoundTrip: Debug + Send + Sync + 'static {
    /// Send the request and wait for the response head.
    async fn round_trip(
        &self,
        repl: &Replacer,
        req: http::Request<Body>,
    ) -> Result<http::Response<Body>>;
}

/// Provision validates a configured transport and prepares it for serving.
///
/// Provisioning happens once, before the first request. A transport that
/// failed to provision must never serve traffic.
#[async_trait]
pub trait Provision: Send {
    /// Validate the configuration and build runtime state.
    async fn provision(&mut self, ctx: &Context) -> Result<()>;
}

/// TlsTransport is implemented by transports that can dial upstreams over
/// TLS.
///
/// The host pipeline uses it to switch TLS on for upstreams that need it
/// without knowing which concrete transport it holds.
pub trait TlsTransport {
    /// Returns true if the transport talks TLS to the upstream.
    fn tls_enabled(&self) -> bool;

    /// Enable TLS, using `base` as the starting configuration.
    ///
    /// Must be called before provisioning.
    fn enable_tls(&mut self, base: &TlsConfig) -> Result<()>;
}

/// TlsConfig holds the TLS settings used to dial an upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsConfig {
    /// PEM files holding extra certificate authorities to trust.
    pub root_ca_pem_files: Vec<String>,
    /// PEM file holding the client certificate for mutual TLS.
    pub client_certificate_file: Option<String>,
    /// PEM file holding the private key of the client certificate.
    pub client_certificate_key_file: Option<String>,
    /// Skip verification of the upstream's certificate chain and host name.
    pub insecure_skip_verify: bool,
}

/// Transport is everything a host pipeline needs from a loadable transport
/// module.
///
/// It is implemented automatically for every type providing the individual
/// capabilities.
pub trait Transport: RoundTrip + Provision + TlsTransport + UnmarshalBlock {}

impl<T> Transport for T where T: RoundTrip + Provision + TlsTransport + UnmarshalBlock {}
