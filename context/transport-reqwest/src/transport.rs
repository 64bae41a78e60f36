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

use async_trait::async_trait;
use http::uri::Scheme;
use http::Uri;
use http_body_util::BodyExt;
use log::debug;
use reqsign_transport_core::time::serde_duration;
use reqsign_transport_core::{
    body, Body, Context, Error, Provision, Replacer, Result, RoundTrip, TlsConfig, TlsTransport,
};
use reqwest::{Certificate, Client, Identity};
use serde::Deserialize;
use std::time::Duration;

/// HttpTransport is the base transport performing the actual network I/O.
///
/// It is configured first (struct literal, JSON or block syntax), then
/// provisioned once, which builds a pooled [`reqwest::Client`]. The
/// provisioned transport is shared by all concurrent requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpTransport {
    /// TLS settings. Setting this enables TLS to the upstream: `http`
    /// upstream URLs are dialed as `https`.
    pub tls: Option<TlsConfig>,
    /// Maximum time to wait for a connection to be established.
    #[serde(with = "serde_duration")]
    pub dial_timeout: Option<Duration>,
    /// Connection reuse settings.
    pub keep_alive: Option<KeepAlive>,
    /// Allowed HTTP versions: `1.1` and/or `2`. Empty allows both.
    pub versions: Vec<String>,

    #[serde(skip)]
    client: Option<Client>,
}

/// KeepAlive controls connection pooling of the [`HttpTransport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeepAlive {
    /// Set to `false` to close connections after every request.
    pub enabled: Option<bool>,
    /// Interval between TCP keep-alive probes.
    #[serde(with = "serde_duration")]
    pub probe_interval: Option<Duration>,
    /// Maximum idle connections kept per upstream host.
    pub max_idle_conns_per_host: Option<usize>,
    /// How long an idle connection stays in the pool.
    #[serde(with = "serde_duration")]
    pub idle_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Returns true once the transport has been provisioned.
    pub fn is_provisioned(&self) -> bool {
        self.client.is_some()
    }

    /// Compute the uri actually dialed for `uri`.
    fn upstream_uri(&self, uri: Uri) -> Result<Uri> {
        if !self.tls_enabled() || uri.scheme() != Some(&Scheme::HTTP) {
            return Ok(uri);
        }

        let mut parts = uri.into_parts();
        parts.scheme = Some(Scheme::HTTPS);
        Ok(Uri::from_parts(parts)?)
    }

    async fn build_client(&self, ctx: &Context) -> Result<Client> {
        let mut builder = Client::builder();

        if let Some(d) = self.dial_timeout {
            builder = builder.connect_timeout(d);
        }

        if let Some(ka) = &self.keep_alive {
            if ka.enabled == Some(false) {
                builder = builder.pool_max_idle_per_host(0);
            } else {
                if let Some(d) = ka.probe_interval {
                    builder = builder.tcp_keepalive(d);
                }
                if let Some(n) = ka.max_idle_conns_per_host {
                    builder = builder.pool_max_idle_per_host(n);
                }
                if let Some(d) = ka.idle_timeout {
                    builder = builder.pool_idle_timeout(d);
                }
            }
        }

        let allows = |v: &str| self.versions.iter().any(|x| x == v);
        if let Some(v) = self.versions.iter().find(|v| !matches!(v.as_str(), "1.1" | "2")) {
            return Err(Error::config_invalid(format!("unsupported HTTP version '{v}'")));
        }
        match (allows("1.1"), allows("2")) {
            (true, false) => builder = builder.http1_only(),
            (false, true) => builder = builder.http2_prior_knowledge(),
            _ => {}
        }

        if let Some(tls) = &self.tls {
            builder = builder.use_rustls_tls();
            for path in &tls.root_ca_pem_files {
                let pem = ctx.file_read(path).await?;
                let cert = Certificate::from_pem(&pem).map_err(|e| {
                    Error::config_invalid(format!("invalid CA certificate '{path}'")).with_source(e)
                })?;
                builder = builder.add_root_certificate(cert);
            }

            match (
                &tls.client_certificate_file,
                &tls.client_certificate_key_file,
            ) {
                (Some(cert), Some(key)) => {
                    let mut pem = ctx.file_read(key).await?;
                    pem.push(b'\n');
                    pem.extend(ctx.file_read(cert).await?);
                    let identity = Identity::from_pem(&pem).map_err(|e| {
                        Error::config_invalid(format!("invalid client certificate '{cert}'"))
                            .with_source(e)
                    })?;
                    builder = builder.identity(identity);
                }
                (None, None) => {}
                _ => {
                    return Err(Error::config_invalid(
                        "client certificate and key must be configured together",
                    ))
                }
            }

            if tls.insecure_skip_verify {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))
    }
}

#[async_trait]
impl Provision for HttpTransport {
    async fn provision(&mut self, ctx: &Context) -> Result<()> {
        let client = self.build_client(ctx).await?;
        debug!(
            "http transport provisioned: tls={}, versions={:?}",
            self.tls_enabled(),
            self.versions
        );
        self.client = Some(client);
        Ok(())
    }
}

impl TlsTransport for HttpTransport {
    fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    fn enable_tls(&mut self, base: &TlsConfig) -> Result<()> {
        if self.is_provisioned() {
            return Err(Error::config_invalid(
                "TLS must be enabled before the transport is provisioned",
            ));
        }
        self.tls = Some(base.clone());
        Ok(())
    }
}

#[async_trait]
impl RoundTrip for HttpTransport {
    async fn round_trip(
        &self,
        _: &Replacer,
        req: http::Request<Body>,
    ) -> Result<http::Response<Body>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| Error::config_invalid("http transport used before provisioning"))?;

        let (mut parts, body) = req.into_parts();
        parts.uri = self.upstream_uri(parts.uri)?;
        // The body is usually buffered already by the signing layer, so this
        // is a cheap move of the underlying bytes.
        let body = body::collect(body).await?;

        let req = reqwest::Request::try_from(http::Request::from_parts(parts, body))
            .map_err(|e| Error::request_invalid("invalid upstream request").with_source(e))?;
        debug!("sending {} {}", req.method(), req.url());

        let resp: http::Response<reqwest::Body> = client
            .execute(req)
            .await
            .map_err(|e| Error::transport("error sending request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let body = body
            .map_err(|e| Error::transport("error reading response body").with_source(e))
            .boxed_unsync();
        Ok(http::Response::from_parts(parts, body))
    }
}
