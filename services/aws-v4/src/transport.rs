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

use crate::constants::AWS_MODULE_ID;
use crate::payload::hash_payload;
use crate::{Credential, RequestSigner, SigningTransport};
use async_trait::async_trait;
use log::debug;
use reqsign_transport_core::utils::Redact;
use reqsign_transport_core::{
    Body, Context, Error, ModuleInfo, Provision, Replacer, Result, RoundTrip, SignRequest,
    Signer, SigningContext, TlsConfig, TlsTransport, Transport,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// AwsTransport signs every request with AWS Signature Version 4 before
/// handing it to its base transport.
///
/// All four signing fields are templates: placeholders such as
/// `{env.AWS_ACCESS_KEY_ID}` are expanded with the [`Replacer`] of each
/// request, unknown placeholders becoming empty. Nothing resolved is kept
/// between requests.
///
/// The base transport `T` is owned by this transport and created with
/// `T::default()` at provisioning if none was configured.
#[derive(Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de>"))]
pub struct AwsTransport<T> {
    /// Access key id template.
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key template.
    #[serde(default)]
    pub secret_access_key: String,
    /// Region template, e.g. `us-east-2`.
    #[serde(default)]
    pub region: String,
    /// Service template, e.g. `execute-api`.
    #[serde(default)]
    pub service: String,
    /// Base transport performing the network round trip.
    #[serde(default)]
    pub transport: Option<T>,

    #[serde(skip, default = "default_signer")]
    signer: Arc<dyn SignRequest<Credential = Credential>>,
    #[serde(skip)]
    provisioned: bool,
}

fn default_signer() -> Arc<dyn SignRequest<Credential = Credential>> {
    Arc::new(RequestSigner::new())
}

impl<T> Default for AwsTransport<T> {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: String::new(),
            service: String::new(),
            transport: None,
            signer: default_signer(),
            provisioned: false,
        }
    }
}

impl<T: Debug> Debug for AwsTransport<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsTransport")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .field("transport", &self.transport)
            .field("provisioned", &self.provisioned)
            .finish()
    }
}

impl<T: DeserializeOwned> AwsTransport<T> {
    /// Build a transport from its JSON configuration.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| Error::config_invalid("invalid aws transport configuration").with_source(e))
    }
}

impl<T> AwsTransport<T> {
    /// Create a transport from its four signing templates.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            service: service.into(),
            ..Default::default()
        }
    }

    /// Use `transport` as base transport instead of a default one.
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the SigV4 signer, mostly useful to observe signing inputs.
    pub fn with_request_signer(
        mut self,
        signer: Arc<dyn SignRequest<Credential = Credential>>,
    ) -> Self {
        self.signer = signer;
        self
    }

    /// Returns true once the transport has been provisioned.
    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    /// Resolve the per-request signing inputs.
    fn signing_context(&self, repl: &Replacer, payload_hash: String) -> SigningContext<Credential> {
        SigningContext {
            credential: Credential {
                access_key_id: repl.replace_known(&self.access_key_id, ""),
                secret_access_key: repl.replace_known(&self.secret_access_key, ""),
            },
            service: repl.replace_known(&self.service, ""),
            region: repl.replace_known(&self.region, ""),
            payload_hash,
        }
    }
}

impl<T: Transport + Default> AwsTransport<T> {
    /// Module information for this transport with `T` as base transport.
    pub fn module_info() -> ModuleInfo {
        ModuleInfo {
            id: AWS_MODULE_ID,
            new: new_module::<T>,
        }
    }
}

fn new_module<T: Transport + Default>() -> Box<dyn Transport> {
    Box::<AwsTransport<T>>::default()
}

#[async_trait]
impl<T> Provision for AwsTransport<T>
where
    T: Provision + Default + Send + Sync,
{
    async fn provision(&mut self, ctx: &Context) -> Result<()> {
        self.provisioned = false;

        let missing = [
            ("access_key_id", &self.access_key_id),
            ("secret_access_key", &self.secret_access_key),
            ("region", &self.region),
            ("service", &self.service),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(Error::config_invalid(format!(
                "some configuration values are missing: {}",
                missing.join(", ")
            )));
        }

        self.transport
            .get_or_insert_with(T::default)
            .provision(ctx)
            .await?;
        self.provisioned = true;
        debug!(
            "aws transport provisioned for service {} in region {}",
            self.service, self.region
        );
        Ok(())
    }
}

#[async_trait]
impl<T: RoundTrip> RoundTrip for AwsTransport<T> {
    async fn round_trip(
        &self,
        repl: &Replacer,
        mut req: http::Request<Body>,
    ) -> Result<http::Response<Body>> {
        let base = match (&self.transport, self.provisioned) {
            (Some(base), true) => base,
            _ => return Err(Error::config_invalid("aws transport used before provisioning")),
        };

        let payload_hash = hash_payload(&mut req).await?;
        let ctx = self.signing_context(repl, payload_hash);
        let signer = Signer::new(self.signer.clone(), ctx);

        SigningTransport::new(signer, base)
            .round_trip(repl, req)
            .await
    }
}

impl<T: TlsTransport + Default> TlsTransport for AwsTransport<T> {
    fn tls_enabled(&self) -> bool {
        self.transport.as_ref().is_some_and(T::tls_enabled)
    }

    fn enable_tls(&mut self, base: &TlsConfig) -> Result<()> {
        self.transport
            .get_or_insert_with(T::default)
            .enable_tls(base)
    }
}
