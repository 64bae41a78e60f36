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

use crate::time::DateTime;
use crate::Result;
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

/// SigningContext carries every input needed to sign one request.
///
/// It is derived fresh from the transport configuration for each request
/// and dropped once the request has been signed.
#[derive(Debug, Clone)]
pub struct SigningContext<K> {
    /// Credential resolved for this request.
    pub credential: K,
    /// Service namespace, e.g. `s3` or `execute-api`.
    pub service: String,
    /// Region, e.g. `us-east-2`.
    pub region: String,
    /// Lowercase hex SHA-256 digest of the exact payload being sent.
    pub payload_hash: String,
}

/// SignRequest is the trait used by signer to sign the request.
///
/// Implementations receive the request head only: the payload is committed
/// to through [`SigningContext::payload_hash`].
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Sign the request in place.
    ///
    /// `now` is the signing time; implementations must not read the clock
    /// themselves.
    async fn sign_request(
        &self,
        req: &mut http::request::Parts,
        ctx: &SigningContext<Self::Credential>,
        now: DateTime,
    ) -> Result<()>;
}
