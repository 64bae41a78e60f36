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

use crate::time::{now, DateTime};
use crate::{Result, SignRequest, SigningContext, SigningCredential};
use std::sync::Arc;

/// Signer binds a [`SignRequest`] implementation to the inputs of a single
/// request.
///
/// A signer is cheap to build and is meant to be thrown away after use:
/// credentials, service and region may differ from one request to the next.
#[derive(Debug)]
pub struct Signer<K: SigningCredential> {
    builder: Arc<dyn SignRequest<Credential = K>>,
    ctx: SigningContext<K>,
    time: Option<DateTime>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(builder: Arc<dyn SignRequest<Credential = K>>, ctx: SigningContext<K>) -> Self {
        Self {
            builder,
            ctx,
            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Inputs this signer is bound to.
    pub fn context(&self) -> &SigningContext<K> {
        &self.ctx
    }

    /// Sign the request head.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let now = self.time.unwrap_or_else(now);
        self.builder.sign_request(req, &self.ctx, now).await
    }
}
