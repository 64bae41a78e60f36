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

use crate::Credential;
use log::debug;
use reqsign_transport_core::{Body, Error, Replacer, Result, RoundTrip, Signer};

/// SigningTransport signs a request and sends it through a base transport.
///
/// It is built for exactly one request: the signer it holds is bound to the
/// credential, service and region resolved for that request.
#[derive(Debug)]
pub struct SigningTransport<'a, T: RoundTrip + ?Sized> {
    signer: Signer<Credential>,
    base: &'a T,
}

impl<'a, T: RoundTrip + ?Sized> SigningTransport<'a, T> {
    /// Create a signing transport around `base`.
    pub fn new(signer: Signer<Credential>, base: &'a T) -> Self {
        Self { signer, base }
    }

    /// Sign `req` and send it.
    ///
    /// Errors of the base transport are returned unchanged.
    pub async fn round_trip(
        &self,
        repl: &Replacer,
        req: http::Request<Body>,
    ) -> Result<http::Response<Body>> {
        let (mut parts, body) = req.into_parts();
        self.signer
            .sign(&mut parts)
            .await
            .map_err(|e| Error::signing_failed("error signing request").with_source(e))?;
        debug!(
            "signed {} {} for {}/{}",
            parts.method,
            parts.uri,
            self.signer.context().service,
            self.signer.context().region
        );

        self.base
            .round_trip(repl, http::Request::from_parts(parts, body))
            .await
    }
}
