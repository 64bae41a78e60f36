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

//! AWS Signature Version 4 signing transport.
//!
//! [`AwsTransport`] wraps a base transport and signs every request on its
//! way through:
//!
//! 1. the payload is hashed and committed to with `x-amz-content-sha256`
//!    ([`hash_payload`]),
//! 2. credential, region and service templates are expanded with the
//!    request's [`Replacer`](reqsign_transport_core::Replacer),
//! 3. a [`SigningTransport`] signs the request with a fresh signer and sends
//!    it through the base transport.
//!
//! ## Example
//!
//! ```no_run
//! use reqsign_transport_aws_v4::AwsTransport;
//! use reqsign_transport_core::{body, Context, OsEnv, Provision, Replacer, RoundTrip};
//! use reqsign_transport_reqwest::HttpTransport;
//!
//! #[tokio::main]
//! async fn main() -> reqsign_transport_core::Result<()> {
//!     let mut transport = AwsTransport::<HttpTransport>::new(
//!         "{env.AWS_ACCESS_KEY_ID}",
//!         "{env.AWS_SECRET_ACCESS_KEY}",
//!         "us-east-1",
//!         "s3",
//!     );
//!     transport.provision(&Context::new()).await?;
//!
//!     let repl = Replacer::new().with_env(OsEnv);
//!     let req = http::Request::builder()
//!         .uri("https://examplebucket.s3.amazonaws.com/test.txt")
//!         .body(body::empty())?;
//!     let resp = transport.round_trip(&repl, req).await?;
//!     println!("{}", resp.status());
//!     Ok(())
//! }
//! ```

mod constants;
pub use constants::{AWS_MODULE_ID, EMPTY_STRING_SHA256, X_AMZ_CONTENT_SHA_256};

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod payload;
pub use payload::hash_payload;

mod signing_transport;
pub use signing_transport::SigningTransport;

mod transport;
pub use transport::AwsTransport;

mod unmarshal;
