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

//! Reqwest-based base transport for reqsign-transport.
//!
//! [`HttpTransport`] performs the actual network round trip for signing
//! transports. It owns a pooled [`reqwest::Client`] built at provisioning
//! time and can be configured with TLS material, timeouts and connection
//! reuse settings.
//!
//! ## Example
//!
//! ```no_run
//! use reqsign_transport_core::{body, Context, Provision, Replacer, RoundTrip};
//! use reqsign_transport_reqwest::HttpTransport;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> reqsign_transport_core::Result<()> {
//!     let mut transport = HttpTransport::default();
//!     transport.dial_timeout = Some(Duration::from_secs(5));
//!     transport.provision(&Context::new()).await?;
//!
//!     let req = http::Request::builder()
//!         .uri("http://localhost:8080/")
//!         .body(body::empty())?;
//!     let resp = transport.round_trip(&Replacer::new(), req).await?;
//!     println!("upstream answered {}", resp.status());
//!     Ok(())
//! }
//! ```

mod transport;
pub use transport::{HttpTransport, KeepAlive};

mod unmarshal;

use reqsign_transport_core::{ModuleInfo, Transport};

/// Module id of the base transport.
pub const HTTP_MODULE_ID: &str = "http.reverse_proxy.transport.http";

/// Module information for [`HttpTransport`].
pub fn module_info() -> ModuleInfo {
    ModuleInfo {
        id: HTTP_MODULE_ID,
        new: new_module,
    }
}

fn new_module() -> Box<dyn Transport> {
    Box::<HttpTransport>::default()
}
