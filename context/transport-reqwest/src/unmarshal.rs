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

use crate::{HttpTransport, KeepAlive};
use reqsign_transport_core::block::{Dispenser, UnmarshalBlock};
use reqsign_transport_core::time::parse_duration;
use reqsign_transport_core::{Result, TlsConfig};
use std::time::Duration;

impl UnmarshalBlock for HttpTransport {
    /// Parse an `http` block:
    ///
    /// ```text
    /// http {
    ///     tls
    ///     tls_insecure_skip_verify
    ///     tls_trusted_ca_certs <pem_files...>
    ///     tls_client_auth <cert_file> <key_file>
    ///     dial_timeout <duration>
    ///     keepalive <duration>|off
    ///     keepalive_idle_conns_per_host <n>
    ///     idle_timeout <duration>
    ///     versions <versions...>
    /// }
    /// ```
    fn unmarshal_block(&mut self, d: &mut Dispenser) -> Result<()> {
        if !d.next() {
            return Err(d.err("expected 'http'"));
        }
        if d.val() != "http" {
            return Err(d.err(format!("unknown transport module '{}'", d.val())));
        }
        if d.next_arg() {
            return Err(d.arg_err());
        }

        while d.next_block(0) {
            match d.val() {
                "tls" => {
                    if d.next_arg() {
                        return Err(d.arg_err());
                    }
                    self.tls_mut();
                }
                "tls_insecure_skip_verify" => {
                    if d.next_arg() {
                        return Err(d.arg_err());
                    }
                    self.tls_mut().insecure_skip_verify = true;
                }
                "tls_trusted_ca_certs" => {
                    let files = d.remaining_args();
                    if files.is_empty() {
                        return Err(d.arg_err());
                    }
                    self.tls_mut().root_ca_pem_files = files;
                }
                "tls_client_auth" => {
                    let args = d.remaining_args();
                    let [cert, key] = <[String; 2]>::try_from(args).map_err(|_| d.arg_err())?;
                    let tls = self.tls_mut();
                    tls.client_certificate_file = Some(cert);
                    tls.client_certificate_key_file = Some(key);
                }
                "dial_timeout" => {
                    self.dial_timeout = Some(duration_arg(d)?);
                }
                "keepalive" => {
                    let arg = d.single_arg()?;
                    let ka = self.keep_alive.get_or_insert_with(KeepAlive::default);
                    if arg == "off" {
                        ka.enabled = Some(false);
                    } else {
                        ka.enabled = Some(true);
                        ka.probe_interval = Some(
                            parse_duration(&arg)
                                .map_err(|e| d.err(format!("bad duration value '{arg}': {e}")))?,
                        );
                    }
                }
                "keepalive_idle_conns_per_host" => {
                    let arg = d.single_arg()?;
                    let n = arg
                        .parse::<usize>()
                        .map_err(|_| d.err(format!("bad integer value '{arg}'")))?;
                    self.keep_alive
                        .get_or_insert_with(KeepAlive::default)
                        .max_idle_conns_per_host = Some(n);
                }
                "idle_timeout" => {
                    let timeout = duration_arg(d)?;
                    self.keep_alive
                        .get_or_insert_with(KeepAlive::default)
                        .idle_timeout = Some(timeout);
                }
                "versions" => {
                    let versions = d.remaining_args();
                    if versions.is_empty() {
                        return Err(d.arg_err());
                    }
                    self.versions = versions;
                }
                other => {
                    return Err(d.err(format!("unrecognized subdirective '{other}'")));
                }
            }
        }

        Ok(())
    }
}

impl HttpTransport {
    fn tls_mut(&mut self) -> &mut TlsConfig {
        self.tls.get_or_insert_with(TlsConfig::default)
    }
}

fn duration_arg(d: &mut Dispenser) -> Result<Duration> {
    let arg = d.single_arg()?;
    parse_duration(&arg).map_err(|e| d.err(format!("bad duration value '{arg}': {e}")))
}
