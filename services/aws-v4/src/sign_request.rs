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

use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, IGNORED_HEADERS, X_AMZ_DATE};
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::{debug, warn};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use reqsign_transport_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use reqsign_transport_core::time::{format_date, format_iso8601, DateTime};
use reqsign_transport_core::{
    Error, Result, SignRequest, SigningContext, SigningCredential, SigningRequest,
};
use std::fmt::Write;

/// RequestSigner signs requests with AWS Signature Version 4.
///
/// The signature is carried by the `Authorization` header. Service, region
/// and credential are taken from the [`SigningContext`] of every call, so
/// one signer serves any number of differently configured requests.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new AWS V4 signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        req: &mut Parts,
        ctx: &SigningContext<Self::Credential>,
        now: DateTime,
    ) -> Result<()> {
        let cred = &ctx.credential;
        if !cred.is_valid() {
            warn!("signing request with incomplete credential: {cred:?}");
        }

        let mut signed_req = SigningRequest::build(req)?;

        canonicalize_header(&mut signed_req, now)?;
        canonicalize_query(&mut signed_req);

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req, &ctx.payload_hash)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            ctx.region,
            ctx.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "AWS4-HMAC-SHA256")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &ctx.region, &ctx.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            signed_header_names(&signed_req).join(";"),
            signature
        ))
        .map_err(|e| {
            Error::signing_failed("failed to create authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn signed_header_names(req: &SigningRequest) -> Vec<&str> {
    req.header_name_to_vec_sorted(|k| !IGNORED_HEADERS.contains(&k))
}

fn canonical_request_string(req: &SigningRequest, payload_hash: &str) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path, every segment is encoded exactly once.
    let path = percent_decode_str(&req.path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid("failed to decode path").with_source(e))?;
    let path = if path.is_empty() { "/".into() } else { path };
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    // Insert query
    writeln!(
        f,
        "{}",
        req.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers
    let signed_headers = signed_header_names(req);
    for name in signed_headers.iter() {
        let values = req
            .headers
            .get_all(*name)
            .iter()
            .map(SigningRequest::header_value_normalize)
            .collect::<Result<Vec<_>>>()?;
        writeln!(f, "{}:{}", name, values.join(","))?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}

fn canonicalize_header(req: &mut SigningRequest, now: DateTime) -> Result<()> {
    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        req.headers
            .insert(header::HOST, req.authority.as_str().parse()?);
    }

    // Set DATE header, replacing any value sent by the client.
    req.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

    Ok(())
}

fn canonicalize_query(req: &mut SigningRequest) {
    if req.query.is_empty() {
        return;
    }

    // Sort by param name
    req.query.sort();

    req.query = req
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
