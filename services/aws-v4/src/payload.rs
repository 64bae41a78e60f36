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

use crate::constants::X_AMZ_CONTENT_SHA_256;
use bytes::BytesMut;
use http::HeaderValue;
use http_body_util::BodyExt;
use log::debug;
use reqsign_transport_core::hash::HexSha256;
use reqsign_transport_core::{body, Body, Error, Result};
use std::mem;

/// Hash the request payload and commit to it with `x-amz-content-sha256`.
///
/// The body is read to completion and replaced with a buffered body holding
/// the same bytes, so it stays readable for whoever sends the request. The
/// lowercase hex SHA-256 digest is returned and set as header value.
///
/// Reading stops at the first body error: the request must not be sent
/// then. Dropping the returned future stops reading as well.
pub async fn hash_payload(req: &mut http::Request<Body>) -> Result<String> {
    let mut stream = mem::replace(req.body_mut(), body::empty());

    let mut hasher = HexSha256::new();
    let mut buf = BytesMut::new();
    while let Some(frame) = stream.frame().await {
        let frame =
            frame.map_err(|e| Error::payload_unreadable("error hashing payload").with_source(e))?;
        // Trailers are not part of the signed payload.
        if let Ok(data) = frame.into_data() {
            hasher.update(&data);
            buf.extend_from_slice(&data);
        }
    }

    let hash = hasher.finish();
    debug!("hashed payload of {} bytes: {hash}", buf.len());

    *req.body_mut() = body::full(buf.freeze());
    req.headers_mut()
        .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&hash)?);
    Ok(hash)
}
