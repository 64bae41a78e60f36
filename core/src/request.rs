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

use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// SigningRequest is a decomposed request head that signers can rewrite
/// freely before it is applied back onto the original request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing request from http::request::Parts.
    ///
    /// The uri and headers are moved out of `parts`; call
    /// [`apply`](Self::apply) to put them back.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing request back to http::request::Parts.
    ///
    /// Query pairs are expected to be percent encoded already.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;

        let mut paq = self.path;
        for (i, (k, v)) in self.query.iter().enumerate() {
            paq.push(if i == 0 { '?' } else { '&' });
            paq.push_str(k);
            if !v.is_empty() {
                paq.push('=');
                paq.push_str(v);
            }
        }

        let mut uri_parts = mem::take(&mut parts.uri).into_parts();
        uri_parts.scheme = Some(self.scheme);
        uri_parts.authority = Some(self.authority);
        uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        parts.uri = Uri::from_parts(uri_parts)?;

        Ok(())
    }

    /// Normalize header value by trimming surrounding whitespace and folding
    /// inner runs of spaces into one.
    pub fn header_value_normalize(v: &HeaderValue) -> Result<String> {
        let s = v.to_str()?;
        let mut out = String::with_capacity(s.len());
        for (i, word) in s.split_ascii_whitespace().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word);
        }
        Ok(out)
    }

    /// Get header names as sorted vector, skipping the ones rejected by
    /// `filter`.
    pub fn header_name_to_vec_sorted(&self, filter: impl Fn(&str) -> bool) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .filter(|k| filter(k))
            .collect::<Vec<&str>>();
        h.sort_unstable();
        h
    }
}
