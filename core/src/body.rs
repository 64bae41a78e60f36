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

//! Request and response bodies passed between transports.

use crate::Error;
use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};

/// Body is the streaming body type shared by every transport.
///
/// It is boxed so that transports can be stacked without leaking the concrete
/// body types of their neighbours.
pub type Body = UnsyncBoxBody<Bytes, Error>;

/// Create a body without any content.
pub fn empty() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Create a body that yields the given bytes once.
///
/// Bytes are reference counted, so the returned body is cheap to rebuild
/// from the same buffer as many times as needed.
pub fn full(content: impl Into<Bytes>) -> Body {
    Full::new(content.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Read the whole body into memory.
pub async fn collect(body: Body) -> crate::Result<Bytes> {
    Ok(body.collect().await?.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_full() {
        let bs = collect(full("Hello, World!")).await.unwrap();
        assert_eq!(bs, Bytes::from_static(b"Hello, World!"));
    }

    #[tokio::test]
    async fn test_collect_empty() {
        let bs = collect(empty()).await.unwrap();
        assert!(bs.is_empty());
    }
}
