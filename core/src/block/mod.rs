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

//! Block configuration syntax.
//!
//! Transports can be configured with a small line-oriented syntax:
//!
//! ```text
//! aws {
//!     access_id {env.AWS_ACCESS_KEY_ID}
//!     secret_key {env.AWS_SECRET_ACCESS_KEY}
//!     region us-east-2
//!     service execute-api
//!     transport http {
//!         dial_timeout 5s
//!     }
//! }
//! ```
//!
//! [`Dispenser`] walks the tokens of such a block and [`UnmarshalBlock`] is
//! implemented by every type that can be configured this way.

mod dispenser;
pub use dispenser::Dispenser;

mod lexer;
pub use lexer::{tokenize, Token};

use crate::Result;

/// UnmarshalBlock fills a value from a block configuration.
///
/// The dispenser is positioned before the value's own name token. An
/// implementation must consume exactly its own tokens: the name, its
/// arguments and its block, leaving the cursor on the block's closing brace
/// (or on the last argument when there is no block).
pub trait UnmarshalBlock {
    /// Parse the block at the dispenser's cursor into `self`.
    fn unmarshal_block(&mut self, d: &mut Dispenser) -> Result<()>;
}
