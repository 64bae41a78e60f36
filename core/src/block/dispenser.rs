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

use super::lexer::{tokenize, Token};
use crate::{Error, Result};
use std::sync::Arc;

/// Dispenser hands out the tokens of a block configuration one at a time.
///
/// The cursor starts before the first token. Parsers move it with
/// [`next`](Self::next), [`next_arg`](Self::next_arg) and
/// [`next_block`](Self::next_block) and read the current token with
/// [`val`](Self::val). Tokens are never removed, so a dispenser can be
/// [`reset`](Self::reset) and read again.
///
/// ```
/// use reqsign_transport_core::block::Dispenser;
///
/// let mut d = Dispenser::new("Testfile", "aws {\n region us-east-1\n}").unwrap();
/// assert!(d.next());
/// assert_eq!(d.val(), "aws");
/// assert!(d.next_block(0));
/// assert_eq!(d.val(), "region");
/// assert!(d.next_arg());
/// assert_eq!(d.val(), "us-east-1");
/// assert!(!d.next_block(0));
/// ```
#[derive(Debug, Clone)]
pub struct Dispenser {
    file: Arc<str>,
    tokens: Vec<Token>,
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    /// Tokenize `input` and create a dispenser over it.
    ///
    /// `file` is only used to prefix error messages.
    pub fn new(file: &str, input: &str) -> Result<Self> {
        let tokens = tokenize(input)
            .map_err(|e| Error::config_invalid(format!("{file}: {e}")).with_source(e))?;
        Ok(Self::from_tokens(file, tokens))
    }

    /// Create a dispenser over already tokenized input.
    pub fn from_tokens(file: &str, tokens: Vec<Token>) -> Self {
        Self {
            file: file.into(),
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Move the cursor to the beginning, before the first token.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.nesting = 0;
    }

    /// Load the next token. Returns false at the end of the input.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Move the cursor back by one token. Returns false at the beginning.
    pub fn prev(&mut self) -> bool {
        match self.cursor {
            Some(0) | None => {
                self.cursor = None;
                false
            }
            Some(c) => {
                self.cursor = Some(c - 1);
                true
            }
        }
    }

    /// Load the next token if it is an argument of the current line.
    ///
    /// Arguments live on the same line as the current token. A block opening
    /// brace is not an argument, so `next_arg` stops in front of it.
    pub fn next_arg(&mut self) -> bool {
        match self.peek_same_line() {
            Some(t) if !t.is_open() => self.next(),
            _ => false,
        }
    }

    /// Drive a loop over the entries of a block.
    ///
    /// Call it with the nesting level at which the block's owner token
    /// lives, usually `0`, as the condition of a `while` loop. The first
    /// call expects a `{` on the current line and enters the block; every
    /// following call loads the next token and returns false once the
    /// matching `}` has been consumed. Nested blocks that the loop body does
    /// not handle are walked through transparently.
    pub fn next_block(&mut self, initial_nesting: usize) -> bool {
        if self.nesting > initial_nesting {
            if !self.next() {
                return false;
            }
            let token = self.current();
            if token.is_some_and(Token::is_close) {
                self.nesting -= 1;
            } else if token.is_some_and(Token::is_open) {
                self.nesting += 1;
            }
            return self.nesting > initial_nesting;
        }

        match self.peek_same_line() {
            Some(t) if t.is_open() => {
                self.next();
            }
            _ => return false,
        }
        // Consume the opening brace, stop right away on an empty block.
        if !self.next() || self.current().is_some_and(Token::is_close) {
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Current nesting depth.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Text of the current token, empty if there is none.
    pub fn val(&self) -> &str {
        self.current().map_or("", |t| t.text.as_str())
    }

    /// Line of the current token, `0` if there is none.
    pub fn line(&self) -> usize {
        self.current().map_or(0, |t| t.line)
    }

    /// Returns true if the current token is a block opening brace.
    pub fn is_open(&self) -> bool {
        self.current().is_some_and(Token::is_open)
    }

    /// Load all remaining arguments of the current line.
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            args.push(self.val().to_string());
        }
        args
    }

    /// Load exactly one argument of the current line and return it.
    ///
    /// Fails with [`arg_err`](Self::arg_err) if the argument is missing or
    /// followed by another one.
    pub fn single_arg(&mut self) -> Result<String> {
        if !self.next_arg() {
            return Err(self.arg_err());
        }
        let value = self.val().to_string();
        if self.next_arg() {
            return Err(self.arg_err());
        }
        Ok(value)
    }

    /// Split off the segment starting at the current token.
    ///
    /// A segment is the current token, the rest of its line and, when the
    /// line ends with `{`, the whole block up to its matching `}`. The
    /// returned dispenser starts before the segment's first token; `self` is
    /// left on the segment's last token, so nothing is consumed twice.
    pub fn next_segment(&mut self) -> Dispenser {
        let Some(start) = self.cursor else {
            return Dispenser::from_tokens(&self.file, Vec::new());
        };

        let mut end = start;
        while self.next_arg() {
            end = self.cursor.unwrap_or(end);
        }
        if self.peek_same_line().is_some_and(Token::is_open) {
            let mut depth = 0usize;
            while self.next() {
                let Some(token) = self.current() else { break };
                if token.is_open() {
                    depth += 1;
                } else if token.is_close() {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            end = self.cursor.unwrap_or(end);
        }

        Dispenser::from_tokens(&self.file, self.tokens[start..=end].to_vec())
    }

    /// Returns true if every token has been loaded.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.map_or(self.tokens.is_empty(), |c| c + 1 >= self.tokens.len())
    }

    /// Error for a wrong number of arguments after the current token.
    pub fn arg_err(&self) -> Error {
        self.err(format!(
            "wrong argument count or unexpected line ending after '{}'",
            self.val()
        ))
    }

    /// Syntax error at the current position.
    pub fn err(&self, msg: impl AsRef<str>) -> Error {
        Error::config_invalid(format!(
            "{}:{} - syntax error: {}",
            self.file,
            self.line(),
            msg.as_ref()
        ))
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.tokens.get(c))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor.map_or(0, |c| c + 1))
    }

    fn peek_same_line(&self) -> Option<&Token> {
        let current = self.current()?;
        self.peek().filter(|t| t.line == current.end_line())
    }
}
