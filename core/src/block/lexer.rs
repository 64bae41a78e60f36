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

use crate::{Error, Result};

/// Token is a single word of a block configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with quotes and escapes removed.
    pub text: String,
    /// 1-based line the token starts on.
    pub line: usize,
    /// Number of line breaks inside the token, only non-zero for quoted
    /// tokens spanning lines.
    pub line_breaks: usize,
    /// Whether the token was written as a quoted string.
    pub quoted: bool,
}

impl Token {
    /// Returns true if the token opens a block.
    pub fn is_open(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    /// Returns true if the token closes a block.
    pub fn is_close(&self) -> bool {
        !self.quoted && self.text == "}"
    }

    /// Line the token ends on.
    pub fn end_line(&self) -> usize {
        self.line + self.line_breaks
    }
}

/// Split input into tokens.
///
/// Words are separated by whitespace, `#` starts a comment running to the
/// end of the line, and double quotes group a word that may contain
/// whitespace. Inside quotes `\"` stands for a literal quote.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|c| *c != '\n').is_some() {}
            }
            '"' => {
                chars.next();
                let start = line;
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' if chars.peek() == Some(&'"') => {
                            text.push('"');
                            chars.next();
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\n' => {
                            line += 1;
                            text.push(c);
                        }
                        _ => text.push(c),
                    }
                }
                if !closed {
                    return Err(Error::config_invalid(format!(
                        "unterminated quoted string starting on line {start}"
                    )));
                }
                tokens.push(Token {
                    text,
                    line: start,
                    line_breaks: line - start,
                    quoted: true,
                });
            }
            _ => {
                let mut text = String::new();
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    text.push(c);
                }
                tokens.push(Token {
                    text,
                    line,
                    line_breaks: 0,
                    quoted: false,
                });
            }
        }
    }

    Ok(tokens)
}
