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

//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret value before it reaches a log line.
///
/// - An empty value prints as `EMPTY`.
/// - A value that is exactly one placeholder, like `{env.AWS_SECRET}`, is not
///   a secret itself and prints verbatim so operators can see where the
///   value will come from.
/// - Values shorter than 12 characters are entirely redacted.
/// - Longer values keep their first and last three characters.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl Redact<'_> {
    fn is_placeholder(&self) -> bool {
        let v = self.0;
        v.len() > 2
            && v.starts_with('{')
            && v.ends_with('}')
            && !v[1..v.len() - 1].contains(['{', '}'])
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if self.is_placeholder() {
            f.write_str(self.0)
        } else if length < 12 || !self.0.is_char_boundary(3) || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("", "EMPTY"),
            ("secret", "***"),
            ("AKIDEXAMPLE", "***"),
            ("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", "wJa***KEY"),
            ("{env.AWS_SECRET_ACCESS_KEY}", "{env.AWS_SECRET_ACCESS_KEY}"),
            ("prefix-{env.AWS_SECRET}", "pre***ET}"),
            ("{}", "***"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact(input)),
                expected,
                "Failed on input: {}",
                input
            );
        }
    }
}
