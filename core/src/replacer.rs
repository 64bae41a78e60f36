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

//! Placeholder replacement for per-request configuration values.

use crate::Env;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Namespace prefix answered by the configured [`Env`].
const ENV_PREFIX: &str = "env.";

type Provider = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Replacer expands `{key}` placeholders inside configuration templates.
///
/// A replacer is built by the host pipeline for every request, so its values
/// may depend on the request being served. Values come from, in order:
///
/// 1. static values added with [`Replacer::set`],
/// 2. provider closures added with [`Replacer::map`],
/// 3. the `env.` namespace, answered by the configured [`Env`].
///
/// ```
/// use reqsign_transport_core::Replacer;
///
/// let repl = Replacer::new().set("upstream.region", "us-east-2");
/// assert_eq!(repl.replace_known("{upstream.region}", ""), "us-east-2");
/// assert_eq!(repl.replace_known("{unknown}", ""), "");
/// ```
#[derive(Clone, Default)]
pub struct Replacer {
    values: HashMap<String, String>,
    providers: Vec<Provider>,
    env: Option<Arc<dyn Env>>,
}

impl Debug for Replacer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Replacer")
            .field("keys", &keys)
            .field("providers", &self.providers.len())
            .field("env", &self.env)
            .finish()
    }
}

impl Replacer {
    /// Create an empty replacer which knows no placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `{env.NAME}` placeholders from the given environment.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    /// Answer `{env.NAME}` placeholders from a shared environment, usually
    /// [`Context::env`](crate::Context::env).
    pub fn with_shared_env(mut self, env: Arc<dyn Env>) -> Self {
        self.env = Some(env);
        self
    }

    /// Set a static value for the placeholder `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add a provider consulted for keys without a static value.
    pub fn map(mut self, f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.providers.push(Arc::new(f));
        self
    }

    /// Look up the current value of a placeholder key.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(v) = self.values.get(key) {
            return Some(v.clone());
        }
        if let Some(v) = self.providers.iter().find_map(|p| p(key)) {
            return Some(v);
        }
        match (key.strip_prefix(ENV_PREFIX), &self.env) {
            (Some(name), Some(env)) => env.var(name),
            _ => None,
        }
    }

    /// Expand every placeholder in `input`.
    ///
    /// - Known placeholders are replaced with their value, or with `empty` if
    ///   that value is empty.
    /// - Unknown placeholders are replaced with `empty`.
    /// - `\{` and `\}` produce literal braces, an unclosed `{` is kept as is.
    pub fn replace_known(&self, input: &str, empty: &str) -> String {
        if !input.contains(['{', '\\']) {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(idx) = rest.find(['{', '\\']) {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];

            if let Some(escaped) = tail.strip_prefix('\\') {
                match escaped.chars().next() {
                    Some(c @ ('{' | '}')) => {
                        out.push(c);
                        rest = &escaped[1..];
                    }
                    _ => {
                        out.push('\\');
                        rest = escaped;
                    }
                }
                continue;
            }

            // tail starts with '{'
            let Some(end) = tail.find('}') else {
                out.push_str(tail);
                rest = "";
                break;
            };
            let key = &tail[1..end];
            if key.is_empty() || key.contains('{') {
                out.push('{');
                rest = &tail[1..];
                continue;
            }

            match self.get(key) {
                Some(v) if !v.is_empty() => out.push_str(&v),
                _ => out.push_str(empty),
            }
            rest = &tail[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticEnv;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn replacer() -> Replacer {
        Replacer::new()
            .set("http.request.host", "bucket.s3.amazonaws.com")
            .set("blank", "")
            .map(|key| (key == "upstream.region").then(|| "eu-west-1".to_string()))
            .with_env(StaticEnv {
                envs: HashMap::from([("AWS_KEY".to_string(), "ABC123".to_string())]),
            })
    }

    #[test_case("AKIDEXAMPLE", "AKIDEXAMPLE"; "literal")]
    #[test_case("{env.AWS_KEY}", "ABC123"; "env placeholder")]
    #[test_case("{env.MISSING}", ""; "missing env")]
    #[test_case("{nope}", ""; "unknown placeholder")]
    #[test_case("{blank}", ""; "known but empty")]
    #[test_case("{upstream.region}", "eu-west-1"; "provider")]
    #[test_case("key-{env.AWS_KEY}-{nope}-end", "key-ABC123--end"; "mixed")]
    #[test_case("{http.request.host}/{env.AWS_KEY}", "bucket.s3.amazonaws.com/ABC123"; "adjacent")]
    #[test_case(r"\{env.AWS_KEY\}", "{env.AWS_KEY}"; "escaped braces")]
    #[test_case(r"a\b", r"a\b"; "lonely backslash")]
    #[test_case("{unclosed", "{unclosed"; "unclosed brace")]
    #[test_case("{}", "{}"; "empty key")]
    #[test_case("{{env.AWS_KEY}", "{ABC123"; "double open")]
    fn test_replace_known(input: &str, expected: &str) {
        assert_eq!(replacer().replace_known(input, ""), expected);
    }

    #[test]
    fn test_replace_known_with_empty_marker() {
        let repl = replacer();
        assert_eq!(repl.replace_known("{nope}", "-"), "-");
        assert_eq!(repl.replace_known("{blank}", "-"), "-");
    }

    #[test]
    fn test_static_values_take_precedence() {
        let repl = replacer().set("env.AWS_KEY", "override");
        assert_eq!(repl.replace_known("{env.AWS_KEY}", ""), "override");
    }

    #[test]
    fn test_env_namespace_needs_env() {
        let repl = Replacer::new();
        assert_eq!(repl.get("env.PATH"), None);
    }
}
