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

//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;
use std::time::Duration;

/// DateTime is the alias of `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse a duration written as a sequence of decimal numbers with unit
/// suffixes, like `300ms`, `1.5h` or `2h45m`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h` and `d`. A bare
/// `0` is accepted without unit.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = || Error::config_invalid(format!("invalid duration '{input}'"));

    let s = input.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if num_end == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..num_end].parse().map_err(|_| invalid())?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_end] {
            "ns" => 1f64,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "d" => 86400e9,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_end..];

        total += value * nanos_per_unit;
    }

    Ok(Duration::from_nanos(total.round() as u64))
}

/// Serde adapter for `Option<Duration>` fields.
///
/// Accepts either a duration string (see [`parse_duration`]) or an integer
/// number of nanoseconds.
pub mod serde_duration {
    use super::parse_duration;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Nanos(u64),
        Text(String),
    }

    /// Deserialize an optional duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Nanos(n)) => Ok(Some(Duration::from_nanos(n))),
            Some(Raw::Text(s)) => parse_duration(&s).map(Some).map_err(D::Error::custom),
        }
    }
}
