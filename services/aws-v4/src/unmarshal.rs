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

use crate::AwsTransport;
use reqsign_transport_core::block::{Dispenser, UnmarshalBlock};
use reqsign_transport_core::Result;

impl<T: UnmarshalBlock + Default> UnmarshalBlock for AwsTransport<T> {
    /// Parse an `aws` block:
    ///
    /// ```text
    /// aws {
    ///     access_id <access_key_id>
    ///     secret_key <secret_access_key>
    ///     region <region>
    ///     service <service>
    ///     transport <name> {
    ///         ...
    ///     }
    /// }
    /// ```
    ///
    /// Tokens are only read, never removed: the base transport receives its
    /// own segment of the block.
    fn unmarshal_block(&mut self, d: &mut Dispenser) -> Result<()> {
        if !d.next() {
            return Err(d.err("expected 'aws'"));
        }
        if d.next_arg() {
            return Err(d.arg_err());
        }

        while d.next_block(0) {
            match d.val() {
                "access_id" => self.access_key_id = d.single_arg()?,
                "secret_key" => self.secret_access_key = d.single_arg()?,
                "region" => self.region = d.single_arg()?,
                "service" => self.service = d.single_arg()?,
                "transport" => {
                    if self.transport.is_some() {
                        return Err(d.err("transport already specified"));
                    }
                    if !d.next_arg() {
                        return Err(d.arg_err());
                    }

                    let mut segment = d.next_segment();
                    let mut base = T::default();
                    base.unmarshal_block(&mut segment)?;
                    self.transport = Some(base);
                }
                other => {
                    return Err(d.err(format!("unrecognized parameter '{other}'")));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqsign_transport_core::ErrorKind;

    /// Records the tokens of its segment.
    #[derive(Debug, Default)]
    struct RecordingBase {
        tokens: Vec<String>,
    }

    impl UnmarshalBlock for RecordingBase {
        fn unmarshal_block(&mut self, d: &mut Dispenser) -> Result<()> {
            while d.next() {
                self.tokens.push(d.val().to_string());
            }
            Ok(())
        }
    }

    fn parse(input: &str) -> Result<AwsTransport<RecordingBase>> {
        let mut d = Dispenser::new("Caddyfile", input)?;
        let mut t = AwsTransport::default();
        t.unmarshal_block(&mut d)?;
        Ok(t)
    }

    #[test]
    fn test_parse_block() {
        let t = parse(
            r#"
            aws {
                access_id {env.AWS_ACCESS_KEY_ID}
                secret_key "{env.AWS_SECRET_ACCESS_KEY}"
                region us-east-2
                service execute-api
                transport http {
                    dial_timeout 5s
                }
            }"#,
        )
        .unwrap();

        assert_eq!(t.access_key_id, "{env.AWS_ACCESS_KEY_ID}");
        assert_eq!(t.secret_access_key, "{env.AWS_SECRET_ACCESS_KEY}");
        assert_eq!(t.region, "us-east-2");
        assert_eq!(t.service, "execute-api");
        assert_eq!(
            t.transport.unwrap().tokens,
            vec!["http", "{", "dial_timeout", "5s", "}"]
        );
    }

    #[test]
    fn test_parse_transport_without_block() {
        let t = parse("aws {\n transport http\n region us-east-1\n}").unwrap();
        assert_eq!(t.transport.unwrap().tokens, vec!["http"]);
        assert_eq!(t.region, "us-east-1");
    }

    #[test]
    fn test_transport_already_specified() {
        let err = parse(
            "aws {\n transport http {\n }\n transport http {\n }\n}",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(
            err.to_string(),
            "Caddyfile:4 - syntax error: transport already specified"
        );
    }

    #[test]
    fn test_unrecognized_parameter() {
        let err = parse("aws {\n region us-east-1\n foo bar\n}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Caddyfile:3 - syntax error: unrecognized parameter 'foo'"
        );
    }

    #[test]
    fn test_missing_argument() {
        let err = parse("aws {\n region\n service s3\n}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Caddyfile:2 - syntax error: wrong argument count or unexpected line ending after 'region'"
        );

        let err = parse("aws {\n transport\n}").unwrap_err();
        assert!(err.to_string().contains("after 'transport'"));

        let err = parse("aws {\n service s3 s4\n}").unwrap_err();
        assert!(err.to_string().contains("wrong argument count"));
    }

    #[test]
    fn test_consumes_only_own_tokens() {
        let mut d = Dispenser::new(
            "Caddyfile",
            "aws {\n region us-east-1\n transport http {\n  versions 2\n }\n}\nlb_policy first",
        )
        .unwrap();
        let mut t = AwsTransport::<RecordingBase>::default();
        t.unmarshal_block(&mut d).unwrap();

        assert_eq!(d.val(), "}");
        assert!(d.next());
        assert_eq!(d.val(), "lb_policy");
    }

    #[test]
    fn test_parse_is_not_destructive() {
        let input = "aws {\n region us-east-1\n}";
        let mut d = Dispenser::new("Caddyfile", input).unwrap();
        let mut t = AwsTransport::<RecordingBase>::default();
        t.unmarshal_block(&mut d).unwrap();

        d.reset();
        let mut again = AwsTransport::<RecordingBase>::default();
        again.unmarshal_block(&mut d).unwrap();
        assert_eq!(again.region, "us-east-1");
    }
}
