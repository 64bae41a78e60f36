//! AWS support with convenience APIs
//!
//! This module provides the SigV4 signing transport along with convenience
//! functions for the common setup.

// Re-export all AWS signing types
pub use reqsign_transport_aws_v4::*;

#[cfg(feature = "default-context")]
use crate::http::HttpTransport;

/// Default AWS transport, sending through the reqwest base transport.
#[cfg(feature = "default-context")]
pub type DefaultAwsTransport = AwsTransport<HttpTransport>;

/// Create an AWS transport reading its credential from the standard
/// `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` environment variables
/// on every request.
///
/// The transport still needs to be provisioned.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> reqsign_transport::Result<()> {
/// use reqsign_transport::{OsEnv, Provision, Replacer, RoundTrip};
///
/// let mut transport = reqsign_transport::aws::default_transport("s3", "us-east-1");
/// transport.provision(&reqsign_transport::default_context()).await?;
///
/// let req = http::Request::builder()
///     .uri("https://my-bucket.s3.amazonaws.com/my-object")
///     .body(reqsign_transport::body::empty())?;
/// let resp = transport
///     .round_trip(&Replacer::new().with_env(OsEnv), req)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_transport(service: &str, region: &str) -> DefaultAwsTransport {
    AwsTransport::new(
        "{env.AWS_ACCESS_KEY_ID}",
        "{env.AWS_SECRET_ACCESS_KEY}",
        region,
        service,
    )
}

#[cfg(all(test, feature = "default-context"))]
mod tests {
    use super::*;
    use crate::{Replacer, StaticEnv};
    use std::collections::HashMap;

    #[test]
    fn test_default_transport() {
        let t = default_transport("s3", "us-east-1");
        assert_eq!(t.service, "s3");
        assert_eq!(t.region, "us-east-1");
        assert!(t.transport.is_none());

        let repl = Replacer::new().with_env(StaticEnv {
            envs: HashMap::from([(
                "AWS_ACCESS_KEY_ID".to_string(),
                "AKIDEXAMPLE".to_string(),
            )]),
        });
        assert_eq!(repl.replace_known(&t.access_key_id, ""), "AKIDEXAMPLE");
    }
}
