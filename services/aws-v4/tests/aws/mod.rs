use std::env;

use http::StatusCode;
use log::{debug, warn};
use reqsign_transport_aws_v4::AwsTransport;
use reqsign_transport_core::{body, Context, OsEnv, Provision, Replacer, Result, RoundTrip};
use reqsign_transport_file_read_tokio::TokioFileRead;
use reqsign_transport_reqwest::HttpTransport;

/// Build a transport against a real AWS endpoint.
///
/// Credentials are only referenced through placeholders and resolved from
/// the environment for every request.
async fn init_transport() -> Option<(AwsTransport<HttpTransport>, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("REQSIGN_AWS_V4_TEST").unwrap_or_default() != "on" {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_env(OsEnv);

    let mut transport = AwsTransport::<HttpTransport>::new(
        "{env.REQSIGN_AWS_V4_ACCESS_KEY}",
        "{env.REQSIGN_AWS_V4_SECRET_KEY}",
        "{env.REQSIGN_AWS_V4_REGION}",
        "{env.REQSIGN_AWS_V4_SERVICE}",
    );
    transport
        .provision(&ctx)
        .await
        .expect("provision must succeed");

    let url = env::var("REQSIGN_AWS_V4_URL").expect("env REQSIGN_AWS_V4_URL must set");
    Some((transport, url))
}

#[tokio::test]
async fn test_head_object() -> Result<()> {
    let Some((transport, url)) = init_transport().await else {
        warn!("REQSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };

    let req = http::Request::builder()
        .method(http::Method::HEAD)
        .uri(format!("{url}/not_exist_file"))
        .body(body::empty())?;
    let resp = transport
        .round_trip(&Replacer::new().with_env(OsEnv), req)
        .await?;

    debug!("got response: {:?}", resp);
    assert_eq!(StatusCode::NOT_FOUND, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_put_and_get_object() -> Result<()> {
    let Some((transport, url)) = init_transport().await else {
        warn!("REQSIGN_AWS_V4_TEST is not set, skipped");
        return Ok(());
    };
    let repl = Replacer::new().with_env(OsEnv);

    let req = http::Request::builder()
        .method(http::Method::PUT)
        .uri(format!("{url}/put_object_test"))
        .body(body::full("Hello, World!"))?;
    let resp = transport.round_trip(&repl, req).await?;
    debug!("got response: {:?}", resp);
    assert_eq!(StatusCode::OK, resp.status());

    let req = http::Request::builder()
        .uri(format!("{url}/put_object_test"))
        .body(body::empty())?;
    let resp = transport.round_trip(&repl, req).await?;
    assert_eq!(StatusCode::OK, resp.status());
    let content = body::collect(resp.into_body()).await?;
    assert_eq!(content.as_ref(), b"Hello, World!");
    Ok(())
}
