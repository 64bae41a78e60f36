use anyhow::Result;
use reqsign_transport::block::Dispenser;
use reqsign_transport::{
    body, default_context, default_registry, OsEnv, Provision, Replacer, RoundTrip,
    TRANSPORT_NAMESPACE,
};
use std::env;

const CONFIG: &str = r#"
aws {
    access_id {env.AWS_ACCESS_KEY_ID}
    secret_key {env.AWS_SECRET_ACCESS_KEY}
    region {env.AWS_REGION}
    service s3
    transport http {
        dial_timeout 5s
        keepalive 30s
    }
}
"#;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Build the transport the way a proxy would: from its block configuration.
    let mut d = Dispenser::new("example", CONFIG)?;
    let mut transport = default_registry().load_block(TRANSPORT_NAMESPACE, &mut d)?;
    transport.provision(&default_context()).await?;

    let url = env::args()
        .nth(1)
        .unwrap_or_else(|| "https://s3.amazonaws.com/my-bucket/my-object".to_string());

    // Placeholders are resolved again for every request.
    let repl = Replacer::new().with_env(OsEnv);
    let req = http::Request::builder()
        .method(http::Method::GET)
        .uri(url)
        .body(body::empty())?;

    let resp = transport.round_trip(&repl, req).await?;
    println!("Response status: {}", resp.status());

    let content = body::collect(resp.into_body()).await?;
    println!("Response body: {}", String::from_utf8_lossy(&content));

    Ok(())
}
