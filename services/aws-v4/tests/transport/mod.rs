use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use http::header;
use http_body::Frame;
use http_body_util::{BodyExt, StreamBody};
use pretty_assertions::assert_eq;
use reqsign_transport_aws_v4::{AwsTransport, Credential, EMPTY_STRING_SHA256, X_AMZ_CONTENT_SHA_256};
use reqsign_transport_core::block::{Dispenser, UnmarshalBlock};
use reqsign_transport_core::time::DateTime;
use reqsign_transport_reqwest::HttpTransport;
use reqsign_transport_core::{
    body, Body, Context, Error, ErrorKind, Provision, Registry, Replacer, Result, RoundTrip,
    SignRequest, SigningContext, StaticEnv, TlsConfig, TlsTransport,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use test_case::test_case;

/// A request as seen by the base transport.
#[derive(Debug, Clone)]
struct Sent {
    method: http::Method,
    uri: String,
    headers: http::HeaderMap,
    body: Bytes,
}

/// Base transport answering every request with `200 ok`.
#[derive(Debug, Default)]
struct MockBase {
    provisioned: bool,
    tls: bool,
    fail: bool,
    sent: Mutex<Vec<Sent>>,
}

impl MockBase {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provision for MockBase {
    async fn provision(&mut self, _: &Context) -> Result<()> {
        self.provisioned = true;
        Ok(())
    }
}

impl TlsTransport for MockBase {
    fn tls_enabled(&self) -> bool {
        self.tls
    }

    fn enable_tls(&mut self, _: &TlsConfig) -> Result<()> {
        self.tls = true;
        Ok(())
    }
}

impl UnmarshalBlock for MockBase {
    fn unmarshal_block(&mut self, d: &mut Dispenser) -> Result<()> {
        if !d.next() || d.val() != "mock" {
            return Err(d.err(format!("unknown transport module '{}'", d.val())));
        }
        while d.next_block(0) {
            match d.val() {
                "tls" => self.tls = true,
                "fail" => self.fail = true,
                other => return Err(d.err(format!("unrecognized subdirective '{other}'"))),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RoundTrip for MockBase {
    async fn round_trip(
        &self,
        _: &Replacer,
        req: http::Request<Body>,
    ) -> Result<http::Response<Body>> {
        if self.fail {
            return Err(Error::transport("dial tcp 10.0.0.1:443: i/o timeout"));
        }

        let (parts, body) = req.into_parts();
        let body = body::collect(body).await?;
        self.sent.lock().unwrap().push(Sent {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });
        Ok(http::Response::new(body::full("ok")))
    }
}

/// Signer recording the inputs it was called with.
#[derive(Debug, Default)]
struct RecordingSigner {
    calls: Mutex<Vec<SigningContext<Credential>>>,
}

impl RecordingSigner {
    fn calls(&self) -> Vec<SigningContext<Credential>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignRequest for RecordingSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        req: &mut http::request::Parts,
        ctx: &SigningContext<Credential>,
        _: DateTime,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(ctx.clone());
        let value = format!(
            "MOCK {}:{} {}/{}",
            ctx.credential.access_key_id,
            ctx.credential.secret_access_key,
            ctx.region,
            ctx.service
        );
        req.headers.insert(header::AUTHORIZATION, value.parse()?);
        Ok(())
    }
}

fn config() -> AwsTransport<MockBase> {
    AwsTransport::new("AKIDEXAMPLE", "secret", "us-east-1", "s3")
}

async fn provisioned(
    t: AwsTransport<MockBase>,
) -> (AwsTransport<MockBase>, Arc<RecordingSigner>) {
    let signer = Arc::new(RecordingSigner::default());
    let mut t = t.with_request_signer(signer.clone());
    t.provision(&Context::new()).await.unwrap();
    (t, signer)
}

fn get(uri: &str) -> http::Request<Body> {
    http::Request::builder()
        .uri(uri)
        .body(body::empty())
        .unwrap()
}

fn base(t: &AwsTransport<MockBase>) -> &MockBase {
    t.transport.as_ref().unwrap()
}

#[tokio::test]
async fn test_sign_get_without_body() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (t, signer) = provisioned(config()).await;
    let resp = t
        .round_trip(&Replacer::new(), get("https://example.amazonaws.com/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), http::StatusCode::OK);

    let calls = signer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].credential.access_key_id, "AKIDEXAMPLE");
    assert_eq!(calls[0].credential.secret_access_key, "secret");
    assert_eq!(calls[0].region, "us-east-1");
    assert_eq!(calls[0].service, "s3");
    assert_eq!(calls[0].payload_hash, EMPTY_STRING_SHA256);

    let sent = base(&t).sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, http::Method::GET);
    assert_eq!(sent[0].uri, "https://example.amazonaws.com/");
    assert_eq!(sent[0].headers[X_AMZ_CONTENT_SHA_256], EMPTY_STRING_SHA256);
    assert_eq!(
        sent[0].headers[header::AUTHORIZATION],
        "MOCK AKIDEXAMPLE:secret us-east-1/s3"
    );
}

#[tokio::test]
async fn test_sign_with_default_signer() {
    let mut t = config();
    t.provision(&Context::new()).await.unwrap();
    t.round_trip(&Replacer::new(), get("https://example.amazonaws.com/"))
        .await
        .unwrap();

    let sent = base(&t).sent();
    let auth = sent[0].headers[header::AUTHORIZATION].to_str().unwrap();
    assert!(
        auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"),
        "got: {auth}"
    );
    assert!(auth.contains("/us-east-1/s3/aws4_request, "), "got: {auth}");
    assert!(
        auth.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date, "),
        "got: {auth}"
    );
    assert!(sent[0].headers.contains_key("x-amz-date"));
}

#[tokio::test]
async fn test_body_is_hashed_and_forwarded() {
    let (t, signer) = provisioned(config()).await;
    let req = http::Request::builder()
        .method(http::Method::PUT)
        .uri("https://examplebucket.s3.amazonaws.com/hello.txt")
        .body(body::full("Hello, World!"))
        .unwrap();
    t.round_trip(&Replacer::new(), req).await.unwrap();

    let hash = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";
    assert_eq!(signer.calls()[0].payload_hash, hash);

    let sent = base(&t).sent();
    assert_eq!(sent[0].headers[X_AMZ_CONTENT_SHA_256], hash);
    assert_eq!(sent[0].body.as_ref(), b"Hello, World!");
}

#[tokio::test]
async fn test_templates_are_resolved_per_request() {
    let (t, signer) = provisioned(AwsTransport::new(
        "{env.AWS_KEY}",
        "{env.AWS_NO_SUCH_SECRET}",
        "{upstream.region}",
        "execute-api",
    ))
    .await;

    let env = StaticEnv {
        envs: HashMap::from([("AWS_KEY".to_string(), "ABC123".to_string())]),
    };
    for region in ["us-east-2", "eu-central-1"] {
        let repl = Replacer::new()
            .with_env(env.clone())
            .set("upstream.region", region);
        t.round_trip(&repl, get("https://abc.execute-api.amazonaws.com/prod"))
            .await
            .unwrap();
    }

    let calls = signer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].credential.access_key_id, "ABC123");
    assert_eq!(calls[0].credential.secret_access_key, "");
    assert_eq!(calls[0].region, "us-east-2");
    assert_eq!(calls[1].region, "eu-central-1");
    assert_eq!(calls[1].service, "execute-api");
}

#[tokio::test]
async fn test_concurrent_requests() {
    let (t, signer) = provisioned(AwsTransport::new(
        "{tenant.key}",
        "secret",
        "us-east-1",
        "s3",
    ))
    .await;
    let t = Arc::new(t);

    let handles = (0..8)
        .map(|i| {
            let t = t.clone();
            tokio::spawn(async move {
                let repl = Replacer::new().set("tenant.key", format!("KEY{i}"));
                let req = http::Request::builder()
                    .method(http::Method::POST)
                    .uri(format!("https://example.amazonaws.com/{i}"))
                    .body(body::full(format!("payload {i}")))
                    .unwrap();
                t.round_trip(&repl, req).await.unwrap();
            })
        })
        .collect::<Vec<_>>();
    for h in handles {
        h.await.unwrap();
    }

    let mut keys = signer
        .calls()
        .into_iter()
        .map(|c| c.credential.access_key_id)
        .collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, (0..8).map(|i| format!("KEY{i}")).collect::<Vec<_>>());

    for sent in base(&t).sent() {
        let i = sent.uri.rsplit('/').next().unwrap().to_string();
        assert_eq!(sent.body, Bytes::from(format!("payload {i}")));
        assert_eq!(
            sent.headers[header::AUTHORIZATION],
            format!("MOCK KEY{i}:secret us-east-1/s3").as_str()
        );
    }
}

#[test_case("access_key_id"; "access key id")]
#[test_case("secret_access_key"; "secret access key")]
#[test_case("region"; "region")]
#[test_case("service"; "service")]
#[tokio::test]
async fn test_provision_requires_field(field: &str) {
    let mut t = config();
    match field {
        "access_key_id" => t.access_key_id.clear(),
        "secret_access_key" => t.secret_access_key.clear(),
        "region" => t.region.clear(),
        _ => t.service.clear(),
    }

    let err = t.provision(&Context::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(
        err.to_string(),
        format!("some configuration values are missing: {field}")
    );
    assert!(!t.is_provisioned());

    let err = t
        .round_trip(&Replacer::new(), get("https://example.amazonaws.com/"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(t.transport.is_none());
}

#[tokio::test]
async fn test_failed_reprovision_stops_serving() {
    let mut t = config();
    t.provision(&Context::new()).await.unwrap();
    assert!(t.is_provisioned());

    t.region.clear();
    let err = t.provision(&Context::new()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "some configuration values are missing: region"
    );
    assert!(!t.is_provisioned());

    let err = t
        .round_trip(&Replacer::new(), get("https://example.amazonaws.com/"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(base(&t).sent().is_empty());
}

#[tokio::test]
async fn test_unreadable_body_is_not_sent() {
    let (t, signer) = provisioned(config()).await;
    let frames = vec![
        Ok(Frame::data(Bytes::from_static(b"first chunk"))),
        Err(Error::unexpected("client closed the connection")),
    ];
    let req = http::Request::builder()
        .method(http::Method::PUT)
        .uri("https://examplebucket.s3.amazonaws.com/upload.bin")
        .body(StreamBody::new(stream::iter(frames)).boxed_unsync())
        .unwrap();

    let err = t.round_trip(&Replacer::new(), req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PayloadUnreadable);
    assert!(err.is_local());
    assert!(signer.calls().is_empty());
    assert!(base(&t).sent().is_empty());
}

#[tokio::test]
async fn test_provision_creates_and_provisions_base() {
    let mut t = config();
    assert!(t.transport.is_none());
    t.provision(&Context::new()).await.unwrap();
    assert!(t.is_provisioned());
    assert!(base(&t).provisioned);

    let mut t = config().with_transport(MockBase {
        tls: true,
        ..Default::default()
    });
    t.provision(&Context::new()).await.unwrap();
    assert!(base(&t).provisioned);
    assert!(t.tls_enabled());
}

#[tokio::test]
async fn test_base_error_is_passed_through() {
    let (t, _) = provisioned(config().with_transport(MockBase {
        fail: true,
        ..Default::default()
    }))
    .await;

    let err = t
        .round_trip(&Replacer::new(), get("https://example.amazonaws.com/"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.to_string(), "dial tcp 10.0.0.1:443: i/o timeout");
}

#[tokio::test]
async fn test_load_from_registry() {
    let mut registry = Registry::new();
    registry
        .register(AwsTransport::<MockBase>::module_info())
        .unwrap();

    let mut d = Dispenser::new(
        "Caddyfile",
        r#"
        aws {
            access_id AKIDEXAMPLE
            secret_key secret
            region us-east-1
            service s3
            transport mock {
                tls
            }
        }"#,
    )
    .unwrap();
    let mut module = registry
        .load_block("http.reverse_proxy.transport", &mut d)
        .unwrap();
    assert!(module.tls_enabled());

    module.provision(&Context::new()).await.unwrap();
    let resp = module
        .round_trip(&Replacer::new(), get("https://example.amazonaws.com/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), http::StatusCode::OK);
}

#[test]
fn test_parse_errors() {
    let parse = |input: &str| {
        let mut d = Dispenser::new("Caddyfile", input)?;
        AwsTransport::<MockBase>::default().unmarshal_block(&mut d)
    };

    let err = parse("aws {\n transport mock\n transport mock {\n  tls\n }\n}").unwrap_err();
    assert!(err.to_string().ends_with("transport already specified"));

    let err = parse("aws {\n foo bar\n}").unwrap_err();
    assert!(err.to_string().contains("'foo'"));

    let err = parse("aws {\n transport mock {\n  bogus\n }\n}").unwrap_err();
    assert!(err.to_string().contains("unrecognized subdirective 'bogus'"));

    let err = parse("aws {\n transport fastcgi {\n }\n}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Caddyfile:2 - syntax error: unknown transport module 'fastcgi'"
    );
}

#[test]
fn test_parse_rejects_unknown_http_base() {
    let parse = |input: &str| {
        let mut d = Dispenser::new("Caddyfile", input)?;
        let mut t = AwsTransport::<HttpTransport>::default();
        t.unmarshal_block(&mut d)?;
        Ok::<_, Error>(t)
    };

    let t = parse("aws {\n transport http {\n  dial_timeout 5s\n }\n}").unwrap();
    assert!(t.transport.is_some());

    let err = parse("aws {\n transport fastcgi {\n  dial_timeout 5s\n }\n}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().ends_with("unknown transport module 'fastcgi'"));
}
