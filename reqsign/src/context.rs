use reqsign_transport_core::{Context, OsEnv};
use reqsign_transport_file_read_tokio::TokioFileRead;

/// Create a provisioning context reading files with tokio and environment
/// variables from the process.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> reqsign_transport::Result<()> {
/// let ctx = reqsign_transport::default_context();
/// let pem = ctx.file_read("/etc/ssl/certs/internal-ca.pem").await?;
/// # Ok(())
/// # }
/// ```
pub fn default_context() -> Context {
    Context::new().with_file_read(TokioFileRead).with_env(OsEnv)
}
