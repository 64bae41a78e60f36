use crate::aws::DefaultAwsTransport;
use crate::{ModuleInfo, Registry};
use log::warn;

/// Namespace of the transport modules, the prefix of their ids.
pub const TRANSPORT_NAMESPACE: &str = "http.reverse_proxy.transport";

/// Create a registry holding every transport module of this crate:
///
/// - `http.reverse_proxy.transport.aws`, the SigV4 signing transport sending
///   through the reqwest base transport
/// - `http.reverse_proxy.transport.http`, the reqwest base transport
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    let modules: [ModuleInfo; 2] = [
        DefaultAwsTransport::module_info(),
        crate::http::module_info(),
    ];
    for info in modules {
        if let Err(e) = registry.register(info) {
            warn!("failed to register module {}: {e}", info.id);
        }
    }
    registry
}
