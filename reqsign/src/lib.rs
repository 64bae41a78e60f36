#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use reqsign_transport_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "default-context")]
pub mod http {
    //! The reqwest-backed base transport.
    pub use reqsign_transport_reqwest::*;
}

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(all(feature = "aws", feature = "default-context"))]
mod registry;
#[cfg(all(feature = "aws", feature = "default-context"))]
pub use registry::{default_registry, TRANSPORT_NAMESPACE};
