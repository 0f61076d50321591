pub mod client;
pub mod headers;
pub mod registry;

pub use client::ProxyClient;
pub use headers::HeaderCodec;
pub use registry::HeaderRegistry;
