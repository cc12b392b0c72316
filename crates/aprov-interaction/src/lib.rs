//! HTTP layer: the Protheus REST client and the connection probe.

pub mod endpoints;
pub mod probe;
pub mod protheus_client;

pub use probe::RestProbe;
pub use protheus_client::ProtheusClient;
