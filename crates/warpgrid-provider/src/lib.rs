//! warpgrid-provider — the cloud provider interface for WarpGrid.
//!
//! A cloud provider supplies infrastructure facts (node inventory) and,
//! optionally, scheduling decisions that the orchestrator delegates
//! instead of computing natively.
//!
//! # Architecture
//!
//! ```text
//! ProviderRegistry (name → factory)
//!   └── Box<dyn CloudProvider>
//!       ├── instances()           → Option<&dyn Instances>
//!       ├── scheduler_extension() → Option<&dyn SchedulerExtension>
//!       └── tcp_load_balancer() / zones() / clusters()
//! ```
//!
//! Capabilities are fixed when the provider is constructed. Every
//! operation returns a [`ProviderError`] on failure; providers never retry.

pub mod error;
pub mod provider;
pub mod registry;
pub mod types;

pub use error::{ErrorKind, ProviderError, ProviderResult, TransportError, TransportErrorKind};
pub use provider::{
    Capability, CloudProvider, Clusters, Instances, ProviderFuture, SchedulerExtension,
    TcpLoadBalancer, Zones,
};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use types::*;
