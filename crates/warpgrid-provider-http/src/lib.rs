//! warpgrid-provider-http — a cloud provider backed by a remote HTTP/JSON
//! service.
//!
//! Lets the orchestrator delegate node inventory and scheduling decisions
//! (filter, prioritize, bind, unbind) to an external authority instead of
//! implementing them natively. The provider applies no policy of its own:
//! it forwards each call once and trusts the answer.
//!
//! # Architecture
//!
//! ```text
//! ProviderRegistry["http"] → new_http_cloud(config)
//!   └── HttpCloud
//!       ├── HttpCloudSettings (validated flags + base URLs, immutable)
//!       ├── protocol (fixed paths, request bodies)
//!       └── Transport (one attempt, 5s deadline, buffered body)
//! ```
//!
//! Inventory and scheduler-extension are enabled by configuration;
//! load-balancer, zones and clusters are never offered.

pub mod client;
pub mod config;
pub mod protocol;
pub mod transport;

use std::io::Read;

use warpgrid_provider::{CloudProvider, ProviderRegistry, ProviderResult};

pub use client::HttpCloud;
pub use config::{BaseUrl, HttpCloudConfig, HttpCloudSettings, PrioritizeScope};
pub use transport::{HttpTransport, PROVIDER_TIMEOUT, Transport, TransportFuture};

/// Name the provider is registered under.
pub const PROVIDER_NAME: &str = "http";

/// Construct the provider from a config stream.
pub fn new_http_cloud(config: Option<&mut dyn Read>) -> ProviderResult<HttpCloud> {
    let settings = HttpCloudSettings::from_reader(config)?;
    HttpCloud::new(settings)
}

/// Make the provider discoverable as [`PROVIDER_NAME`].
pub fn register(registry: &mut ProviderRegistry) -> ProviderResult<()> {
    registry.register(
        PROVIDER_NAME,
        Box::new(
            |config: Option<&mut dyn Read>| -> ProviderResult<Box<dyn CloudProvider>> {
                Ok(Box::new(new_http_cloud(config)?))
            },
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use warpgrid_provider::{Capability, ErrorKind};

    #[test]
    fn registry_constructs_http_provider_by_name() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry).unwrap();
        assert_eq!(registry.names(), vec!["http"]);

        let mut config: &[u8] = b"[global]\ninstances = true\ninstances-url = \"http://inv/\"\n";
        let provider = registry.get_provider("http", Some(&mut config)).unwrap();
        assert_eq!(provider.provider_name(), "http");
        assert!(provider.supports(Capability::Instances));
        assert!(!provider.supports(Capability::SchedulerExtension));
    }

    #[test]
    fn registry_surfaces_config_errors() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry).unwrap();
        let err = registry.get_provider("http", None).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn init_from_config_file() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[global]").unwrap();
        writeln!(file, "scheduler-extension = true").unwrap();
        writeln!(file, "scheduler-extension-url = \"http://sched:9090\"").unwrap();

        let provider = registry
            .init_provider(PROVIDER_NAME, Some(file.path()))
            .unwrap()
            .unwrap();
        assert!(provider.scheduler_extension().is_some());
        assert!(provider.instances().is_none());
    }

    #[test]
    fn settings_keep_normalized_urls() {
        let mut config: &[u8] = b"[global]\ninstances = true\ninstances-url = \"http://h/a/\"\n";
        let cloud = new_http_cloud(Some(&mut config)).unwrap();
        assert_eq!(
            cloud.settings().instances_url.as_ref().map(BaseUrl::as_str),
            Some("http://h/a")
        );
    }
}
