//! Capability traits implemented by cloud providers.
//!
//! A provider exposes each optional capability through an accessor that
//! returns `Some(&dyn Capability)` when supported and `None` otherwise.
//! Callers must query before use; an unsupported capability has no
//! reachable operations.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::ProviderResult;
use crate::types::{
    BindAnnotations, HostPriorityList, InstanceName, NodeAddress, NodeList, NodeResources, Pod,
};

/// Boxed future returned by provider operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = ProviderResult<T>> + Send + 'a>>;

/// Optional operation groups a provider may claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Instances,
    TcpLoadBalancer,
    Zones,
    Clusters,
    SchedulerExtension,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Instances,
        Capability::TcpLoadBalancer,
        Capability::Zones,
        Capability::Clusters,
        Capability::SchedulerExtension,
    ];

    /// Configuration key naming this capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instances => "instances",
            Self::TcpLoadBalancer => "tcp-load-balancer",
            Self::Zones => "zones",
            Self::Clusters => "clusters",
            Self::SchedulerExtension => "scheduler-extension",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point handed to the orchestrator for a configured provider.
pub trait CloudProvider: Send + Sync {
    /// Name the provider was registered under.
    fn provider_name(&self) -> &str;

    fn instances(&self) -> Option<&dyn Instances> {
        None
    }

    fn tcp_load_balancer(&self) -> Option<&dyn TcpLoadBalancer> {
        None
    }

    fn zones(&self) -> Option<&dyn Zones> {
        None
    }

    fn clusters(&self) -> Option<&dyn Clusters> {
        None
    }

    fn scheduler_extension(&self) -> Option<&dyn SchedulerExtension> {
        None
    }

    /// Flag form of the capability accessors.
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Instances => self.instances().is_some(),
            Capability::TcpLoadBalancer => self.tcp_load_balancer().is_some(),
            Capability::Zones => self.zones().is_some(),
            Capability::Clusters => self.clusters().is_some(),
            Capability::SchedulerExtension => self.scheduler_extension().is_some(),
        }
    }
}

/// Node inventory.
pub trait Instances: Send + Sync {
    /// Enumerate instance names matching `filter`. An empty filter means all.
    fn list<'a>(&'a self, filter: &'a str) -> ProviderFuture<'a, Vec<InstanceName>>;

    fn node_addresses<'a>(&'a self, instance: &'a str) -> ProviderFuture<'a, Vec<NodeAddress>>;

    fn node_resources<'a>(&'a self, instance: &'a str) -> ProviderFuture<'a, NodeResources>;

    /// Provider-side identifier for an instance.
    fn external_id(&self, instance: &str) -> ProviderResult<String>;
}

/// Delegated scheduling decisions.
pub trait SchedulerExtension: Send + Sync {
    /// Narrow `nodes` to those admissible for `pod`. Order is preserved.
    fn filter<'a>(&'a self, pod: &'a Pod, nodes: &'a NodeList) -> ProviderFuture<'a, NodeList>;

    /// Score `nodes` for `pod`. Scores are added to the orchestrator's own.
    fn prioritize<'a>(
        &'a self,
        pod: &'a Pod,
        nodes: &'a NodeList,
    ) -> ProviderFuture<'a, HostPriorityList>;

    /// Commit `pod` to `host`, returning annotations for later lifecycle
    /// stages. On error the binding state is unknown.
    fn bind<'a>(&'a self, pod: &'a Pod, host: &'a str) -> ProviderFuture<'a, BindAnnotations>;

    /// Release whatever `bind` reserved for `pod`.
    fn unbind<'a>(&'a self, pod: &'a Pod) -> ProviderFuture<'a, ()>;
}

// Capabilities without operations of their own. The HTTP provider never
// offers them; the accessors exist so callers can ask.

/// L4 load balancers fronting a set of hosts.
pub trait TcpLoadBalancer: Send + Sync {}

/// Failure-domain lookup for the calling node.
pub trait Zones: Send + Sync {}

/// Multi-cluster enumeration.
pub trait Clusters: Send + Sync {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl CloudProvider for Bare {
        fn provider_name(&self) -> &str {
            "bare"
        }
    }

    #[test]
    fn default_provider_supports_nothing() {
        let p = Bare;
        for cap in Capability::ALL {
            assert!(!p.supports(cap), "{cap} should be unsupported");
        }
        assert!(p.instances().is_none());
        assert!(p.scheduler_extension().is_none());
    }

    struct Zoned;

    impl Zones for Zoned {}

    impl CloudProvider for Zoned {
        fn provider_name(&self) -> &str {
            "zoned"
        }

        fn zones(&self) -> Option<&dyn Zones> {
            Some(self)
        }
    }

    #[test]
    fn marker_capability_is_reported_when_offered() {
        let p = Zoned;
        assert!(p.supports(Capability::Zones));
        assert!(!p.supports(Capability::Clusters));
        assert!(!p.supports(Capability::TcpLoadBalancer));
    }

    #[test]
    fn capability_names_match_config_keys() {
        let names: Vec<_> = Capability::ALL.iter().map(Capability::as_str).collect();
        assert_eq!(
            names,
            ["instances", "tcp-load-balancer", "zones", "clusters", "scheduler-extension"]
        );
    }
}
