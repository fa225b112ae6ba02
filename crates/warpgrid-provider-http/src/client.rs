//! The HTTP cloud provider.
//!
//! [`HttpCloud`] is a transparent pipe: each operation builds a URL from
//! the configured base, serializes its payload, performs one round trip
//! and decodes the typed answer. It holds no per-call state, so a single
//! instance can serve concurrent callers.

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use warpgrid_provider::{
    BindAnnotations, CloudProvider, HostPriorityList, InstanceName, Instances, NodeAddress,
    NodeList, NodeResources, Pod, ProviderError, ProviderFuture, ProviderResult,
    SchedulerExtension,
};

use crate::PROVIDER_NAME;
use crate::config::{BaseUrl, HttpCloudSettings, PrioritizeScope};
use crate::protocol::{self, BindArgs, FilterArgs, PriorityArgs, SchedulerVerb};
use crate::transport::{HttpTransport, Transport};

pub struct HttpCloud<T = HttpTransport> {
    settings: HttpCloudSettings,
    transport: T,
}

impl HttpCloud<HttpTransport> {
    pub fn new(settings: HttpCloudSettings) -> ProviderResult<Self> {
        Ok(Self::with_transport(settings, HttpTransport::new()?))
    }
}

impl<T: Transport> HttpCloud<T> {
    pub fn with_transport(settings: HttpCloudSettings, transport: T) -> Self {
        debug!(
            instances = settings.instances_enabled(),
            scheduler_extension = settings.scheduler_extension_enabled(),
            prioritize_scope = ?settings.prioritize_scope,
            "http cloud provider created"
        );
        Self {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &HttpCloudSettings {
        &self.settings
    }

    fn instances_base(&self, op: &'static str) -> ProviderResult<&BaseUrl> {
        self.settings
            .instances_url
            .as_ref()
            .ok_or_else(|| unsupported(op, "instances"))
    }

    fn scheduler_base(&self, op: &'static str) -> ProviderResult<&BaseUrl> {
        self.settings
            .scheduler_extension_url
            .as_ref()
            .ok_or_else(|| unsupported(op, "scheduler-extension"))
    }

    async fn send(
        &self,
        op: &'static str,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> ProviderResult<bytes::Bytes> {
        debug!(op, %method, %url, "provider request");
        self.transport
            .send(method, url, body)
            .await
            .map_err(|source| {
                warn!(op, %url, error = %source, "provider request failed");
                ProviderError::Transport {
                    op,
                    url: url.to_string(),
                    source,
                }
            })
    }

    async fn get<R: DeserializeOwned>(&self, op: &'static str, url: Url) -> ProviderResult<R> {
        let body = self.send(op, Method::GET, &url, None).await?;
        decode(op, &url, &body)
    }

    async fn post<B, R>(&self, op: &'static str, url: Url, payload: &B) -> ProviderResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.send(op, Method::POST, &url, Some(encode(op, payload)?)).await?;
        decode(op, &url, &body)
    }

    /// POST whose response body carries no meaning.
    async fn post_ignoring_body<B>(&self, op: &'static str, url: Url, payload: &B) -> ProviderResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(op, Method::POST, &url, Some(encode(op, payload)?)).await?;
        Ok(())
    }

    async fn list_instances(&self, filter: &str) -> ProviderResult<Vec<InstanceName>> {
        if is_dot_segment(filter) {
            return Err(ProviderError::InvalidArgument {
                op: "list",
                message: format!("{filter:?} is not a usable filter"),
            });
        }
        let url = protocol::list_url(self.instances_base("list")?, filter);
        self.get("list", url).await
    }

    async fn get_node_addresses(&self, instance: &str) -> ProviderResult<Vec<NodeAddress>> {
        const OP: &str = "addresses";
        check_instance(OP, instance)?;
        let url = protocol::instance_url(self.instances_base(OP)?, instance, protocol::ADDRESSES);
        self.get(OP, url).await
    }

    async fn get_node_resources(&self, instance: &str) -> ProviderResult<NodeResources> {
        const OP: &str = "resources";
        check_instance(OP, instance)?;
        let url = protocol::instance_url(self.instances_base(OP)?, instance, protocol::RESOURCES);
        self.get(OP, url).await
    }

    async fn filter_nodes(&self, pod: &Pod, nodes: &NodeList) -> ProviderResult<NodeList> {
        let verb = SchedulerVerb::Filter;
        let url = protocol::scheduler_url(self.scheduler_base(verb.as_str())?, verb);
        self.post(verb.as_str(), url, &FilterArgs { pod, nodes }).await
    }

    async fn prioritize_nodes(&self, pod: &Pod, nodes: &NodeList) -> ProviderResult<HostPriorityList> {
        let verb = SchedulerVerb::Prioritize;
        let url = protocol::scheduler_url(self.scheduler_base(verb.as_str())?, verb);

        let filtered;
        let nodes = match self.settings.prioritize_scope {
            PrioritizeScope::Candidates => nodes,
            PrioritizeScope::Filtered => {
                filtered = self.filter_nodes(pod, nodes).await?;
                if filtered.is_empty() {
                    debug!(pod = %pod.metadata.name, "no nodes survived filter, skipping prioritize");
                    return Ok(Vec::new());
                }
                &filtered
            }
        };

        self.post(verb.as_str(), url, &PriorityArgs { pod, nodes }).await
    }

    async fn bind_pod(&self, pod: &Pod, host: &str) -> ProviderResult<BindAnnotations> {
        let verb = SchedulerVerb::Bind;
        let url = protocol::scheduler_url(self.scheduler_base(verb.as_str())?, verb);
        self.post(verb.as_str(), url, &BindArgs { pod, host }).await
    }

    async fn unbind_pod(&self, pod: &Pod) -> ProviderResult<()> {
        let verb = SchedulerVerb::Unbind;
        let url = protocol::scheduler_url(self.scheduler_base(verb.as_str())?, verb);
        self.post_ignoring_body(verb.as_str(), url, pod).await
    }
}

impl<T: Transport> CloudProvider for HttpCloud<T> {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn instances(&self) -> Option<&dyn Instances> {
        self.settings.instances_enabled().then_some(self as &dyn Instances)
    }

    fn scheduler_extension(&self) -> Option<&dyn SchedulerExtension> {
        self.settings
            .scheduler_extension_enabled()
            .then_some(self as &dyn SchedulerExtension)
    }
}

impl<T: Transport> Instances for HttpCloud<T> {
    fn list<'a>(&'a self, filter: &'a str) -> ProviderFuture<'a, Vec<InstanceName>> {
        Box::pin(self.list_instances(filter))
    }

    fn node_addresses<'a>(&'a self, instance: &'a str) -> ProviderFuture<'a, Vec<NodeAddress>> {
        Box::pin(self.get_node_addresses(instance))
    }

    fn node_resources<'a>(&'a self, instance: &'a str) -> ProviderFuture<'a, NodeResources> {
        Box::pin(self.get_node_resources(instance))
    }

    /// The instance name doubles as the provider ID.
    fn external_id(&self, instance: &str) -> ProviderResult<String> {
        Ok(instance.to_string())
    }
}

impl<T: Transport> SchedulerExtension for HttpCloud<T> {
    fn filter<'a>(&'a self, pod: &'a Pod, nodes: &'a NodeList) -> ProviderFuture<'a, NodeList> {
        Box::pin(self.filter_nodes(pod, nodes))
    }

    fn prioritize<'a>(
        &'a self,
        pod: &'a Pod,
        nodes: &'a NodeList,
    ) -> ProviderFuture<'a, HostPriorityList> {
        Box::pin(self.prioritize_nodes(pod, nodes))
    }

    fn bind<'a>(&'a self, pod: &'a Pod, host: &'a str) -> ProviderFuture<'a, BindAnnotations> {
        Box::pin(self.bind_pod(pod, host))
    }

    fn unbind<'a>(&'a self, pod: &'a Pod) -> ProviderFuture<'a, ()> {
        Box::pin(self.unbind_pod(pod))
    }
}

impl<T> std::fmt::Debug for HttpCloud<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCloud")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn encode<B: Serialize + ?Sized>(op: &'static str, payload: &B) -> ProviderResult<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|source| ProviderError::Encode { op, source })
}

fn decode<R: DeserializeOwned>(op: &'static str, url: &Url, body: &[u8]) -> ProviderResult<R> {
    serde_json::from_slice(body).map_err(|source| {
        warn!(op, %url, error = %source, "provider response did not decode");
        ProviderError::Decode {
            op,
            url: url.to_string(),
            source,
        }
    })
}

/// Instance names become a path segment of their own; the URL library
/// drops `.`/`..` segments, which would silently retarget the request.
/// The URL library drops `.` and `..` path segments, which would
/// silently retarget the request.
fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

fn check_instance(op: &'static str, instance: &str) -> ProviderResult<()> {
    if instance.trim().is_empty() || is_dot_segment(instance) {
        return Err(ProviderError::InvalidArgument {
            op,
            message: format!("{instance:?} is not a usable instance name"),
        });
    }
    Ok(())
}

/// Only reachable by calling an operation directly on [`HttpCloud`]
/// after ignoring the capability accessors.
fn unsupported(op: &'static str, capability: &str) -> ProviderError {
    ProviderError::InvalidArgument {
        op,
        message: format!("{capability} capability is not enabled"),
    }
}
