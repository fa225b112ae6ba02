//! Provider configuration parsing and validation.
//!
//! The configuration is a TOML document with a single `[global]` table:
//!
//! ```toml
//! [global]
//! instances = true
//! instances-url = "http://inventory.internal:8080"
//! scheduler-extension = true
//! scheduler-extension-url = "http://scheduler.internal:8080/api/"
//! prioritize-scope = "candidates"
//! ```
//!
//! Parsing produces [`HttpCloudSettings`], which is validated once and
//! immutable afterwards.

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use warpgrid_provider::{Capability, ProviderError, ProviderResult};

/// Raw configuration document, as written by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpCloudConfig {
    #[serde(default, alias = "Global")]
    pub global: GlobalConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalConfig {
    pub instances: bool,
    pub instances_url: String,
    pub tcp_load_balancer: bool,
    pub zones: bool,
    pub clusters: bool,
    pub scheduler_extension: bool,
    pub scheduler_extension_url: String,
    pub prioritize_scope: PrioritizeScope,
}

/// Which node list a prioritize call carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrioritizeScope {
    /// Forward the caller's candidate list unchanged.
    #[default]
    Candidates,
    /// Run `filter` first and prioritize only the survivors.
    Filtered,
}

/// Absolute `http` or `https` base URL with trailing slashes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    raw: String,
    url: Url,
}

impl BaseUrl {
    /// Validate `value` as the base URL for config key `field`.
    pub fn parse(field: &str, value: &str) -> ProviderResult<Self> {
        let invalid = |reason: String| {
            ProviderError::Config(format!("can't parse the {field} provided ({value:?}): {reason}"))
        };

        let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme {:?}, expected http or https",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment".to_string()));
        }

        let raw = value.trim_end_matches('/').to_string();
        let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        Ok(Self { raw, url })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Append `segments` to the base path, each as its own
    /// percent-encoded path segment.
    pub fn join<'a, I>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Validated provider settings.
///
/// A base URL is present exactly when its capability is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCloudSettings {
    pub instances_url: Option<BaseUrl>,
    pub scheduler_extension_url: Option<BaseUrl>,
    pub prioritize_scope: PrioritizeScope,
    /// Capabilities requested in the config that this provider never offers.
    pub unsupported_requested: Vec<Capability>,
}

impl HttpCloudSettings {
    /// Read and validate settings from a config stream.
    ///
    /// An absent or empty stream is an error: the provider has no defaults.
    pub fn from_reader(config: Option<&mut dyn Read>) -> ProviderResult<Self> {
        let Some(reader) = config else {
            return Err(empty_config());
        };

        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| ProviderError::Config(format!("couldn't read config: {e}")))?;

        Self::parse(&content)
    }

    /// Parse and validate a TOML config document.
    pub fn parse(content: &str) -> ProviderResult<Self> {
        if content.trim().is_empty() {
            return Err(empty_config());
        }

        let config: HttpCloudConfig = toml::from_str(content)
            .map_err(|e| ProviderError::Config(format!("couldn't read config: {e}")))?;

        Self::from_config(&config)
    }

    pub fn from_config(config: &HttpCloudConfig) -> ProviderResult<Self> {
        let global = &config.global;

        let instances_url = global
            .instances
            .then(|| BaseUrl::parse("instances-url", &global.instances_url))
            .transpose()?;

        let scheduler_extension_url = global
            .scheduler_extension
            .then(|| BaseUrl::parse("scheduler-extension-url", &global.scheduler_extension_url))
            .transpose()?;

        let unsupported_requested: Vec<Capability> = [
            (Capability::TcpLoadBalancer, global.tcp_load_balancer),
            (Capability::Zones, global.zones),
            (Capability::Clusters, global.clusters),
        ]
        .into_iter()
        .filter_map(|(cap, requested)| requested.then_some(cap))
        .collect();

        for cap in &unsupported_requested {
            warn!(capability = %cap, "capability enabled in config but not offered by the http provider");
        }

        Ok(Self {
            instances_url,
            scheduler_extension_url,
            prioritize_scope: global.prioritize_scope,
            unsupported_requested,
        })
    }

    pub fn instances_enabled(&self) -> bool {
        self.instances_url.is_some()
    }

    pub fn scheduler_extension_enabled(&self) -> bool {
        self.scheduler_extension_url.is_some()
    }
}

fn empty_config() -> ProviderError {
    ProviderError::Config("config file is empty or is not provided".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpgrid_provider::ErrorKind;

    #[test]
    fn absent_config_is_rejected() {
        let err = HttpCloudSettings::from_reader(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn empty_config_is_rejected() {
        let mut empty: &[u8] = b"";
        let err = HttpCloudSettings::from_reader(Some(&mut empty)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = HttpCloudSettings::parse("  \n\t\n").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn parses_full_config() {
        let settings = HttpCloudSettings::parse(
            r#"
[global]
instances = true
instances-url = "http://inventory:8080"
scheduler-extension = true
scheduler-extension-url = "http://sched:9090/api"
prioritize-scope = "filtered"
"#,
        )
        .unwrap();

        assert!(settings.instances_enabled());
        assert!(settings.scheduler_extension_enabled());
        assert_eq!(settings.instances_url.unwrap().as_str(), "http://inventory:8080");
        assert_eq!(
            settings.scheduler_extension_url.unwrap().as_str(),
            "http://sched:9090/api"
        );
        assert_eq!(settings.prioritize_scope, PrioritizeScope::Filtered);
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let base = BaseUrl::parse("instances-url", "http://h/a/").unwrap();
        assert_eq!(base.as_str(), "http://h/a");

        let base = BaseUrl::parse("instances-url", "http://h//").unwrap();
        assert_eq!(base.as_str(), "http://h");
    }

    #[test]
    fn malformed_url_for_enabled_capability_names_field() {
        let err = HttpCloudSettings::parse(
            r#"
[global]
scheduler-extension = true
scheduler-extension-url = "not a url"
"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("scheduler-extension-url"));
    }

    #[test]
    fn url_of_disabled_capability_is_not_validated() {
        let settings = HttpCloudSettings::parse(
            r#"
[global]
instances = false
instances-url = "not a url"
"#,
        )
        .unwrap();
        assert!(!settings.instances_enabled());
    }

    #[test]
    fn enabled_capability_without_url_is_rejected() {
        let err = HttpCloudSettings::parse("[global]\ninstances = true\n").unwrap_err();
        assert!(err.to_string().contains("instances-url"));
    }

    #[test]
    fn https_urls_are_accepted() {
        let url = BaseUrl::parse("instances-url", "https://h/a/").unwrap();
        assert_eq!(url.as_str(), "https://h/a");
        assert_eq!(url.join(["v1", "instances"]).as_str(), "https://h/a/v1/instances");

        let settings = HttpCloudSettings::parse(
            "[global]\nscheduler-extension = true\nscheduler-extension-url = \"https://sched:8443/\"\n",
        )
        .unwrap();
        assert_eq!(
            settings.scheduler_extension_url.unwrap().as_str(),
            "https://sched:8443"
        );
    }

    #[test]
    fn unsupported_scheme_or_suffix_is_rejected() {
        for value in ["ftp://h/a", "unix:/run/sched.sock", "http://h/a?x=1", "http://h/a#frag"] {
            assert!(
                BaseUrl::parse("instances-url", value).is_err(),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = HttpCloudSettings::parse("[global]\ninstance = true\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn capitalized_section_is_accepted() {
        let settings = HttpCloudSettings::parse(
            "[Global]\ninstances = true\ninstances-url = \"http://h\"\n",
        )
        .unwrap();
        assert!(settings.instances_enabled());
    }

    #[test]
    fn unsupported_capabilities_are_recorded() {
        let settings =
            HttpCloudSettings::parse("[global]\nzones = true\ntcp-load-balancer = true\n").unwrap();
        assert_eq!(
            settings.unsupported_requested,
            vec![Capability::TcpLoadBalancer, Capability::Zones]
        );
    }

    #[test]
    fn join_pushes_segments_after_base_path() {
        let base = BaseUrl::parse("instances-url", "http://h/a/").unwrap();
        let url = base.join(["v1", "instances", "node 1/x"]);
        assert_eq!(url.as_str(), "http://h/a/v1/instances/node%201%2Fx");

        let root = BaseUrl::parse("instances-url", "http://h").unwrap();
        assert_eq!(root.join(["v1", "instances"]).as_str(), "http://h/v1/instances");
    }

    #[test]
    fn default_prioritize_scope_is_candidates() {
        let settings = HttpCloudSettings::parse("[global]\nclusters = false\n").unwrap();
        assert_eq!(settings.prioritize_scope, PrioritizeScope::Candidates);
    }
}
