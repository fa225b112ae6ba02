pub mod inventory;
pub mod scheduler;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use warpgrid_provider::{Capability, CloudProvider, ProviderRegistry};

/// Registry holding every provider this binary ships with.
pub fn registry() -> anyhow::Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    warpgrid_provider_http::register(&mut registry)?;
    Ok(registry)
}

/// `{"provider": name, "instances": bool, ...}` for every capability.
pub fn capabilities(provider: &dyn CloudProvider) -> Value {
    let mut out = Map::new();
    out.insert("provider".into(), provider.provider_name().into());
    for cap in Capability::ALL {
        out.insert(cap.as_str().into(), provider.supports(cap).into());
    }
    Value::Object(out)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&content).with_context(|| format!("parsing {}", path.display()))
}
