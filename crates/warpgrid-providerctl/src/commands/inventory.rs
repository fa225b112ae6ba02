use anyhow::Context;
use serde_json::Value;
use warpgrid_provider::{CloudProvider, Instances};

fn instances(provider: &dyn CloudProvider) -> anyhow::Result<&dyn Instances> {
    provider.instances().with_context(|| {
        format!("provider {} does not offer instances", provider.provider_name())
    })
}

pub async fn list(provider: &dyn CloudProvider, filter: &str) -> anyhow::Result<Value> {
    let names = instances(provider)?.list(filter).await?;
    Ok(serde_json::to_value(names)?)
}

pub async fn addresses(provider: &dyn CloudProvider, instance: &str) -> anyhow::Result<Value> {
    let addrs = instances(provider)?.node_addresses(instance).await?;
    Ok(serde_json::to_value(addrs)?)
}

pub async fn resources(provider: &dyn CloudProvider, instance: &str) -> anyhow::Result<Value> {
    let res = instances(provider)?.node_resources(instance).await?;
    Ok(serde_json::to_value(res)?)
}

pub fn external_id(provider: &dyn CloudProvider, instance: &str) -> anyhow::Result<Value> {
    Ok(instances(provider)?.external_id(instance)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::provider;

    #[test]
    fn external_id_needs_no_remote() {
        let p = provider("[global]\ninstances = true\ninstances-url = \"http://127.0.0.1:1\"\n");
        assert_eq!(external_id(p.as_ref(), "node-3").unwrap(), "node-3");
    }

    #[tokio::test]
    async fn unsupported_inventory_is_reported() {
        let p = provider("[global]\nscheduler-extension = true\nscheduler-extension-url = \"http://s\"\n");
        let err = list(p.as_ref(), "").await.unwrap_err();
        assert!(err.to_string().contains("does not offer instances"));
    }
}
