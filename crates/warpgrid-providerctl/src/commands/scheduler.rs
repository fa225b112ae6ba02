use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::info;
use warpgrid_provider::{CloudProvider, NodeList, Pod, SchedulerExtension};

use super::read_json;

fn extension(provider: &dyn CloudProvider) -> anyhow::Result<&dyn SchedulerExtension> {
    provider.scheduler_extension().with_context(|| {
        format!(
            "provider {} does not offer scheduler-extension",
            provider.provider_name()
        )
    })
}

pub async fn filter(provider: &dyn CloudProvider, pod: &Path, nodes: &Path) -> anyhow::Result<Value> {
    let ext = extension(provider)?;
    let pod: Pod = read_json(pod)?;
    let nodes: NodeList = read_json(nodes)?;
    let kept = ext.filter(&pod, &nodes).await?;
    info!(candidates = nodes.items.len(), kept = kept.items.len(), "filter complete");
    Ok(serde_json::to_value(kept)?)
}

pub async fn prioritize(
    provider: &dyn CloudProvider,
    pod: &Path,
    nodes: &Path,
) -> anyhow::Result<Value> {
    let ext = extension(provider)?;
    let pod: Pod = read_json(pod)?;
    let nodes: NodeList = read_json(nodes)?;
    Ok(serde_json::to_value(ext.prioritize(&pod, &nodes).await?)?)
}

pub async fn bind(provider: &dyn CloudProvider, pod: &Path, host: &str) -> anyhow::Result<Value> {
    let ext = extension(provider)?;
    let pod: Pod = read_json(pod)?;
    let annotations = ext
        .bind(&pod, host)
        .await
        .with_context(|| format!("bind of {} to {host} is in an unknown state", pod.metadata.name))?;
    Ok(serde_json::to_value(annotations)?)
}

pub async fn unbind(provider: &dyn CloudProvider, pod: &Path) -> anyhow::Result<Value> {
    let ext = extension(provider)?;
    let pod: Pod = read_json(pod)?;
    ext.unbind(&pod).await?;
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::provider;

    #[tokio::test]
    async fn unsupported_extension_is_reported_before_reading_files() {
        let p = provider("[global]\ninstances = true\ninstances-url = \"http://inv\"\n");
        let err = unbind(p.as_ref(), Path::new("/nonexistent/pod.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not offer scheduler-extension"));
    }

    #[tokio::test]
    async fn unreadable_pod_file_is_reported() {
        let p = provider("[global]\nscheduler-extension = true\nscheduler-extension-url = \"http://s\"\n");
        let err = unbind(p.as_ref(), Path::new("/nonexistent/pod.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pod.json"));
    }
}
