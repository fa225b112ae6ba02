//! Wire protocol: fixed paths and request bodies.
//!
//! | Operation | Method | Path | Request body |
//! |---|---|---|---|
//! | list | GET | `/v1/instances/{filter}` | — |
//! | addresses | GET | `/v1/instances/{id}/addresses` | — |
//! | resources | GET | `/v1/instances/{id}/resources` | — |
//! | filter | POST | `/v1/scheduler/filter` | `{pod, nodes}` |
//! | prioritize | POST | `/v1/scheduler/prioritize` | `{pod, nodes}` |
//! | bind | POST | `/v1/scheduler/bind` | `{pod, host}` |
//! | unbind | POST | `/v1/scheduler/unbind` | pod |

use serde::Serialize;
use url::Url;

use warpgrid_provider::{NodeList, Pod};

use crate::config::BaseUrl;

pub const API_VERSION: &str = "v1";
pub const INSTANCES: &str = "instances";
pub const ADDRESSES: &str = "addresses";
pub const RESOURCES: &str = "resources";
pub const SCHEDULER: &str = "scheduler";

/// Scheduler-extension verbs, one per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerVerb {
    Filter,
    Prioritize,
    Bind,
    Unbind,
}

impl SchedulerVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Prioritize => "prioritize",
            Self::Bind => "bind",
            Self::Unbind => "unbind",
        }
    }
}

/// Body of `filter`.
#[derive(Debug, Serialize)]
pub struct FilterArgs<'a> {
    pub pod: &'a Pod,
    pub nodes: &'a NodeList,
}

/// Body of `prioritize`. Same shape as [`FilterArgs`].
pub type PriorityArgs<'a> = FilterArgs<'a>;

/// Body of `bind`.
#[derive(Debug, Serialize)]
pub struct BindArgs<'a> {
    pub pod: &'a Pod,
    pub host: &'a str,
}

/// `{base}/v1/instances[/{filter}]`. A blank filter selects everything.
pub fn list_url(base: &BaseUrl, filter: &str) -> Url {
    let filter = (!filter.trim().is_empty()).then_some(filter);
    base.join([API_VERSION, INSTANCES].into_iter().chain(filter))
}

/// `{base}/v1/instances/{instance}/{leaf}`.
pub fn instance_url(base: &BaseUrl, instance: &str, leaf: &str) -> Url {
    base.join([API_VERSION, INSTANCES, instance, leaf])
}

/// `{base}/v1/scheduler/{verb}`.
pub fn scheduler_url(base: &BaseUrl, verb: SchedulerVerb) -> Url {
    base.join([API_VERSION, SCHEDULER, verb.as_str()])
}
