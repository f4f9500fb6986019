// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container cluster backend (e.g. ECS/Kubernetes) — runs a task in a
//! declared cluster/namespace using the cluster's own scheduler. This
//! implementation targets Kubernetes via `kube-rs`; a pod, not a Job
//! resource, since the worker's own exit code is all that matters and
//! the agent never waits on it.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Container, EnvVar, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, PostParams};
use kube::Client;
use tharsis_core::{Error, Result};

use crate::executor::{DispatchContext, ExecutorPlugin};

/// Runs one pod per dispatched job in a fixed namespace, using a fixed
/// worker image. Failure surfaces the Kubernetes API error's reason and
/// detail strings, per §4.7.
pub struct ClusterExecutor {
    client: Client,
    namespace: String,
    image: String,
}

impl ClusterExecutor {
    pub async fn new(namespace: impl Into<String>, image: impl Into<String>) -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| Error::internal(format!("failed to create kube client: {e}")))?;
        Ok(Self { client, namespace: namespace.into(), image: image.into() })
    }

    fn build_pod(&self, pod_name: &str, ctx: &DispatchContext) -> Pod {
        build_worker_pod(pod_name, &self.namespace, &self.image, ctx)
    }
}

/// DNS-1123-safe pod name derived from a job id.
fn pod_name_for(ctx: &DispatchContext) -> String {
    format!("tharsis-job-{}", ctx.job_id.short(12)).to_lowercase()
}

/// Pure pod-spec construction, kept free of `Client` so it is testable
/// without a live cluster.
fn build_worker_pod(pod_name: &str, namespace: &str, image: &str, ctx: &DispatchContext) -> Pod {
    let env = ctx
        .env_pairs()
        .into_iter()
        .map(|(name, value)| EnvVar { name, value: Some(value), ..Default::default() })
        .collect();

    Pod {
        metadata: ObjectMeta {
            name: Some(pod_name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(
                [
                    ("app".to_string(), "tharsis-worker".to_string()),
                    ("tharsis.dev/job-id".to_string(), ctx.job_id.to_string()),
                ]
                .into_iter()
                .collect(),
            ),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: "worker".to_string(),
                image: Some(image.to_string()),
                env: Some(env),
                ..Default::default()
            }],
            restart_policy: Some("Never".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[async_trait]
impl ExecutorPlugin for ClusterExecutor {
    async fn dispatch_job(&self, ctx: &DispatchContext) -> Result<String> {
        let pod_name = pod_name_for(ctx);
        let pod_spec = self.build_pod(&pod_name, ctx);

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        pods.create(&PostParams::default(), &pod_spec).await.map_err(|e| {
            Error::internal(format!("pod creation failed for job {}: {e}", ctx.job_id))
        })?;

        tracing::info!(%pod_name, job_id = %ctx.job_id, namespace = %self.namespace, "dispatched cluster worker pod");
        Ok(pod_name)
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
