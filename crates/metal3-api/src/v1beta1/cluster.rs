use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use metal3_versioned::Hub;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::v1beta1::{ApiEndpoint, Condition};

/// A Metal3Cluster describes the bare metal infrastructure of a Cluster API workload cluster.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3Cluster",
    namespaced,
    status = "Metal3ClusterStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3ClusterSpec {
    pub control_plane_endpoint: ApiEndpoint,

    /// Determines if the cluster should run without a cloud provider. The provider ID of
    /// nodes is then set by the infrastructure provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_cloud_provider: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3ClusterStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,

    /// Whether the infrastructure is ready for machines to be provisioned.
    #[serde(default)]
    pub ready: bool,

    /// Introduced with v1beta1.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Hub for Metal3Cluster {}
