use std::fmt::Display;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use metal3_versioned::Hub;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const REBOOT: &str = "Reboot";

/// A Metal3Remediation remediates an unhealthy machine, currently by rebooting its host.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3Remediation",
    namespaced,
    status = "Metal3RemediationStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3RemediationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<RemediationStrategy>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationStrategy {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub type_: Option<RemediationType>,

    /// How many times remediation is retried before the machine is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_limit: Option<i32>,

    /// The duration to wait for the host to come back after each attempt, like `600s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// The remediation strategy. Strategies without a dedicated variant are kept verbatim, since
/// older versions accept an arbitrary string.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RemediationType {
    Reboot,
    Other(String),
}

impl From<String> for RemediationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            REBOOT => Self::Reboot,
            _ => Self::Other(value),
        }
    }
}

impl From<RemediationType> for String {
    fn from(value: RemediationType) -> Self {
        match value {
            RemediationType::Reboot => REBOOT.to_owned(),
            RemediationType::Other(value) => value,
        }
    }
}

impl Display for RemediationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reboot => f.write_str(REBOOT),
            Self::Other(value) => f.write_str(value),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3RemediationStatus {
    /// The phase of the remediation, like `Running` or `Waiting`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_remediated: Option<Time>,
}

#[derive(Clone, CustomResource, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3RemediationTemplate",
    namespaced,
    status = "Metal3RemediationTemplateStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3RemediationTemplateSpec {
    pub template: Metal3RemediationTemplateResource,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3RemediationTemplateResource {
    pub spec: Metal3RemediationSpec,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3RemediationTemplateStatus {
    pub status: Metal3RemediationStatus,
}

impl Hub for Metal3Remediation {}

impl Hub for Metal3RemediationTemplate {}
