use k8s_openapi::api::core::v1::{ObjectReference, SecretReference};
use kube::CustomResource;
use metal3_versioned::Hub;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A Metal3Data holds the rendered metadata and network data of one machine.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3Data",
    plural = "metal3datas",
    namespaced,
    status = "Metal3DataStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataSpec {
    /// The index of this object among all objects rendered from the same template.
    #[serde(default)]
    pub index: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<SecretReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_data: Option<SecretReference>,

    /// The Metal3DataClaim this object was rendered for.
    pub claim: ObjectReference,

    /// The Metal3DataTemplate this object was rendered from.
    pub template: ObjectReference,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataStatus {
    #[serde(default)]
    pub ready: bool,

    #[serde(default)]
    pub error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// A Metal3DataClaim requests a Metal3Data from a Metal3DataTemplate.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3DataClaim",
    namespaced,
    status = "Metal3DataClaimStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataClaimSpec {
    pub template: ObjectReference,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataClaimStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_data: Option<ObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Hub for Metal3Data {}

impl Hub for Metal3DataClaim {}
