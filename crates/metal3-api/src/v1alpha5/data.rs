use k8s_openapi::api::core::v1::{ObjectReference, SecretReference};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha5",
    kind = "Metal3Data",
    plural = "metal3datas",
    namespaced,
    status = "Metal3DataStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataSpec {
    #[serde(default)]
    pub index: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<SecretReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_data: Option<SecretReference>,

    pub claim: ObjectReference,

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

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha5",
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
