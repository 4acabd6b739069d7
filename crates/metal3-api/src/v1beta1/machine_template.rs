use kube::CustomResource;
use metal3_versioned::Hub;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::v1beta1::Metal3MachineSpec;

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3MachineTemplate",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3MachineTemplateSpec {
    pub template: Metal3MachineTemplateResource,

    /// Whether bare metal hosts released by machines of this template are reused for new
    /// machines of the same template.
    #[serde(default)]
    pub node_reuse: bool,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3MachineTemplateResource {
    pub spec: Metal3MachineSpec,
}

impl Hub for Metal3MachineTemplate {}
