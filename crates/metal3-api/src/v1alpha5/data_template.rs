use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, CustomResource, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1alpha5",
    kind = "Metal3DataTemplate",
    namespaced,
    status = "Metal3DataTemplateStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataTemplateSpec {
    pub cluster_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_data: Option<NetworkData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_reference: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataTemplateStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Time>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, i32>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<MetaDataString>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_names: Vec<MetaDataObjectName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<MetaDataIndex>,

    #[serde(
        default,
        rename = "ipAddressesFromIPPool",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ip_addresses_from_pool: Vec<FromPool>,

    #[serde(
        default,
        rename = "prefixesFromIPPool",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prefixes_from_pool: Vec<FromPool>,

    #[serde(
        default,
        rename = "gatewaysFromIPPool",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub gateways_from_pool: Vec<FromPool>,

    #[serde(
        default,
        rename = "dnsServersFromIPPool",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dns_servers_from_pool: Vec<FromPool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_host_interfaces: Vec<MetaDataHostInterface>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_labels: Vec<MetaDataFromLabel>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_annotations: Vec<MetaDataFromAnnotation>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataString {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataObjectName {
    pub key: String,
    pub object: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataIndex {
    pub key: String,

    #[serde(default)]
    pub offset: i32,

    #[serde(default)]
    pub step: i32,

    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FromPool {
    pub key: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataHostInterface {
    pub key: String,
    pub interface: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataFromLabel {
    pub key: String,
    pub object: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataFromAnnotation {
    pub key: String,
    pub object: String,
    pub annotation: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkData {
    #[serde(default)]
    pub links: NetworkDataLink,

    #[serde(default)]
    pub networks: NetworkDataNetwork,

    #[serde(default)]
    pub services: NetworkDataService,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataLink {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ethernets: Vec<NetworkDataLinkEthernet>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonds: Vec<NetworkDataLinkBond>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlans: Vec<NetworkDataLinkVlan>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataLinkEthernet {
    #[serde(rename = "type")]
    pub type_: String,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<NetworkLinkEthernetMac>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataLinkBond {
    pub bond_mode: String,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<NetworkLinkEthernetMac>,

    #[serde(default)]
    pub bond_links: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataLinkVlan {
    #[serde(rename = "vlanID")]
    pub vlan_id: i32,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<NetworkLinkEthernetMac>,

    pub vlan_link: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLinkEthernetMac {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_host_interface: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataNetwork {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4: Vec<NetworkDataIPv4>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6: Vec<NetworkDataIPv6>,

    #[serde(default, rename = "ipv4DHCP", skip_serializing_if = "Vec::is_empty")]
    pub ipv4_dhcp: Vec<NetworkDataDhcp>,

    #[serde(default, rename = "ipv6DHCP", skip_serializing_if = "Vec::is_empty")]
    pub ipv6_dhcp: Vec<NetworkDataDhcp>,

    #[serde(default, rename = "ipv6SLAAC", skip_serializing_if = "Vec::is_empty")]
    pub ipv6_slaac: Vec<NetworkDataDhcp>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataIPv4 {
    pub id: String,

    #[serde(
        default,
        rename = "ipAddressFromIPPool",
        skip_serializing_if = "String::is_empty"
    )]
    pub ip_address_from_pool: String,

    pub link: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<NetworkDataRoute>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataIPv6 {
    pub id: String,

    #[serde(
        default,
        rename = "ipAddressFromIPPool",
        skip_serializing_if = "String::is_empty"
    )]
    pub ip_address_from_pool: String,

    pub link: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<NetworkDataRoute>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataDhcp {
    pub id: String,
    pub link: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<NetworkDataRoute>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataRoute {
    pub network: String,
    pub prefix: i32,
    pub gateway: NetworkGateway,

    #[serde(default)]
    pub services: NetworkDataService,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGateway {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,

    #[serde(
        default,
        rename = "fromIPPool",
        skip_serializing_if = "Option::is_none"
    )]
    pub from_pool: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataService {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,

    #[serde(
        default,
        rename = "dnsFromIPPool",
        skip_serializing_if = "Option::is_none"
    )]
    pub dns_from_pool: Option<String>,
}
