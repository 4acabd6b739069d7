use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::TypedLocalObjectReference, apimachinery::pkg::apis::meta::v1::Time,
};
use kube::CustomResource;
use metal3_versioned::{Hub, restore::Keyed};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A Metal3DataTemplate is the template from which the metadata and network data of
/// machines are rendered.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Metal3DataTemplate",
    namespaced,
    status = "Metal3DataTemplateStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct Metal3DataTemplateSpec {
    /// The name of the cluster this template belongs to.
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

    /// Maps claim names to the index of the Metal3Data rendered for them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, i32>,
}

/// Metadata keys rendered into the `meta_data` secret of a machine.
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

/// Renders `prefix + (offset + index * step) + suffix`.
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

/// A metadata value allocated from an IP pool.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FromPool {
    pub key: String,

    /// The name of the pool.
    pub name: String,

    /// The API group of the pool, like `ipam.metal3.io`. Introduced with v1beta1.
    #[serde(default, rename = "apiGroup")]
    pub api_group: String,

    /// The kind of the pool, like `IPPool`. Introduced with v1beta1.
    #[serde(default)]
    pub kind: String,
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

/// Network configuration rendered into the `network_data` secret of a machine, following
/// the OpenStack network data format.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
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
    /// The link type, like `phy` or `tap`.
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
    /// The bonding mode, like `802.3ad` or `active-backup`.
    pub bond_mode: String,

    /// The transmit hash policy used for slave selection. Introduced with v1beta1.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bond_xmit_hash_policy: String,

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

/// The source of a link MAC address. At most one source is expected to be set.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLinkEthernetMac {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_host_interface: Option<String>,

    /// Reads the MAC address from an annotation. Introduced with v1beta1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_annotation: Option<NetworkLinkEthernetMacFromAnnotation>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLinkEthernetMacFromAnnotation {
    /// The object carrying the annotation, like `machine` or `baremetalhost`.
    pub object: String,
    pub annotation: String,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
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

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataIPv4 {
    pub id: String,

    /// The name of the pool to allocate the address from.
    #[serde(
        default,
        rename = "ipAddressFromIPPool",
        skip_serializing_if = "String::is_empty"
    )]
    pub ip_address_from_pool: String,

    /// A typed reference to the pool to allocate the address from. Introduced with v1beta1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_pool_ref: Option<TypedLocalObjectReference>,

    pub link: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<NetworkDataRoute>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDataIPv6 {
    pub id: String,

    #[serde(
        default,
        rename = "ipAddressFromIPPool",
        skip_serializing_if = "String::is_empty"
    )]
    pub ip_address_from_pool: String,

    /// Introduced with v1beta1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_pool_ref: Option<TypedLocalObjectReference>,

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

impl Keyed for FromPool {
    fn key(&self) -> &str {
        &self.key
    }
}

impl Keyed for NetworkDataLinkEthernet {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for NetworkDataLinkBond {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for NetworkDataLinkVlan {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for NetworkDataIPv4 {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for NetworkDataIPv6 {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Hub for Metal3DataTemplate {}
