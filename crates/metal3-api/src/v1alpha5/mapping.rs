use metal3_versioned::{
    map_fields,
    mapping::{MapFrom, MappingError},
};

use crate::{v1alpha5::*, v1beta1 as hub};

// Shared

map_fields!(ApiEndpoint => hub::ApiEndpoint { host, port });
map_fields!(hub::ApiEndpoint => ApiEndpoint { host, port });

// Metal3Cluster

map_fields!(Metal3Cluster => hub::Metal3Cluster { metadata, spec, status });
map_fields!(hub::Metal3Cluster => Metal3Cluster { metadata, spec, status });

map_fields!(Metal3ClusterSpec => hub::Metal3ClusterSpec {
    control_plane_endpoint,
    no_cloud_provider,
});
map_fields!(hub::Metal3ClusterSpec => Metal3ClusterSpec {
    control_plane_endpoint,
    no_cloud_provider,
});

map_fields!(Metal3ClusterStatus => hub::Metal3ClusterStatus {
    last_updated,
    failure_reason,
    failure_message,
    ready,
}, defaults { conditions });
map_fields!(hub::Metal3ClusterStatus => Metal3ClusterStatus {
    last_updated,
    failure_reason,
    failure_message,
    ready,
});

// Metal3Machine and Metal3MachineTemplate

map_fields!(Metal3Machine => hub::Metal3Machine { metadata, spec, status });
map_fields!(hub::Metal3Machine => Metal3Machine { metadata, spec, status });

map_fields!(Metal3MachineSpec => hub::Metal3MachineSpec {
    provider_id,
    image,
    user_data,
    host_selector,
    data_template,
    meta_data,
    network_data,
    automated_cleaning_mode,
});
map_fields!(hub::Metal3MachineSpec => Metal3MachineSpec {
    provider_id,
    image,
    user_data,
    host_selector,
    data_template,
    meta_data,
    network_data,
    automated_cleaning_mode,
});

map_fields!(Image => hub::Image { url, checksum, checksum_type, disk_format });
map_fields!(hub::Image => Image { url, checksum, checksum_type, disk_format });

map_fields!(HostSelector => hub::HostSelector { match_labels, match_expressions });
map_fields!(hub::HostSelector => HostSelector { match_labels, match_expressions });

map_fields!(HostSelectorRequirement => hub::HostSelectorRequirement { key, operator, values });
map_fields!(hub::HostSelectorRequirement => HostSelectorRequirement { key, operator, values });

map_fields!(MachineAddress => hub::MachineAddress { type_, address });
map_fields!(hub::MachineAddress => MachineAddress { type_, address });

map_fields!(Metal3MachineStatus => hub::Metal3MachineStatus {
    addresses,
    last_updated,
    user_data,
    rendered_data,
    meta_data,
    network_data,
    failure_reason,
    failure_message,
    ready,
}, defaults { conditions });
map_fields!(hub::Metal3MachineStatus => Metal3MachineStatus {
    addresses,
    last_updated,
    user_data,
    rendered_data,
    meta_data,
    network_data,
    failure_reason,
    failure_message,
    ready,
});

map_fields!(Metal3MachineTemplate => hub::Metal3MachineTemplate { metadata, spec });
map_fields!(hub::Metal3MachineTemplate => Metal3MachineTemplate { metadata, spec });

map_fields!(Metal3MachineTemplateSpec => hub::Metal3MachineTemplateSpec { template, node_reuse });
map_fields!(hub::Metal3MachineTemplateSpec => Metal3MachineTemplateSpec { template, node_reuse });

map_fields!(Metal3MachineTemplateResource => hub::Metal3MachineTemplateResource { spec });
map_fields!(hub::Metal3MachineTemplateResource => Metal3MachineTemplateResource { spec });

// Metal3Data and Metal3DataClaim

map_fields!(Metal3Data => hub::Metal3Data { metadata, spec, status });
map_fields!(hub::Metal3Data => Metal3Data { metadata, spec, status });

map_fields!(Metal3DataSpec => hub::Metal3DataSpec {
    index,
    template_reference,
    meta_data,
    network_data,
    claim,
    template,
});
map_fields!(hub::Metal3DataSpec => Metal3DataSpec {
    index,
    template_reference,
    meta_data,
    network_data,
    claim,
    template,
});

map_fields!(Metal3DataStatus => hub::Metal3DataStatus { ready, error, error_message });
map_fields!(hub::Metal3DataStatus => Metal3DataStatus { ready, error, error_message });

map_fields!(Metal3DataClaim => hub::Metal3DataClaim { metadata, spec, status });
map_fields!(hub::Metal3DataClaim => Metal3DataClaim { metadata, spec, status });

map_fields!(Metal3DataClaimSpec => hub::Metal3DataClaimSpec { template });
map_fields!(hub::Metal3DataClaimSpec => Metal3DataClaimSpec { template });

map_fields!(Metal3DataClaimStatus => hub::Metal3DataClaimStatus { rendered_data, error_message });
map_fields!(hub::Metal3DataClaimStatus => Metal3DataClaimStatus { rendered_data, error_message });

// Metal3DataTemplate

map_fields!(Metal3DataTemplate => hub::Metal3DataTemplate { metadata, spec, status });
map_fields!(hub::Metal3DataTemplate => Metal3DataTemplate { metadata, spec, status });

map_fields!(Metal3DataTemplateSpec => hub::Metal3DataTemplateSpec {
    cluster_name,
    meta_data,
    network_data,
    template_reference,
});
map_fields!(hub::Metal3DataTemplateSpec => Metal3DataTemplateSpec {
    cluster_name,
    meta_data,
    network_data,
    template_reference,
});

map_fields!(Metal3DataTemplateStatus => hub::Metal3DataTemplateStatus { last_updated, indexes });
map_fields!(hub::Metal3DataTemplateStatus => Metal3DataTemplateStatus { last_updated, indexes });

map_fields!(MetaData => hub::MetaData {
    strings,
    object_names,
    indexes,
    ip_addresses_from_pool,
    prefixes_from_pool,
    gateways_from_pool,
    dns_servers_from_pool,
    from_host_interfaces,
    from_labels,
    from_annotations,
});
map_fields!(hub::MetaData => MetaData {
    strings,
    object_names,
    indexes,
    ip_addresses_from_pool,
    prefixes_from_pool,
    gateways_from_pool,
    dns_servers_from_pool,
    from_host_interfaces,
    from_labels,
    from_annotations,
});

map_fields!(MetaDataString => hub::MetaDataString { key, value });
map_fields!(hub::MetaDataString => MetaDataString { key, value });

map_fields!(MetaDataObjectName => hub::MetaDataObjectName { key, object });
map_fields!(hub::MetaDataObjectName => MetaDataObjectName { key, object });

map_fields!(MetaDataIndex => hub::MetaDataIndex { key, offset, step, prefix, suffix });
map_fields!(hub::MetaDataIndex => MetaDataIndex { key, offset, step, prefix, suffix });

map_fields!(FromPool => hub::FromPool { key, name }, defaults { api_group, kind });
map_fields!(hub::FromPool => FromPool { key, name });

map_fields!(MetaDataHostInterface => hub::MetaDataHostInterface { key, interface });
map_fields!(hub::MetaDataHostInterface => MetaDataHostInterface { key, interface });

map_fields!(MetaDataFromLabel => hub::MetaDataFromLabel { key, object, label });
map_fields!(hub::MetaDataFromLabel => MetaDataFromLabel { key, object, label });

map_fields!(MetaDataFromAnnotation => hub::MetaDataFromAnnotation { key, object, annotation });
map_fields!(hub::MetaDataFromAnnotation => MetaDataFromAnnotation { key, object, annotation });

map_fields!(NetworkData => hub::NetworkData { links, networks, services });
map_fields!(hub::NetworkData => NetworkData { links, networks, services });

map_fields!(NetworkDataLink => hub::NetworkDataLink { ethernets, bonds, vlans });
map_fields!(hub::NetworkDataLink => NetworkDataLink { ethernets, bonds, vlans });

map_fields!(NetworkDataLinkEthernet => hub::NetworkDataLinkEthernet {
    type_,
    id,
    mtu,
    mac_address,
});
map_fields!(hub::NetworkDataLinkEthernet => NetworkDataLinkEthernet {
    type_,
    id,
    mtu,
    mac_address,
});

map_fields!(NetworkDataLinkBond => hub::NetworkDataLinkBond {
    bond_mode,
    id,
    mtu,
    mac_address,
    bond_links,
}, defaults { bond_xmit_hash_policy });
map_fields!(hub::NetworkDataLinkBond => NetworkDataLinkBond {
    bond_mode,
    id,
    mtu,
    mac_address,
    bond_links,
});

map_fields!(NetworkDataLinkVlan => hub::NetworkDataLinkVlan {
    vlan_id,
    id,
    mtu,
    mac_address,
    vlan_link,
});
map_fields!(hub::NetworkDataLinkVlan => NetworkDataLinkVlan {
    vlan_id,
    id,
    mtu,
    mac_address,
    vlan_link,
});

map_fields!(NetworkLinkEthernetMac => hub::NetworkLinkEthernetMac {
    string,
    from_host_interface,
}, defaults { from_annotation });
map_fields!(hub::NetworkLinkEthernetMac => NetworkLinkEthernetMac {
    string,
    from_host_interface,
});

map_fields!(NetworkDataNetwork => hub::NetworkDataNetwork {
    ipv4,
    ipv6,
    ipv4_dhcp,
    ipv6_dhcp,
    ipv6_slaac,
});
map_fields!(hub::NetworkDataNetwork => NetworkDataNetwork {
    ipv4,
    ipv6,
    ipv4_dhcp,
    ipv6_dhcp,
    ipv6_slaac,
});

map_fields!(NetworkDataIPv4 => hub::NetworkDataIPv4 {
    id,
    ip_address_from_pool,
    link,
    routes,
}, defaults { from_pool_ref });
map_fields!(hub::NetworkDataIPv4 => NetworkDataIPv4 { id, ip_address_from_pool, link, routes });

map_fields!(NetworkDataIPv6 => hub::NetworkDataIPv6 {
    id,
    ip_address_from_pool,
    link,
    routes,
}, defaults { from_pool_ref });
map_fields!(hub::NetworkDataIPv6 => NetworkDataIPv6 { id, ip_address_from_pool, link, routes });

map_fields!(NetworkDataDhcp => hub::NetworkDataDhcp { id, link, routes });
map_fields!(hub::NetworkDataDhcp => NetworkDataDhcp { id, link, routes });

map_fields!(NetworkDataRoute => hub::NetworkDataRoute { network, prefix, gateway, services });
map_fields!(hub::NetworkDataRoute => NetworkDataRoute { network, prefix, gateway, services });

map_fields!(NetworkGateway => hub::NetworkGateway { string, from_pool });
map_fields!(hub::NetworkGateway => NetworkGateway { string, from_pool });

map_fields!(NetworkDataService => hub::NetworkDataService { dns, dns_from_pool });
map_fields!(hub::NetworkDataService => NetworkDataService { dns, dns_from_pool });

// Metal3Remediation and Metal3RemediationTemplate

map_fields!(Metal3Remediation => hub::Metal3Remediation { metadata, spec, status });
map_fields!(hub::Metal3Remediation => Metal3Remediation { metadata, spec, status });

map_fields!(Metal3RemediationSpec => hub::Metal3RemediationSpec { strategy });
map_fields!(hub::Metal3RemediationSpec => Metal3RemediationSpec { strategy });

map_fields!(RemediationStrategy => hub::RemediationStrategy { type_, retry_limit, timeout });
map_fields!(hub::RemediationStrategy => RemediationStrategy { type_, retry_limit, timeout });

map_fields!(Metal3RemediationStatus => hub::Metal3RemediationStatus {
    phase,
    retry_count,
    last_remediated,
});
map_fields!(hub::Metal3RemediationStatus => Metal3RemediationStatus {
    phase,
    retry_count,
    last_remediated,
});

map_fields!(Metal3RemediationTemplate => hub::Metal3RemediationTemplate { metadata, spec, status });
map_fields!(hub::Metal3RemediationTemplate => Metal3RemediationTemplate { metadata, spec, status });

map_fields!(Metal3RemediationTemplateSpec => hub::Metal3RemediationTemplateSpec { template });
map_fields!(hub::Metal3RemediationTemplateSpec => Metal3RemediationTemplateSpec { template });

map_fields!(Metal3RemediationTemplateResource => hub::Metal3RemediationTemplateResource { spec });
map_fields!(hub::Metal3RemediationTemplateResource => Metal3RemediationTemplateResource { spec });

map_fields!(Metal3RemediationTemplateStatus => hub::Metal3RemediationTemplateStatus { status });
map_fields!(hub::Metal3RemediationTemplateStatus => Metal3RemediationTemplateStatus { status });

impl MapFrom<String> for hub::RemediationType {
    fn map_from(value: String) -> Result<Self, MappingError> {
        Ok(value.into())
    }
}

impl MapFrom<hub::RemediationType> for String {
    fn map_from(value: hub::RemediationType) -> Result<Self, MappingError> {
        Ok(value.into())
    }
}
