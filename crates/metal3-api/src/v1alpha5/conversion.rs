use metal3_versioned::{
    Spoke,
    mapping::{MapInto, MappingError},
    restore::{Restoration, restore_elements},
};
use tracing::debug;

use crate::{v1alpha5::*, v1beta1 as hub};

/// Implements [`Spoke`] for kinds which have no fields the hub cannot represent in this
/// version.
macro_rules! mapped_spoke {
    ($($kind:ident),* $(,)?) => {
        $(
            impl Spoke for $kind {
                type Hub = hub::$kind;

                fn map_to_hub(&self) -> Result<Self::Hub, MappingError> {
                    self.clone().map_into()
                }

                fn map_from_hub(hub: &Self::Hub) -> Result<Self, MappingError> {
                    hub.clone().map_into()
                }
            }
        )*
    };
}

mapped_spoke!(
    Metal3MachineTemplate,
    Metal3Data,
    Metal3DataClaim,
    Metal3Remediation,
    Metal3RemediationTemplate,
);

impl Spoke for Metal3Cluster {
    type Hub = hub::Metal3Cluster;

    const PRESERVES_HUB_DATA: bool = true;

    fn map_to_hub(&self) -> Result<Self::Hub, MappingError> {
        self.clone().map_into()
    }

    fn map_from_hub(hub: &Self::Hub) -> Result<Self, MappingError> {
        hub.clone().map_into()
    }

    fn restore_hub_data(hub: &mut Self::Hub, recovered: Self::Hub) {
        if let Some(conditions) = recovered.status.map(|status| status.conditions) {
            restore_conditions(&mut hub.status, conditions);
        }
    }
}

impl Spoke for Metal3Machine {
    type Hub = hub::Metal3Machine;

    const PRESERVES_HUB_DATA: bool = true;

    fn map_to_hub(&self) -> Result<Self::Hub, MappingError> {
        self.clone().map_into()
    }

    fn map_from_hub(hub: &Self::Hub) -> Result<Self, MappingError> {
        hub.clone().map_into()
    }

    fn restore_hub_data(hub: &mut Self::Hub, recovered: Self::Hub) {
        if let Some(conditions) = recovered.status.map(|status| status.conditions) {
            restore_conditions(&mut hub.status, conditions);
        }
    }
}

/// Conditions only exist in the hub, so whatever the spoke status says, the recovered
/// conditions are the latest known ones.
fn restore_conditions<S>(status: &mut Option<S>, conditions: Vec<hub::Condition>)
where
    S: Default + HasConditions,
{
    if conditions.is_empty() {
        return;
    }

    *status.get_or_insert_with(S::default).conditions_mut() = conditions;
}

trait HasConditions {
    fn conditions_mut(&mut self) -> &mut Vec<hub::Condition>;
}

impl HasConditions for hub::Metal3ClusterStatus {
    fn conditions_mut(&mut self) -> &mut Vec<hub::Condition> {
        &mut self.conditions
    }
}

impl HasConditions for hub::Metal3MachineStatus {
    fn conditions_mut(&mut self) -> &mut Vec<hub::Condition> {
        &mut self.conditions
    }
}

impl Spoke for Metal3DataTemplate {
    type Hub = hub::Metal3DataTemplate;

    const PRESERVES_HUB_DATA: bool = true;

    fn map_to_hub(&self) -> Result<Self::Hub, MappingError> {
        self.clone().map_into()
    }

    fn map_from_hub(hub: &Self::Hub) -> Result<Self, MappingError> {
        hub.clone().map_into()
    }

    fn restore_hub_data(hub: &mut Self::Hub, recovered: Self::Hub) {
        if let (Some(meta_data), Some(recovered)) =
            (hub.spec.meta_data.as_mut(), &recovered.spec.meta_data)
        {
            restore_meta_data(meta_data, recovered);
        }

        if let (Some(network_data), Some(recovered)) =
            (hub.spec.network_data.as_mut(), &recovered.spec.network_data)
        {
            restore_network_data(network_data, recovered);
        }
    }
}

fn restore_meta_data(meta_data: &mut hub::MetaData, recovered: &hub::MetaData) {
    let pools = [
        (
            "ipAddressesFromIPPool",
            &mut meta_data.ip_addresses_from_pool,
            &recovered.ip_addresses_from_pool,
        ),
        (
            "prefixesFromIPPool",
            &mut meta_data.prefixes_from_pool,
            &recovered.prefixes_from_pool,
        ),
        (
            "gatewaysFromIPPool",
            &mut meta_data.gateways_from_pool,
            &recovered.gateways_from_pool,
        ),
        (
            "dnsServersFromIPPool",
            &mut meta_data.dns_servers_from_pool,
            &recovered.dns_servers_from_pool,
        ),
    ];

    for (field, target, recovered) in pools {
        let restoration = restore_elements(target, recovered, |pool, recovered_pool| {
            pool.api_group.clone_from(&recovered_pool.api_group);
            pool.kind.clone_from(&recovered_pool.kind);
        });
        log_restoration(field, restoration);
    }
}

fn restore_network_data(network_data: &mut hub::NetworkData, recovered: &hub::NetworkData) {
    let links = &mut network_data.links;

    let restoration = restore_elements(
        &mut links.ethernets,
        &recovered.links.ethernets,
        |ethernet, recovered_ethernet| {
            restore_mac_annotation(&mut ethernet.mac_address, &recovered_ethernet.mac_address);
        },
    );
    log_restoration("links.ethernets", restoration);

    let restoration = restore_elements(
        &mut links.vlans,
        &recovered.links.vlans,
        |vlan, recovered_vlan| {
            restore_mac_annotation(&mut vlan.mac_address, &recovered_vlan.mac_address);
        },
    );
    log_restoration("links.vlans", restoration);

    let restoration = restore_elements(
        &mut links.bonds,
        &recovered.links.bonds,
        |bond, recovered_bond| {
            restore_mac_annotation(&mut bond.mac_address, &recovered_bond.mac_address);
            bond.bond_xmit_hash_policy
                .clone_from(&recovered_bond.bond_xmit_hash_policy);
        },
    );
    log_restoration("links.bonds", restoration);

    let networks = &mut network_data.networks;

    let restoration = restore_elements(
        &mut networks.ipv4,
        &recovered.networks.ipv4,
        |network, recovered_network| {
            network.from_pool_ref.clone_from(&recovered_network.from_pool_ref);
        },
    );
    log_restoration("networks.ipv4", restoration);

    let restoration = restore_elements(
        &mut networks.ipv6,
        &recovered.networks.ipv6,
        |network, recovered_network| {
            network.from_pool_ref.clone_from(&recovered_network.from_pool_ref);
        },
    );
    log_restoration("networks.ipv6", restoration);
}

/// The annotation source is only restored if the link still has a MAC address. A MAC
/// address removed while the object was stored as a spoke stays removed.
fn restore_mac_annotation(
    mac_address: &mut Option<hub::NetworkLinkEthernetMac>,
    recovered: &Option<hub::NetworkLinkEthernetMac>,
) {
    if let (Some(mac_address), Some(recovered)) = (mac_address.as_mut(), recovered) {
        mac_address
            .from_annotation
            .clone_from(&recovered.from_annotation);
    }
}

fn log_restoration(field: &str, restoration: Restoration) {
    match restoration {
        Restoration::Keyed { restored } => debug!(
            field,
            restored,
            "restored hub-only fields of elements matched by key"
        ),
        Restoration::Positional { restored } => debug!(
            field,
            restored,
            "restored hub-only fields of elements matched by position"
        ),
    }
}
