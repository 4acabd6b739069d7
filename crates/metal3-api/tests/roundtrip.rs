use indoc::indoc;
use metal3_api::{v1alpha5, v1beta1};
use metal3_versioned::{
    ConversionError, SideChannel, SideChannelOptions, Spoke, key::PayloadKey,
    side_channel::{LoadError, StoreError},
};
use rstest::rstest;

fn hub_data_template() -> v1beta1::Metal3DataTemplate {
    serde_yaml::from_str(include_str!("inputs/data-template-v1beta1.yaml")).unwrap()
}

fn hub_machine() -> v1beta1::Metal3Machine {
    serde_yaml::from_str(indoc! {r#"
        apiVersion: infrastructure.cluster.x-k8s.io/v1beta1
        kind: Metal3Machine
        metadata:
          name: workers-abc12
          namespace: metal3
          resourceVersion: "815"
        spec:
          providerID: metal3://metal3/host-0/workers-abc12
          image:
            url: http://images.example.com/ubuntu-24.04.qcow2
            checksum: http://images.example.com/ubuntu-24.04.qcow2.sha256sum
            checksumType: sha256
            diskFormat: qcow2
          hostSelector:
            matchLabels:
              example.com/rack: r1
          dataTemplate:
            name: workers-template
        status:
          ready: true
          addresses:
            - type: InternalIP
              address: 192.168.111.20
          conditions:
            - type: Ready
              status: "True"
              lastTransitionTime: "2024-05-01T10:00:00Z"
            - type: AssociateBMH
              status: "False"
              severity: Warning
              reason: WaitingForHost
              message: no host matches the selector
    "#})
    .unwrap()
}

fn manifest_key() -> String {
    PayloadKey::Manifest.to_string()
}

fn chunk_key(index: usize) -> String {
    PayloadKey::Chunk(index).to_string()
}

#[test]
fn ready_condition_and_ip_pool_reference_survive_round_trip() {
    let side_channel = SideChannel::default();

    let machine = hub_machine();
    let spoke = v1alpha5::Metal3Machine::convert_from_hub(&machine, &side_channel).unwrap();
    let upgraded = spoke.convert_to_hub(&side_channel).unwrap();

    let conditions = &upgraded.status.as_ref().unwrap().conditions;
    assert_eq!(conditions[0].type_, "Ready");
    assert_eq!(conditions[0].status, "True");
    assert_eq!(upgraded, machine);

    let template = hub_data_template();
    let spoke = v1alpha5::Metal3DataTemplate::convert_from_hub(&template, &side_channel).unwrap();
    let upgraded = spoke.convert_to_hub(&side_channel).unwrap();

    let pool = &upgraded.spec.meta_data.as_ref().unwrap().ip_addresses_from_pool[0];
    assert_eq!(pool.api_group, "ipam.metal3.io");
    assert_eq!(pool.kind, "IPPool");
    assert_eq!(upgraded, template);
}

#[test]
fn cluster_round_trip_is_lossless() {
    let side_channel = SideChannel::default();
    let cluster: v1beta1::Metal3Cluster = serde_yaml::from_str(indoc! {r#"
        apiVersion: infrastructure.cluster.x-k8s.io/v1beta1
        kind: Metal3Cluster
        metadata:
          name: workload
          namespace: metal3
          ownerReferences:
            - apiVersion: cluster.x-k8s.io/v1beta1
              kind: Cluster
              name: workload
              uid: 0b6f5bd4-7c0e-4a51-a8b4-7d26a3f6e0a1
        spec:
          controlPlaneEndpoint:
            host: 192.168.111.249
            port: 6443
          noCloudProvider: true
        status:
          ready: true
          lastUpdated: "2024-05-01T09:58:12Z"
          conditions:
            - type: Ready
              status: "True"
              lastTransitionTime: "2024-05-01T10:00:00Z"
    "#})
    .unwrap();

    let spoke = v1alpha5::Metal3Cluster::convert_from_hub(&cluster, &side_channel).unwrap();
    assert!(spoke.status.as_ref().unwrap().ready);
    assert!(
        spoke
            .metadata
            .annotations
            .as_ref()
            .unwrap()
            .contains_key(&manifest_key())
    );

    let upgraded = spoke.convert_to_hub(&side_channel).unwrap();
    assert_eq!(upgraded, cluster);
}

#[test]
fn data_template_round_trip_is_lossless() {
    let side_channel = SideChannel::default();
    let template = hub_data_template();

    let spoke = v1alpha5::Metal3DataTemplate::convert_from_hub(&template, &side_channel).unwrap();

    let annotations = spoke.metadata.annotations.as_ref().unwrap();
    assert_eq!(annotations["example.com/owner"], "platform-team");
    assert!(annotations.contains_key(&manifest_key()));
    assert!(annotations.contains_key(&chunk_key(0)));

    let upgraded = spoke.convert_to_hub(&side_channel).unwrap();
    assert_eq!(upgraded, template);
    assert_eq!(
        upgraded.metadata.annotations,
        template.metadata.annotations,
        "side channel entries must not leak into the hub"
    );
}

#[test]
fn multi_entry_payload_round_trip_is_lossless() {
    let side_channel = SideChannel::new(SideChannelOptions {
        max_entry_bytes: 256,
        max_entries: 1000,
    })
    .unwrap();
    let template = hub_data_template();

    let spoke = v1alpha5::Metal3DataTemplate::convert_from_hub(&template, &side_channel).unwrap();
    let annotations = spoke.metadata.annotations.as_ref().unwrap();
    assert!(annotations.contains_key(&chunk_key(1)));
    assert!(annotations.values().all(|value| value.len() <= 256));

    let upgraded = spoke.convert_to_hub(&side_channel).unwrap();
    assert_eq!(upgraded, template);
}

#[test]
fn downgrade_is_idempotent() {
    let side_channel = SideChannel::default();
    let template = hub_data_template();

    let first = v1alpha5::Metal3DataTemplate::convert_from_hub(&template, &side_channel).unwrap();
    let second = v1alpha5::Metal3DataTemplate::convert_from_hub(&template, &side_channel).unwrap();
    assert_eq!(first, second);

    // Downgrading the result of an upgrade replaces the previous entries instead of
    // accumulating them.
    let upgraded = first.convert_to_hub(&side_channel).unwrap();
    let third = v1alpha5::Metal3DataTemplate::convert_from_hub(&upgraded, &side_channel).unwrap();
    assert_eq!(first.metadata.annotations, third.metadata.annotations);
}

#[test]
fn absent_side_channel_leaves_hub_only_fields_at_default() {
    let side_channel = SideChannel::default();
    let spoke: v1alpha5::Metal3DataTemplate = serde_yaml::from_str(indoc! {r#"
        apiVersion: infrastructure.cluster.x-k8s.io/v1alpha5
        kind: Metal3DataTemplate
        metadata:
          name: workers-template
          namespace: metal3
        spec:
          clusterName: workload
          metaData:
            ipAddressesFromIPPool:
              - key: provisioningIP
                name: provisioning-pool
          networkData:
            links:
              bonds:
                - bondMode: 802.3ad
                  id: bond0
                  macAddress:
                    fromHostInterface: enp1s0
                  bondLinks:
                    - enp1s0
            networks:
              ipv4:
                - id: provisioning
                  ipAddressFromIPPool: provisioning-pool
                  link: bond0
    "#})
    .unwrap();

    let hub = spoke.convert_to_hub(&side_channel).unwrap();

    let pool = &hub.spec.meta_data.as_ref().unwrap().ip_addresses_from_pool[0];
    assert_eq!(pool.name, "provisioning-pool");
    assert_eq!(pool.api_group, "");
    assert_eq!(pool.kind, "");

    let network_data = hub.spec.network_data.as_ref().unwrap();
    let bond = &network_data.links.bonds[0];
    assert_eq!(bond.bond_xmit_hash_policy, "");
    assert_eq!(
        bond.mac_address.as_ref().unwrap().from_host_interface.as_deref(),
        Some("enp1s0")
    );
    assert_eq!(bond.mac_address.as_ref().unwrap().from_annotation, None);
    assert_eq!(network_data.networks.ipv4[0].from_pool_ref, None);
    assert_eq!(hub.metadata.annotations, None);

    let cluster = v1alpha5::Metal3Cluster::new("workload", v1alpha5::Metal3ClusterSpec::default());
    let hub = cluster.convert_to_hub(&side_channel).unwrap();
    assert_eq!(hub.status, None);
}

#[test]
fn garbled_side_channel_is_reported() {
    let side_channel = SideChannel::default();
    let mut spoke =
        v1alpha5::Metal3DataTemplate::convert_from_hub(&hub_data_template(), &side_channel)
            .unwrap();

    let chunk = spoke
        .metadata
        .annotations
        .as_mut()
        .unwrap()
        .get_mut(&chunk_key(0))
        .unwrap();
    *chunk = chunk.replacen("IPPool", "IPPull", 1);

    let err = spoke.convert_to_hub(&side_channel).unwrap_err();
    assert!(
        matches!(
            err,
            ConversionError::LoadSideChannel {
                source: LoadError::ChecksumMismatch { .. },
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn truncated_side_channel_is_reported() {
    let side_channel = SideChannel::default();
    let mut spoke =
        v1alpha5::Metal3Machine::convert_from_hub(&hub_machine(), &side_channel).unwrap();

    spoke
        .metadata
        .annotations
        .as_mut()
        .unwrap()
        .get_mut(&chunk_key(0))
        .unwrap()
        .pop();

    let err = spoke.convert_to_hub(&side_channel).unwrap_err();
    assert!(
        matches!(
            err,
            ConversionError::LoadSideChannel {
                source: LoadError::LengthMismatch { .. },
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn side_channel_of_another_object_is_reported() {
    let side_channel = SideChannel::default();
    let mut spoke =
        v1alpha5::Metal3Machine::convert_from_hub(&hub_machine(), &side_channel).unwrap();

    // Copying an object including its annotations must not carry over the hub-only fields
    spoke.metadata.name = Some("workers-copy".to_owned());

    let err = spoke.convert_to_hub(&side_channel).unwrap_err();
    assert!(
        matches!(
            err,
            ConversionError::LoadSideChannel {
                source: LoadError::IdentityMismatch { .. },
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn edits_on_the_spoke_take_precedence() {
    let side_channel = SideChannel::default();
    let mut spoke =
        v1alpha5::Metal3DataTemplate::convert_from_hub(&hub_data_template(), &side_channel)
            .unwrap();

    let meta_data = spoke.spec.meta_data.as_mut().unwrap();
    meta_data.ip_addresses_from_pool.reverse();
    meta_data.ip_addresses_from_pool[0].name = "bmc-pool-v2".to_owned();

    let network_data = spoke.spec.network_data.as_mut().unwrap();
    network_data.links.bonds[0].mac_address = None;
    network_data.links.bonds[0].bond_mode = "active-backup".to_owned();
    network_data.links.ethernets.remove(0);
    network_data.links.ethernets.push(v1alpha5::NetworkDataLinkEthernet {
        type_: "phy".to_owned(),
        id: "enp3s0".to_owned(),
        mtu: None,
        mac_address: Some(v1alpha5::NetworkLinkEthernetMac {
            string: Some("00:11:22:33:44:66".to_owned()),
            from_host_interface: None,
        }),
    });

    let hub = spoke.convert_to_hub(&side_channel).unwrap();

    // Pools are matched by key, so the reordering is followed
    let pools = &hub.spec.meta_data.as_ref().unwrap().ip_addresses_from_pool;
    assert_eq!(pools[0].key, "bmcIP");
    assert_eq!(pools[0].name, "bmc-pool-v2");
    assert_eq!(pools[0].api_group, "ipam.cluster.x-k8s.io");
    assert_eq!(pools[0].kind, "InClusterIPPool");
    assert_eq!(pools[1].key, "provisioningIP");
    assert_eq!(pools[1].api_group, "ipam.metal3.io");

    let links = &hub.spec.network_data.as_ref().unwrap().links;
    let bond = &links.bonds[0];
    assert_eq!(bond.bond_mode, "active-backup");
    assert_eq!(bond.bond_xmit_hash_policy, "layer3+4");
    assert_eq!(bond.mac_address, None, "a removed MAC address must stay removed");

    assert_eq!(links.ethernets.len(), 2);
    assert_eq!(links.ethernets[0].id, "enp2s0");
    assert_eq!(
        links.ethernets[0]
            .mac_address
            .as_ref()
            .unwrap()
            .from_annotation
            .as_ref()
            .unwrap()
            .annotation,
        "example.com/enp2s0-mac"
    );
    assert_eq!(links.ethernets[1].id, "enp3s0");
    assert_eq!(
        links.ethernets[1].mac_address.as_ref().unwrap().from_annotation,
        None
    );
}

#[test]
fn payload_exceeding_the_entry_budget_is_rejected() {
    let side_channel = SideChannel::new(SideChannelOptions {
        max_entry_bytes: 64,
        max_entries: 2,
    })
    .unwrap();

    let err = v1alpha5::Metal3DataTemplate::convert_from_hub(&hub_data_template(), &side_channel)
        .unwrap_err();
    assert!(
        matches!(
            err,
            ConversionError::StoreSideChannel {
                source: StoreError::PayloadTooLarge { max_entries: 2, .. },
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn mapped_kinds_carry_no_side_channel() {
    let side_channel = SideChannel::default();
    let template: v1beta1::Metal3MachineTemplate = serde_yaml::from_str(indoc! {r#"
        apiVersion: infrastructure.cluster.x-k8s.io/v1beta1
        kind: Metal3MachineTemplate
        metadata:
          name: workers
          namespace: metal3
        spec:
          nodeReuse: true
          template:
            spec:
              image:
                url: http://images.example.com/ubuntu-24.04.qcow2
                checksum: 97830b21ed272a3d854615beb54cf004
              automatedCleaningMode: metadata
    "#})
    .unwrap();

    let spoke =
        v1alpha5::Metal3MachineTemplate::convert_from_hub(&template, &side_channel).unwrap();
    assert_eq!(spoke.metadata.annotations, None);
    assert!(spoke.spec.node_reuse);

    let upgraded = spoke.convert_to_hub(&side_channel).unwrap();
    assert_eq!(upgraded, template);
}

#[rstest]
#[case::unknown("PowerCycle")]
#[case::empty("")]
fn unknown_remediation_strategy_round_trips(#[case] strategy: &str) {
    let side_channel = SideChannel::default();
    let mut spoke: v1alpha5::Metal3RemediationTemplate = serde_yaml::from_str(indoc! {r#"
        apiVersion: infrastructure.cluster.x-k8s.io/v1alpha5
        kind: Metal3RemediationTemplate
        metadata:
          name: workers-remediation
          namespace: metal3
        spec:
          template:
            spec:
              strategy:
                retryLimit: 2
                timeout: 300s
    "#})
    .unwrap();
    spoke.spec.template.spec.strategy.as_mut().unwrap().type_ = Some(strategy.to_owned());

    let hub = spoke.convert_to_hub(&side_channel).unwrap();
    let hub_strategy = hub.spec.template.spec.strategy.as_ref().unwrap();
    assert_eq!(
        hub_strategy.type_,
        Some(v1beta1::RemediationType::Other(strategy.to_owned()))
    );

    let serialized = serde_json::to_value(&hub).unwrap();
    assert_eq!(
        serialized["spec"]["template"]["spec"]["strategy"]["type"],
        strategy
    );

    let downgraded =
        v1alpha5::Metal3RemediationTemplate::convert_from_hub(&hub, &side_channel).unwrap();
    assert_eq!(downgraded, spoke);
}

#[test]
fn known_remediation_strategy_round_trips() {
    let side_channel = SideChannel::default();
    let spoke: v1alpha5::Metal3Remediation = serde_yaml::from_str(indoc! {r#"
        apiVersion: infrastructure.cluster.x-k8s.io/v1alpha5
        kind: Metal3Remediation
        metadata:
          name: workers-abc12
          namespace: metal3
        spec:
          strategy:
            type: Reboot
            retryLimit: 2
        status:
          phase: Running
          retryCount: 1
    "#})
    .unwrap();

    let hub = spoke.convert_to_hub(&side_channel).unwrap();
    let strategy = hub.spec.strategy.as_ref().unwrap();
    assert_eq!(strategy.type_, Some(v1beta1::RemediationType::Reboot));
    assert_eq!(strategy.retry_limit, Some(2));

    let downgraded = v1alpha5::Metal3Remediation::convert_from_hub(&hub, &side_channel).unwrap();
    assert_eq!(downgraded, spoke);
}
