use kube::core::{conversion::ConversionReview, response::StatusSummary};
use metal3_api::{ConvertObjectError, convert_object, try_convert};
use metal3_versioned::{SideChannel, SideChannelOptions};
use rstest::rstest;
use serde_json::{Value, json};

const V1ALPHA5: &str = "infrastructure.cluster.x-k8s.io/v1alpha5";
const V1BETA1: &str = "infrastructure.cluster.x-k8s.io/v1beta1";

fn hub_cluster() -> Value {
    json!({
        "apiVersion": V1BETA1,
        "kind": "Metal3Cluster",
        "metadata": {
            "name": "workload",
            "namespace": "metal3",
        },
        "spec": {
            "controlPlaneEndpoint": {
                "host": "192.168.111.249",
                "port": 6443,
            },
        },
        "status": {
            "ready": true,
            "conditions": [{
                "type": "Ready",
                "status": "True",
            }],
        },
    })
}

fn spoke_machine(name: &str) -> Value {
    json!({
        "apiVersion": V1ALPHA5,
        "kind": "Metal3Machine",
        "metadata": {
            "name": name,
            "namespace": "metal3",
        },
        "spec": {
            "image": {
                "url": "http://images.example.com/ubuntu-24.04.qcow2",
                "checksum": "97830b21ed272a3d854615beb54cf004",
            },
        },
    })
}

fn review(desired_api_version: &str, objects: Vec<Value>) -> ConversionReview {
    serde_json::from_value(json!({
        "apiVersion": "apiextensions.k8s.io/v1",
        "kind": "ConversionReview",
        "request": {
            "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
            "desiredAPIVersion": desired_api_version,
            "objects": objects,
        },
    }))
    .unwrap()
}

#[test]
fn object_round_trip() {
    let side_channel = SideChannel::default();

    let spoke = convert_object(hub_cluster(), V1ALPHA5, &side_channel).unwrap();
    assert_eq!(spoke["apiVersion"], V1ALPHA5);
    assert_eq!(spoke["kind"], "Metal3Cluster");
    assert_eq!(spoke["status"]["ready"], true);
    assert!(spoke["status"].get("conditions").is_none());
    assert!(
        spoke["metadata"]["annotations"]
            .get("infrastructure.cluster.x-k8s.io/conversion-data")
            .is_some()
    );

    let hub = convert_object(spoke, V1BETA1, &side_channel).unwrap();
    assert_eq!(hub, hub_cluster());
}

#[test]
fn object_with_desired_version_is_returned_unchanged() {
    let object = json!({
        "apiVersion": V1BETA1,
        "kind": "Metal3Cluster",
        "unknownField": "kept as is",
    });

    let converted = convert_object(object.clone(), V1BETA1, &SideChannel::default()).unwrap();
    assert_eq!(converted, object);
}

#[test]
fn list_is_converted_item_by_item() {
    let mut untyped_item = spoke_machine("workers-def34");
    let fields = untyped_item.as_object_mut().unwrap();
    fields.remove("apiVersion");
    fields.remove("kind");

    let list = json!({
        "apiVersion": V1ALPHA5,
        "kind": "Metal3MachineList",
        "metadata": {
            "resourceVersion": "4711",
        },
        "items": [spoke_machine("workers-abc12"), untyped_item],
    });

    let converted = convert_object(list, V1BETA1, &SideChannel::default()).unwrap();
    assert_eq!(converted["apiVersion"], V1BETA1);
    assert_eq!(converted["kind"], "Metal3MachineList");
    assert_eq!(converted["metadata"]["resourceVersion"], "4711");

    let items = converted["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for (item, name) in items.iter().zip(["workers-abc12", "workers-def34"]) {
        assert_eq!(item["apiVersion"], V1BETA1);
        assert_eq!(item["kind"], "Metal3Machine");
        assert_eq!(item["metadata"]["name"], name);
    }
}

#[rstest]
#[case::unknown_desired_version(
    hub_cluster(),
    "infrastructure.cluster.x-k8s.io/v1alpha4",
    "ParseDesiredApiVersion"
)]
#[case::unknown_api_version(
    json!({"apiVersion": "infrastructure.cluster.x-k8s.io/v1alpha4", "kind": "Metal3Cluster"}),
    V1BETA1,
    "ParseApiVersion"
)]
#[case::foreign_kind(
    json!({"apiVersion": V1ALPHA5, "kind": "BareMetalHost"}),
    V1BETA1,
    "ParseKind"
)]
#[case::foreign_list_kind(
    json!({"apiVersion": V1ALPHA5, "kind": "BareMetalHostList", "items": []}),
    V1BETA1,
    "ParseKind"
)]
#[case::missing_kind(json!({"apiVersion": V1ALPHA5}), V1BETA1, "FieldNotPresent")]
#[case::kind_not_a_string(
    json!({"apiVersion": V1ALPHA5, "kind": 42}),
    V1BETA1,
    "FieldNotStr"
)]
#[case::items_not_an_array(
    json!({"apiVersion": V1ALPHA5, "kind": "Metal3MachineList", "items": {}}),
    V1BETA1,
    "ItemsNotArray"
)]
#[case::list_item_of_another_kind(
    json!({"apiVersion": V1ALPHA5, "kind": "Metal3MachineList", "items": [hub_cluster()]}),
    V1BETA1,
    "UnexpectedItemKind"
)]
#[case::list_item_of_another_version(
    json!({"apiVersion": V1ALPHA5, "kind": "Metal3ClusterList", "items": [hub_cluster()]}),
    V1BETA1,
    "UnexpectedItemApiVersion"
)]
#[case::malformed_object(
    json!({"apiVersion": V1ALPHA5, "kind": "Metal3Machine", "metadata": {}, "spec": "none"}),
    V1BETA1,
    "DeserializeObject"
)]
fn type_mismatch_is_rejected(
    #[case] object: Value,
    #[case] desired_api_version: &str,
    #[case] expected: &str,
) {
    let err = convert_object(object, desired_api_version, &SideChannel::default()).unwrap_err();

    assert!(
        format!("{err:?}").starts_with(expected),
        "expected {expected}, got {err:?}"
    );
    assert_eq!(err.http_status_code(), 400);
}

#[test]
fn errors_are_joined_with_their_sources() {
    let object = json!({
        "apiVersion": V1ALPHA5,
        "kind": "Metal3Cluster",
        "metadata": {
            "name": "workload",
            "namespace": "metal3",
            "annotations": {
                "infrastructure.cluster.x-k8s.io/conversion-data.0": "{}",
            },
        },
        "spec": {
            "controlPlaneEndpoint": {
                "host": "192.168.111.249",
                "port": 6443,
            },
        },
    });

    let err = convert_object(object, V1BETA1, &SideChannel::default()).unwrap_err();
    assert!(matches!(err, ConvertObjectError::ConvertObject { .. }));
    assert_eq!(err.http_status_code(), 422);
    assert_eq!(
        err.join_errors(),
        format!(
            "failed to convert Metal3Cluster to {V1BETA1}: \
            failed to recover hub data from the side channel of Metal3Cluster \"workload\": \
            found 1 side channel chunks without a manifest"
        )
    );
}

#[test]
fn failing_to_preserve_hub_data_is_a_server_error() {
    let side_channel = SideChannel::new(SideChannelOptions {
        max_entry_bytes: 16,
        max_entries: 1,
    })
    .unwrap();

    let err = convert_object(hub_cluster(), V1ALPHA5, &side_channel).unwrap_err();
    assert!(matches!(err, ConvertObjectError::ConvertObject { .. }));
    assert_eq!(err.http_status_code(), 500);
}

#[test]
fn review_is_answered_with_converted_objects() {
    let review = try_convert(review(
        V1BETA1,
        vec![spoke_machine("workers-abc12"), spoke_machine("workers-def34")],
    ));

    let response = review.response.unwrap();
    assert!(matches!(response.result.status, Some(StatusSummary::Success)));
    assert_eq!(response.uid, "705ab4f5-6393-11e8-b7cc-42010a800002");
    assert_eq!(response.converted_objects.len(), 2);
    assert!(
        response
            .converted_objects
            .iter()
            .all(|object| object["apiVersion"] == V1BETA1)
    );
}

#[test]
fn review_reports_failures() {
    let review = try_convert(review(
        "infrastructure.cluster.x-k8s.io/v1alpha4",
        vec![spoke_machine("workers-abc12")],
    ));

    let response = review.response.unwrap();
    assert!(matches!(response.result.status, Some(StatusSummary::Failure)));
    assert_eq!(response.result.code, 400);
    assert_eq!(response.uid, "705ab4f5-6393-11e8-b7cc-42010a800002");
    assert!(response.result.message.contains("v1alpha4"));
    assert!(response.converted_objects.is_empty());
}
