use std::{error::Error, fmt::Write as _};

use kube::core::{
    conversion::{ConversionRequest, ConversionResponse, ConversionReview},
    response::StatusSummary,
};
use metal3_versioned::{ConversionError, SideChannel, Spoke};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::{debug, instrument, warn};

use crate::v1alpha5;

const LIST_SUFFIX: &str = "List";

/// All versions of the `infrastructure.cluster.x-k8s.io` group objects can be converted
/// between.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
pub enum ApiVersion {
    #[strum(serialize = "infrastructure.cluster.x-k8s.io/v1alpha5")]
    V1Alpha5,

    /// The hub version.
    #[strum(serialize = "infrastructure.cluster.x-k8s.io/v1beta1")]
    V1Beta1,
}

/// All kinds which can be converted. Every kind `X` is accompanied by a list kind `XList`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
pub enum Kind {
    Metal3Cluster,
    Metal3Machine,
    Metal3MachineTemplate,
    Metal3Data,
    Metal3DataClaim,
    Metal3DataTemplate,
    Metal3Remediation,
    Metal3RemediationTemplate,
}

#[derive(Debug, Snafu)]
pub enum ConvertObjectError {
    #[snafu(display("the desired api version {api_version:?} is not supported"))]
    ParseDesiredApiVersion {
        source: strum::ParseError,
        api_version: String,
    },

    #[snafu(display("the object sent for conversion has no {field:?} field"))]
    FieldNotPresent { field: String },

    #[snafu(display("the {field:?} field of the object sent for conversion isn't a string"))]
    FieldNotStr { field: String },

    #[snafu(display("the \"items\" field of the {kind} sent for conversion isn't an array"))]
    ItemsNotArray { kind: String },

    #[snafu(display(
        "the api version {api_version:?} of the object sent for conversion is not supported"
    ))]
    ParseApiVersion {
        source: strum::ParseError,
        api_version: String,
    },

    #[snafu(display("objects of kind {kind:?} can not be converted"))]
    ParseKind {
        source: strum::ParseError,
        kind: String,
    },

    #[snafu(display("the {kind} sent for conversion contains an object of kind {found:?}"))]
    UnexpectedItemKind { kind: String, found: String },

    #[snafu(display("the {kind} sent for conversion contains an object of api version {found:?}"))]
    UnexpectedItemApiVersion { kind: String, found: String },

    #[snafu(display("failed to deserialize object of kind {kind} with api version {api_version}"))]
    DeserializeObject {
        source: serde_json::Error,
        kind: Kind,
        api_version: ApiVersion,
    },

    #[snafu(display("failed to convert {kind} to {api_version}"))]
    ConvertObject {
        source: ConversionError,
        kind: Kind,
        api_version: ApiVersion,
    },

    #[snafu(display("failed to serialize converted {kind} with api version {api_version}"))]
    SerializeObject {
        source: serde_json::Error,
        kind: Kind,
        api_version: ApiVersion,
    },
}

impl ConvertObjectError {
    /// The HTTP status code reported back to the API server for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ParseDesiredApiVersion { .. }
            | Self::FieldNotPresent { .. }
            | Self::FieldNotStr { .. }
            | Self::ItemsNotArray { .. }
            | Self::ParseApiVersion { .. }
            | Self::ParseKind { .. }
            | Self::UnexpectedItemKind { .. }
            | Self::UnexpectedItemApiVersion { .. }
            | Self::DeserializeObject { .. } => 400,
            Self::ConvertObject {
                source:
                    ConversionError::MapFields { .. } | ConversionError::LoadSideChannel { .. },
                ..
            } => 422,
            Self::ConvertObject {
                source: ConversionError::StoreSideChannel { .. },
                ..
            }
            | Self::SerializeObject { .. } => 500,
        }
    }

    /// Renders this error and all of its sources as a single message.
    pub fn join_errors(&self) -> String {
        let mut error_message = self.to_string();

        let mut source = self.source();
        while let Some(err) = source {
            // Writing to a String can not fail
            let _ = write!(error_message, ": {err}");
            source = err.source();
        }

        error_message
    }
}

/// Converts a single object or a list of objects to the `desired_api_version`.
///
/// Objects which already have the desired version are returned unchanged. List kinds are
/// converted item by item, keeping the list metadata.
#[instrument(
    skip_all,
    fields(k8s.crd.conversion.desired_api_version = desired_api_version)
)]
pub fn convert_object(
    object: Value,
    desired_api_version: &str,
    side_channel: &SideChannel,
) -> Result<Value, ConvertObjectError> {
    let desired = desired_api_version
        .parse::<ApiVersion>()
        .with_context(|_| ParseDesiredApiVersionSnafu {
            api_version: desired_api_version,
        })?;

    let kind = string_field(&object, "kind")?.to_owned();
    let current = string_field(&object, "apiVersion")?;
    let current = current
        .parse::<ApiVersion>()
        .with_context(|_| ParseApiVersionSnafu {
            api_version: current,
        })?;

    if current == desired {
        debug!(k8s.crd.conversion.kind = %kind, "object already has the desired api version");
        return Ok(object);
    }

    match kind.strip_suffix(LIST_SUFFIX) {
        Some(item_kind) => {
            let item_kind = parse_kind(item_kind)?;
            convert_list(object, &kind, item_kind, current, desired, side_channel)
        }
        None => convert_item(object, parse_kind(&kind)?, current, desired, side_channel),
    }
}

/// Converts all objects of a [`ConversionReview`] sent by the Kubernetes API server, using a
/// side channel with default options.
///
/// The returned review either carries all converted objects or a failure, which is handed
/// back to the API server.
pub fn try_convert(review: ConversionReview) -> ConversionReview {
    try_convert_with(review, &SideChannel::default())
}

/// Like [`try_convert`], but with an explicitly configured side channel.
#[instrument(skip_all)]
pub fn try_convert_with(review: ConversionReview, side_channel: &SideChannel) -> ConversionReview {
    let request = match ConversionRequest::from_review(review) {
        Ok(request) => request,
        Err(err) => {
            warn!(?err, "received invalid conversion review");

            return ConversionResponse::invalid(kube::core::Status {
                status: Some(StatusSummary::Failure),
                message: err.to_string(),
                reason: err.to_string(),
                details: None,
                metadata: None,
                code: 400,
            })
            .into_review();
        }
    };

    let response = match convert_objects(
        request.objects,
        &request.desired_api_version,
        side_channel,
    ) {
        Ok(converted_objects) => {
            debug!(
                k8s.crd.conversion.converted_object_count = converted_objects.len(),
                "successfully converted objects"
            );

            ConversionResponse {
                result: kube::core::Status::success(),
                types: request.types,
                uid: request.uid,
                converted_objects,
            }
        }
        Err(err) => {
            let code = err.http_status_code();
            let message = err.join_errors();
            warn!(code, %message, "failed to convert objects");

            ConversionResponse {
                result: kube::core::Status {
                    status: Some(StatusSummary::Failure),
                    message: message.clone(),
                    reason: message,
                    details: None,
                    metadata: None,
                    code,
                },
                types: request.types,
                uid: request.uid,
                converted_objects: vec![],
            }
        }
    };

    response.into_review()
}

fn convert_objects(
    objects: Vec<Value>,
    desired_api_version: &str,
    side_channel: &SideChannel,
) -> Result<Vec<Value>, ConvertObjectError> {
    objects
        .into_iter()
        .map(|object| convert_object(object, desired_api_version, side_channel))
        .collect()
}

fn convert_list(
    mut list: Value,
    list_kind: &str,
    item_kind: Kind,
    current: ApiVersion,
    desired: ApiVersion,
    side_channel: &SideChannel,
) -> Result<Value, ConvertObjectError> {
    let items = match list.get_mut("items") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => std::mem::take(items),
        Some(_) => return ItemsNotArraySnafu { kind: list_kind }.fail(),
    };

    let mut converted_items = Vec::with_capacity(items.len());
    for mut item in items {
        complete_item_type(&mut item, list_kind, item_kind, current)?;
        converted_items.push(convert_item(
            item,
            item_kind,
            current,
            desired,
            side_channel,
        )?);
    }

    debug!(
        k8s.crd.conversion.kind = list_kind,
        k8s.crd.conversion.converted_object_count = converted_items.len(),
        "converted list items"
    );

    if let Value::Object(fields) = &mut list {
        fields.insert("apiVersion".to_owned(), Value::String(desired.to_string()));
        fields.insert("items".to_owned(), Value::Array(converted_items));
    }

    Ok(list)
}

/// Items of a list may omit their type information, which is then filled in from the list.
/// If they carry it, it has to match the list.
fn complete_item_type(
    item: &mut Value,
    list_kind: &str,
    item_kind: Kind,
    current: ApiVersion,
) -> Result<(), ConvertObjectError> {
    let Value::Object(fields) = item else {
        return Ok(());
    };

    let expected_fields = [
        ("kind", item_kind.to_string()),
        ("apiVersion", current.to_string()),
    ];

    for (field, expected) in expected_fields {
        match fields.get(field).and_then(Value::as_str).map(str::to_owned) {
            Some(found) if field == "kind" => ensure!(
                found == expected,
                UnexpectedItemKindSnafu {
                    kind: list_kind,
                    found
                }
            ),
            Some(found) => ensure!(
                found == expected,
                UnexpectedItemApiVersionSnafu {
                    kind: list_kind,
                    found
                }
            ),
            None => {
                fields.insert(field.to_owned(), Value::String(expected));
            }
        }
    }

    Ok(())
}

fn convert_item(
    object: Value,
    kind: Kind,
    current: ApiVersion,
    desired: ApiVersion,
    side_channel: &SideChannel,
) -> Result<Value, ConvertObjectError> {
    let convert = match kind {
        Kind::Metal3Cluster => convert_kind::<v1alpha5::Metal3Cluster>,
        Kind::Metal3Machine => convert_kind::<v1alpha5::Metal3Machine>,
        Kind::Metal3MachineTemplate => convert_kind::<v1alpha5::Metal3MachineTemplate>,
        Kind::Metal3Data => convert_kind::<v1alpha5::Metal3Data>,
        Kind::Metal3DataClaim => convert_kind::<v1alpha5::Metal3DataClaim>,
        Kind::Metal3DataTemplate => convert_kind::<v1alpha5::Metal3DataTemplate>,
        Kind::Metal3Remediation => convert_kind::<v1alpha5::Metal3Remediation>,
        Kind::Metal3RemediationTemplate => convert_kind::<v1alpha5::Metal3RemediationTemplate>,
    };

    convert(object, kind, current, desired, side_channel)
}

fn convert_kind<S>(
    object: Value,
    kind: Kind,
    current: ApiVersion,
    desired: ApiVersion,
    side_channel: &SideChannel,
) -> Result<Value, ConvertObjectError>
where
    S: Spoke + Serialize + DeserializeOwned,
{
    match (current, desired) {
        (ApiVersion::V1Alpha5, ApiVersion::V1Beta1) => {
            let spoke = deserialize::<S>(object, kind, current)?;
            let hub = spoke
                .convert_to_hub(side_channel)
                .context(ConvertObjectSnafu {
                    kind,
                    api_version: desired,
                })?;
            serialize(&hub, kind, desired)
        }
        (ApiVersion::V1Beta1, ApiVersion::V1Alpha5) => {
            let hub = deserialize::<S::Hub>(object, kind, current)?;
            let spoke = S::convert_from_hub(&hub, side_channel).context(ConvertObjectSnafu {
                kind,
                api_version: desired,
            })?;
            serialize(&spoke, kind, desired)
        }
        _ => Ok(object),
    }
}

fn deserialize<T: DeserializeOwned>(
    object: Value,
    kind: Kind,
    api_version: ApiVersion,
) -> Result<T, ConvertObjectError> {
    serde_json::from_value(object).context(DeserializeObjectSnafu { kind, api_version })
}

fn serialize<T: Serialize>(
    object: &T,
    kind: Kind,
    api_version: ApiVersion,
) -> Result<Value, ConvertObjectError> {
    serde_json::to_value(object).context(SerializeObjectSnafu { kind, api_version })
}

fn string_field<'a>(object: &'a Value, field: &str) -> Result<&'a str, ConvertObjectError> {
    object
        .get(field)
        .context(FieldNotPresentSnafu { field })?
        .as_str()
        .context(FieldNotStrSnafu { field })
}

fn parse_kind(kind: &str) -> Result<Kind, ConvertObjectError> {
    kind.parse().context(ParseKindSnafu { kind })
}
