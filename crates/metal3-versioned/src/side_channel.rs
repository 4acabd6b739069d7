//! The side channel preserves a hub snapshot inside the annotations of a spoke object.
//!
//! A snapshot is the JSON serialization of the complete hub object, with its metadata
//! reduced to the name and namespace. It is stored as a manifest entry and one or more
//! chunk entries (see [`crate::key`]):
//!
//! - The manifest records the `apiVersion` and kind of the hub the snapshot was taken
//!   from, the number of chunks, the total length in bytes and the SHA-256 digest of the
//!   payload.
//! - Each chunk holds at most [`SideChannelOptions::max_entry_bytes`] bytes of the payload.
//!   Chunks are always cut at UTF-8 character boundaries.
//!
//! Loading verifies every part of the manifest before the payload is deserialized, so that
//! truncation is detected independently of the JSON parser.
use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::{debug, instrument};

use crate::{
    Hub,
    key::{self, MAX_CHUNK_INDEX, PayloadKey, PayloadKeyError},
};

/// The default maximum size of a single annotation value written by the side channel.
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 32 * 1024;

/// The total size Kubernetes allows for all annotation keys and values of an object.
pub const ANNOTATIONS_MAX_BYTES: usize = 256 * 1024;

/// The default maximum number of chunks. Together with [`DEFAULT_MAX_ENTRY_BYTES`] this
/// leaves one entry worth of [`ANNOTATIONS_MAX_BYTES`] for the manifest, the keys and
/// foreign annotations.
pub const DEFAULT_MAX_ENTRIES: usize = 7;

/// The smallest supported entry size. Every chunk must be able to hold at least one
/// complete UTF-8 character.
pub const MIN_ENTRY_BYTES: usize = 16;

#[derive(Debug, PartialEq, Snafu)]
pub enum OptionsError {
    #[snafu(display(
        "maximum entry size of {max_entry_bytes} bytes is below the minimum of \
        {MIN_ENTRY_BYTES} bytes"
    ))]
    EntryTooSmall { max_entry_bytes: usize },

    #[snafu(display(
        "maximum entry count must be between 1 and {MAX_CHUNK_INDEX}, got {max_entries}"
    ))]
    InvalidEntryCount { max_entries: usize },
}

#[derive(Debug, Snafu)]
pub enum StoreError {
    #[snafu(display("failed to serialize {kind} snapshot"))]
    SerializeSnapshot {
        source: serde_json::Error,
        kind: String,
    },

    #[snafu(display("failed to serialize side channel manifest"))]
    SerializeManifest { source: serde_json::Error },

    #[snafu(display(
        "snapshot of {length} bytes needs {entries} entries, but at most {max_entries} are allowed"
    ))]
    PayloadTooLarge {
        length: usize,
        entries: usize,
        max_entries: usize,
    },
}

/// Errors returned when a side channel is present but cannot be recovered. An absent side
/// channel is not an error.
#[derive(Debug, Snafu)]
pub enum LoadError {
    #[snafu(display("failed to parse side channel manifest"))]
    ParseManifest { source: serde_json::Error },

    #[snafu(display("found {entries} side channel chunks without a manifest"))]
    OrphanedEntries { entries: usize },

    #[snafu(display("found malformed side channel key"))]
    InvalidEntryKey { source: PayloadKeyError },

    #[snafu(display(
        "snapshot was taken from {found:?}, but only {expected:?} snapshots are supported"
    ))]
    UnsupportedRevision { found: String, expected: String },

    #[snafu(display("snapshot holds a {found}, expected a {expected}"))]
    UnexpectedKind { found: String, expected: String },

    #[snafu(display("side channel chunk {index} is missing"))]
    MissingEntry { index: usize },

    #[snafu(display("found side channel chunk {index}, but the manifest lists only {entries}"))]
    UnexpectedEntry { index: usize, entries: usize },

    #[snafu(display("snapshot is {found} bytes long, expected {expected} bytes"))]
    LengthMismatch { found: usize, expected: usize },

    #[snafu(display("snapshot digest {found} does not match the recorded digest {expected}"))]
    ChecksumMismatch { found: String, expected: String },

    #[snafu(display("failed to deserialize {kind} snapshot"))]
    DeserializeSnapshot {
        source: serde_json::Error,
        kind: String,
    },

    #[snafu(display("snapshot belongs to {found:?}, but is attached to {expected:?}"))]
    IdentityMismatch { found: String, expected: String },
}

/// Size limits of the side channel.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct SideChannelOptions {
    /// Maximum size of a single side channel annotation value in bytes.
    #[cfg_attr(
        feature = "clap",
        arg(
            long = "side-channel-max-entry-bytes",
            env = "SIDE_CHANNEL_MAX_ENTRY_BYTES",
            default_value_t = DEFAULT_MAX_ENTRY_BYTES
        )
    )]
    pub max_entry_bytes: usize,

    /// Maximum number of annotations a single snapshot may be split into.
    #[cfg_attr(
        feature = "clap",
        arg(
            long = "side-channel-max-entries",
            env = "SIDE_CHANNEL_MAX_ENTRIES",
            default_value_t = DEFAULT_MAX_ENTRIES
        )
    )]
    pub max_entries: usize,
}

impl Default for SideChannelOptions {
    fn default() -> Self {
        Self {
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    api_version: String,
    kind: String,
    entries: usize,
    length: usize,
    sha256: String,
}

/// Stores and loads hub snapshots. It holds no state besides its validated options and
/// can be shared freely between concurrent conversions.
#[derive(Clone, Debug, Default)]
pub struct SideChannel {
    options: SideChannelOptions,
}

impl SideChannel {
    pub fn new(options: SideChannelOptions) -> Result<Self, OptionsError> {
        ensure!(
            options.max_entry_bytes >= MIN_ENTRY_BYTES,
            EntryTooSmallSnafu {
                max_entry_bytes: options.max_entry_bytes
            }
        );
        ensure!(
            (1..=MAX_CHUNK_INDEX).contains(&options.max_entries),
            InvalidEntryCountSnafu {
                max_entries: options.max_entries
            }
        );

        Ok(Self { options })
    }

    pub fn options(&self) -> &SideChannelOptions {
        &self.options
    }

    /// Writes a snapshot of `hub` into the annotations of `target`, replacing any side
    /// channel entries `target` already carries. Foreign annotations are kept as is.
    ///
    /// Storing the same hub object twice produces identical annotations.
    #[instrument(skip_all, fields(kind = %H::kind(&())))]
    pub fn store<H: Hub>(&self, hub: &H, target: &mut ObjectMeta) -> Result<(), StoreError> {
        let kind = H::kind(&());
        let payload = serde_json::to_string(&snapshot_of(hub))
            .with_context(|_| SerializeSnapshotSnafu { kind: kind.as_ref() })?;

        let chunks = split_payload(&payload, self.options.max_entry_bytes);
        ensure!(
            chunks.len() <= self.options.max_entries,
            PayloadTooLargeSnafu {
                length: payload.len(),
                entries: chunks.len(),
                max_entries: self.options.max_entries,
            }
        );

        let manifest = Manifest {
            api_version: H::api_version(&()).into_owned(),
            kind: kind.into_owned(),
            entries: chunks.len(),
            length: payload.len(),
            sha256: digest(&payload),
        };
        let manifest = serde_json::to_string(&manifest).context(SerializeManifestSnafu)?;

        remove_entries(target);

        let annotations = target.annotations.get_or_insert_with(BTreeMap::new);
        annotations.insert(PayloadKey::Manifest.into(), manifest);
        for (index, chunk) in chunks.iter().enumerate() {
            annotations.insert(PayloadKey::Chunk(index).into(), (*chunk).to_owned());
        }

        debug!(
            side_channel.length = payload.len(),
            side_channel.entries = chunks.len(),
            "stored hub snapshot"
        );

        Ok(())
    }

    /// Recovers the hub snapshot stored in the annotations of `source`.
    ///
    /// Returns `Ok(None)` if no side channel is present. Every other irregularity is an
    /// error, because silently dropping a damaged snapshot would lose data without notice.
    #[instrument(skip_all, fields(kind = %H::kind(&())))]
    pub fn load<H: Hub>(&self, source: &ObjectMeta) -> Result<Option<H>, LoadError> {
        let Some(annotations) = source.annotations.as_ref() else {
            return Ok(None);
        };

        let mut manifest = None;
        let mut chunks = BTreeMap::new();

        for (key, value) in annotations {
            match key.parse::<PayloadKey>() {
                Ok(PayloadKey::Manifest) => manifest = Some(value),
                Ok(PayloadKey::Chunk(index)) => {
                    chunks.insert(index, value.as_str());
                }
                Err(err) if err.is_foreign() => {}
                Err(err) => return Err(err).context(InvalidEntryKeySnafu),
            }
        }

        let Some(manifest) = manifest else {
            ensure!(
                chunks.is_empty(),
                OrphanedEntriesSnafu {
                    entries: chunks.len()
                }
            );

            debug!("no hub snapshot present");
            return Ok(None);
        };

        let manifest: Manifest = serde_json::from_str(manifest).context(ParseManifestSnafu)?;

        let expected_api_version = H::api_version(&());
        ensure!(
            manifest.api_version == expected_api_version,
            UnsupportedRevisionSnafu {
                found: manifest.api_version.as_str(),
                expected: expected_api_version.as_ref(),
            }
        );

        let expected_kind = H::kind(&());
        ensure!(
            manifest.kind == expected_kind,
            UnexpectedKindSnafu {
                found: manifest.kind.as_str(),
                expected: expected_kind.as_ref(),
            }
        );

        if let Some(index) = chunks.keys().find(|index| **index >= manifest.entries) {
            return UnexpectedEntrySnafu {
                index: *index,
                entries: manifest.entries,
            }
            .fail();
        }

        let mut payload = String::new();
        for index in 0..manifest.entries {
            let chunk = chunks.get(&index).context(MissingEntrySnafu { index })?;
            payload.push_str(chunk);
        }

        ensure!(
            payload.len() == manifest.length,
            LengthMismatchSnafu {
                found: payload.len(),
                expected: manifest.length,
            }
        );

        let found_digest = digest(&payload);
        ensure!(
            found_digest == manifest.sha256,
            ChecksumMismatchSnafu {
                found: found_digest,
                expected: manifest.sha256,
            }
        );

        let snapshot: H = serde_json::from_str(&payload).with_context(|_| {
            DeserializeSnapshotSnafu {
                kind: expected_kind.as_ref(),
            }
        })?;

        let found_identity = identity(snapshot.meta());
        let expected_identity = identity(source);
        ensure!(
            found_identity == expected_identity,
            IdentityMismatchSnafu {
                found: found_identity,
                expected: expected_identity,
            }
        );

        debug!(
            side_channel.length = payload.len(),
            side_channel.entries = manifest.entries,
            "recovered hub snapshot"
        );

        Ok(Some(snapshot))
    }
}

/// Removes all side channel entries from `metadata`, including malformed ones, and returns
/// how many were removed. An annotation map left empty by the removal is dropped.
pub fn remove_entries(metadata: &mut ObjectMeta) -> usize {
    let Some(annotations) = metadata.annotations.as_mut() else {
        return 0;
    };

    let before = annotations.len();
    annotations.retain(|key, _| !key::is_reserved(key));
    let removed = before - annotations.len();

    if removed > 0 && annotations.is_empty() {
        metadata.annotations = None;
    }

    removed
}

/// Clones `hub` and strips all metadata except the identity. The snapshot never carries
/// platform managed fields like the resource version or owner references, and never its
/// own annotations.
fn snapshot_of<H: Hub>(hub: &H) -> H {
    let mut snapshot = hub.clone();
    let metadata = snapshot.meta_mut();

    *metadata = ObjectMeta {
        name: metadata.name.take(),
        namespace: metadata.namespace.take(),
        ..ObjectMeta::default()
    };

    snapshot
}

fn split_payload(payload: &str, max_entry_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = payload;

    while !rest.is_empty() {
        let mut end = rest.len().min(max_entry_bytes);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }

        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }

    chunks
}

fn digest(payload: &str) -> String {
    format!("{:x}", Sha256::digest(payload.as_bytes()))
}

fn identity(metadata: &ObjectMeta) -> String {
    format!(
        "{namespace}/{name}",
        namespace = metadata.namespace.as_deref().unwrap_or_default(),
        name = metadata.name.as_deref().unwrap_or_default()
    )
}
