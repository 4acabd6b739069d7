//! Annotation keys reserved for the side channel.
//!
//! The side channel occupies one manifest entry and a number of chunk entries, all sharing
//! the same key prefix:
//!
//! ```text
//! infrastructure.cluster.x-k8s.io/conversion-data      <- manifest
//! infrastructure.cluster.x-k8s.io/conversion-data.0    <- first chunk
//! infrastructure.cluster.x-k8s.io/conversion-data.1    <- second chunk
//! ```
//!
//! Chunk indices are plain decimal numbers without leading zeros, which keeps the mapping
//! between an index and its key bijective.
use std::{fmt::Display, str::FromStr, sync::LazyLock};

use regex::Regex;
use snafu::{OptionExt, Snafu, ensure};

/// The prefix segment shared by all side channel annotation keys.
pub const KEY_PREFIX: &str = "infrastructure.cluster.x-k8s.io";

/// The name segment of the manifest key. Chunk keys append `.<index>`.
pub const KEY_NAME: &str = "conversion-data";

/// The upper bound (exclusive) for chunk indices. It keeps every chunk key well below the
/// 63 character limit Kubernetes imposes on the name segment of a key.
pub const MAX_CHUNK_INDEX: usize = 1000;

static CHUNK_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9][0-9]*)$").expect("failed to compile chunk suffix regex")
});

/// The error type for side channel key parsing.
#[derive(Debug, PartialEq, Snafu)]
pub enum PayloadKeyError {
    /// The key does not belong to the side channel at all. Callers scanning annotations
    /// usually skip these keys.
    #[snafu(display("key {key:?} is not a side channel key"))]
    Foreign { key: String },

    /// The key uses the side channel name but its chunk suffix is not a valid index.
    #[snafu(display("side channel key {key:?} has an invalid chunk index"))]
    InvalidChunkIndex { key: String },

    /// The chunk index is out of the supported range.
    #[snafu(display(
        "side channel key {key:?} exceeds the maximum chunk index - expected less than \
        {MAX_CHUNK_INDEX}"
    ))]
    ChunkIndexTooLarge { key: String },
}

impl PayloadKeyError {
    /// Returns `true` if the key was not a side channel key.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::Foreign { .. })
    }
}

/// A parsed side channel annotation key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PayloadKey {
    /// The entry describing the stored payload.
    Manifest,

    /// One chunk of the serialized payload.
    Chunk(usize),
}

impl FromStr for PayloadKey {
    type Err = PayloadKeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let name = input
            .strip_prefix(KEY_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_prefix(KEY_NAME))
            .context(ForeignSnafu { key: input })?;

        if name.is_empty() {
            return Ok(Self::Manifest);
        }

        // Keys like "conversion-database" share the name as a prefix only
        let suffix = name.strip_prefix('.').context(ForeignSnafu { key: input })?;

        ensure!(
            CHUNK_SUFFIX_REGEX.is_match(suffix),
            InvalidChunkIndexSnafu { key: input }
        );

        // Digit strings overflowing usize are out of range as well
        let index = suffix
            .parse::<usize>()
            .ok()
            .filter(|index| *index < MAX_CHUNK_INDEX)
            .context(ChunkIndexTooLargeSnafu { key: input })?;

        Ok(Self::Chunk(index))
    }
}

impl Display for PayloadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manifest => write!(f, "{KEY_PREFIX}/{KEY_NAME}"),
            Self::Chunk(index) => write!(f, "{KEY_PREFIX}/{KEY_NAME}.{index}"),
        }
    }
}

impl From<PayloadKey> for String {
    fn from(value: PayloadKey) -> Self {
        value.to_string()
    }
}

/// Returns `true` if `key` is reserved for the side channel, including malformed chunk keys.
pub fn is_reserved(key: &str) -> bool {
    !matches!(PayloadKey::from_str(key), Err(PayloadKeyError::Foreign { .. }))
}
