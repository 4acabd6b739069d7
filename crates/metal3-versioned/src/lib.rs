//! This crate implements lossless conversion between the versions of a Kubernetes custom
//! resource, following the hub and spoke model.
//!
//! One version of a resource is the hub: the canonical and most expressive representation.
//! All other versions are spokes, which convert to and from the hub. Spokes are frozen,
//! they cannot gain fields. Converting a hub object to a spoke (downgrade) would therefore
//! drop every field the spoke cannot represent. To prevent this, the downgrade writes a
//! snapshot of the hub into the [side channel](side_channel) of the spoke: a set of
//! reserved annotations. The next upgrade reads the snapshot and [restores](restore) the
//! hub-only values.
//!
//! ```text
//!            map_from_hub              map_to_hub
//!   hub  ------------------>  spoke  -------------->  hub
//!    |                          ^ |                    ^
//!    |   SideChannel::store     | |  SideChannel::load |  restore_hub_data
//!    +--------------------------+ +--------------------+
//! ```
//!
//! ## Usage Guide
//!
//! Mark the hub type with [`Hub`] and implement [`Spoke`] for every other version. The
//! field mapping is written with [`map_fields!`] and the [`mapping::MapFrom`] trait. Spokes
//! whose hub has additional fields set [`Spoke::PRESERVES_HUB_DATA`] and implement
//! [`Spoke::restore_hub_data`], typically by calling the functions in [`restore`] for every
//! nested collection.
//!
//! Conversions hold no state. A single [`SideChannel`] can be shared by any number of
//! concurrent conversions.
pub mod key;
pub mod mapping;
pub mod restore;
pub mod side_channel;

mod conversion;

pub use conversion::*;
pub use side_channel::{SideChannel, SideChannelOptions};
