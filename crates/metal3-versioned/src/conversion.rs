use kube::{Resource, ResourceExt};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{
    mapping::MappingError,
    side_channel::{self, LoadError, SideChannel, StoreError},
};

#[derive(Debug, Snafu)]
pub enum ConversionError {
    #[snafu(display("failed to map fields of {kind} to {api_version}"))]
    MapFields {
        source: MappingError,
        kind: String,
        api_version: String,
    },

    #[snafu(display("failed to recover hub data from the side channel of {kind} {name:?}"))]
    LoadSideChannel {
        source: LoadError,
        kind: String,
        name: String,
    },

    #[snafu(display("failed to preserve hub data in the side channel of {kind} {name:?}"))]
    StoreSideChannel {
        source: StoreError,
        kind: String,
        name: String,
    },
}

/// Marks the canonical version of a resource. Every spoke converts to and from its hub.
pub trait Hub: Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned {}

/// An older, less expressive version of a resource.
///
/// Implementors provide the field mapping in both directions and, if the hub has fields
/// the spoke cannot represent, the restoration of these fields. The provided
/// [`Spoke::convert_to_hub`] and [`Spoke::convert_from_hub`] functions sequence mapping and
/// side channel access and should not be overridden.
pub trait Spoke: Resource<DynamicType = ()> + Sized {
    type Hub: Hub;

    /// Whether the hub has fields this spoke cannot represent. Only then is the side
    /// channel written on downgrade and read on upgrade.
    const PRESERVES_HUB_DATA: bool = false;

    /// Maps all fields both versions share. Hub-only fields are left at their default.
    fn map_to_hub(&self) -> Result<Self::Hub, MappingError>;

    /// Maps all fields both versions share. Hub-only fields are dropped.
    fn map_from_hub(hub: &Self::Hub) -> Result<Self, MappingError>;

    /// Copies hub-only values from the `recovered` snapshot onto the freshly mapped `hub`.
    /// Implementations must not touch fields populated by [`Spoke::map_to_hub`].
    fn restore_hub_data(_hub: &mut Self::Hub, _recovered: Self::Hub) {}

    /// Converts this spoke object into a new hub object (upgrade).
    ///
    /// If the spoke carries a side channel, hub-only values are restored from it. Objects
    /// without side channel convert into a hub with zero-valued hub-only fields. The side
    /// channel entries are not carried over into the hub metadata.
    #[instrument(
        skip_all,
        fields(
            k8s.kind = %Self::kind(&()),
            k8s.api_version = %Self::api_version(&()),
            k8s.name = %self.name_any(),
        )
    )]
    fn convert_to_hub(&self, side_channel: &SideChannel) -> Result<Self::Hub, ConversionError> {
        let mut hub = self.map_to_hub().with_context(|_| MapFieldsSnafu {
            kind: Self::kind(&()),
            api_version: Self::Hub::api_version(&()),
        })?;

        if !Self::PRESERVES_HUB_DATA {
            return Ok(hub);
        }

        let recovered = side_channel
            .load::<Self::Hub>(self.meta())
            .with_context(|_| LoadSideChannelSnafu {
                kind: Self::kind(&()),
                name: self.name_any(),
            })?;

        side_channel::remove_entries(hub.meta_mut());

        match recovered {
            Some(recovered) => {
                Self::restore_hub_data(&mut hub, recovered);
                debug!("restored hub-only fields from side channel");
            }
            None => debug!("no side channel present, hub-only fields keep their defaults"),
        }

        Ok(hub)
    }

    /// Converts a hub object into a new spoke object (downgrade).
    ///
    /// If the hub has fields this spoke cannot represent, a snapshot of the hub is written
    /// into the side channel of the returned spoke, replacing any previous snapshot.
    #[instrument(
        skip_all,
        fields(
            k8s.kind = %Self::kind(&()),
            k8s.api_version = %Self::api_version(&()),
            k8s.name = %hub.name_any(),
        )
    )]
    fn convert_from_hub(
        hub: &Self::Hub,
        side_channel: &SideChannel,
    ) -> Result<Self, ConversionError> {
        let mut spoke = Self::map_from_hub(hub).with_context(|_| MapFieldsSnafu {
            kind: Self::kind(&()),
            api_version: Self::api_version(&()),
        })?;

        if Self::PRESERVES_HUB_DATA {
            side_channel
                .store(hub, spoke.meta_mut())
                .with_context(|_| StoreSideChannelSnafu {
                    kind: Self::kind(&()),
                    name: hub.name_any(),
                })?;
        }

        Ok(spoke)
    }
}
