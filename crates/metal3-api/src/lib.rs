//! Versioned Metal3 infrastructure resources of the `infrastructure.cluster.x-k8s.io`
//! group.
//!
//! [`v1beta1`] is the hub version, [`v1alpha5`] a spoke. Every kind of the spoke
//! implements [`metal3_versioned::Spoke`], which makes the round trip hub to spoke to hub
//! lossless. Objects of unknown type can be converted with [`convert_object`], and
//! conversion reviews sent by the Kubernetes API server with [`try_convert`].
//!
//! ```
//! use metal3_api::{v1alpha5, v1beta1};
//! use metal3_versioned::{SideChannel, Spoke};
//!
//! let side_channel = SideChannel::default();
//! let hub = v1beta1::Metal3Cluster::new("workload", v1beta1::Metal3ClusterSpec::default());
//!
//! let spoke = v1alpha5::Metal3Cluster::convert_from_hub(&hub, &side_channel).unwrap();
//! let upgraded = spoke.convert_to_hub(&side_channel).unwrap();
//!
//! assert_eq!(upgraded, hub);
//! ```
mod convert;

pub mod v1alpha5;
pub mod v1beta1;

pub use convert::*;
