//! The v1alpha5 version of the Metal3 infrastructure resources.
//!
//! This version is frozen. It converts to and from [`crate::v1beta1`], preserving the
//! fields it cannot represent in the side channel of the converted object.
mod cluster;
mod common;
mod conversion;
mod data;
mod data_template;
mod machine;
mod machine_template;
mod mapping;
mod remediation;

pub use cluster::*;
pub use common::*;
pub use data::*;
pub use data_template::*;
pub use machine::*;
pub use machine_template::*;
pub use remediation::*;
