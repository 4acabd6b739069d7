//! The hub version of all Metal3 infrastructure resources.
//!
//! Every other version converts to and from the types in this module. Fields which were
//! introduced with this version are marked as such in their documentation. Spokes cannot
//! represent them and preserve them in their side channel instead.
mod cluster;
mod common;
mod data;
mod data_template;
mod machine;
mod machine_template;
mod remediation;

pub use cluster::*;
pub use common::*;
pub use data::*;
pub use data_template::*;
pub use machine::*;
pub use machine_template::*;
pub use remediation::*;
