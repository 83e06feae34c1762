// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod node_id;
mod package_ref;

pub use id::{DeploymentId, Id, PackageId};
pub use node_id::{NodeId, NodeIdError};
pub use package_ref::{PackageRef, PackageRefError};
