mod complement;
mod endpoints;
mod intersection;
mod join;
mod union;

pub use complement::compute_complement;
pub use intersection::{compute_intersection, compute_intersection_all};
pub use join::join_touching;
pub use union::{are_disjoint, compute_union};

pub mod assertions;
