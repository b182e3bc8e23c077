//! Value Objects - Immutable, identity-less domain primitives

mod location_name;
mod record_id;

pub use location_name::LocationName;
pub use record_id::RecordId;
