// Entity Models
//
// - family: the hand-written family definitions a run starts from
// - payor: canonical payor entities expanded from those families

pub mod family;
pub mod payor;

pub use family::{load_families, parse_families, ChildDefinition, FamilyDefinition};
pub use payor::{website_for, CanonicalEntity, EntityBuilder};
