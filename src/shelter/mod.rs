//! Emergency shelter data: records, loading and candidate queries.

mod channel;
mod loader;
mod model;
mod set;

pub use channel::{ShelterLoadChannel, ShelterLoadResult};
pub use loader::{parse_shelters, ParsedShelters, ShelterLoadError};
pub use model::{Shelter, ShelterId};
pub use set::{LoadedShelters, ShelterSet};

/// Attribution shown while shelters are on the map.
pub const SHELTER_ATTRIBUTION: &str = "Designated Emergency Evacuation Sites (GSI)";
