pub mod bbox;
pub mod record;
pub mod scope;

pub use bbox::{BoundingBox, BoundsError, PARIS};
pub use record::{Access, FeatureRecord, ScoreTier, ScoredFeatureRecord, UNKNOWN};
pub use scope::{QueryScope, TagFilter};
