pub mod normalize;

pub use normalize::{normalize_element, normalize_elements};
