use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected bounding box bounds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    #[error("bounding box values must be finite")]
    NonFinite,
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("north ({north}) must be greater than south ({south})")]
    InvertedLatitude { north: f64, south: f64 },
    #[error("east ({east}) must be greater than west ({west})")]
    InvertedLongitude { east: f64, west: f64 },
}

/// Rectangular area in WGS84 decimal degrees.
///
/// Always satisfies `north > south` and `east > west`; the only way to get
/// one is through [`BoundingBox::new`], which checks that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

/// Central Paris, the area every preset directory covers by default
pub const PARIS: BoundingBox = BoundingBox {
    north: 48.9025,
    south: 48.8156,
    east: 2.4025,
    west: 2.2241,
};

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, BoundsError> {
        if ![north, south, east, west].iter().all(|v| v.is_finite()) {
            return Err(BoundsError::NonFinite);
        }
        for lat in [north, south] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(BoundsError::LatitudeOutOfRange(lat));
            }
        }
        for lon in [east, west] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(BoundsError::LongitudeOutOfRange(lon));
            }
        }
        if north <= south {
            return Err(BoundsError::InvertedLatitude { north, south });
        }
        if east <= west {
            return Err(BoundsError::InvertedLongitude { east, west });
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Bounds in Overpass order: (south, west, north, east)
    pub fn overpass_order(&self) -> (f64, f64, f64, f64) {
        (self.south, self.west, self.north, self.east)
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        PARIS
    }
}

#[derive(Serialize, Deserialize)]
struct RawBounds {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl TryFrom<RawBounds> for BoundingBox {
    type Error = BoundsError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        BoundingBox::new(raw.north, raw.south, raw.east, raw.west)
    }
}

impl From<BoundingBox> for RawBounds {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            north: bbox.north,
            south: bbox.south,
            east: bbox.east,
            west: bbox.west,
        }
    }
}
