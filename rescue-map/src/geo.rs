//! Geographic primitives used by the map surface and the controller.

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude in degrees, positive to the north.
    pub latitude: f64,
    /// Longitude in degrees, positive to the east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    pub fn latlon(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Extent of a viewport region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoSpan {
    /// North-south extent.
    pub latitude_delta: f64,
    /// East-west extent.
    pub longitude_delta: f64,
}

/// A rectangular viewport region defined by its center and span.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoRegion {
    /// Center of the region.
    pub center: GeoPoint,
    /// Extent of the region.
    pub span: GeoSpan,
}

impl GeoRegion {
    /// Region centered at `center` with the same `delta` on both axes.
    pub fn centered(center: GeoPoint, delta: f64) -> Self {
        Self {
            center,
            span: GeoSpan {
                latitude_delta: delta,
                longitude_delta: delta,
            },
        }
    }

    /// The smallest region containing all of the given points.
    ///
    /// Returns `None` for an empty input.
    pub fn bounding(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;

        let mut lat_min = first.latitude;
        let mut lat_max = first.latitude;
        let mut lon_min = first.longitude;
        let mut lon_max = first.longitude;
        for point in &points[1..] {
            lat_min = lat_min.min(point.latitude);
            lat_max = lat_max.max(point.latitude);
            lon_min = lon_min.min(point.longitude);
            lon_max = lon_max.max(point.longitude);
        }

        Some(Self {
            center: GeoPoint::latlon((lat_min + lat_max) / 2.0, (lon_min + lon_max) / 2.0),
            span: GeoSpan {
                latitude_delta: lat_max - lat_min,
                longitude_delta: lon_max - lon_min,
            },
        })
    }
}
