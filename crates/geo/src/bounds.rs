use crate::point::GeoPoint;

/// Axis-aligned geographic bounding box (degrees).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

const DEGENERATE_EPS_DEG: f64 = 1e-9;

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Tightest box enclosing all valid points; `None` if no point is valid.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut bounds: Option<GeoBounds> = None;
        for p in points {
            if !p.is_valid() {
                continue;
            }
            bounds = Some(match bounds {
                None => GeoBounds::new(p.lat, p.lng, p.lat, p.lng),
                Some(b) => GeoBounds::new(
                    b.south.min(p.lat),
                    b.west.min(p.lng),
                    b.north.max(p.lat),
                    b.east.max(p.lng),
                ),
            });
        }
        bounds
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// A box with no usable extent: corners invalid, or zero span on both
    /// axes (a single repeated point). A viewport cannot be fitted to it.
    pub fn is_degenerate(&self) -> bool {
        let sw = GeoPoint::new(self.south, self.west);
        let ne = GeoPoint::new(self.north, self.east);
        if !sw.is_valid() || !ne.is_valid() || self.south > self.north || self.west > self.east {
            return true;
        }
        (self.north - self.south) < DEGENERATE_EPS_DEG
            && (self.east - self.west) < DEGENERATE_EPS_DEG
    }
}
