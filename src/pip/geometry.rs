use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// Polygon as delivered by the reference dataset: `[lon, lat]` rings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonRings {
    pub exterior: Vec<[f64; 2]>,
    #[serde(default)]
    pub interiors: Vec<Vec<[f64; 2]>>,
}

/// Build a closed ring, or `None` if it has fewer than three distinct corners.
pub fn close_ring(ring: &[[f64; 2]]) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();

    if coords.len() < 3 {
        return None;
    }

    // Close the ring if needed
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }

    if coords.len() < 4 {
        return None;
    }

    Some(LineString::new(coords))
}

/// Convert reference polygons into a single multipolygon, dropping degenerate rings.
pub fn to_multipolygon(polygons: &[PolygonRings]) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<Polygon<f64>> = polygons
        .iter()
        .filter_map(|p| {
            let exterior = close_ring(&p.exterior)?;
            let interiors = p.interiors.iter().filter_map(|r| close_ring(r)).collect();
            Some(Polygon::new(exterior, interiors))
        })
        .collect();

    if polygons.is_empty() {
        return None;
    }

    Some(MultiPolygon::new(polygons))
}
