//! Reprojection of register coordinates to WGS84.
//!
//! The address register stores UTM easting/northing together with a
//! coordinate-system code. Codes are mapped to UTM zones and projected back
//! to latitude/longitude with the inverse transverse Mercator series.

use thiserror::Error;

use crate::models::GeoPoint;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("unknown coordinate system '{0}'")]
    UnknownCoordinateSystem(String),

    #[error("invalid UTM zone {0}")]
    InvalidZone(u8),

    #[error("non-finite coordinate ({easting}, {northing})")]
    NonFinite { easting: f64, northing: f64 },
}

/// Converts projected coordinates to a geographic point.
pub trait Projector: Send + Sync {
    fn project(&self, easting: f64, northing: f64, zone: u8) -> Result<GeoPoint, ProjectionError>;
}

/// Map a coordinate-system code to its UTM zone.
///
/// Historical register codes 21-26 were superseded by the EPSG codes
/// 25831-25836; both map to zones 31-36.
pub fn utm_zone_for_code(code: &str) -> Option<u8> {
    match code.trim() {
        "21" | "25831" => Some(31),
        "22" | "25832" => Some(32),
        "23" | "25833" => Some(33),
        "24" | "25834" => Some(34),
        "25" | "25835" => Some(35),
        "26" | "25836" => Some(36),
        _ => None,
    }
}

// WGS84 / ETRS89 (GRS80 differs below a millimetre at these latitudes)
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;

/// Northern hemisphere UTM inverse projection
#[derive(Debug, Clone, Copy, Default)]
pub struct UtmProjector;

impl Projector for UtmProjector {
    fn project(&self, easting: f64, northing: f64, zone: u8) -> Result<GeoPoint, ProjectionError> {
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError::InvalidZone(zone));
        }
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::NonFinite { easting, northing });
        }

        let a = SEMI_MAJOR_AXIS;
        let e2 = FLATTENING * (2.0 - FLATTENING);
        let ep2 = e2 / (1.0 - e2);
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let x = easting - FALSE_EASTING;
        let m = northing / SCALE_FACTOR;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

        // footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin1, cos1) = phi1.sin_cos();
        let tan1 = phi1.tan();
        let n1 = a / (1.0 - e2 * sin1 * sin1).sqrt();
        let t1 = tan1 * tan1;
        let c1 = ep2 * cos1 * cos1;
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
        let d = x / (n1 * SCALE_FACTOR);

        let lat = phi1
            - (n1 * tan1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
                / 120.0)
            / cos1;

        let central_meridian = f64::from(zone) * 6.0 - 183.0;

        Ok(GeoPoint::new(
            lat.to_degrees(),
            central_meridian + lon.to_degrees(),
        ))
    }
}
