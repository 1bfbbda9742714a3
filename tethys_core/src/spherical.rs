// tethys_core/src/spherical.rs

use nalgebra::{Rotation3, Vector3};
use serde::Deserialize;

// WGS84 ellipsoid parameters.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

const ECEF_ITERATIONS: usize = 8;

/// Geodetic reference of the simulation world.
///
/// The local frame is ENU rotated about Up by `heading_deg`. With a zero
/// heading, local +x points east and +y points north.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SphericalCoordinates {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Elevation of the local origin above the ellipsoid (m).
    pub elevation: f64,
    pub heading_deg: f64,
}

impl SphericalCoordinates {
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation: f64, heading_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation,
            heading_deg,
        }
    }

    /// Converts a position in the local frame into `(latitude_deg,
    /// longitude_deg, altitude)`.
    pub fn spherical_from_local_position(&self, local: &Vector3<f64>) -> Vector3<f64> {
        let enu = Rotation3::from_axis_angle(&Vector3::z_axis(), self.heading_deg.to_radians()) * local;
        let ecef = self.origin_ecef() + self.enu_to_ecef_rotation() * enu;
        ecef_to_geodetic(&ecef)
    }

    fn origin_ecef(&self) -> Vector3<f64> {
        geodetic_to_ecef(
            self.latitude_deg.to_radians(),
            self.longitude_deg.to_radians(),
            self.elevation,
        )
    }

    /// Columns are the east, north and up unit vectors expressed in ECEF.
    #[rustfmt::skip]
    fn enu_to_ecef_rotation(&self) -> nalgebra::Matrix3<f64> {
        let (sin_lat, cos_lat) = self.latitude_deg.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude_deg.to_radians().sin_cos();
        nalgebra::Matrix3::new(
            -sin_lon, -sin_lat * cos_lon, cos_lat * cos_lon,
            cos_lon, -sin_lat * sin_lon, cos_lat * sin_lon,
            0.0, cos_lat, sin_lat,
        )
    }
}

fn eccentricity_squared() -> f64 {
    WGS84_FLATTENING * (2.0 - WGS84_FLATTENING)
}

fn prime_vertical_radius(latitude: f64) -> f64 {
    WGS84_SEMI_MAJOR_AXIS / (1.0 - eccentricity_squared() * latitude.sin().powi(2)).sqrt()
}

fn geodetic_to_ecef(latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64> {
    let n = prime_vertical_radius(latitude);
    let e2 = eccentricity_squared();
    Vector3::new(
        (n + altitude) * latitude.cos() * longitude.cos(),
        (n + altitude) * latitude.cos() * longitude.sin(),
        (n * (1.0 - e2) + altitude) * latitude.sin(),
    )
}

fn ecef_to_geodetic(ecef: &Vector3<f64>) -> Vector3<f64> {
    let e2 = eccentricity_squared();
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let longitude = ecef.y.atan2(ecef.x);

    let mut latitude = ecef.z.atan2(p * (1.0 - e2));
    let mut altitude = 0.0;
    for _ in 0..ECEF_ITERATIONS {
        let n = prime_vertical_radius(latitude);
        altitude = if latitude.cos().abs() > 1e-9 {
            p / latitude.cos() - n
        } else {
            // At the poles the horizontal distance carries no information.
            ecef.z.abs() - n * (1.0 - e2)
        };
        latitude = ecef.z.atan2(p * (1.0 - e2 * n / (n + altitude)));
    }

    Vector3::new(latitude.to_degrees(), longitude.to_degrees(), altitude)
}
