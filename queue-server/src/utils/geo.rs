//! Great-circle distance (Haversine)
//!
//! Used only to filter the restaurant list by proximity. No ranking.

use shared::models::GeoPoint;

/// Earth radius in km
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in km
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// True when `point` lies within `radius_km` of `center`
pub fn within_radius(center: GeoPoint, point: GeoPoint, radius_km: f64) -> bool {
    distance_km(center, point) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint { lat: 1.3521, lng: 103.8198 };
        assert!(distance_km(p, p) < 1e-9);
    }

    #[test]
    fn singapore_to_kuala_lumpur_roughly_316km() {
        let sg = GeoPoint { lat: 1.3521, lng: 103.8198 };
        let kl = GeoPoint { lat: 3.1390, lng: 101.6869 };
        let d = distance_km(sg, kl);
        assert!((300.0..330.0).contains(&d), "got {d}");
    }

    #[test]
    fn within_radius_respects_boundary() {
        let center = GeoPoint { lat: 1.3000, lng: 103.8000 };
        // ~1.1km north
        let near = GeoPoint { lat: 1.3100, lng: 103.8000 };
        assert!(within_radius(center, near, 2.0));
        assert!(!within_radius(center, near, 1.0));
    }
}
