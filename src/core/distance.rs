use crate::models::GeoPoint;

/// Earth's radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance at which proximity is worth nothing
pub const DEFAULT_MAX_DISTANCE_M: f64 = 50_000.0;

/// Points awarded for two identical locations under the default weights
pub const DEFAULT_LOCATION_POINTS: f64 = 30.0;

/// Calculate the Haversine distance between two points in meters
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Proximity score in `[0, max_points]`
///
/// Linear decay from `max_points` at zero distance to 0 at
/// `max_distance_m` and beyond. A missing point on either side scores 0.
pub fn distance_score(
    a: Option<&GeoPoint>,
    b: Option<&GeoPoint>,
    max_distance_m: f64,
    max_points: f64,
) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if max_distance_m <= 0.0 {
        return 0.0;
    }

    let distance = haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude);
    let score = ((1.0 - distance / max_distance_m) * max_points).max(0.0);

    tracing::debug!(
        "Distance: {:.2}km, Score: {:.2}/{}",
        distance / 1000.0,
        score,
        max_points
    );
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let distance = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((distance - 344_000.0).abs() < 10_000.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_same_point_scores_full() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(
            distance_score(Some(&p), Some(&p), DEFAULT_MAX_DISTANCE_M, DEFAULT_LOCATION_POINTS),
            30.0
        );
    }

    #[test]
    fn test_missing_point_scores_zero() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(distance_score(Some(&p), None, DEFAULT_MAX_DISTANCE_M, 30.0), 0.0);
        assert_eq!(distance_score(None, Some(&p), DEFAULT_MAX_DISTANCE_M, 30.0), 0.0);
    }

    #[test]
    fn test_zero_coordinates_are_real_points() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_eq!(distance_score(Some(&origin), Some(&origin), DEFAULT_MAX_DISTANCE_M, 30.0), 30.0);
    }

    #[test]
    fn test_linear_decay() {
        let nyc = GeoPoint::new(40.7128, -74.0060);
        // ~1.1km north
        let near = GeoPoint::new(40.7228, -74.0060);
        let score = distance_score(Some(&nyc), Some(&near), DEFAULT_MAX_DISTANCE_M, 30.0);
        let expected = (1.0 - haversine_distance(40.7128, -74.0060, 40.7228, -74.0060) / 50_000.0) * 30.0;
        assert!((score - expected).abs() < 1e-9);
        assert!(score > 29.0 && score < 30.0);
    }

    #[test]
    fn test_beyond_max_distance() {
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let la = GeoPoint::new(34.0522, -118.2437);
        assert_eq!(distance_score(Some(&nyc), Some(&la), DEFAULT_MAX_DISTANCE_M, 30.0), 0.0);
    }

    #[test]
    fn test_monotonic() {
        let origin = GeoPoint::new(48.0, 11.0);
        let mut previous = f64::MAX;
        for step in 0..60 {
            let p = GeoPoint::new(48.0 + step as f64 * 0.01, 11.0);
            let score = distance_score(Some(&origin), Some(&p), DEFAULT_MAX_DISTANCE_M, 30.0);
            assert!(score <= previous);
            previous = score;
        }
        assert_eq!(previous, 0.0);
    }
}
