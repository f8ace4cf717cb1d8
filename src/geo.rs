//! Great-circle distance and nearest-station search.
//!
//! The station dataset is small (a few thousand rows at most), so the
//! nearest-neighbor search is a plain linear scan — no spatial index.

use crate::model::{round2, ApiError, GeoPoint, NearestStation, StationRecord};

/// Mean Earth radius in kilometers, per the standard haversine approximation.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points using the haversine formula.
///
/// Spherical approximation — callers must not assume ellipsoidal accuracy.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let p1 = a.lat().to_radians();
    let p2 = b.lat().to_radians();
    let dlat = (b.lat() - a.lat()).to_radians();
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Finds the station closest to `point` within `max_radius_km` (inclusive).
///
/// Linear scan tracking the minimum distance seen, with strict `<`
/// comparison: ties keep the first-encountered record. This tie-break is
/// deterministic and must stay that way for reproducible results.
/// Distance and depth are rounded to 2 decimals only in the returned
/// value, never during comparison.
///
/// # Errors
/// - `NotFound` — no record qualifies, or the closest one is beyond
///   `max_radius_km`.
/// - `Data` — the winning record's depth field does not parse as a number.
pub fn nearest(
    records: &[StationRecord],
    point: GeoPoint,
    max_radius_km: f64,
) -> Result<NearestStation, ApiError> {
    let mut best: Option<(&StationRecord, f64)> = None;

    for record in records {
        // Catalog records always carry valid coordinates, but guard anyway
        // so a hand-built record set cannot panic the search.
        let Ok(station_point) = GeoPoint::new(record.latitude, record.longitude) else {
            continue;
        };

        let dist = haversine_km(point, station_point);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((record, dist));
        }
    }

    let (record, dist) = match best {
        Some((record, dist)) if dist <= max_radius_km => (record, dist),
        _ => {
            return Err(ApiError::NotFound(format!(
                "No CGWB/WRIS station found within {} km of ({},{})",
                max_radius_km,
                point.lat(),
                point.lon()
            )));
        }
    };

    let depth_m: f64 = record.depth_m_bgl.trim().parse().map_err(|_| {
        ApiError::Data("Nearest station has invalid 'depth_m_bgl' value in CSV".to_string())
    })?;

    Ok(NearestStation {
        record: record.clone(),
        distance_km: round2(dist),
        depth_m: round2(depth_m),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).expect("test point should be valid")
    }

    fn station(id: &str, lat: f64, lon: f64, depth: &str) -> StationRecord {
        StationRecord {
            station_id: id.to_string(),
            station_name: format!("Station {}", id),
            latitude: lat,
            longitude: lon,
            depth_m_bgl: depth.to_string(),
            date: "2024-05-15".to_string(),
            state: "West Bengal".to_string(),
            district: "Kolkata".to_string(),
        }
    }

    // --- distance ----------------------------------------------------------

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = point(22.5726, 88.3639);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = point(28.6139, 77.2090); // Delhi
        let b = point(19.0760, 72.8777); // Mumbai
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-9, "distance must be symmetric");
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // One degree of arc on a 6371 km sphere is 6371 * pi / 180 km.
        let d = haversine_km(point(0.0, 0.0), point(0.0, 1.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!(
            (d - expected).abs() < 1e-6,
            "expected {} km, got {}",
            expected,
            d
        );
    }

    #[test]
    fn test_equator_to_pole() {
        let d = haversine_km(point(0.0, 0.0), point(90.0, 0.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 2.0;
        assert!((d - expected).abs() < 1e-6);
    }

    // --- nearest -----------------------------------------------------------

    #[test]
    fn test_nearest_picks_minimum_distance() {
        let records = vec![
            station("FAR", 25.0, 90.0, "8.0"),
            station("NEAR", 22.6, 88.4, "4.2"),
            station("MID", 23.0, 88.9, "6.0"),
        ];
        let result = nearest(&records, point(22.5726, 88.3639), 500.0)
            .expect("should find a station");
        assert_eq!(result.record.station_id, "NEAR");
        assert_eq!(result.depth_m, 4.2);
    }

    #[test]
    fn test_nearest_tie_keeps_first_encountered() {
        // Two stations at the same coordinates: the first in the dataset
        // must win, for reproducibility.
        let records = vec![
            station("FIRST", 22.6, 88.4, "4.0"),
            station("SECOND", 22.6, 88.4, "9.0"),
        ];
        let result = nearest(&records, point(22.5726, 88.3639), 500.0)
            .expect("should find a station");
        assert_eq!(result.record.station_id, "FIRST");
    }

    #[test]
    fn test_nearest_beyond_radius_is_not_found() {
        let records = vec![station("FAR", 28.6139, 77.2090, "5.0")];
        // Delhi is ~1300 km from Kolkata; a 50 km radius must fail.
        let result = nearest(&records, point(22.5726, 88.3639), 50.0);
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let origin = point(22.5726, 88.3639);
        let records = vec![station("EDGE", 22.6, 88.4, "5.0")];
        let exact = haversine_km(origin, point(22.6, 88.4));

        let result = nearest(&records, origin, exact);
        assert!(
            result.is_ok(),
            "a station at exactly max_radius_km must qualify"
        );
        let result = nearest(&records, origin, exact - 1e-9);
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_empty_record_set_is_not_found() {
        let result = nearest(&[], point(22.5726, 88.3639), 50.0);
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_unparsable_depth_on_winner_is_data_error() {
        let records = vec![station("BAD", 22.6, 88.4, "dry")];
        let result = nearest(&records, point(22.5726, 88.3639), 500.0);
        assert!(matches!(result, Err(ApiError::Data(_))));
    }

    #[test]
    fn test_unparsable_depth_on_loser_is_harmless() {
        let records = vec![
            station("BAD", 25.0, 90.0, "dry"),
            station("GOOD", 22.6, 88.4, "4.2"),
        ];
        let result = nearest(&records, point(22.5726, 88.3639), 500.0)
            .expect("loser's depth should never be parsed");
        assert_eq!(result.record.station_id, "GOOD");
    }

    #[test]
    fn test_distance_and_depth_are_rounded() {
        let records = vec![station("S", 22.6, 88.4, "4.5678")];
        let result = nearest(&records, point(22.5726, 88.3639), 500.0)
            .expect("should find a station");
        assert_eq!(result.depth_m, 4.57);
        let cents = result.distance_km * 100.0;
        assert!(
            (cents - cents.round()).abs() < 1e-9,
            "distance_km should carry at most 2 decimals, got {}",
            result.distance_km
        );
    }
}
