//! Great-circle distance engine.
//!
//! Distances use the Haversine formula on a spherical Earth of radius
//! [`EARTH_RADIUS_KM`]. That is accurate enough for ranking facilities across
//! country-sized areas, not for navigation-grade routing.
//!
//! # Ranking
//!
//! Every ranked result carries `distance_km` rounded to 2 decimals, and the
//! sort key is that rounded value. Sorting is stable, so facilities at the
//! same rounded distance keep the order they have in the source collection.
//! Radius membership is tested on the unrounded distance.
//!
//! The functions here never apply defaults or clamps; the query layer in
//! [`crate::directory`] does that before calling in.

use crate::coords::{BoundingBox, GeoPoint};
use crate::facility::{Facility, RankedFacility};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two points in kilometers.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point in decimal degrees
/// * `lat2`, `lon2` - Second point in decimal degrees
///
/// # Examples
///
/// ```
/// use carefind::distance::haversine_distance;
///
/// // New Delhi to Mumbai
/// let d = haversine_distance(28.6139, 77.2090, 19.0760, 72.8777);
/// assert!((1150.0..1165.0).contains(&d));
/// ```
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to 2 decimal places.
#[inline]
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Check whether two points are within `radius_km` of each other.
pub fn is_within_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_km: f64) -> bool {
    haversine_distance(lat1, lon1, lat2, lon2) <= radius_km
}

/// Pair every facility with its unrounded distance from `point`.
fn distances<'a>(
    point: &'a GeoPoint,
    facilities: &'a [Facility],
) -> impl Iterator<Item = (&'a Facility, f64)> + 'a {
    facilities.iter().map(move |facility| {
        let distance = haversine_distance(
            point.latitude(),
            point.longitude(),
            facility.latitude,
            facility.longitude,
        );
        (facility, distance)
    })
}

fn ranked((facility, distance): (&Facility, f64)) -> RankedFacility {
    RankedFacility::new(facility.clone(), round_km(distance))
}

fn sort_by_distance(ranked: &mut [RankedFacility]) {
    // `sort_by` is stable: equal distances keep source order.
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

/// Find the `limit` facilities closest to `point`, nearest first.
///
/// Returns fewer than `limit` entries when the collection is smaller, and an
/// empty vector for an empty collection. `limit` is taken as-is; clamping is
/// the caller's job.
///
/// # Example
///
/// ```
/// use carefind::{distance::find_nearest, Facility, GeoPoint};
///
/// let facilities = vec![
///     Facility::new("Far", "", 19.0760, 72.8777),
///     Facility::new("Near", "", 28.6000, 77.2000),
/// ];
/// let delhi = GeoPoint::new(28.6139, 77.2090).unwrap();
/// let nearest = find_nearest(&delhi, &facilities, 1);
/// assert_eq!(nearest[0].facility.name, "Near");
/// ```
pub fn find_nearest(point: &GeoPoint, facilities: &[Facility], limit: usize) -> Vec<RankedFacility> {
    let mut results: Vec<RankedFacility> = distances(point, facilities).map(ranked).collect();
    sort_by_distance(&mut results);
    results.truncate(limit);
    results
}

/// Find every facility within `radius_km` of `point`, nearest first.
///
/// Membership is decided on the unrounded distance, so a facility a few
/// meters away never passes a sub-meter radius. Results are then ranked on
/// the rounded value like [`find_nearest`]. There is no implicit limit.
pub fn within_radius(point: &GeoPoint, facilities: &[Facility], radius_km: f64) -> Vec<RankedFacility> {
    let mut results: Vec<RankedFacility> = distances(point, facilities)
        .filter(|&(_, distance)| distance <= radius_km)
        .map(ranked)
        .collect();
    sort_by_distance(&mut results);
    results
}

/// Compute a lat/lon rectangle enclosing a circle of `radius_km` around `center`.
///
/// This is an approximation for pre-filtering only; exact distances must
/// still be checked afterwards. The longitude span is divided by
/// `cos(latitude)`, so it grows without bound towards the poles, and the box
/// is not wrapped across the antimeridian.
pub fn bounding_box(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let lat = center.latitude();
    let lon = center.longitude();

    let lat_range = (radius_km / EARTH_RADIUS_KM).to_degrees();
    let lon_range = (radius_km / EARTH_RADIUS_KM / lat.to_radians().cos()).to_degrees();

    BoundingBox::new(lat - lat_range, lat + lat_range, lon - lon_range, lon + lon_range)
}

/// Format a distance for display.
///
/// - under 1 km: whole meters, e.g. `"850 meters"`
/// - under 10 km: one decimal, e.g. `"4.2 km"`
/// - otherwise: whole kilometers, e.g. `"153 km"`
///
/// # Examples
///
/// ```
/// use carefind::distance::format_distance;
///
/// assert_eq!(format_distance(0.85), "850 meters");
/// assert_eq!(format_distance(4.24), "4.2 km");
/// assert_eq!(format_distance(152.6), "153 km");
/// ```
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} meters", (distance_km * 1000.0).round() as i64)
    } else if distance_km < 10.0 {
        format!("{:.1} km", distance_km)
    } else {
        format!("{} km", distance_km.round() as i64)
    }
}
