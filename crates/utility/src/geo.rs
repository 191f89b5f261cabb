//! Spherical geometry on a mean-radius earth.

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const EARTH_RADIUS_METERS: f64 = EARTH_RADIUS_KM * 1000.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Great circle distance in meters between two points given in degrees.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_METERS * c
}

/// The point reached when travelling `distance_meters` from the start point
/// along the great circle with the given initial bearing (degrees clockwise
/// from north).
pub fn destination_point(
    latitude: f64,
    longitude: f64,
    bearing_degrees: f64,
    distance_meters: f64,
) -> (f64, f64) {
    let lat_rad = to_radians(latitude);
    let lon_rad = to_radians(longitude);
    let bearing = to_radians(bearing_degrees);
    let angular = distance_meters / EARTH_RADIUS_METERS;

    let dest_lat = (lat_rad.sin() * angular.cos()
        + lat_rad.cos() * angular.sin() * bearing.cos())
    .asin();
    let dest_lon = lon_rad
        + (bearing.sin() * angular.sin() * lat_rad.cos())
            .atan2(angular.cos() - lat_rad.sin() * dest_lat.sin());

    // normalize longitude to [-180, 180)
    let dest_lon = to_degrees(dest_lon);
    let dest_lon = (dest_lon + 540.0).rem_euclid(360.0) - 180.0;

    (to_degrees(dest_lat), dest_lon)
}
