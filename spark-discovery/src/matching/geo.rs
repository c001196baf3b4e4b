/// Mean Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in km between two lat/lng points.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Maximum candidate distance for a fetched pool of `pool_size` profiles.
///
/// Sparse pools get a wider radius. The tiers are not monotonic: a pool of
/// 10..=49 is cut at 50 km while a full pool of 50 is cut at 100 km.
pub fn distance_cutoff_km(pool_size: usize) -> f64 {
    match pool_size {
        0..=4 => 200.0,
        5..=9 => 150.0,
        10..=49 => 50.0,
        _ => 100.0,
    }
}
