//! Decorative overlay for the map tab: a static base map of the continental
//! US and a flyer that loops east to west across it. Nothing here reads data.

/// Continental US bounding box.
pub const LON_RANGE: [f64; 2] = [-125.0, -66.0];
pub const LAT_RANGE: [f64; 2] = [25.0, 49.0];

/// Seconds for one east-to-west pass.
pub const FLIGHT_PERIOD_SECS: f64 = 15.0;

const START_FRACTION: f64 = 0.95;
const END_FRACTION: f64 = 0.05;

pub const FLYER: &str = "🎅";

/// Horizontal position of the flyer as a fraction of the box width.
/// Linear from 95% to 5%, restarting every `period` seconds.
pub fn flyer_fraction(time_secs: f64, period: f64) -> f64 {
    let phase = (time_secs / period).rem_euclid(1.0);
    START_FRACTION + (END_FRACTION - START_FRACTION) * phase
}

/// Flyer position in `[lon, lat]`, vertically centred in the box.
pub fn flyer_position(time_secs: f64) -> [f64; 2] {
    let frac = flyer_fraction(time_secs, FLIGHT_PERIOD_SECS);
    let lon = LON_RANGE[0] + (LON_RANGE[1] - LON_RANGE[0]) * frac;
    let lat = (LAT_RANGE[0] + LAT_RANGE[1]) / 2.0;
    [lon, lat]
}

/// Closed outline of the bounding box, counter-clockwise from the south-west.
pub fn base_outline() -> Vec<[f64; 2]> {
    vec![
        [LON_RANGE[0], LAT_RANGE[0]],
        [LON_RANGE[1], LAT_RANGE[0]],
        [LON_RANGE[1], LAT_RANGE[1]],
        [LON_RANGE[0], LAT_RANGE[1]],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flyer_moves_east_to_west_and_loops() {
        assert!((flyer_fraction(0.0, 15.0) - 0.95).abs() < 1e-12);
        assert!((flyer_fraction(7.5, 15.0) - 0.5).abs() < 1e-12);
        assert!(flyer_fraction(14.9, 15.0) < 0.06);
        assert!((flyer_fraction(15.0, 15.0) - 0.95).abs() < 1e-12);
        assert!((flyer_fraction(37.5, 15.0) - flyer_fraction(7.5, 15.0)).abs() < 1e-12);
    }

    #[test]
    fn flyer_stays_inside_the_box() {
        for t in 0..300 {
            let [lon, lat] = flyer_position(t as f64 * 0.1);
            assert!(lon > LON_RANGE[0] && lon < LON_RANGE[1]);
            assert_eq!(lat, 37.0);
        }
    }
}
