// src/display/format.rs
//! Text shown in the coordinate widgets

use crate::gps::Coordinates;

/// `12.3457S`: absolute value to four decimals and a hemisphere letter
pub fn format_latitude(latitude: f64) -> String {
    with_hemisphere(latitude, 'N', 'S')
}

/// `122.4567W`
pub fn format_longitude(longitude: f64) -> String {
    with_hemisphere(longitude, 'E', 'W')
}

/// `545.4m`, right aligned to five characters
pub fn format_altitude(altitude: f64) -> String {
    format!("{:5.1}m", altitude)
}

fn with_hemisphere(value: f64, positive: char, negative: char) -> String {
    if value < 0.0 {
        format!("{:.4}{}", -value, negative)
    } else {
        format!("{:.4}{}", value, positive)
    }
}

// The panel sometimes fails to draw the final character of a string, so
// every rendered value ends with a space.

/// Latitude, longitude and altitude lines for the expanded view
pub fn expanded_lines(coords: &Coordinates) -> [String; 3] {
    [
        format!("{} ", format_latitude(coords.latitude)),
        format!("{} ", format_longitude(coords.longitude)),
        format!("{} ", format_altitude(coords.altitude)),
    ]
}

/// `48.1170N,11.5170E 545m ` for the compact view; altitude in whole meters
pub fn compact_line(coords: &Coordinates) -> String {
    format!(
        "{},{} {}m ",
        format_latitude(coords.latitude),
        format_longitude(coords.longitude),
        coords.altitude.trunc() as i64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(-12.34567, "12.3457S")]
    #[case(48.117, "48.1170N")]
    #[case(0.0, "0.0000N")]
    fn test_latitude(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_latitude(value), expected);
    }

    #[rstest]
    #[case(-122.4567, "122.4567W")]
    #[case(11.517, "11.5170E")]
    fn test_longitude(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_longitude(value), expected);
    }

    #[rstest]
    #[case(15.0, " 15.0m")]
    #[case(545.44, "545.4m")]
    #[case(1234.56, "1234.6m")]
    #[case(-3.0, " -3.0m")]
    fn test_altitude(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_altitude(value), expected);
    }

    #[test]
    fn test_expanded_lines_have_trailing_space() {
        let coords = Coordinates::new(-12.34567, 11.517, 545.4);
        let [lat, lon, alt] = expanded_lines(&coords);
        assert_eq!(lat, "12.3457S ");
        assert_eq!(lon, "11.5170E ");
        assert_eq!(alt, "545.4m ");
    }

    #[test]
    fn test_compact_line() {
        let coords = Coordinates::new(37.1234, -122.4567, 15.9);
        assert_eq!(compact_line(&coords), "37.1234N,122.4567W 15m ");
    }
}
