use radar_data::Angle;

/// Parses an angle field such as `"45"` or `"45.0"`, truncating toward zero.
pub(crate) fn to_angle(field: &str) -> Option<Angle> {
    let value: f64 = field.trim().parse().ok()?;
    let degrees = value.trunc();
    if !(0. ..=Angle::MAX_DEGREES as f64).contains(&degrees) {
        return None;
    }
    Angle::new(degrees as u8)
}

/// Parses a distance field, accepting only `0 < d <= max_distance`.
pub(crate) fn to_distance(field: &str, max_distance: f64) -> Option<f64> {
    let d: f64 = field.trim().parse().ok()?;
    is_valid_distance(d, max_distance).then_some(d)
}

pub(crate) fn is_valid_distance(d: f64, max_distance: f64) -> bool {
    d > 0. && d <= max_distance
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_angle() {
        assert_eq!(to_angle("45").map(Angle::degrees), Some(45));
        assert_eq!(to_angle(" 45.9 ").map(Angle::degrees), Some(45));
        assert_eq!(to_angle("180.7").map(Angle::degrees), Some(180));
        assert_eq!(to_angle("-0.5").map(Angle::degrees), Some(0));
        assert_eq!(to_angle("181"), None);
        assert_eq!(to_angle("-1"), None);
        assert_eq!(to_angle("NaN"), None);
        assert_eq!(to_angle("inf"), None);
        assert_eq!(to_angle("forty"), None);
        assert_eq!(to_angle(""), None);
    }

    #[test]
    fn test_to_distance() {
        assert_eq!(to_distance("45.5", 120.), Some(45.5));
        assert_eq!(to_distance("120", 120.), Some(120.));
        assert_eq!(to_distance("120.01", 120.), None);
        assert_eq!(to_distance("0", 120.), None);
        assert_eq!(to_distance("-3", 120.), None);
        assert_eq!(to_distance("NaN", 120.), None);
        assert_eq!(to_distance("inf", 120.), None);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&[0x0A, 0xFF, 0x31]), "0A FF 31");
    }
}
