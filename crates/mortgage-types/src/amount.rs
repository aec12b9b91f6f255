//! JSON encoding of amounts and rates.

use serde::Serializer;

/// Beyond 2^53 not every integer has an exact `f64`, so larger values keep
/// their float form.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes whole numbers as JSON integers (`5000000`, not `5000000.0`).
pub(crate) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Amount(#[serde(serialize_with = "super::serialize")] f64);

    fn encode(value: f64) -> String {
        serde_json::to_string(&Amount(value)).unwrap()
    }

    #[test]
    fn test_whole_amounts_have_no_fraction() {
        assert_eq!(encode(5_000_000.0), "5000000");
        assert_eq!(encode(8.0), "8");
        assert_eq!(encode(0.0), "0");
        assert_eq!(encode(-0.0), "0");
    }

    #[test]
    fn test_fractional_amounts_are_kept() {
        assert_eq!(encode(11.5), "11.5");
        assert_eq!(encode(1e300), "1e300");
    }
}
