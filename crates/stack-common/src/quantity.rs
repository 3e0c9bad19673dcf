//! Resource quantity validation
//!
//! Quantities are copied into the emitted objects verbatim; these checks only make sure
//! the cluster will accept them.

use crate::{Error, Result};

const CPU_EXAMPLES: &str = "'100m', '1', '0.5'";
const MEMORY_EXAMPLES: &str = "'128Mi', '1Gi'";

const MEMORY_SUFFIXES: [&str; 12] = [
    "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "k", "M", "G", "T", "P", "E",
];

/// Validate a CPU quantity (e.g., "100m", "1", "0.5")
pub fn validate_cpu_quantity(qty: &str, field: &str) -> Result<()> {
    let is_valid = if let Some(stripped) = qty.strip_suffix('m') {
        stripped.parse::<u64>().is_ok()
    } else {
        is_decimal(qty)
    };

    if !is_valid {
        return Err(Error::invalid_quantity(field, qty, CPU_EXAMPLES));
    }
    Ok(())
}

/// Validate a memory or storage quantity (e.g., "128Mi", "1Gi", "1000000", "1.5")
pub fn validate_memory_quantity(qty: &str, field: &str) -> Result<()> {
    let is_valid = if let Some(suffix) = MEMORY_SUFFIXES.iter().find(|s| qty.ends_with(*s)) {
        is_decimal(&qty[..qty.len() - suffix.len()])
    } else {
        is_decimal(qty)
    };

    if !is_valid {
        return Err(Error::invalid_quantity(field, qty, MEMORY_EXAMPLES));
    }
    Ok(())
}

// f64 parsing alone would accept "inf" and "NaN"
fn is_decimal(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit()) && s.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100m")]
    #[case("1")]
    #[case("0.5")]
    #[case("2000m")]
    fn accepts_cpu(#[case] qty: &str) {
        assert!(validate_cpu_quantity(qty, "limits.cpu").is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("lots")]
    #[case("1.5m")]
    #[case("inf")]
    #[case("1Gi")]
    fn rejects_cpu(#[case] qty: &str) {
        let err = validate_cpu_quantity(qty, "limits.cpu").unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { ref field, .. } if field == "limits.cpu"));
    }

    #[rstest]
    #[case("128Mi")]
    #[case("1Gi")]
    #[case("1.5Gi")]
    #[case("1000000")]
    #[case("500M")]
    #[case("2Ei")]
    #[case("1.5")]
    #[case("0.25")]
    fn accepts_memory(#[case] qty: &str) {
        assert!(validate_memory_quantity(qty, "limits.memory").is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("Gi")]
    #[case("lots")]
    #[case("1.5.2")]
    #[case("-1")]
    #[case("12XB")]
    #[case("NaNMi")]
    fn rejects_memory(#[case] qty: &str) {
        assert!(validate_memory_quantity(qty, "limits.memory").is_err());
    }
}
