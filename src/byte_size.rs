use once_cell::sync::Lazy;
use regex::Regex;

static BYTE_SIZE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(b|kb|mb|gb|tb|pb)?$").expect("invalid byte size regex")
});

/// Error that may occur while parsing a byte size.
#[derive(Debug, thiserror::Error)]
pub enum ParseByteSizeError {
    /// The string does not look like a byte size
    #[error("invalid byte size '{0}'")]
    Invalid(String),

    /// The numeric part could not be parsed
    #[error("invalid byte size number")]
    InvalidNumber(#[source] std::num::ParseFloatError),

    /// The size does not fit in a u64
    #[error("byte size '{0}' is too large")]
    TooLarge(String),
}

/// Parse a human-readable byte size, like `512KB` or `1.5 MB`, into a byte count.
///
/// Units are case-insensitive and binary, so `1KB` is 1024 bytes.
/// A missing unit means bytes. Fractional byte counts are floored.
pub fn parse_byte_size(input: &str) -> Result<u64, ParseByteSizeError> {
    let input = input.trim();
    let captures = BYTE_SIZE_REGEX
        .captures(input)
        .ok_or_else(|| ParseByteSizeError::Invalid(input.to_string()))?;

    let value: f64 = captures[1]
        .parse()
        .map_err(ParseByteSizeError::InvalidNumber)?;

    let multiplier: u64 = match captures
        .get(2)
        .map(|unit| unit.as_str().to_ascii_lowercase())
        .as_deref()
    {
        None | Some("b") => 1,
        Some("kb") => 1 << 10,
        Some("mb") => 1 << 20,
        Some("gb") => 1 << 30,
        Some("tb") => 1 << 40,
        Some("pb") => 1 << 50,
        Some(_) => return Err(ParseByteSizeError::Invalid(input.to_string())),
    };

    let bytes = (value * multiplier as f64).floor();
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(ParseByteSizeError::TooLarge(input.to_string()));
    }

    Ok(bytes as u64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!(parse_byte_size("512").unwrap(), 512);
        assert_eq!(parse_byte_size("512B").unwrap(), 512);
        assert_eq!(parse_byte_size("1KB").unwrap(), 1024);
        assert_eq!(parse_byte_size("512KB").unwrap(), 524_288);
        assert_eq!(parse_byte_size("1.5MB").unwrap(), 1_572_864);
        assert_eq!(parse_byte_size("2GB").unwrap(), 2_147_483_648);
        assert_eq!(parse_byte_size("1TB").unwrap(), 1_099_511_627_776);
        assert_eq!(parse_byte_size("1PB").unwrap(), 1_125_899_906_842_624);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(parse_byte_size("1kb").unwrap(), 1024);
        assert_eq!(parse_byte_size("1Kb").unwrap(), 1024);
        assert_eq!(parse_byte_size("3mB").unwrap(), 3 * 1_048_576);
    }

    #[test]
    fn parse_floors_fractions() {
        assert_eq!(parse_byte_size("240.4KB").unwrap(), 246_169);
        assert_eq!(parse_byte_size("1.5B").unwrap(), 1);
    }

    #[test]
    fn parse_allows_space_before_unit() {
        assert_eq!(parse_byte_size("4 KB").unwrap(), 4096);
        assert_eq!(parse_byte_size(" 4KB ").unwrap(), 4096);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_byte_size("").is_err());
        assert!(parse_byte_size("KB").is_err());
        assert!(parse_byte_size("-1KB").is_err());
        assert!(parse_byte_size("12XB").is_err());
        assert!(parse_byte_size("1.KB").is_err());
    }
}
