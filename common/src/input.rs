use crate::{MAX_NUMBER, MIN_NUMBER, ValidationError};

/// Checks that a number lies within the playable range.
pub fn validate_number(value: i64) -> Result<u8, ValidationError> {
    if (MIN_NUMBER as i64..=MAX_NUMBER as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::OutOfRange { value })
    }
}

/// Parse typed input into a playable number. Only whole numbers are accepted.
pub fn parse_number(input: &str) -> Result<u8, ValidationError> {
    let trimmed = input.trim_matches(|c: char| c.is_ascii_control() || c.is_whitespace());
    let Ok(value) = trimmed.parse::<i64>() else {
        return Err(ValidationError::NotANumber {
            input: trimmed.to_string(),
        });
    };
    validate_number(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whole_numbers_in_range() {
        assert_eq!(parse_number("1"), Ok(1));
        assert_eq!(parse_number(" 10 \n"), Ok(10));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(parse_number("0"), Err(ValidationError::OutOfRange { value: 0 }));
        assert_eq!(parse_number("11"), Err(ValidationError::OutOfRange { value: 11 }));
        assert_eq!(parse_number("-3"), Err(ValidationError::OutOfRange { value: -3 }));
    }

    #[test]
    fn rejects_non_integers() {
        assert!(matches!(parse_number("2.5"), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(parse_number(""), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(parse_number("six"), Err(ValidationError::NotANumber { .. })));
    }
}
