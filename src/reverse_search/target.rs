use crate::error::Error;
use crate::types::{validate_radix, Digit, Radix};

/// The output sequence to reproduce, in emission order, with every digit
/// known to be below the radix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSequence {
    digits: Vec<Digit>,
    radix: Radix,
}

impl TargetSequence {
    /// Validate everything up front so a bad digit never reaches the search.
    pub fn new(digits: Vec<Digit>, radix: Radix) -> Result<TargetSequence, Error> {
        let radix = validate_radix(radix)?;
        if let Some((position, &digit)) = digits.iter().enumerate().find(|(_, &d)| d >= radix) {
            return Err(Error::InvalidDigit { position, digit, radix });
        }
        Ok(TargetSequence { digits, radix })
    }

    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}

/// Parse `2,4,1,3` (whitespace around digits allowed).
pub fn parse_digits(text: &str) -> Result<Vec<Digit>, Error> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .enumerate()
        .map(|(i, part)| {
            part.trim().parse::<Digit>().map_err(|_| {
                Error::from(format!("Invalid digit {:?} at position {}", part.trim(), i))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_at_radix_rejected() {
        match TargetSequence::new(vec![0, 3, 8, 1], 8) {
            Err(Error::InvalidDigit { position, digit, radix }) => {
                assert_eq!((position, digit, radix), (2, 8, 8));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_radix_one_rejected() {
        assert!(matches!(TargetSequence::new(vec![0], 1), Err(Error::InvalidRadix { radix: 1 })));
    }

    #[test]
    fn test_empty_target_is_valid() {
        let t = TargetSequence::new(Vec::new(), 2).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.radix(), 2);
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits(" 2, 4,1 ,3 ").unwrap(), vec![2, 4, 1, 3]);
        assert_eq!(parse_digits("").unwrap(), Vec::<Digit>::new());
        assert!(parse_digits("2,,3").is_err());
        assert!(parse_digits("2,-1").is_err());
    }
}
