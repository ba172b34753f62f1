use crate::types::{Digit, Radix};
use std::fmt;

#[derive(Debug)]
pub struct SimpleStringError {
  description: String
}

impl fmt::Display for SimpleStringError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl std::error::Error for SimpleStringError {
}

#[derive(Debug)]
pub enum Error {
  IO {
    error: std::io::Error
  },
  Json {
    error: serde_json::Error
  },
  SimpleString {
    error: SimpleStringError
  },
  /// A line of input could not be understood.
  Parse {
    line: usize,
    reason: String
  },
  InvalidRadix {
    radix: Radix
  },
  /// A target digit outside `[0, radix)`.
  InvalidDigit {
    position: usize,
    digit: Digit,
    radix: Radix
  },
  /// The evaluator was built for a different branching factor than the target.
  RadixMismatch {
    target: Radix,
    evaluator: Radix
  },
  CandidateLimit {
    level: usize,
    size: usize,
    limit: usize
  },
  AccumulatorOverflow {
    level: usize
  },
  Machine {
    ip: usize,
    reason: String
  },
  StepLimit {
    limit: u64
  },
  /// The program does not have the single-loop shape the digit search relies on.
  UnsupportedProgram {
    reason: String
  }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO { error } => write!(f, "io error: {}", error),
            Error::Json { error } => write!(f, "json error: {}", error),
            Error::SimpleString { error } => write!(f, "{}", error),
            Error::Parse { line, reason } => write!(f, "line {}: {}", line, reason),
            Error::InvalidRadix { radix } => write!(f, "radix must be at least 2, got {}", radix),
            Error::InvalidDigit { position, digit, radix } => write!(
                f, "target digit {} at position {} is outside [0, {})", digit, position, radix
            ),
            Error::RadixMismatch { target, evaluator } => write!(
                f, "target uses radix {} but the evaluator models radix {}", target, evaluator
            ),
            Error::CandidateLimit { level, size, limit } => write!(
                f, "candidate set grew to {} at level {}, above the limit of {}", size, level, limit
            ),
            Error::AccumulatorOverflow { level } => write!(
                f, "accumulator no longer fits in 128 bits at level {}", level
            ),
            Error::Machine { ip, reason } => write!(f, "machine fault at ip {}: {}", ip, reason),
            Error::StepLimit { limit } => write!(f, "program did not halt within {} steps", limit),
            Error::UnsupportedProgram { reason } => write!(f, "unsupported program: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO { error } => Some(error),
            Error::Json { error } => Some(error),
            Error::SimpleString { error } => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
  fn from(error: std::io::Error) -> Self {
    Error::IO { error: error }
  }
}

impl From<serde_json::Error> for Error {
  fn from(error: serde_json::Error) -> Self {
    Error::Json { error: error }
  }
}

impl From<String> for Error {
  fn from(description: String) -> Self {
    Error::SimpleString {
      error: SimpleStringError {
        description: description
      }
    }
  }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let e = Error::InvalidDigit { position: 3, digit: 9, radix: 8 };
        assert_eq!(e.to_string(), "target digit 9 at position 3 is outside [0, 8)");

        let e = Error::from("plain failure".to_string());
        assert_eq!(e.to_string(), "plain failure");
    }

    #[test]
    fn test_io_error_is_kept_as_source() {
        use std::error::Error as _;
        let e = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(e.source().is_some());
    }
}
