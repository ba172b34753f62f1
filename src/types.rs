use crate::error::Error;

/// A candidate seed. 128 bits keeps every 3-bit target of up to 42 digits exact.
pub type Accumulator = u128;

/// One radix-bounded output symbol.
pub type Digit = u32;

pub type Radix = u32;

pub fn validate_radix(radix: Radix) -> Result<Radix, Error> {
    if radix < 2 {
        return Err(Error::InvalidRadix { radix });
    }
    Ok(radix)
}

/// `acc * radix + digit`, or `None` once the value leaves 128 bits.
#[inline]
pub fn append_digit(acc: Accumulator, radix: Radix, digit: Digit) -> Option<Accumulator> {
    acc.checked_mul(radix as Accumulator)?
        .checked_add(digit as Accumulator)
}

/// Drop `count` low-order digits. Saturates to zero instead of overflowing.
#[inline]
pub fn drop_digits(acc: Accumulator, radix: Radix, count: usize) -> Accumulator {
    let mut value = acc;
    for _ in 0..count {
        if value == 0 {
            break;
        }
        value /= radix as Accumulator;
    }
    value
}
