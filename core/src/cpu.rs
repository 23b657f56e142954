//! Host mirror of the verdict kernel.
//!
//! These functions must stay bit-for-bit equivalent to their counterparts in
//! [`crate::cube::compute`] so the orchestration can be exercised without a
//! compute device.

use crate::ctx::SearchCtx;

/// Splits the candidate fields into the ten digits of the number `YYMMDDNNNN`.
#[inline]
pub fn pin_digits(year: u32, month: u32, day: u32, serial: u32) -> [u8; 10] {
    [
        (year / 10) as u8,
        (year % 10) as u8,
        (month / 10) as u8,
        (month % 10) as u8,
        (day / 10) as u8,
        (day % 10) as u8,
        (serial / 1000 % 10) as u8,
        (serial / 100 % 10) as u8,
        (serial / 10 % 10) as u8,
        (serial % 10) as u8,
    ]
}

/// Checks the Luhn checksum over the ten digits.
#[inline]
pub fn luhn_valid(digits: &[u8; 10]) -> bool {
    let mut sum = 0;

    for (i, &num) in digits.iter().enumerate() {
        let num = num as u32;
        if i % 2 == 0 {
            let mut doubled = num * 2;
            if num >= 5 {
                doubled -= 9;
            }
            sum += doubled;
        } else {
            sum += num;
        }
    }

    sum % 10 == 0
}

/// Checks the date validity of the number.
///
/// Days 61 onwards are coordination numbers, which shift the real day by 60.
#[inline]
pub fn date_valid(digits: &[u8; 10]) -> bool {
    let year = (digits[0] * 10 + digits[1]) as u32;
    let month = (digits[2] * 10 + digits[3]) as u32;
    let day = (digits[4] * 10 + digits[5]) as u32;

    if month == 0 || month > 12 {
        return false;
    }

    let max_day = match month {
        2 => 28 + (year % 4 == 0) as u32,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };

    if day > max_day && day < 61 {
        return false;
    }
    if day > max_day + 60 {
        return false;
    }

    true
}

/// The full reference predicate over the ten digits.
#[inline]
pub fn check(digits: &[u8; 10]) -> bool {
    date_valid(digits) && luhn_valid(digits)
}

/// Evaluates the predicate for one flat id of one batch, splitting the flat id
/// with the same mixed-radix formula the kernel uses.
#[inline]
pub fn check_pin(flat: u32, batch: u32, ctx: &SearchCtx) -> bool {
    let year = flat % ctx.year_bound;
    let rest = flat / ctx.year_bound;
    let month = rest % ctx.month_bound;
    let day = rest / ctx.month_bound;

    check(&pin_digits(year, month, day, batch))
}

#[cfg(test)]
mod tests {
    use crate::{
        cpu::{check, check_pin, date_valid, luhn_valid},
        ctx::SearchCtxBuilder,
    };

    fn assert_pin(digits: [u8; 10], expected: bool) {
        let actual = check(&digits);

        assert_eq!(
            expected,
            actual,
            "check on {digits:?} returned {actual}: luhn {}, date {}",
            luhn_valid(&digits),
            date_valid(&digits),
        );
    }

    #[test]
    fn test_known_valid() {
        assert_pin([0, 6, 1, 0, 0, 9, 2, 4, 5, 4], true);
        assert_pin([0, 6, 0, 3, 1, 7, 9, 2, 7, 6], true);

        assert_pin([0, 9, 0, 6, 2, 7, 8, 8, 9, 0], true);
        assert_pin([7, 1, 0, 7, 0, 8, 8, 5, 0, 7], true);
        assert_pin([6, 5, 0, 6, 1, 4, 8, 9, 9, 5], true);
    }

    #[test]
    fn test_hand_calculated_valid() {
        assert_pin([0, 0, 0, 1, 0, 6, 2, 4, 5, 4], true);
    }

    #[test]
    fn test_faulty_date() {
        assert_pin([0, 6, 1, 0, 5, 8, 2, 4, 5, 4], false);
        assert_pin([0, 1, 1, 0, 9, 5, 2, 4, 5, 4], false);
    }

    #[test]
    fn test_faulty_luhn() {
        assert_pin([0, 5, 1, 3, 0, 7, 2, 4, 5, 4], false);
    }

    #[test]
    fn test_check_pin_splits_the_flat_id() {
        let ctx = SearchCtxBuilder::new()
            .day_bound(32)
            .month_bound(13)
            .year_bound(100)
            .build()
            .unwrap();

        // 0610092454, a known valid number: year 6, month 10, day 9
        let flat = 6 + 100 * (10 + 13 * 9);
        assert!(check_pin(flat, 2454, &ctx));

        // same date with an off-by-one checksum
        assert!(!check_pin(flat, 2455, &ctx));
    }
}
