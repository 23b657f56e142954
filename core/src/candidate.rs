use crate::{
    ctx::SearchCtx,
    error::{PincrackError, PincrackResult},
};

/// One point of the candidate space, together with the batch it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub day: u32,
    pub month: u32,
    pub year: u32,
    pub batch: u32,
}

impl Candidate {
    pub fn new(day: u32, month: u32, year: u32, batch: u32) -> Self {
        Self {
            day,
            month,
            year,
            batch,
        }
    }

    /// Encodes the calendar fields into the flat id indexing the verdict buffer.
    ///
    /// The year varies fastest. This must stay the exact formula the kernel
    /// uses to split its thread id, or verdicts are silently misattributed.
    pub fn flat_id(&self, ctx: &SearchCtx) -> PincrackResult<u32> {
        let fields = [
            ("day", self.day, ctx.day_bound),
            ("month", self.month, ctx.month_bound),
            ("year", self.year, ctx.year_bound),
        ];
        for (field, value, bound) in fields {
            if value >= bound {
                return Err(PincrackError::InvalidCandidate {
                    field,
                    value,
                    bound,
                });
            }
        }

        Ok(self.year + ctx.year_bound * (self.month + ctx.month_bound * self.day))
    }

    /// Decodes a flat id back into its calendar fields.
    pub fn decode(flat: u32, batch: u32, ctx: &SearchCtx) -> PincrackResult<Self> {
        if flat >= ctx.capacity {
            return Err(PincrackError::OutOfRange(flat, ctx.capacity));
        }

        let year = flat % ctx.year_bound;
        let rest = flat / ctx.year_bound;
        let month = rest % ctx.month_bound;
        let day = rest / ctx.month_bound;

        Ok(Self {
            day,
            month,
            year,
            batch,
        })
    }

    /// Formats the candidate as its fixed-width `YYMMDDNNNN` token.
    pub fn token(&self) -> String {
        format!(
            "{:02}{:02}{:02}{:04}",
            self.year, self.month, self.day, self.batch
        )
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{candidate::Candidate, ctx::build_test_ctx, error::PincrackError};

    #[test]
    fn test_flat_id_round_trip() {
        let ctx = build_test_ctx();

        for (day, month, year) in (0..2).cartesian_product(0..2).cartesian_product(0..2).map(
            |((day, month), year)| (day, month, year),
        ) {
            let candidate = Candidate::new(day, month, year, 0);
            let flat = candidate.flat_id(&ctx).unwrap();

            // the documented encoding, with both field moduli equal to 2
            assert_eq!(year + 2 * month + 4 * day, flat);
            assert_eq!(candidate, Candidate::decode(flat, 0, &ctx).unwrap());
        }
    }

    #[test]
    fn test_flat_id_rejects_fields_outside_their_bounds() {
        let ctx = build_test_ctx();

        let invalid = Candidate::new(0, 2, 0, 0).flat_id(&ctx);
        assert!(matches!(
            invalid,
            Err(PincrackError::InvalidCandidate {
                field: "month",
                value: 2,
                bound: 2,
            })
        ));
    }

    #[test]
    fn test_decode_rejects_flat_ids_outside_the_space() {
        let ctx = build_test_ctx();

        let out_of_range = Candidate::decode(8, 0, &ctx);
        assert!(matches!(out_of_range, Err(PincrackError::OutOfRange(8, 8))));
    }

    #[test]
    fn test_token_is_fixed_width() {
        assert_eq!("0100010042", Candidate::new(1, 0, 1, 42).token());
        assert_eq!("9912310000", Candidate::new(31, 12, 99, 0).token());
    }
}
