use cubecl::prelude::*;

use crate::ctx::SearchCtx;

/// The CubeCL kernel.
/// It classifies every candidate of the current batch in parallel, writing one
/// verdict per flat id into the verdict buffer.
#[cube(launch_unchecked)]
pub fn verdict_kernel(offsets: &Array<u32>, verdicts: &mut Array<u32>, runtime_ctx: RuntimeGpuCtx) {
    if ABSOLUTE_POS < verdicts.len() {
        // slot 3 of the offsets block is the live batch counter
        if check_pin(ABSOLUTE_POS, offsets[3], &runtime_ctx) {
            verdicts[ABSOLUTE_POS] = 1u32;
        } else {
            verdicts[ABSOLUTE_POS] = 0u32;
        }
    }
}

/// Evaluates the predicate for one flat id of one batch.
///
/// The flat id is split with the mixed-radix formula of
/// [`crate::candidate::Candidate::decode`]; the two must never diverge.
#[cube]
pub fn check_pin(flat: u32, batch: u32, ctx: &RuntimeGpuCtx) -> bool {
    let year = flat % ctx.year_bound;
    let rest = flat / ctx.year_bound;
    let month = rest % ctx.month_bound;
    let day = rest / ctx.month_bound;

    date_valid(year, month, day) && luhn_valid(year, month, day, batch)
}

/// Checks the date validity of the candidate.
///
/// Days 61 onwards are coordination numbers, which shift the real day by 60.
#[cube]
pub fn date_valid(year: u32, month: u32, day: u32) -> bool {
    let mut valid = true;

    if month == 0 {
        valid = false;
    } else if month > 12 {
        valid = false;
    } else {
        let mut max_day = 31u32;
        if month == 2 {
            max_day = 28;
            if year % 4 == 0 {
                max_day = 29;
            }
        } else if month == 4 {
            max_day = 30;
        } else if month == 6 {
            max_day = 30;
        } else if month == 9 {
            max_day = 30;
        } else if month == 11 {
            max_day = 30;
        }

        if day > max_day && day < 61 {
            valid = false;
        }
        if day > max_day + 60 {
            valid = false;
        }
    }

    valid
}

/// Checks the Luhn checksum over the ten digits of the number `YYMMDDNNNN`.
#[cube]
pub fn luhn_valid(year: u32, month: u32, day: u32, serial: u32) -> bool {
    let mut digits = Array::<u32>::new(10);
    digits[0] = year / 10;
    digits[1] = year % 10;
    digits[2] = month / 10;
    digits[3] = month % 10;
    digits[4] = day / 10;
    digits[5] = day % 10;
    digits[6] = serial / 1000 % 10;
    digits[7] = serial / 100 % 10;
    digits[8] = serial / 10 % 10;
    digits[9] = serial % 10;

    let mut sum = 0u32;
    for i in 0..10u32 {
        let num = digits[i];
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

/// The runtime context of the search space.
/// It carries the field bounds the kernel needs to split a flat id.
#[derive(CubeLaunch)]
pub struct RuntimeGpuCtx {
    pub year_bound: u32,
    pub month_bound: u32,
}

impl SearchCtx {
    /// Returns the launch configuration covering the whole candidate space.
    ///
    /// The grid is derived from the configured capacity, never from a fixed
    /// constant, so changing the field bounds resizes the dispatch with them.
    pub fn launch_grid(&self) -> (CubeCount, CubeDim) {
        let block_count = Ord::max(self.capacity.div_ceil(self.group_size), 1);

        (
            CubeCount::Static(block_count, 1, 1),
            CubeDim::new(self.group_size, 1, 1),
        )
    }

    pub fn to_runtime<'a, Backend: Runtime>(&self) -> RuntimeGpuCtxLaunch<'a, Backend> {
        RuntimeGpuCtxLaunch::new(
            ScalarArg::new(self.year_bound),
            ScalarArg::new(self.month_bound),
        )
    }
}
