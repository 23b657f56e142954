use serde::{Deserialize, Serialize};

use crate::{
    error::{PincrackError, PincrackResult},
    DEFAULT_BATCH_END, DEFAULT_FIELD_BOUND, DEFAULT_GROUP_SIZE, MAX_FIELD_BOUND, MAX_GROUP_SIZE,
};

/// A builder for a search context.
#[derive(Clone)]
pub struct SearchCtxBuilder {
    day_bound: u32,
    month_bound: u32,
    year_bound: u32,
    capacity: Option<u32>,
    batch_start: u32,
    batch_end: u32,
    group_size: u32,
}

impl Default for SearchCtxBuilder {
    fn default() -> Self {
        Self {
            day_bound: DEFAULT_FIELD_BOUND,
            month_bound: DEFAULT_FIELD_BOUND,
            year_bound: DEFAULT_FIELD_BOUND,
            capacity: None,
            batch_start: 0,
            batch_end: DEFAULT_BATCH_END,
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

impl SearchCtxBuilder {
    /// Creates a new SearchCtxBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of values the day field can take.
    pub fn day_bound(mut self, bound: u32) -> Self {
        self.day_bound = bound;

        self
    }

    /// Sets the number of values the month field can take.
    pub fn month_bound(mut self, bound: u32) -> Self {
        self.month_bound = bound;

        self
    }

    /// Sets the number of values the year field can take.
    pub fn year_bound(mut self, bound: u32) -> Self {
        self.year_bound = bound;

        self
    }

    /// Declares the verdict buffer capacity explicitly.
    /// Building fails if the field bounds do not tile this capacity exactly.
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);

        self
    }

    /// Sets the inclusive range of batch indices to search.
    pub fn batch_range(mut self, start: u32, end: u32) -> Self {
        self.batch_start = start;
        self.batch_end = end;

        self
    }

    /// Sets the thread group size used on the accelerator.
    pub fn group_size(mut self, group_size: u32) -> Self {
        self.group_size = group_size;

        self
    }

    /// Builds a SearchCtx with the specified parameters.
    pub fn build(self) -> PincrackResult<SearchCtx> {
        let bounds = [
            ("day", self.day_bound),
            ("month", self.month_bound),
            ("year", self.year_bound),
        ];
        for (field, bound) in bounds {
            if bound == 0 || bound > MAX_FIELD_BOUND {
                return Err(PincrackError::Bound { field, bound });
            }
        }

        // the buffer and the thread id assignment must agree on the space, so
        // a declared capacity the bounds do not tile exactly is refused
        let tiled = self.day_bound as u64 * self.month_bound as u64 * self.year_bound as u64;
        let declared = self.capacity.map(u64::from).unwrap_or(tiled);
        if declared != tiled {
            return Err(PincrackError::Capacity { tiled, declared });
        }

        if self.batch_start > self.batch_end {
            return Err(PincrackError::BatchRange(self.batch_start, self.batch_end));
        }

        if self.group_size == 0 || self.group_size > MAX_GROUP_SIZE {
            return Err(PincrackError::GroupSize(self.group_size));
        }

        Ok(SearchCtx {
            day_bound: self.day_bound,
            month_bound: self.month_bound,
            year_bound: self.year_bound,
            capacity: tiled as u32,
            batch_start: self.batch_start,
            batch_end: self.batch_end,
            group_size: self.group_size,
        })
    }
}

/// Context used to store all parameters of a search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchCtx {
    /// The number of values of the day field.
    pub day_bound: u32,
    /// The number of values of the month field.
    pub month_bound: u32,
    /// The number of values of the year field.
    pub year_bound: u32,
    /// The number of slots of the verdict buffer, one per flat id.
    pub capacity: u32,
    /// The first batch index to search.
    pub batch_start: u32,
    /// The last batch index to search, inclusive.
    pub batch_end: u32,
    /// The thread group size used on the accelerator.
    pub group_size: u32,
}

impl SearchCtx {
    /// The number of batches in the configured range.
    pub fn batch_count(&self) -> u64 {
        (self.batch_end - self.batch_start) as u64 + 1
    }
}

#[cfg(test)]
pub fn build_test_ctx() -> SearchCtx {
    SearchCtxBuilder::new()
        .day_bound(2)
        .month_bound(2)
        .year_bound(2)
        .batch_range(0, 0)
        .group_size(32)
        .build()
        .unwrap()
}
