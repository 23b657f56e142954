//! The orchestrator driving the batch loop.

use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    ctx::SearchCtx,
    dispatch::Classifier,
    error::PincrackResult,
    event::{Event, SearchHandle},
    sink::MatchSink,
};

/// The report of a finished search.
#[derive(Clone, Copy, Debug)]
pub struct SearchReport {
    /// The number of batches dispatched.
    pub batches: u64,
    /// The number of matches recorded.
    pub matches: u64,
    /// Wall time spent in the batch loop.
    pub elapsed: Duration,
}

/// A sequential search over the whole candidate space.
///
/// Exactly one batch is in flight at a time: a batch is dispatched, its
/// verdicts are drained to the sink, and only then does the next batch start.
/// This keeps the reused verdict buffer race-free without any locking.
pub struct Search<C> {
    ctx: SearchCtx,
    classifier: C,
    cancel: Arc<AtomicBool>,
}

impl<C: Classifier> Search<C> {
    pub fn new(ctx: SearchCtx, classifier: C) -> Self {
        Self {
            ctx,
            classifier,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a token that stops the search before its next batch.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Runs the search to completion, writing matches to the sink.
    pub fn run<W: Write>(mut self, sink: &mut MatchSink<W>) -> PincrackResult<SearchReport> {
        self.run_impl(sink, None)
    }

    /// Runs the search in a background thread.
    /// Returns a handle to receive progress events and the final report.
    pub fn run_with_events<W>(self, mut sink: MatchSink<W>) -> SearchHandle
    where
        W: Write + Send + 'static,
        C: Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let cancel = self.cancel.clone();

        let handle = thread::spawn(move || {
            let mut search = self;
            search.run_impl(&mut sink, Some(sender))
        });

        SearchHandle {
            handle,
            receiver,
            cancel,
        }
    }

    fn run_impl<W: Write>(
        &mut self,
        sink: &mut MatchSink<W>,
        events: Option<Sender<Event>>,
    ) -> PincrackResult<SearchReport> {
        let batch_count = self.ctx.batch_count();
        info!(
            capacity = self.ctx.capacity,
            batches = batch_count,
            "starting search"
        );

        let start = Instant::now();
        let mut verdicts = vec![false; self.ctx.capacity as usize];
        let mut batches = 0;
        let mut matches = 0;

        for batch in self.ctx.batch_start..=self.ctx.batch_end {
            if self.cancel.load(Ordering::Relaxed) {
                info!(batch, "search cancelled");
                break;
            }

            // the grid may overshoot the capacity, so clear the buffer to keep
            // stale verdicts of the previous batch out of uncovered slots
            verdicts.fill(false);
            self.classifier.classify(batch, &mut verdicts)?;

            let found = sink.record_batch(&self.ctx, batch, &verdicts)? as u64;
            batches += 1;
            matches += found;

            debug!(batch, found, "batch recorded");

            if let Some(sender) = &events {
                // the receiver hanging up is not an error, the search goes on
                let _ = sender.send(Event::Batch {
                    batch_number: batches,
                    batch_count,
                    matches: found,
                });
                let _ = sender.send(Event::Progress(batches as f64 / batch_count as f64 * 100.));
            }
        }

        sink.flush()?;

        let report = SearchReport {
            batches,
            matches,
            elapsed: start.elapsed(),
        };
        info!(
            batches = report.batches,
            matches = report.matches,
            elapsed = ?report.elapsed,
            "search finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use itertools::Itertools;

    use crate::{
        candidate::Candidate,
        ctx::{SearchCtx, SearchCtxBuilder},
        dispatch::CpuClassifier,
        event::Event,
        search::Search,
        sink::MatchSink,
    };

    fn ten_batch_ctx() -> SearchCtx {
        SearchCtxBuilder::new()
            .day_bound(2)
            .month_bound(2)
            .year_bound(2)
            .batch_range(0, 9)
            .group_size(32)
            .build()
            .unwrap()
    }

    fn run_to_string(ctx: SearchCtx) -> String {
        let classifier = CpuClassifier::with_predicate(|flat, batch| flat == batch % 8);
        let mut sink = MatchSink::new(Vec::new());

        let report = Search::new(ctx, classifier).run(&mut sink).unwrap();
        assert_eq!(10, report.batches);
        assert_eq!(10, report.matches);

        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_one_line_per_batch_in_batch_order() {
        let ctx = ten_batch_ctx();
        let output = run_to_string(ctx.clone());
        let lines = output.lines().collect_vec();

        assert_eq!(ctx.batch_count() as usize, lines.len());

        // every match lands on the line of its own batch, correctly decoded
        for (batch, line) in lines.iter().enumerate() {
            let batch = batch as u32;
            let expected = Candidate::decode(batch % 8, batch, &ctx).unwrap().token();
            assert_eq!(expected, *line);
        }
    }

    #[test]
    fn test_identical_predicates_yield_identical_output() {
        let first = run_to_string(ten_batch_ctx());
        let second = run_to_string(ten_batch_ctx());

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_batches_still_produce_lines() {
        let ctx = ten_batch_ctx();
        let classifier = CpuClassifier::with_predicate(|_, _| false);
        let mut sink = MatchSink::new(Vec::new());

        let report = Search::new(ctx, classifier).run(&mut sink).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();

        assert_eq!(0, report.matches);
        assert_eq!("\n".repeat(10), output);
    }

    #[test]
    fn test_cancellation_stops_before_the_next_batch() {
        let ctx = ten_batch_ctx();
        let classifier = CpuClassifier::with_predicate(|_, _| true);
        let mut sink = MatchSink::new(Vec::new());

        let search = Search::new(ctx, classifier);
        search.cancel_token().store(true, Ordering::Relaxed);

        let report = search.run(&mut sink).unwrap();

        assert_eq!(0, report.batches);
        assert!(String::from_utf8(sink.into_inner()).unwrap().is_empty());
    }

    #[test]
    fn test_events_track_every_batch() {
        let ctx = SearchCtxBuilder::new()
            .day_bound(2)
            .month_bound(2)
            .year_bound(2)
            .batch_range(0, 4)
            .group_size(32)
            .build()
            .unwrap();
        let classifier = CpuClassifier::with_predicate(|_, _| false);

        let search = Search::new(ctx, classifier);
        let mut handle = search.run_with_events(MatchSink::new(Vec::new()));

        let mut batch_events = 0;
        let mut last_progress = 0.;
        while let Some(event) = handle.recv() {
            match event {
                Event::Batch { batch_count, .. } => {
                    assert_eq!(5, batch_count);
                    batch_events += 1;
                }
                Event::Progress(progress) => last_progress = progress,
            }
        }

        let report = handle.join().unwrap();

        assert_eq!(5, batch_events);
        assert_eq!(100., last_progress);
        assert_eq!(5, report.batches);
    }
}
