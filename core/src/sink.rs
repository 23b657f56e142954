//! Everything related to persisting the matches of a batch.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;

use crate::{
    candidate::Candidate,
    ctx::SearchCtx,
    error::{PincrackError, PincrackResult},
};

/// Streams the matches of each batch to an output stream.
///
/// One line is appended per batch, so line numbers track batch indices even
/// when a batch produced no match.
pub struct MatchSink<W: Write> {
    writer: W,
}

impl MatchSink<BufWriter<File>> {
    /// Creates a sink over a file, truncating any previous content.
    /// The stream is only appended to afterwards.
    pub fn create(path: &Path) -> PincrackResult<Self> {
        let file = File::options()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self::new(BufWriter::with_capacity(1024 * 1024, file)))
    }
}

impl<W: Write> MatchSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Scans the verdicts of one batch in ascending flat-id order and appends
    /// every match as its token, space-separated on a single line.
    /// Returns the number of matches recorded.
    pub fn record_batch(
        &mut self,
        ctx: &SearchCtx,
        batch: u32,
        verdicts: &[bool],
    ) -> PincrackResult<usize> {
        if verdicts.len() != ctx.capacity as usize {
            return Err(PincrackError::BufferMismatch(verdicts.len(), ctx.capacity));
        }

        let tokens = verdicts
            .iter()
            .enumerate()
            .filter(|(_, &verdict)| verdict)
            .map(|(flat, _)| Candidate::decode(flat as u32, batch, ctx).map(|c| c.token()))
            .collect::<PincrackResult<Vec<_>>>()?;

        writeln!(self.writer, "{}", tokens.iter().join(" "))?;

        Ok(tokens.len())
    }

    pub fn flush(&mut self) -> PincrackResult<()> {
        self.writer.flush()?;

        Ok(())
    }

    /// Consumes the sink and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use crate::{ctx::build_test_ctx, error::PincrackError, sink::MatchSink};

    #[test]
    fn test_single_match_line() {
        let ctx = build_test_ctx();
        let mut sink = MatchSink::new(Vec::new());

        // flat id 5: year 1, month 0, day 1
        let mut verdicts = vec![false; 8];
        verdicts[5] = true;

        let matches = sink.record_batch(&ctx, 42, &verdicts).unwrap();

        assert_eq!(1, matches);
        assert_eq!("0100010042\n", String::from_utf8(sink.into_inner()).unwrap());
    }

    #[test]
    fn test_no_match_batch_still_emits_a_line() {
        let ctx = build_test_ctx();
        let mut sink = MatchSink::new(Vec::new());

        let matches = sink.record_batch(&ctx, 42, &vec![false; 8]).unwrap();

        assert_eq!(0, matches);
        assert_eq!("\n", String::from_utf8(sink.into_inner()).unwrap());
    }

    #[test]
    fn test_matches_are_space_joined_in_flat_id_order() {
        let ctx = build_test_ctx();
        let mut sink = MatchSink::new(Vec::new());

        let mut verdicts = vec![false; 8];
        verdicts[1] = true;
        verdicts[5] = true;

        sink.record_batch(&ctx, 42, &verdicts).unwrap();

        assert_eq!(
            "0100000042 0100010042\n",
            String::from_utf8(sink.into_inner()).unwrap()
        );
    }

    #[test]
    fn test_buffer_of_the_wrong_size_is_refused() {
        let ctx = build_test_ctx();
        let mut sink = MatchSink::new(Vec::new());

        let mismatch = sink.record_batch(&ctx, 0, &vec![false; 7]);
        assert!(matches!(mismatch, Err(PincrackError::BufferMismatch(7, 8))));
    }
}
