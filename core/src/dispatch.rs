//! The classifiers driving one accelerator dispatch per batch.

use cubecl::{client::ComputeClient, prelude::*, Runtime};
use rayon::prelude::*;

use crate::{
    cpu,
    ctx::SearchCtx,
    cube::compute::verdict_kernel,
    error::{PincrackError, PincrackResult},
};

/// A trait that every classifier implements to evaluate one batch.
///
/// `classify` writes one verdict per flat id into the slice and returns only
/// once the whole batch is done; the caller never observes partial results.
pub trait Classifier {
    fn classify(&mut self, batch: u32, verdicts: &mut [bool]) -> PincrackResult<()>;
}

/// A classifier running the verdict kernel on a compute accelerator.
///
/// Exactly one dispatch is in flight at a time: the batch index is written
/// into the offsets block, the kernel is launched over the whole flat-id
/// space, and the read-back blocks until the device has finished writing.
pub struct GpuClassifier<Backend: Runtime> {
    client: ComputeClient<Backend::Server, Backend::Channel>,
    ctx: SearchCtx,
    zeroes: Vec<u32>,
}

impl<Backend: Runtime> GpuClassifier<Backend> {
    /// Creates a classifier on the given backend.
    /// A missing device or a pipeline creation failure aborts here, before
    /// any batch is dispatched.
    pub fn new(ctx: SearchCtx) -> Self {
        Self {
            client: Backend::client(&Default::default()),
            zeroes: vec![0; ctx.capacity as usize],
            ctx,
        }
    }
}

impl<Backend: Runtime> Classifier for GpuClassifier<Backend> {
    fn classify(&mut self, batch: u32, verdicts: &mut [bool]) -> PincrackResult<()> {
        if verdicts.len() != self.ctx.capacity as usize {
            return Err(PincrackError::BufferMismatch(
                verdicts.len(),
                self.ctx.capacity,
            ));
        }

        // slot 3 is the live batch counter, the other slots are reserved
        let offsets = [0u32, 0, 0, batch];
        let offsets_handle = self.client.create(u32::as_bytes(&offsets));

        // the device is not guaranteed to clear untouched slots between
        // batches, so the buffer is rebuilt from zeroes on every dispatch
        let verdicts_handle = self.client.create(u32::as_bytes(&self.zeroes));

        let (cube_count, cube_dim) = self.ctx.launch_grid();

        unsafe {
            let offsets_arg = ArrayArg::from_raw_parts::<u32>(&offsets_handle, offsets.len(), 1);
            let verdicts_arg =
                ArrayArg::from_raw_parts::<u32>(&verdicts_handle, self.ctx.capacity as usize, 1);

            verdict_kernel::launch_unchecked::<Backend>(
                &self.client,
                cube_count,
                cube_dim,
                offsets_arg,
                verdicts_arg,
                self.ctx.to_runtime::<Backend>(),
            );
        }

        // blocks until the kernel has fully written the batch
        let raw = self.client.read_one(verdicts_handle.binding());
        let flags = u32::from_bytes(&raw);

        for (slot, flag) in verdicts.iter_mut().zip(flags) {
            *slot = *flag != 0;
        }

        Ok(())
    }
}

/// A classifier evaluating a software predicate on the host, in parallel.
///
/// It mirrors the accelerator hand-off so the orchestration stays testable on
/// machines without a compute device.
pub struct CpuClassifier<P> {
    predicate: P,
}

impl CpuClassifier<()> {
    /// Creates a classifier backed by the reference number predicate.
    pub fn new(ctx: SearchCtx) -> CpuClassifier<impl Fn(u32, u32) -> bool + Send + Sync> {
        CpuClassifier {
            predicate: move |flat, batch| cpu::check_pin(flat, batch, &ctx),
        }
    }
}

impl<P: Fn(u32, u32) -> bool + Send + Sync> CpuClassifier<P> {
    /// Creates a classifier from a custom predicate over (flat id, batch index).
    pub fn with_predicate(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P: Fn(u32, u32) -> bool + Send + Sync> Classifier for CpuClassifier<P> {
    fn classify(&mut self, batch: u32, verdicts: &mut [bool]) -> PincrackResult<()> {
        verdicts
            .par_iter_mut()
            .enumerate()
            .for_each(|(flat, verdict)| *verdict = (self.predicate)(flat as u32, batch));

        Ok(())
    }
}
