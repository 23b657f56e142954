pub mod candidate;
pub mod cpu;
pub mod ctx;
pub mod cube;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod search;
pub mod sink;

pub use candidate::Candidate;
pub use ctx::{SearchCtx, SearchCtxBuilder};
pub use dispatch::{Classifier, CpuClassifier, GpuClassifier};
pub use error::{PincrackError, PincrackResult};
pub use event::{Event, SearchHandle};
pub use search::{Search, SearchReport};
pub use sink::MatchSink;

pub use cubecl::Runtime;
pub use cubecl_cuda::CudaRuntime;
pub use cubecl_wgpu::WgpuRuntime;

/// The default number of values for each calendar field.
/// 100 x 100 x 100 tiles the reference verdict buffer of 1,000,000 slots exactly.
pub const DEFAULT_FIELD_BOUND: u32 = 100;

/// The largest bound a field can take while still fitting its two-digit token.
pub const MAX_FIELD_BOUND: u32 = 100;

/// The default last batch index, inclusive.
pub const DEFAULT_BATCH_END: u32 = 10_000;

// Threads are executed in warps/waves of 32, so the group size should be a
// multiple of 32. 512 is a safe value on every backend we target.
/// The default accelerator thread group size.
pub const DEFAULT_GROUP_SIZE: u32 = 512;

/// The largest thread group size a device is expected to report.
pub const MAX_GROUP_SIZE: u32 = 1024;
