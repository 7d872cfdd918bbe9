//! Live ticker rendering: frame construction and the render thread.

mod event_loop;
mod frame;
mod status;

pub use event_loop::{RenderCommand, RenderHandle, RenderLoop};
pub use frame::{FrameOutput, FrameRenderer, HEADER_WIDTH, NAME_WIDTH};
pub use status::{QueueStatus, SharedQueueStatus};

