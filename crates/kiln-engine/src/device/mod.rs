//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - handing out the device/queue pair a [`WgpuContext`](crate::context::WgpuContext) wraps

mod gpu;
mod init;

pub use gpu::Gpu;
pub use init::GpuInit;
