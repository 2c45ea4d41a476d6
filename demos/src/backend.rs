//! Backend the `evaluate` binary runs on, chosen by cargo feature.
//!
//! `wgpu` takes precedence when both backend features are enabled.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "wgpu")] {
        pub type SelectedBackend = burn::backend::Wgpu;
        pub type SelectedDevice = burn::backend::wgpu::WgpuDevice;

        /// Label used in logs and reports.
        pub const BACKEND_NAME: &str = "wgpu";
    } else {
        pub type SelectedBackend = burn::backend::NdArray;
        pub type SelectedDevice = burn::backend::ndarray::NdArrayDevice;

        /// Label used in logs and reports.
        pub const BACKEND_NAME: &str = "ndarray";
    }
}

/// Default device of [`SelectedBackend`]: the first GPU adapter for `wgpu`, the CPU otherwise.
pub fn create_device() -> SelectedDevice {
    SelectedDevice::default()
}
