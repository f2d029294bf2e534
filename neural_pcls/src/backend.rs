//! Backend aliases and device selection.

use burn::backend::Autodiff;
use burn::tensor::backend::Backend;

/// Backend alias for training/eval (NdArray by default; WGPU if enabled).
#[cfg(feature = "wgpu")]
pub type TrainBackend = burn::backend::Wgpu<f32>;
/// Backend alias for training/eval (NdArray by default; WGPU if enabled).
#[cfg(not(feature = "wgpu"))]
pub type TrainBackend = burn::backend::NdArray<f32>;

/// Autodiff wrapper used for the training pass.
pub type ADBackend = Autodiff<TrainBackend>;

/// Device type of [`TrainBackend`].
pub type TrainDevice = <TrainBackend as Backend>::Device;

/// Whether this build can run on a GPU.
pub fn gpu_available() -> bool {
    cfg!(feature = "wgpu")
}

/// Pick the device for a run and report the choice.
///
/// A GPU is used only when requested and compiled in. The report line is
/// logged at info level so it lands in the run log.
pub fn select_device(use_gpu: bool) -> (TrainDevice, bool) {
    if use_gpu && gpu_available() {
        let device = gpu_device();
        log::info!("Using GPU : {:?}", device);
        (device, true)
    } else {
        log::info!("Using CPU");
        (cpu_device(), false)
    }
}

/// Seed the backend's random number generator.
pub fn seed(seed: u64) {
    TrainBackend::seed(seed);
}

#[cfg(feature = "wgpu")]
fn gpu_device() -> TrainDevice {
    burn::backend::wgpu::WgpuDevice::DefaultDevice
}

#[cfg(not(feature = "wgpu"))]
fn gpu_device() -> TrainDevice {
    cpu_device()
}

#[cfg(feature = "wgpu")]
fn cpu_device() -> TrainDevice {
    burn::backend::wgpu::WgpuDevice::Cpu
}

#[cfg(not(feature = "wgpu"))]
fn cpu_device() -> TrainDevice {
    burn::backend::ndarray::NdArrayDevice::Cpu
}
