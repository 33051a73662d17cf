// Proximity Clap Core - gesture detection for the clap screen
// Near/far proximity readings in, display/sound/haptic effects out

// Module declarations
pub mod api;
pub mod config;
pub mod detector;
pub mod error;
pub mod feedback;
pub mod replay;
pub mod session;
pub mod telemetry;
pub mod testing;

// Re-exports for convenience
pub use api::*;

use log::info;

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        /// Route `log`/`tracing` output to logcat
        pub fn init_logging() {
            use tracing_subscriber::layer::SubscriberExt;
            use tracing_subscriber::util::SubscriberInitExt;

            if let Ok(layer) = tracing_android::layer("ProximityClap") {
                let _ = tracing_subscriber::registry().with(layer).try_init();
            }
        }
    } else {
        /// Route `log`/`tracing` output to stderr
        pub fn init_logging() {
            let _ = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::INFO)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// JNI_OnLoad is called when the native library is loaded by Android
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: jni::JavaVM, _reserved: *mut std::ffi::c_void) -> jni::sys::jint {
    init_logging();
    info!("JNI_OnLoad called - proximity clap core loaded");
    jni::sys::JNI_VERSION_1_6
}

/// Log the crate version once the host has set up logging.
pub fn log_startup() {
    info!("Proximity clap core v{}", env!("CARGO_PKG_VERSION"));
}
