mod shutdown;
mod store;


pub use shutdown::{ShutdownSignal, install_shutdown_handler};
pub use store::open_store;

use tokio::runtime::{Builder, Runtime};

/// Multi-threaded runtime shared by the pipeline stages and writer tasks.
pub fn build_runtime() -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .thread_name("logpulse-worker")
        .enable_all()
        .build()
}
