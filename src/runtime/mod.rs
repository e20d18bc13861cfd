pub mod server;
pub mod shutdown;
pub mod startup;

pub use server::{build_app, run_server};
pub use shutdown::listen_for_shutdown;
pub use startup::{AppState, StartupContext, prepare_server};
