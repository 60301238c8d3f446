mod config;
mod log;
mod session;

use log::Logging;
use tracing::{error, info, instrument};

#[instrument(skip_all, name = "trace_start_server")]
fn main() -> anyhow::Result<()> {
    let logging = Logging::new();
    logging.early_init();

    let config = config::Config::from_env();
    info!(socket_path = %config.socket_path.display(), "server starting");

    let listener = transport::listen_seqpacket(&config.socket_path)?;
    loop {
        let client = transport::accept_client(&listener)?;
        info!("client connected");
        std::thread::spawn(move || {
            if let Err(err) = session::run_session(client) {
                error!(%err, "session ended with an error");
            }
        });
    }
}
