use std::process;

use clap::Parser;

use liso::config::{Cli, ServerConfig};
use liso::error::{EXIT_CONFIG, SetupError};
use liso::server::Server;

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = match ServerConfig::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("liso: {:#}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();

    let result = match runtime {
        Ok(rt) => rt.block_on(serve(cfg)),
        Err(e) => Err(SetupError::Reactor(e)),
    };

    if let Err(e) = result {
        eprintln!("liso: {}", e);
        process::exit(e.exit_code());
    }
}

async fn serve(cfg: ServerConfig) -> Result<(), SetupError> {
    let server = Server::bind(&cfg).await?;
    tracing::info!(
        root = %cfg.document_root.display(),
        log = %cfg.log_path.display(),
        "Serving static files"
    );

    tokio::select! {
        _ = server.run() => {}

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
