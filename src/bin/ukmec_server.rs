//! UKMEC eligibility gRPC server
//!
//! A standalone server binary for running the eligibility service over gRPC.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::signal;
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ukmec::transport::EligibilityGrpc;
use ukmec::{EligibilityService, ServiceConfig};

fn usage() {
    println!("ukmec-server - UKMEC eligibility gRPC server");
    println!();
    println!("USAGE:");
    println!("    ukmec-server [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -a, --addr <ADDR>         Address to listen on [env: UKMEC_ADDR] [default: 127.0.0.1:50061]");
    println!("    -t, --table <FILE>        Reference data file [env: UKMEC_TABLE] [default: embedded UKMEC 2016]");
    println!(
        "    -m, --max-conditions <N>  Condition entries per request \
         [env: UKMEC_MAX_REQUEST_CONDITIONS] [default: 2048]"
    );
    println!("    -h, --help                Print help information");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

fn parse_args() -> ServiceConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = ServiceConfig::from_env().unwrap_or_else(|e| fail(e));

    let mut i = 1;
    while i < args.len() {
        let value = || {
            args.get(i + 1)
                .unwrap_or_else(|| fail(format!("{} requires a value", args[i])))
        };
        match args[i].as_str() {
            "--addr" | "-a" => {
                config.set_addr(value()).unwrap_or_else(|e| fail(e));
                i += 2;
            }
            "--table" | "-t" => {
                config.table_path = Some(PathBuf::from(value()));
                i += 2;
            }
            "--max-conditions" | "-m" => {
                config.set_max_request_conditions(value()).unwrap_or_else(|e| fail(e));
                i += 2;
            }
            "--help" | "-h" => {
                usage();
                std::process::exit(0);
            }
            arg => fail(format!("unknown argument: {arg}")),
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting ukmec-server");

    let service = Arc::new(EligibilityService::from_config(&config)?);
    let revision = service.table().revision();
    info!(
        revision = %revision.name,
        fingerprint = %revision.fingerprint,
        conditions = service.table().len(),
        "Reference table ready"
    );

    let svc = EligibilityGrpc::new(Arc::clone(&service)).into_server();

    info!(addr = %config.addr, "Serving gRPC; press Ctrl+C to stop");
    Server::builder()
        .add_service(svc)
        .serve_with_shutdown(config.addr, async {
            let _ = signal::ctrl_c().await;
        })
        .await?;

    info!("Shut down");
    Ok(())
}
