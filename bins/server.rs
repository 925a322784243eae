use clap::Parser;
use configs::{AppConfig, LogFormat};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "server", about = "User account RPC service")]
struct Args {
    /// Human-readable logs instead of JSON
    #[arg(long)]
    dev: bool,
}

fn init_logging(cfg: &AppConfig, dev: bool) {
    if dev || cfg.log.format == LogFormat::Compact {
        common::utils::logging::init_logging_default(&cfg.log.level);
    } else {
        common::utils::logging::init_logging_json(&cfg.log.level);
    }
    info!(service = "server", event = "logger_init", dev, "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("failed to load configuration: {e:#}");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(&cfg, args.dev);

    // 基础服务上下文（不含敏感信息）
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "server service starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "server", event = "run_failed", error = %format!("{e:#}"), "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
