// src/main.rs

use filesettle::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("filesettle error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = config::resolve(&args)?;
    logging::init_logging(cfg.log.level, cfg.log.file.as_deref())?;
    run(cfg, args.dry_run).await
}
