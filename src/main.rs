use clap::Parser;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use wirenode::config::file::FileConfig;
use wirenode::utils::{logger, validation::Validate};
use wirenode::{
    CliConfig, Engine, Outcome, Reply, Request, ResolvedSettings, SysfsBus, TracingEvents,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting wirenode");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }

    let file = match &config.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(f) => Some(f),
            Err(e) => {
                tracing::error!("Cannot load config file {path}: {e}");
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let bus_root = file
        .as_ref()
        .and_then(|f| f.engine.bus_root.clone())
        .unwrap_or_else(|| config.bus_root.clone());
    let bus = SysfsBus::new(bus_root);

    if let Some(raw) = &config.request {
        // One-shot mode: a single request on the command line.
        let request: Request = serde_json::from_str(raw)?;
        let reply = process(&bus, &config, file.as_ref(), request).await;
        let code = emit(&reply)?;
        if code > 0 {
            std::process::exit(code);
        }
    } else {
        // Flow mode: newline-delimited JSON requests on stdin, output
        // messages on stdout, logs on stderr.
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Request>(line) {
                Ok(request) => {
                    let reply = process(&bus, &config, file.as_ref(), request).await;
                    emit(&reply)?;
                }
                Err(e) => tracing::warn!("Skipping unparseable request: {e}"),
            }
        }
    }

    Ok(())
}

async fn process(
    bus: &SysfsBus,
    cli: &CliConfig,
    file: Option<&FileConfig>,
    mut request: Request,
) -> Reply {
    let device = file.and_then(|f| {
        request
            .topic
            .as_deref()
            .and_then(|topic| f.device_for(topic))
    });
    if request.label.is_none() {
        request.label = device.and_then(|d| d.label.clone());
    }

    let settings = ResolvedSettings {
        identifier: cli
            .identifier
            .clone()
            .or_else(|| device.map(|d| d.identifier.clone())),
        delay: file
            .and_then(|f| f.engine.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(cli.delay_ms)),
        celsius: cli.celsius
            || file.and_then(|f| f.engine.celsius).unwrap_or(false)
            || device.and_then(|d| d.celsius).unwrap_or(false),
    };

    Engine::new(bus.clone(), settings, TracingEvents)
        .run(request)
        .await
}

/// Print the outcome message, if any, and map the result to an exit code.
fn emit(reply: &Reply) -> anyhow::Result<i32> {
    match &reply.outcome {
        Outcome::Success(message) | Outcome::Unsupported(message) => {
            println!("{}", serde_json::to_string(message)?);
            Ok(0)
        }
        Outcome::Exhausted(e) => {
            tracing::error!("Request failed: {e}");
            Ok(2)
        }
    }
}
