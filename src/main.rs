use std::path::PathBuf;

use anyhow::Context;
use memq::{error::ErrorExt, init_logging, Broker, MemoryBroker, Options, Settings};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Читает строки из stdin и публикует их в брокер. Строка вида
/// `topic: text` публикуется с темой, остальные без темы. Один подписчик
/// получает всё, второй только тему `alerts`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_from(&path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load().context("failed to load settings")?,
    };
    let logging = init_logging(settings.logging_config())?;

    let cancel = CancellationToken::new();
    let broker = MemoryBroker::<String>::with_config(cancel.clone(), settings.broker_config());

    let (all_tx, mut all_rx) = mpsc::channel::<String>(settings.capacity.max(1));
    let (alerts_tx, mut alerts_rx) = mpsc::channel::<String>(settings.capacity.max(1));
    broker.subscribe(all_tx, Options::new()).await?;
    broker
        .subscribe(alerts_tx, Options::new().topic("alerts"))
        .await?;

    let printer = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(msg) = all_rx.recv() => println!("[all] {msg}"),
                Some(msg) = alerts_rx.recv() => println!("[alerts] {msg}"),
                else => break,
            }
        }
    });

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received");
                cancel.cancel();
            }
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };

        let (options, text) = match line.split_once(':') {
            Some((topic, text)) => (Options::new().topic(topic.trim()), text.trim().to_string()),
            None => (Options::new(), line),
        };
        if let Err(e) = broker.publish(text, options).await {
            warn!(
                error = %e.client_message(),
                code = %e.status_code(),
                tags = ?e.metrics_tags(),
                "publish rejected"
            );
            break;
        }
    }

    broker.close()?;
    broker.wait_terminated().await;
    drop(broker);
    let _ = printer.await;

    logging.shutdown();
    Ok(())
}
