use anyhow::Result;
use idps_dashboard::chart::{ChartReconciler, TextChart};
use idps_dashboard::client::HttpBackend;
use idps_dashboard::commands::CommandDispatcher;
use idps_dashboard::config::AppConfig;
use idps_dashboard::dashboard::Dashboard;
use idps_dashboard::poller::{Poller, PollerConfig};
use idps_dashboard::table::{RandomConfidence, TableRenderer};
use idps_dashboard::version::{NAME, VERSION};
use idps_dashboard::view::{ConsolePrompt, ConsoleView};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

const HELP: &str = "commands: start | reset | refresh | quit";

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = AppConfig::load()?;
    tracing::info!(
        backend = %app_config.backend.base_url,
        interval_ms = app_config.polling.interval_ms,
        "{} {} starting",
        NAME,
        VERSION
    );

    let backend = Arc::new(HttpBackend::new(&app_config.backend.base_url)?);
    let dashboard = Dashboard::new(
        ConsoleView::stdout(),
        ChartReconciler::new(Box::new(TextChart::stdout())),
        TableRenderer::new(Box::new(RandomConfidence::new(
            app_config.display.confidence_min,
            app_config.display.confidence_max,
        ))),
    );
    let poller = Poller::new(backend.clone(), dashboard);
    let handle = poller.spawn(PollerConfig {
        interval_ms: app_config.polling.interval_ms,
    });
    let commands = CommandDispatcher::new(backend, poller.clone());

    let lines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let prompt = ConsolePrompt::new(lines.clone());
    println!("{}", HELP);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        let line = tokio::select! {
            line = async { lines.lock().await.next_line().await } => line,
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal");
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                // stdin closed (detached run): keep polling until signalled
                (&mut shutdown).await;
                tracing::info!("Received shutdown signal");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, operation = "read_command", "stdin read failed");
                break;
            }
        };
        match line.trim() {
            "" => {}
            "start" => {
                let _ = commands.start_capture(&prompt).await;
            }
            "reset" => {
                let _ = commands.reset_statistics(&prompt).await;
            }
            "refresh" => {
                poller.poll_once().await;
            }
            "quit" | "exit" => break,
            other => println!("unknown command '{}'; {}", other, HELP),
        }
    }

    handle.stop().await;
    Ok(())
}
