use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, info_span, warn};

use addrbook_common::config::Config;
use addrbook_common::network::{interface, mac};
use addrbook_core::api::{self, SharedRepository};
use addrbook_core::network::capture;
use addrbook_core::{IngestStats, MemoryStore, ingest};

use crate::terminal::{colors, print, spinner};

const KEY_WIDTH: usize = 9;

pub async fn listen(cfg: &Config) -> anyhow::Result<()> {
    if !is_root::is_root() {
        warn!("Not running as root, opening the capture will likely fail");
    }

    let intf = interface::find_capture_interface(cfg.capture.device.as_deref())?;
    print::aligned_line("Interface", KEY_WIDTH, intf.name.as_str());
    if let Some(hw_addr) = intf.mac {
        print::aligned_line(
            "MAC",
            KEY_WIDTH,
            mac::mac_to_string(hw_addr).color(colors::MAC_ADDR),
        );
    }
    print::aligned_line("API", KEY_WIDTH, format!("http://{}", cfg.listen_addr));

    let capture = capture::start_capture(&intf, &cfg.capture)?;
    let repository: SharedRepository = Arc::new(MemoryStore::new());
    let ingestion = ingest::spawn(capture.rx, Arc::clone(&repository));

    let listener: TcpListener = TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;

    let span = info_span!("listen", indicatif.pb_show = true);
    let spinner_handle = spinner::start_directory_spinner(span.clone(), Arc::clone(&repository));

    let start_time: Instant = Instant::now();
    axum::serve(listener, api::create_router(Arc::clone(&repository)))
        .with_graceful_shutdown(shutdown_signal(ingestion))
        .into_future()
        .instrument(span)
        .await
        .context("serving the query API")?;

    spinner_handle.abort();
    print_summary(repository.len(), start_time);
    Ok(())
}

/// Resolves on Ctrl-C, or as soon as the capture feed dries up.
async fn shutdown_signal(mut ingestion: JoinHandle<IngestStats>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Shutting down");
        }
        result = &mut ingestion => match result {
            Ok(stats) => warn!(
                "Capture ended after {} frames, {} conflicting observations",
                stats.frames, stats.conflicts
            ),
            Err(e) => error!("Ingestion task failed: {}", e),
        },
    }
}

fn print_summary(count: usize, start_time: Instant) {
    let addresses: ColoredString = format!("{count} addresses").bold().green();
    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Listening complete: {addresses} mapped in {elapsed}").color(colors::TEXT_DEFAULT);
    print::fat_separator();
    print::centerln(&output.to_string());
}
