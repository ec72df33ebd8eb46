use std::sync::Arc;
use std::time::Duration;

use colored::*;
use indicatif::ProgressStyle;
use tokio::task::JoinHandle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use addrbook_common::AddressRepository;

use crate::terminal::colors;

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

pub fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

fn directory_message(count: usize) -> String {
    format!(
        "Mapped {} so far...",
        format!("{} addresses", count).green().bold()
    )
    .color(colors::TEXT_DEFAULT)
    .to_string()
}

/// Keeps the spinner attached to `span` showing the live directory size.
pub fn start_directory_spinner(
    span: Span,
    repository: Arc<dyn AddressRepository>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
        loop {
            ticker.tick().await;
            span.pb_set_message(&directory_message(repository.len()));
        }
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
