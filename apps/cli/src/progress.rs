//! Terminal rendering of dataset download progress.

use dojo_datasets::{ProgressEvent, ProgressSink, Stage};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({eta})";

/// Byte progress bar during the transfer, then one line per later stage.
pub struct BarProgressSink {
    bar: ProgressBar,
}

impl BarProgressSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { name, total_bytes } => {
                if let Some(total) = total_bytes {
                    self.bar.set_length(total);
                }
                self.bar.set_message(name);
            }
            ProgressEvent::Transferred { bytes, .. } => self.bar.set_position(bytes),
            ProgressEvent::Stage { name, stage } => match stage {
                Stage::Downloading => {}
                Stage::Downloaded => self.bar.finish_with_message(format!("{name} downloaded")),
                other => self.bar.println(format!("  {name}: {other}")),
            },
            ProgressEvent::Finished { .. } => self.bar.finish_and_clear(),
        }
    }
}
