use std::io::{self, Write};
use std::path::PathBuf;

use kanal::AsyncReceiver;
use snaplabel_config::ui::UiConfig;
use snaplabel_types::{AppEvent, UiEvent};

const RULE: &str = "----------------------------------------";

/// Text and preview surface on a terminal.
///
/// Every text update replaces the previous one; the surface keeps no history.
pub struct TerminalSurface<W: Write> {
    out: W,
    show_preview: bool,
    preview_path: Option<PathBuf>,
    text: Option<String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, config: &UiConfig) -> Self {
        Self {
            out,
            show_preview: config.show_preview,
            preview_path: config.preview_path.clone(),
            text: None,
        }
    }

    /// Currently displayed text
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Apply one event. Returns false once the surface is closed.
    pub fn handle(&mut self, event: AppEvent) -> io::Result<bool> {
        match event {
            AppEvent::ShowText(text) => {
                writeln!(self.out, "{}\n{}", RULE, text)?;
                self.text = Some(text);
            }
            AppEvent::ShowImage(image) => {
                if self.show_preview {
                    writeln!(self.out, "[preview] {}", snaplabel_capture::describe(&image))?;
                }
                if let Some(path) = &self.preview_path {
                    match snaplabel_capture::save_preview(&image, path) {
                        Ok(()) => tracing::debug!("Preview written to {}", path.display()),
                        Err(e) => tracing::error!("Preview not saved: {:#}", e),
                    }
                }
            }
            AppEvent::PermissionPrompt { capability, .. } => {
                writeln!(self.out, "Allow snaplabel to use the {}? [y/n]", capability)?;
            }
            AppEvent::BackendReady => {
                writeln!(self.out, "Ready. Press Enter to capture, q to quit.")?;
            }
            AppEvent::UiEvent(UiEvent::Close) => {
                self.out.flush()?;
                return Ok(false);
            }
            _ => {}
        }

        self.out.flush()?;
        Ok(true)
    }
}

pub async fn ui_loop(app_to_ui_rx: AsyncReceiver<AppEvent>, config: UiConfig) -> anyhow::Result<()> {
    let mut surface = TerminalSurface::new(io::stdout(), &config);

    while let Ok(event) = app_to_ui_rx.recv().await {
        if !surface.handle(event)? {
            break;
        }
    }

    tracing::debug!("UI loop stopped");
    Ok(())
}
