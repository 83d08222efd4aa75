use crate::domain::ports::Page;
use crate::domain::surface::{Severity, SurfaceId};
use crate::error::Result;
use std::io::Write;

/// Writes what the checkout surfaces currently show as plain text lines.
pub struct StatusWriter<W: Write> {
    writer: W,
}

impl<W: Write> StatusWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the amount label, if the modal is showing.
    pub fn write_confirmation(&mut self, page: &dyn Page, plan: &str) -> Result<()> {
        let modal_open = page
            .lookup(SurfaceId::ConfirmationModal)
            .is_some_and(|modal| modal.is_visible());
        if let Some(label) = page.lookup(SurfaceId::AmountLabel)
            && modal_open
        {
            writeln!(self.writer, "Confirm {} for plan {plan}", label.text())?;
        }
        Ok(())
    }

    /// Writes the status line, if it is visible.
    pub fn write_status(&mut self, page: &dyn Page) -> Result<()> {
        if let Some(status) = page.lookup(SurfaceId::StatusMessage)
            && status.is_visible()
        {
            let tag = match status.severity() {
                Some(Severity::Positive) => "ok",
                Some(Severity::Negative) => "error",
                None => "info",
            };
            writeln!(self.writer, "[{tag}] {}", status.text())?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
