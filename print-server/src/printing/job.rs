//! Print jobs
//!
//! A [`PrintJob`] lives for one request: it is built by a handler after
//! the request passed authorization and validation, then run to completion
//! on a blocking thread.

use super::connector::PrinterConnector;
use super::receipt::ReceiptPrinter;
use receipt_printer::{PrintResult, RasterImage};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Maximum raster width in dots
pub const MAX_IMAGE_WIDTH: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintJob {
    /// One plain line
    PlainText { text: String, cut: bool },
    /// Markdown-lite document, always cut
    MarkdownDocument { document: String },
    /// Fixed-width document, always cut
    FixedWidthPart { document: String },
    /// QR code
    Qr { text: String, cut: bool },
    /// Paper cut only
    Cut,
    /// Image asset followed by a cut
    Image { path: PathBuf },
}

impl PrintJob {
    pub fn kind(&self) -> &'static str {
        match self {
            PrintJob::PlainText { .. } => "plain_text",
            PrintJob::MarkdownDocument { .. } => "markdown_document",
            PrintJob::FixedWidthPart { .. } => "fixed_width_part",
            PrintJob::Qr { .. } => "qr",
            PrintJob::Cut => "cut",
            PrintJob::Image { .. } => "image",
        }
    }

    /// Open a printer through `connector` and run the job
    ///
    /// Image assets are loaded before the printer is opened, so a missing
    /// asset never reaches the device.
    #[instrument(skip_all, fields(kind = self.kind()))]
    pub fn execute(&self, connector: &dyn PrinterConnector) -> PrintResult<()> {
        let image = match self {
            PrintJob::Image { path } => Some(RasterImage::open(path, MAX_IMAGE_WIDTH)?),
            _ => None,
        };

        let mut receipt = ReceiptPrinter::new(connector.open()?);

        match self {
            PrintJob::PlainText { text, cut } => receipt.print_line(text, *cut)?,
            PrintJob::MarkdownDocument { document } => receipt.print_document(document)?,
            PrintJob::FixedWidthPart { document } => receipt.print_part(document)?,
            PrintJob::Qr { text, cut } => receipt.print_qr(text, *cut)?,
            PrintJob::Cut => receipt.cut()?,
            PrintJob::Image { .. } => {
                if let Some(image) = &image {
                    receipt.print_image(image)?;
                }
            }
        }

        info!("Print job done");
        Ok(())
    }
}
