//! Receipt printing - layout, jobs and printer access

pub mod connector;
pub mod format;
pub mod job;
pub mod receipt;

pub use connector::{PrinterConnector, PrinterHandle, UsbConnector};
pub use format::{FormattedLine, LINE_WIDTH, LineStyle, format_document, format_part};
pub use job::PrintJob;
pub use receipt::ReceiptPrinter;
