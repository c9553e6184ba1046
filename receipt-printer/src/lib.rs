//! # receipt-printer
//!
//! ESC/POS receipt printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - WPC1252 encoding for Western printers
//! - USB printing through the Linux `usblp` driver
//! - Image processing for raster printing
//!
//! Business logic (WHAT to print) stays in application code:
//! - Markdown-lite and fixed-width receipt layout → print-server
//!
//! ## Example
//!
//! ```ignore
//! use receipt_printer::{EscPosPrinter, Printer, TextStyle, UsbPrinter};
//!
//! let mut printer = EscPosPrinter::open(UsbPrinter::open(0x04b8, 0x0202)?)?;
//! printer.set_style(TextStyle::Bold)?;
//! printer.text("Receipt\n")?;
//! printer.set_style(TextStyle::Normal)?;
//! printer.cut()?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{encode_cp1252, pad_width, text_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{EscPosBuilder, RasterImage, TextStyle};
pub use printer::{DEV_USB, EscPosPrinter, Printer, SYSFS_USBMISC, Transport, UsbPrinter};
