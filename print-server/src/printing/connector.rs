//! Printer connectors
//!
//! A connector opens a fresh printer handle for each job. Handles are not
//! shared or locked, so concurrent jobs may interleave on the device.

use receipt_printer::{EscPosPrinter, PrintResult, Printer, UsbPrinter};

/// Printer handle as seen by the job runner
pub type PrinterHandle = Box<dyn Printer + Send>;

/// Opens printer handles
pub trait PrinterConnector: Send + Sync {
    /// Open a new handle to the device
    fn open(&self) -> PrintResult<PrinterHandle>;

    /// Whether the device currently looks reachable
    fn is_online(&self) -> bool;
}

/// USB printer identified by vendor and product id
#[derive(Debug, Clone, Copy)]
pub struct UsbConnector {
    vendor_id: u16,
    product_id: u16,
}

impl UsbConnector {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl PrinterConnector for UsbConnector {
    fn open(&self) -> PrintResult<PrinterHandle> {
        let device = UsbPrinter::open(self.vendor_id, self.product_id)?;
        Ok(Box::new(EscPosPrinter::open(device)?))
    }

    fn is_online(&self) -> bool {
        UsbPrinter::is_online(self.vendor_id, self.product_id)
    }
}
