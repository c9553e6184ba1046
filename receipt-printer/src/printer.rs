//! Printer capability and device adapters
//!
//! - [`Printer`]: primitive drawing commands (text, style, QR, image, cut)
//! - [`Transport`]: raw byte sink behind a printer
//! - [`EscPosPrinter`]: encodes primitives as ESC/POS for a transport
//! - [`UsbPrinter`]: Linux USB printer class device (`/dev/usb/lpN`)

use crate::error::{PrintError, PrintResult};
use crate::escpos::{EscPosBuilder, RasterImage, TextStyle};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// sysfs class directory listing USB printer class devices
pub const SYSFS_USBMISC: &str = "/sys/class/usbmisc";

/// Directory holding the USB printer device nodes
pub const DEV_USB: &str = "/dev/usb";

/// Primitive drawing commands of a receipt printer
///
/// Every call is sent to the device immediately, so output written before
/// a failing call stays on paper.
pub trait Printer {
    /// Write text as-is; the caller supplies any line terminator
    fn text(&mut self, text: &str) -> PrintResult<()>;

    /// Replace the current character style
    fn set_style(&mut self, style: TextStyle) -> PrintResult<()>;

    /// Print `data` as a QR code
    fn qr(&mut self, data: &str) -> PrintResult<()>;

    /// Print a raster image
    fn image(&mut self, image: &RasterImage) -> PrintResult<()>;

    /// Feed and cut the paper
    fn cut(&mut self) -> PrintResult<()>;
}

impl<P: Printer + ?Sized> Printer for Box<P> {
    fn text(&mut self, text: &str) -> PrintResult<()> {
        (**self).text(text)
    }

    fn set_style(&mut self, style: TextStyle) -> PrintResult<()> {
        (**self).set_style(style)
    }

    fn qr(&mut self, data: &str) -> PrintResult<()> {
        (**self).qr(data)
    }

    fn image(&mut self, image: &RasterImage) -> PrintResult<()> {
        (**self).image(image)
    }

    fn cut(&mut self) -> PrintResult<()> {
        (**self).cut()
    }
}

/// Raw byte sink for ESC/POS data
pub trait Transport {
    fn send(&mut self, data: &[u8]) -> PrintResult<()>;
}

/// ESC/POS printer over any transport
///
/// Each primitive is encoded and sent as its own write.
#[derive(Debug)]
pub struct EscPosPrinter<T> {
    transport: T,
}

impl<T: Transport> EscPosPrinter<T> {
    /// Wrap a transport, resetting the printer and selecting the code page
    pub fn open(mut transport: T) -> PrintResult<Self> {
        let mut b = EscPosBuilder::new();
        b.initialize();
        transport.send(&b.build())?;
        Ok(Self { transport })
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn send(&mut self, b: EscPosBuilder) -> PrintResult<()> {
        self.transport.send(&b.build())
    }
}

impl<T: Transport> Printer for EscPosPrinter<T> {
    fn text(&mut self, text: &str) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.text(text);
        self.send(b)
    }

    fn set_style(&mut self, style: TextStyle) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.style(style);
        self.send(b)
    }

    fn qr(&mut self, data: &str) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.qr(data);
        self.send(b)
    }

    fn image(&mut self, image: &RasterImage) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.raster(image);
        self.send(b)
    }

    fn cut(&mut self) -> PrintResult<()> {
        let mut b = EscPosBuilder::new();
        b.cut();
        self.send(b)
    }
}

/// USB printer class device
///
/// The kernel `usblp` driver exposes each attached printer as
/// `/dev/usb/lpN`. The matching node is found through sysfs by USB
/// vendor and product id.
#[derive(Debug)]
pub struct UsbPrinter {
    path: PathBuf,
    file: File,
}

impl UsbPrinter {
    /// Open the printer with the given USB identifiers
    #[instrument(skip_all, fields(device = %format!("{:04x}:{:04x}", vendor_id, product_id)))]
    pub fn open(vendor_id: u16, product_id: u16) -> PrintResult<Self> {
        let path = Self::find_device(
            Path::new(SYSFS_USBMISC),
            Path::new(DEV_USB),
            vendor_id,
            product_id,
        )?;
        Self::open_path(&path)
    }

    /// Open a device node directly
    pub fn open_path(path: &Path) -> PrintResult<Self> {
        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Open {} failed: {}", path.display(), e),
            ))
        })?;

        info!(path = %path.display(), "Printer opened");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Locate the device node for a vendor/product pair
    ///
    /// `sysfs` is the usbmisc class directory and `dev` the directory of
    /// device nodes; both are parameters so the lookup can run against a
    /// fixture tree.
    pub fn find_device(
        sysfs: &Path,
        dev: &Path,
        vendor_id: u16,
        product_id: u16,
    ) -> PrintResult<PathBuf> {
        let wanted = format!("{:04x}:{:04x}", vendor_id, product_id);

        let entries = match std::fs::read_dir(sysfs) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, sysfs = %sysfs.display(), "USB printer class unavailable");
                return Err(PrintError::NotFound(wanted));
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with("lp") {
                continue;
            }

            match read_usb_ids(&entry.path()) {
                Some((vendor, product)) if vendor == vendor_id && product == product_id => {
                    let node = dev.join(name);
                    debug!(node = %node.display(), "Matched USB printer");
                    return Ok(node);
                }
                Some(_) => continue,
                None => debug!(entry = name, "No USB ids for class device"),
            }
        }

        Err(PrintError::NotFound(wanted))
    }

    /// Check whether a printer with the given identifiers is attached
    pub fn is_online(vendor_id: u16, product_id: u16) -> bool {
        match Self::find_device(
            Path::new(SYSFS_USBMISC),
            Path::new(DEV_USB),
            vendor_id,
            product_id,
        ) {
            Ok(node) => node.exists(),
            Err(_) => false,
        }
    }
}

impl Transport for UsbPrinter {
    #[instrument(skip(self, data), fields(path = %self.path.display(), data_len = data.len()))]
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        self.file.write_all(data).map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;
        self.file.flush()?;
        Ok(())
    }
}

/// Read `idVendor`/`idProduct` of the USB device owning a class entry
///
/// `<entry>/device` is the USB interface; the ids live on its parent.
fn read_usb_ids(entry: &Path) -> Option<(u16, u16)> {
    let interface = std::fs::canonicalize(entry.join("device")).ok()?;
    let usb_device = interface.parent()?;
    let vendor = read_hex_id(&usb_device.join("idVendor"))?;
    let product = read_hex_id(&usb_device.join("idProduct"))?;
    Some((vendor, product))
}

fn read_hex_id(path: &Path) -> Option<u16> {
    let raw = std::fs::read_to_string(path).ok()?;
    u16::from_str_radix(raw.trim(), 16).ok()
}
