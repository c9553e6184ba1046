//! Receipt printer
//!
//! Realizes formatted lines through [`Printer`] primitives. Every
//! document-level operation ends with a cut.

use super::format::{FormattedLine, LineStyle, format_document, format_part};
use receipt_printer::{PrintResult, Printer, RasterImage, TextStyle};

/// A printer handle plus the receipt-level operations built on it
///
/// Errors are not recovered: the first failing primitive aborts the
/// operation and lines already sent stay printed.
pub struct ReceiptPrinter<P> {
    printer: P,
}

impl<P: Printer> ReceiptPrinter<P> {
    pub fn new(printer: P) -> Self {
        Self { printer }
    }

    pub fn into_inner(self) -> P {
        self.printer
    }

    /// Print one line, optionally cutting afterwards
    pub fn print_line(&mut self, text: &str, cut: bool) -> PrintResult<()> {
        self.emit(&FormattedLine::new(LineStyle::Plain, text))?;
        self.cut_if(cut)
    }

    /// Print one bold line, optionally cutting afterwards
    pub fn print_bold(&mut self, text: &str, cut: bool) -> PrintResult<()> {
        self.emit(&FormattedLine::new(LineStyle::Bold, text))?;
        self.cut_if(cut)
    }

    /// Print one bold, underlined line, optionally cutting afterwards
    pub fn print_bold_underline(&mut self, text: &str, cut: bool) -> PrintResult<()> {
        self.emit(&FormattedLine::new(LineStyle::BoldUnderline, text))?;
        self.cut_if(cut)
    }

    /// Print `text` as a QR code, optionally cutting afterwards
    pub fn print_qr(&mut self, text: &str, cut: bool) -> PrintResult<()> {
        self.printer.qr(text)?;
        self.cut_if(cut)
    }

    /// Print a Markdown-lite document and cut
    pub fn print_document(&mut self, document: &str) -> PrintResult<()> {
        self.emit_all(&format_document(document))?;
        self.printer.cut()
    }

    /// Print a document in fixed-width mode and cut
    pub fn print_part(&mut self, document: &str) -> PrintResult<()> {
        self.emit_all(&format_part(document))?;
        self.printer.cut()
    }

    /// Print a raster image and cut
    pub fn print_image(&mut self, image: &RasterImage) -> PrintResult<()> {
        self.printer.image(image)?;
        self.printer.cut()
    }

    pub fn cut(&mut self) -> PrintResult<()> {
        self.printer.cut()
    }

    fn cut_if(&mut self, cut: bool) -> PrintResult<()> {
        if cut {
            self.printer.cut()?;
        }
        Ok(())
    }

    fn emit_all(&mut self, lines: &[FormattedLine]) -> PrintResult<()> {
        for line in lines {
            self.emit(line)?;
        }
        Ok(())
    }

    /// Send one line, wrapping styled lines in a style change
    ///
    /// Style is sticky on the device, so it is reset to normal right after
    /// the text.
    fn emit(&mut self, line: &FormattedLine) -> PrintResult<()> {
        let style = match line.style {
            LineStyle::Bold => Some(TextStyle::Bold),
            LineStyle::BoldUnderline => Some(TextStyle::BoldUnderline),
            _ => None,
        };

        match style {
            Some(style) => {
                self.printer.set_style(style)?;
                self.printer.text(&line.render())?;
                self.printer.set_style(TextStyle::Normal)
            }
            None => self.printer.text(&line.render()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_printer::PrintError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Text(String),
        Style(TextStyle),
        Qr(String),
        Image(u32),
        Cut,
    }

    /// Records calls; fails every call after `fail_after` successful ones
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_after: Option<usize>,
    }

    impl Recorder {
        fn record(&mut self, call: Call) -> PrintResult<()> {
            if self.fail_after.is_some_and(|n| self.calls.len() >= n) {
                return Err(PrintError::Offline("unplugged".into()));
            }
            self.calls.push(call);
            Ok(())
        }
    }

    impl Printer for Recorder {
        fn text(&mut self, text: &str) -> PrintResult<()> {
            self.record(Call::Text(text.to_string()))
        }

        fn set_style(&mut self, style: TextStyle) -> PrintResult<()> {
            self.record(Call::Style(style))
        }

        fn qr(&mut self, data: &str) -> PrintResult<()> {
            self.record(Call::Qr(data.to_string()))
        }

        fn image(&mut self, image: &RasterImage) -> PrintResult<()> {
            self.record(Call::Image(image.height))
        }

        fn cut(&mut self) -> PrintResult<()> {
            self.record(Call::Cut)
        }
    }

    fn text(s: &str) -> Call {
        Call::Text(s.to_string())
    }

    fn run(f: impl FnOnce(&mut ReceiptPrinter<Recorder>) -> PrintResult<()>) -> Vec<Call> {
        let mut receipt = ReceiptPrinter::new(Recorder::default());
        f(&mut receipt).unwrap();
        receipt.into_inner().calls
    }

    #[test]
    fn test_print_line_with_and_without_cut() {
        assert_eq!(run(|r| r.print_line("Hello", false)), vec![text("Hello\n")]);
        assert_eq!(
            run(|r| r.print_line("Hello", true)),
            vec![text("Hello\n"), Call::Cut]
        );
    }

    #[test]
    fn test_print_bold_restores_normal() {
        assert_eq!(
            run(|r| r.print_bold("Total", true)),
            vec![
                Call::Style(TextStyle::Bold),
                text("Total\n"),
                Call::Style(TextStyle::Normal),
                Call::Cut,
            ]
        );
        assert_eq!(
            run(|r| r.print_bold_underline("Shop", false)),
            vec![
                Call::Style(TextStyle::BoldUnderline),
                text("Shop\n"),
                Call::Style(TextStyle::Normal),
            ]
        );
    }

    #[test]
    fn test_print_qr() {
        assert_eq!(
            run(|r| r.print_qr("https://example.com", false)),
            vec![Call::Qr("https://example.com".into())]
        );
    }

    #[test]
    fn test_print_document_sequence() {
        let calls = run(|r| r.print_document("# Shop\n## Order 7\n\n---x\n*tea*\nthanks"));
        assert_eq!(
            calls,
            vec![
                Call::Style(TextStyle::BoldUnderline),
                text("Shop\n"),
                Call::Style(TextStyle::Normal),
                Call::Style(TextStyle::Bold),
                text("Order 7\n"),
                Call::Style(TextStyle::Normal),
                text(&" ".repeat(42)),
                text(&format!("{}\n", "-".repeat(42))),
                text("    -tea-\n"),
                text("thanks\n"),
                Call::Cut,
            ]
        );
    }

    #[test]
    fn test_print_part_duplicates_each_line() {
        let long = "0123456789".repeat(5);
        let calls = run(|r| r.print_part(&long));
        assert_eq!(
            calls,
            vec![text(&format!("{}\n", &long[..42])), text(&long), Call::Cut]
        );
    }

    #[test]
    fn test_print_image_cuts() {
        let image = RasterImage::new(1, 8, vec![0; 8]);
        assert_eq!(
            run(|r| r.print_image(&image)),
            vec![Call::Image(8), Call::Cut]
        );
    }

    #[test]
    fn test_failure_keeps_earlier_output() {
        let mut receipt = ReceiptPrinter::new(Recorder {
            fail_after: Some(2),
            ..Recorder::default()
        });
        let result = receipt.print_document("a\nb\nc");
        assert!(matches!(result, Err(PrintError::Offline(_))));
        // No cut once the device failed
        assert_eq!(receipt.into_inner().calls, vec![text("a\n"), text("b\n")]);
    }
}
