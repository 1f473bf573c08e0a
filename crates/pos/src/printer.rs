//! Print handoff: renders a [`Receipt`] for the print collaborator.

use std::fmt::Write as _;
use std::io::{self, Write};

use pizzeria_billing::Receipt;

/// Characters per line on the default till roll.
pub const DEFAULT_WIDTH: usize = 40;

const SHOP_NAME: &str = "PIZZERIA";

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("printer output failed: {0}")]
    Io(#[from] io::Error),
}

/// Something that accepts a render-ready receipt.
pub trait ReceiptPrinter {
    fn print(&mut self, receipt: &Receipt) -> Result<(), PrintError>;
}

/// Lays a receipt out as plain text on any writer (terminal, file, spool).
#[derive(Debug)]
pub struct TextReceiptPrinter<W> {
    out: W,
    width: usize,
}

impl<W: Write> TextReceiptPrinter<W> {
    pub fn new(out: W) -> Self {
        Self::with_width(out, DEFAULT_WIDTH)
    }

    pub fn with_width(out: W, width: usize) -> Self {
        Self { out, width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReceiptPrinter for TextReceiptPrinter<W> {
    fn print(&mut self, receipt: &Receipt) -> Result<(), PrintError> {
        let text = render_text(receipt, self.width);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        tracing::info!(invoice = %receipt.invoice_number.short(), "receipt printed");
        Ok(())
    }
}

/// Render `receipt` as fixed-width text.
pub fn render_text(receipt: &Receipt, width: usize) -> String {
    let rule = "-".repeat(width);
    let mut out = String::new();

    let _ = writeln!(out, "{:^width$}", SHOP_NAME);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Invoice: {}", receipt.invoice_number.short());
    let _ = writeln!(
        out,
        "Date: {}",
        receipt.printed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(name) = &receipt.customer.name {
        let _ = writeln!(out, "Customer: {name}");
    }
    if let Some(telephone) = &receipt.customer.telephone {
        let _ = writeln!(out, "Tel: {telephone}");
    }
    let _ = writeln!(out, "{rule}");

    for line in &receipt.lines {
        let _ = writeln!(out, "{}", line.label);
        let qty = format!("  {} x {}", line.quantity, line.unit_price);
        let _ = writeln!(out, "{}", columns(&qty, &line.line_total.to_string(), width));
    }

    let _ = writeln!(out, "{rule}");
    let tax_label = format!("Tax ({})", receipt.tax_rate_label);
    let totals = [
        ("Subtotal", receipt.subtotal),
        (tax_label.as_str(), receipt.tax),
        ("Total", receipt.total),
        ("Paid", receipt.amount_paid),
        ("Balance", receipt.balance),
    ];
    for (label, amount) in totals {
        let _ = writeln!(out, "{}", columns(label, &amount.to_string(), width));
    }

    if let Some(footer) = &receipt.footer {
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{footer:^width$}");
    }
    out
}

/// `left` and `right` justified to the edges, separated by at least one space.
fn columns(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = width.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}
