//! # Receipt Renderer
//!
//! Deterministic plain-text rendering of a receipt for print and display.
//!
//! Finalize, reprint, and the public receipt view all render through this
//! one function, so a reprint months later is byte-identical to the paper
//! the customer received. That only holds if everything here stays
//! locale-free: fixed UTC timestamp format, fixed `€0.00` money format,
//! fixed column widths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, TaxRate};
use crate::types::{Order, OrderItem, PaymentMethod};

/// Column width of the rendered receipt (80mm thermal paper).
pub const RECEIPT_WIDTH: usize = 42;

/// One printable item line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub quantity: i64,
    pub name: String,
    pub line_total_cents: i64,
}

/// Everything the renderer needs, already snapshot-shaped. Building one of
/// these from a persisted order and rendering it is the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDocument {
    pub bar_name: String,
    pub receipt_number: String,
    pub created_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub cashier_label: Option<String>,
    /// Current status at render time; reprints of voided orders carry the
    /// marker, the original print did not.
    pub voided: bool,
    pub lines: Vec<ReceiptLine>,
    pub gross_cents: i64,
    pub tax_cents: i64,
    pub net_cents: i64,
    pub tax_rate_bps: u32,
}

impl ReceiptDocument {
    /// Builds the render input from a persisted order and its items.
    pub fn from_order(order: &Order, items: &[OrderItem], bar_name: &str) -> Self {
        ReceiptDocument {
            bar_name: bar_name.to_string(),
            receipt_number: order.receipt_number.clone(),
            created_at: order.created_at,
            payment_method: order.payment_method,
            cashier_label: order.cashier_label(),
            voided: order.is_voided(),
            lines: items
                .iter()
                .map(|item| ReceiptLine {
                    quantity: item.quantity,
                    name: item.name_snapshot.clone(),
                    line_total_cents: item.line_total_cents,
                })
                .collect(),
            gross_cents: order.gross_cents,
            tax_cents: order.tax_cents,
            net_cents: order.net_cents,
            tax_rate_bps: order.tax_rate_bps,
        }
    }

    /// Renders the fixed-layout receipt text.
    ///
    /// Layout: header (bar name, receipt number, timestamp, optional
    /// cashier, payment method), one `qty x name   price` line per item,
    /// footer with gross, tax labeled by the applicable rate, and net.
    pub fn render(&self) -> String {
        let heavy = "=".repeat(RECEIPT_WIDTH);
        let light = "-".repeat(RECEIPT_WIDTH);

        let mut out: Vec<String> = Vec::new();

        out.push(heavy.clone());
        out.push(format!("{:^width$}", self.bar_name, width = RECEIPT_WIDTH));
        out.push(heavy.clone());

        out.push(format!("{:<10}{}", "Receipt", self.receipt_number));
        out.push(format!(
            "{:<10}{}",
            "Date",
            self.created_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(cashier) = &self.cashier_label {
            out.push(format!("{:<10}{}", "Cashier", cashier));
        }
        out.push(format!("{:<10}{}", "Payment", self.payment_method.as_str()));

        if self.voided {
            out.push(format!("{:^width$}", "*** VOIDED ***", width = RECEIPT_WIDTH));
        }

        out.push(light.clone());
        for line in &self.lines {
            // Names longer than the column are cut, never wrapped
            let name: String = line.name.chars().take(26).collect();
            out.push(format!(
                "{:>3} x {:<26}{:>10}",
                line.quantity,
                name,
                Money::from_cents(line.line_total_cents).to_string()
            ));
        }
        out.push(light);

        let vat_label = format!(
            "incl. {} VAT",
            TaxRate::from_bps(self.tax_rate_bps).percent_label()
        );
        out.push(footer_line("TOTAL", self.gross_cents));
        out.push(footer_line(&vat_label, self.tax_cents));
        out.push(footer_line("net", self.net_cents));
        out.push(heavy);

        let mut text = out
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');
        text
    }
}

fn footer_line(label: &str, cents: i64) -> String {
    format!("{:<26}{:>16}", label, Money::from_cents(cents).to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_document() -> ReceiptDocument {
        ReceiptDocument {
            bar_name: "Riverside Bar".to_string(),
            receipt_number: "SEEFES-00042".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 6, 18, 45, 0).unwrap(),
            payment_method: PaymentMethod::Cash,
            cashier_label: Some("staff:Alice".to_string()),
            voided: false,
            lines: vec![
                ReceiptLine {
                    quantity: 2,
                    name: "Beer 0.5l".to_string(),
                    line_total_cents: 500,
                },
                ReceiptLine {
                    quantity: 1,
                    name: "Bratwurst".to_string(),
                    line_total_cents: 300,
                },
            ],
            gross_cents: 800,
            tax_cents: 133,
            net_cents: 667,
            tax_rate_bps: 2000,
        }
    }

    /// Reprint fidelity: the same document always renders byte-identically.
    #[test]
    fn test_render_is_deterministic() {
        let doc = sample_document();
        assert_eq!(doc.render(), doc.render());

        let clone = doc.clone();
        assert_eq!(doc.render(), clone.render());
    }

    #[test]
    fn test_render_layout() {
        let text = sample_document().render();

        assert!(text.contains("Riverside Bar"));
        assert!(text.contains("Receipt   SEEFES-00042"));
        assert!(text.contains("Date      2026-08-06 18:45"));
        assert!(text.contains("Cashier   staff:Alice"));
        assert!(text.contains("Payment   cash"));
        assert!(text.contains("  2 x Beer 0.5l"));
        assert!(text.contains("  1 x Bratwurst"));
        assert!(text.contains("incl. 20.00% VAT"));
        assert!(text.contains("€8.00"));
        assert!(text.contains("€1.33"));
        assert!(text.contains("€6.67"));
        assert!(!text.contains("VOIDED"));

        for line in text.lines() {
            assert!(
                line.chars().count() <= RECEIPT_WIDTH,
                "line exceeds width: {:?}",
                line
            );
        }
    }

    #[test]
    fn test_voided_marker() {
        let mut doc = sample_document();
        doc.voided = true;

        let text = doc.render();
        assert!(text.contains("*** VOIDED ***"));

        // Item lines and totals are unchanged by the marker
        let original = sample_document().render();
        for needle in ["  2 x Beer 0.5l", "€8.00", "€1.33", "€6.67"] {
            assert!(text.contains(needle));
            assert!(original.contains(needle));
        }
    }

    #[test]
    fn test_anonymous_receipt_omits_cashier_line() {
        let mut doc = sample_document();
        doc.cashier_label = None;

        let text = doc.render();
        assert!(!text.contains("Cashier"));
    }

    #[test]
    fn test_long_names_are_cut_not_wrapped() {
        let mut doc = sample_document();
        doc.lines[0].name = "An unreasonably verbose craft beer name".to_string();

        let text = doc.render();
        for line in text.lines() {
            assert!(line.chars().count() <= RECEIPT_WIDTH);
        }
    }
}
