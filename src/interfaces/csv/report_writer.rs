use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Final state of a replayed flow, one row per run.
#[derive(Debug, Serialize, PartialEq)]
pub struct FlowReport {
    pub screen: String,
    pub email: Option<String>,
    pub balance: Decimal,
    pub order_total: Option<Decimal>,
    pub order_country: Option<String>,
}

/// Writes the flow report as CSV with a header row.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_report(&mut self, report: &FlowReport) -> Result<()> {
        self.writer.serialize(report)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_csv_shape() {
        let report = FlowReport {
            screen: "topup".to_string(),
            email: Some("rev.topup@outlook.com".to_string()),
            balance: dec!(53.00),
            order_total: None,
            order_country: None,
        };

        let mut out = Vec::new();
        ReportWriter::new(&mut out).write_report(&report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "screen,email,balance,order_total,order_country\ntopup,rev.topup@outlook.com,53.00,,\n"
        );
    }

    #[test]
    fn test_report_with_pending_order() {
        let report = FlowReport {
            screen: "payment".to_string(),
            email: Some("rev.topup@outlook.com".to_string()),
            balance: dec!(153),
            order_total: Some(dec!(600.00)),
            order_country: Some("Germany".to_string()),
        };

        let mut out = Vec::new();
        ReportWriter::new(&mut out).write_report(&report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("payment,rev.topup@outlook.com,153,600.00,Germany"));
    }
}
