use crate::application::flow::{FlowEvent, Screen};
use crate::error::{Result, TopUpError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Op {
    Login,
    Logout,
    Country,
    Add,
    Remove,
    Url,
    Amount,
    Submit,
    Confirm,
    Recharge,
    Back,
    Copy,
    Txid,
    Paid,
    Done,
    Goto,
}

/// One row of a flow script: `op,arg,value`.
#[derive(Debug, Deserialize)]
struct EventRecord {
    op: Op,
    arg: Option<String>,
    value: Option<String>,
}

impl EventRecord {
    fn require_arg(self, what: &str) -> Result<String> {
        let op = self.op;
        self.arg
            .filter(|a| !a.is_empty())
            .ok_or_else(|| TopUpError::InvalidEvent(format!("{op:?} is missing {what}")))
    }

    fn row_and_value(self, what: &str) -> Result<(usize, String)> {
        let value = self
            .value
            .clone()
            .ok_or_else(|| TopUpError::InvalidEvent(format!("{:?} is missing {what}", self.op)))?;
        let row = parse_row(&self.require_arg("a row number")?)?;
        Ok((row, value))
    }
}

fn parse_row(raw: &str) -> Result<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|row| *row >= 1)
        .ok_or_else(|| TopUpError::InvalidEvent(format!("bad row number: {raw}")))
}

impl TryFrom<EventRecord> for FlowEvent {
    type Error = TopUpError;

    fn try_from(record: EventRecord) -> Result<Self> {
        match record.op {
            Op::Login => {
                let password = record.value.clone().unwrap_or_default();
                let email = record.require_arg("an email")?;
                Ok(FlowEvent::Login { email, password })
            }
            Op::Logout => Ok(FlowEvent::Logout),
            Op::Country => Ok(FlowEvent::SelectCountry(record.require_arg("a country")?)),
            Op::Add => Ok(FlowEvent::AddLink),
            Op::Remove => Ok(FlowEvent::RemoveLink {
                row: parse_row(&record.require_arg("a row number")?)?,
            }),
            Op::Url => {
                let (row, value) = record.row_and_value("a url")?;
                Ok(FlowEvent::SetUrl { row, value })
            }
            Op::Amount => {
                let (row, value) = record.row_and_value("an amount")?;
                Ok(FlowEvent::SetAmount { row, value })
            }
            Op::Submit => Ok(FlowEvent::Submit),
            Op::Confirm => Ok(FlowEvent::Confirm),
            Op::Recharge => Ok(FlowEvent::Recharge),
            Op::Back => Ok(FlowEvent::Back),
            Op::Copy => Ok(FlowEvent::CopyAddress),
            Op::Txid => Ok(FlowEvent::SubmitTxid(record.require_arg("a transaction id")?)),
            Op::Paid => Ok(FlowEvent::MarkPaid),
            Op::Done => Ok(FlowEvent::Done),
            Op::Goto => Ok(FlowEvent::Goto(record.require_arg("a screen")?.parse::<Screen>()?)),
        }
    }
}

/// Reads flow events from a CSV script.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// and yields one `Result<FlowEvent>` per row so a malformed row can be
/// reported without aborting the replay.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn events(self) -> impl Iterator<Item = Result<FlowEvent>> {
        self.reader
            .into_deserialize::<EventRecord>()
            .map(|result| result.map_err(TopUpError::from).and_then(FlowEvent::try_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str) -> Vec<Result<FlowEvent>> {
        EventReader::new(data.as_bytes()).events().collect()
    }

    #[test]
    fn test_reads_full_script() {
        let data = "\
op,arg,value
login,rev.topup@outlook.com,revtop.china
country,Germany,
url,1,https://a.example/profile
amount,1,100.00
submit,,
confirm,,
";
        let events: Vec<FlowEvent> = read(data).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            events[0],
            FlowEvent::Login {
                email: "rev.topup@outlook.com".to_string(),
                password: "revtop.china".to_string(),
            }
        );
        assert_eq!(events[1], FlowEvent::SelectCountry("Germany".to_string()));
        assert_eq!(
            events[2],
            FlowEvent::SetUrl {
                row: 1,
                value: "https://a.example/profile".to_string(),
            }
        );
        assert_eq!(
            events[3],
            FlowEvent::SetAmount {
                row: 1,
                value: "100.00".to_string(),
            }
        );
        assert_eq!(events[4], FlowEvent::Submit);
        assert_eq!(events[5], FlowEvent::Confirm);
    }

    #[test]
    fn test_goto_parses_screen_names() {
        let data = "op,arg,value\ngoto,processing,\ngoto,crypto-payment,\n";
        let events: Vec<FlowEvent> = read(data).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(events[0], FlowEvent::Goto(Screen::Processing));
        assert_eq!(events[1], FlowEvent::Goto(Screen::CryptoPayment));
    }

    #[test]
    fn test_unknown_op_is_a_row_error() {
        let results = read("op,arg,value\nexplode,,\nsubmit,,\n");
        assert!(results[0].is_err());
        assert_eq!(*results[1].as_ref().unwrap(), FlowEvent::Submit);
    }

    #[test]
    fn test_missing_argument_is_rejected() {
        let results = read("op,arg,value\nremove,,\n");
        assert!(matches!(results[0], Err(TopUpError::InvalidEvent(_))));

        let results = read("op,arg,value\nremove,zero,\n");
        assert!(matches!(results[0], Err(TopUpError::InvalidEvent(_))));
    }
}
