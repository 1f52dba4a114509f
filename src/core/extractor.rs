//! Line-oriented extraction of QSOs from ADIF-style tagged text.
//!
//! Every field is located independently with the tag grammar
//! `<NAME:length>value<`, so field order inside a line does not matter.
//! Lines without a `CALL` tag are headers or noise and are skipped.

use crate::domain::model::{Contact, QslStatus};
use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::collections::BTreeMap;

pub const TO_CALL_TAG: &str = "CALL";
pub const DEFAULT_MANAGER_TAG: &str = "QSL_VIA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKey {
    FromCall,
    ToCall,
    ViaCall,
    Date,
    Time,
    Band,
    Mode,
    Rst,
    QslCode,
    Freq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub tag: String,
    pub key: FieldKey,
    pub required: bool,
}

impl FieldSpec {
    fn required(tag: &str, key: FieldKey) -> Self {
        Self {
            tag: tag.to_string(),
            key,
            required: true,
        }
    }

    fn optional(tag: &str, key: FieldKey) -> Self {
        Self {
            tag: tag.to_string(),
            key,
            required: false,
        }
    }
}

/// The fields read from every QSO line.
pub fn field_table(manager_tag: &str) -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("STATION_CALLSIGN", FieldKey::FromCall),
        FieldSpec::required(TO_CALL_TAG, FieldKey::ToCall),
        FieldSpec::optional(manager_tag, FieldKey::ViaCall),
        FieldSpec::required("QSO_DATE", FieldKey::Date),
        FieldSpec::required("TIME_ON", FieldKey::Time),
        FieldSpec::required("BAND", FieldKey::Band),
        FieldSpec::required("MODE", FieldKey::Mode),
        FieldSpec::required("RST_SENT", FieldKey::Rst),
        FieldSpec::required("QSL_RCVD", FieldKey::QslCode),
        FieldSpec::optional("FREQ", FieldKey::Freq),
    ]
}

/// Builds the matcher for one tag. An ADIF type indicator (`<FREQ:6:N>`) is accepted.
fn tag_pattern(tag: &str) -> Result<Regex> {
    let pattern = format!(r"<{}:\d+(?::[A-Za-z])?>([^<]*)<", regex::escape(tag));
    Regex::new(&pattern).map_err(|e| EtlError::ConfigError {
        message: format!("cannot build matcher for tag {}: {}", tag, e),
    })
}

/// Value of the last occurrence of the tag in `line`, with surrounding ASCII
/// whitespace removed.
pub fn extract_tag_value<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    let mut last = None;
    let mut start = 0;
    // Resume at the closing `<`, which may open the next occurrence.
    while let Some(caps) = pattern.captures_at(line, start) {
        let whole = caps.get(0)?;
        last = caps.get(1);
        start = whole.end() - 1;
    }
    last.map(|m| m.as_str().trim_matches(|c: char| c.is_ascii_whitespace()))
}

/// Per-field outcome of scanning one line.
#[derive(Debug, Default)]
pub struct ExtractedFields<'a> {
    values: BTreeMap<FieldKey, &'a str>,
    missing: Vec<String>,
}

impl<'a> ExtractedFields<'a> {
    pub fn get(&self, key: FieldKey) -> Option<&'a str> {
        self.values.get(&key).copied()
    }

    /// Tags of required fields that were not found, in field-table order.
    pub fn missing_required(&self) -> &[String] {
        &self.missing
    }

    fn value_or_empty(&self, key: FieldKey) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

struct CompiledField {
    spec: FieldSpec,
    pattern: Regex,
}

pub struct RecordExtractor {
    fields: Vec<CompiledField>,
    to_call: Regex,
}

impl RecordExtractor {
    pub fn new(manager_tag: &str) -> Result<Self> {
        let fields = field_table(manager_tag)
            .into_iter()
            .map(|spec| {
                let pattern = tag_pattern(&spec.tag)?;
                Ok(CompiledField { spec, pattern })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fields,
            to_call: tag_pattern(TO_CALL_TAG)?,
        })
    }

    pub fn is_contact_line(&self, line: &str) -> bool {
        extract_tag_value(&self.to_call, line).is_some()
    }

    pub fn extract_fields<'a>(&self, line: &'a str) -> ExtractedFields<'a> {
        let mut extracted = ExtractedFields::default();
        for field in &self.fields {
            match extract_tag_value(&field.pattern, line) {
                Some(value) => {
                    extracted.values.insert(field.spec.key, value);
                }
                None if field.spec.required => extracted.missing.push(field.spec.tag.clone()),
                None => {}
            }
        }
        extracted
    }

    /// `Ok(None)` for lines that carry no QSO.
    pub fn extract_contact(&self, line_no: usize, line: &str) -> Result<Option<Contact>> {
        if !self.is_contact_line(line) {
            return Ok(None);
        }

        let fields = self.extract_fields(line);
        if let Some(tag) = fields.missing_required().first() {
            return Err(EtlError::MissingFieldError {
                line: line_no,
                field: tag.clone(),
            });
        }

        let contact = Contact {
            to_call: fields.value_or_empty(FieldKey::ToCall),
            from_call: fields.value_or_empty(FieldKey::FromCall),
            via_call: fields.value_or_empty(FieldKey::ViaCall),
            date: fields.value_or_empty(FieldKey::Date),
            time: fields.value_or_empty(FieldKey::Time),
            band: fields.value_or_empty(FieldKey::Band),
            mode: fields.value_or_empty(FieldKey::Mode),
            rst: fields.value_or_empty(FieldKey::Rst),
            qsl_status: QslStatus::from_code(fields.get(FieldKey::QslCode).unwrap_or_default()),
            freq: fields.value_or_empty(FieldKey::Freq),
        };
        check_contact(line_no, &contact)?;

        Ok(Some(contact))
    }

    pub fn extract_contacts(&self, text: &str) -> Result<Vec<Contact>> {
        let mut contacts = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if let Some(contact) = self.extract_contact(idx + 1, line)? {
                tracing::trace!("Line {}: QSO with {}", idx + 1, contact.to_call);
                contacts.push(contact);
            }
        }
        Ok(contacts)
    }
}

fn invalid(line: usize, field: &str, value: &str, reason: &str) -> EtlError {
    EtlError::InvalidFieldError {
        line,
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Renderer slices date and time by position, so their shape is fixed here.
fn check_contact(line: usize, contact: &Contact) -> Result<()> {
    if contact.to_call.is_empty() {
        return Err(invalid(line, TO_CALL_TAG, "", "callsign cannot be empty"));
    }

    if !all_digits(&contact.date, 8)
        || NaiveDate::parse_from_str(&contact.date, "%Y%m%d").is_err()
    {
        return Err(invalid(
            line,
            "QSO_DATE",
            &contact.date,
            "expected a calendar date as YYYYMMDD",
        ));
    }

    if !all_digits(&contact.time, 4) || NaiveTime::parse_from_str(&contact.time, "%H%M").is_err()
    {
        return Err(invalid(
            line,
            "TIME_ON",
            &contact.time,
            "expected a time of day as HHMM",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QSO_LINE: &str = "<STATION_CALLSIGN:5>DL0XX<CALL:6>DL1ABC<QSO_DATE:8>20230101<TIME_ON:4>1234<BAND:3>20M<MODE:2>CW<RST_SENT:3>599<QSL_RCVD:1>Y<FREQ:6>14.025<EOR>";

    fn extractor() -> RecordExtractor {
        RecordExtractor::new(DEFAULT_MANAGER_TAG).unwrap()
    }

    #[test]
    fn test_extract_full_line() {
        let contact = extractor().extract_contact(1, QSO_LINE).unwrap().unwrap();

        assert_eq!(contact.to_call, "DL1ABC");
        assert_eq!(contact.from_call, "DL0XX");
        assert_eq!(contact.via_call, "");
        assert_eq!(contact.date, "20230101");
        assert_eq!(contact.time, "1234");
        assert_eq!(contact.band, "20M");
        assert_eq!(contact.mode, "CW");
        assert_eq!(contact.rst, "599");
        assert_eq!(contact.qsl_status, QslStatus::Confirmed);
        assert_eq!(contact.freq, "14.025");
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let line = "<QSL_RCVD:1>N<RST_SENT:3>579<MODE:3>SSB<BAND:3>40M<TIME_ON:4>0815<QSO_DATE:8>20221231<CALL:5>K1ABC<STATION_CALLSIGN:5>DL0XX<QSL_VIA:5>W1MGR<EOR>";
        let contact = extractor().extract_contact(3, line).unwrap().unwrap();

        assert_eq!(contact.to_call, "K1ABC");
        assert_eq!(contact.via_call, "W1MGR");
        assert_eq!(contact.qsl_status, QslStatus::NotConfirmed);
        assert_eq!(contact.freq, "");
    }

    #[test]
    fn test_station_callsign_is_not_mistaken_for_call() {
        let line = "<STATION_CALLSIGN:5>DL0XX<EOR>";
        assert!(extractor().extract_contact(1, line).unwrap().is_none());
    }

    #[test]
    fn test_header_lines_are_skipped() {
        let text = "ADIF export\n<ADIF_VER:5>3.1.4<EOH>\n\n".to_string() + QSO_LINE + "\n";
        let contacts = extractor().extract_contacts(&text).unwrap();
        assert_eq!(contacts.len(), 1);
    }

    #[test]
    fn test_missing_required_field_fails_with_line_number() {
        let line = QSO_LINE.replace("<RST_SENT:3>599", "");
        let text = format!("header\n{}\n", line);
        let err = extractor().extract_contacts(&text).unwrap_err();

        match err {
            EtlError::MissingFieldError { line, field } => {
                assert_eq!(line, 2);
                assert_eq!(field, "RST_SENT");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_fields_reports_every_missing_tag() {
        let extractor = extractor();
        let fields = extractor.extract_fields("<CALL:6>DL1ABC<BAND:3>20M<EOR>");
        assert_eq!(
            fields.missing_required(),
            ["STATION_CALLSIGN", "QSO_DATE", "TIME_ON", "MODE", "RST_SENT", "QSL_RCVD"]
        );
        assert_eq!(fields.get(FieldKey::ToCall), Some("DL1ABC"));
        assert_eq!(fields.get(FieldKey::Freq), None);
    }

    #[test]
    fn test_empty_confirmation_code_is_unknown() {
        let line = QSO_LINE.replace("<QSL_RCVD:1>Y", "<QSL_RCVD:0>");
        let contact = extractor().extract_contact(1, &line).unwrap().unwrap();
        assert_eq!(contact.qsl_status, QslStatus::Unknown);
    }

    #[test]
    fn test_rejects_malformed_date_and_time() {
        let bad_date = QSO_LINE.replace("20230101", "20231301");
        assert!(matches!(
            extractor().extract_contact(1, &bad_date),
            Err(EtlError::InvalidFieldError { ref field, .. }) if field == "QSO_DATE"
        ));

        let seconds = QSO_LINE.replace("<TIME_ON:4>1234", "<TIME_ON:6>123456");
        assert!(matches!(
            extractor().extract_contact(1, &seconds),
            Err(EtlError::InvalidFieldError { ref field, .. }) if field == "TIME_ON"
        ));
    }

    #[test]
    fn test_empty_call_is_rejected() {
        let line = QSO_LINE.replace("<CALL:6>DL1ABC", "<CALL:0>");
        assert!(matches!(
            extractor().extract_contact(1, &line),
            Err(EtlError::InvalidFieldError { ref field, .. }) if field == "CALL"
        ));
    }

    #[test]
    fn test_type_indicator_and_padding() {
        let line = QSO_LINE
            .replace("<FREQ:6>14.025", "<FREQ:6:N>14.025 ")
            .replace("<CALL:6>DL1ABC", "<CALL:6>DL1ABC ");
        let contact = extractor().extract_contact(1, &line).unwrap().unwrap();
        assert_eq!(contact.freq, "14.025");
        assert_eq!(contact.to_call, "DL1ABC");
    }

    #[test]
    fn test_repeated_tag_uses_last_value() {
        let line = QSO_LINE.replace("<EOR>", "<MODE:3>SSB<EOR>");
        let contact = extractor().extract_contact(1, &line).unwrap().unwrap();
        assert_eq!(contact.mode, "SSB");

        let adjacent = QSO_LINE.replace("<MODE:2>CW", "<MODE:2>CW<MODE:3>SSB");
        let contact = extractor().extract_contact(1, &adjacent).unwrap().unwrap();
        assert_eq!(contact.mode, "SSB");
    }

    #[test]
    fn test_only_ascii_whitespace_is_trimmed() {
        let line = QSO_LINE.replace("<MODE:2>CW", "<MODE:3>CW\u{a0}");
        let contact = extractor().extract_contact(1, &line).unwrap().unwrap();
        assert_eq!(contact.mode, "CW\u{a0}");
    }

    #[test]
    fn test_custom_manager_tag() {
        let extractor = RecordExtractor::new("QSL_MGR").unwrap();
        let line = QSO_LINE.replace("<EOR>", "<QSL_MGR:4>W1AW<EOR>");
        let contact = extractor.extract_contact(1, &line).unwrap().unwrap();
        assert_eq!(contact.via_call, "W1AW");
    }
}
