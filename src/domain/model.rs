use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_QSOS_PER_LABEL: u8 = 1;
pub const MAX_QSOS_PER_LABEL: u8 = 6;

/// Columns each QSO slot occupies in a label row.
pub const COLUMNS_PER_QSO: usize = 6;

/// Confirmation state of a QSO as recorded in `QSL_RCVD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QslStatus {
    Confirmed,
    NotConfirmed,
    Unknown,
}

impl QslStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Y" => QslStatus::Confirmed,
            "N" => QslStatus::NotConfirmed,
            _ => QslStatus::Unknown,
        }
    }

    /// Text printed on the label: thanks for a received card, please for a missing one.
    pub fn display(&self) -> &'static str {
        match self {
            QslStatus::Confirmed => "TNX",
            QslStatus::NotConfirmed => "PSE",
            QslStatus::Unknown => "-|-",
        }
    }
}

/// One logged QSO. Date and time stay in raw ADIF digit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub to_call: String,
    pub from_call: String,
    pub via_call: String,
    pub date: String,
    pub time: String,
    pub band: String,
    pub mode: String,
    pub rst: String,
    pub qsl_status: QslStatus,
    pub freq: String,
}

/// QSOs that go onto one physical label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUnit {
    pub to_call: String,
    pub via_call: String,
    pub from_call: String,
    pub contacts: Vec<Contact>,
}

impl LabelUnit {
    pub fn new(first: Contact) -> Self {
        Self {
            to_call: first.to_call.clone(),
            via_call: first.via_call.clone(),
            from_call: first.from_call.clone(),
            contacts: vec![first],
        }
    }

    pub fn qsos_on_label(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_via_manager(&self) -> bool {
        !self.via_call.is_empty()
    }
}

/// Maximum number of QSOs per label, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelCapacity(u8);

impl LabelCapacity {
    pub fn new(value: u8) -> Result<Self> {
        crate::utils::validation::validate_range(
            "labels.qsos_per_label",
            value,
            MIN_QSOS_PER_LABEL,
            MAX_QSOS_PER_LABEL,
        )?;
        Ok(Self(value))
    }

    pub fn get(&self) -> usize {
        usize::from(self.0)
    }

    /// `To`, `Via`, six columns per slot, then the summary block.
    pub fn column_count(&self) -> usize {
        2 + COLUMNS_PER_QSO * self.get() + 1
    }
}

impl Default for LabelCapacity {
    fn default() -> Self {
        Self(MAX_QSOS_PER_LABEL)
    }
}

impl TryFrom<i64> for LabelCapacity {
    type Error = EtlError;

    fn try_from(value: i64) -> Result<Self> {
        let narrowed = u8::try_from(value).map_err(|_| EtlError::InvalidConfigValueError {
            field: "labels.qsos_per_label".to_string(),
            value: value.to_string(),
            reason: format!(
                "Value must be between {} and {}",
                MIN_QSOS_PER_LABEL, MAX_QSOS_PER_LABEL
            ),
        })?;
        Self::new(narrowed)
    }
}

impl fmt::Display for LabelCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Header plus one field list per emitted label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: LabelTable,
    pub contact_count: usize,
    pub label_count: usize,
    pub emitted_count: usize,
    pub filtered_count: usize,
}
