use std::{convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date_format;
use crate::store::{Dataset, Record};

/// Complaint status as written in the `Status` column. Values the shop
/// enters by hand that are not one of the known states are kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Other(String),
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ComplaintStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => Self::Pending,
            "InProgress" => Self::InProgress,
            "Resolved" => Self::Resolved,
            _ => Self::Other(value),
        }
    }
}

impl From<ComplaintStatus> for String {
    fn from(status: ComplaintStatus) -> Self {
        match status {
            ComplaintStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ComplaintStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplaintRecord {
    pub tyre_name: String,
    pub size: String,
    pub brand: String,
    #[serde(with = "date_format::day")]
    pub date: NaiveDate,
    pub issue: String,
    pub quantity_affected: u32,
    pub status: ComplaintStatus,
}

impl Record for ComplaintRecord {
    const DATASET: Dataset = Dataset::Complaint;
}

/// The append-only complaint table. Duplicate entries are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplaintLog {
    records: Vec<ComplaintRecord>,
}

impl ComplaintLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(records: Vec<ComplaintRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplaintRecord> {
        self.records.iter()
    }

    pub fn rows(&self) -> &[ComplaintRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ComplaintRecord> {
        self.records.last()
    }

    pub fn pending(&self) -> impl Iterator<Item = &ComplaintRecord> {
        self.records
            .iter()
            .filter(|record| record.status == ComplaintStatus::Pending)
    }

    pub(crate) fn append(&mut self, record: ComplaintRecord) {
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse_by_name() {
        assert_eq!("Pending".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::Pending);
        assert_eq!("InProgress".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::InProgress);
        assert_eq!("Resolved".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::Resolved);
    }

    #[test]
    fn hand_entered_status_is_kept_verbatim() {
        let status: ComplaintStatus = "In Progress".parse().unwrap();
        assert_eq!(status, ComplaintStatus::Other("In Progress".to_string()));
        assert_eq!(status.to_string(), "In Progress");
        assert_eq!(String::from(status), "In Progress");
    }
}
