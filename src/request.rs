//! Analysis request intake
//!
//! A request arrives as a JSON document whose fields may be missing or
//! malformed. Validation turns it into an [`AnalysisRequest`] or reports
//! every problem at once.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{NightError, NightResult};

lazy_static! {
    static ref MONTH_PATTERN: Regex = Regex::new(r"^(\d{2})-(\d{4})$").expect("valid month pattern");
}

/// Parses `MM-YYYY` into the first day of that month
pub fn parse_month(text: &str) -> Option<NaiveDate> {
    let caps = MONTH_PATTERN.captures(text.trim())?;
    let month: u32 = caps[1].parse().ok()?;
    let year: i32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Formats a date as `MM-YYYY`
pub fn format_month(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}

/// Request document as submitted; nothing is checked yet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequest {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    /// North-south extent in meters
    pub length: Option<Value>,
    /// East-west extent in meters
    pub breadth: Option<Value>,
    pub from_date: Option<Value>,
    pub to_date: Option<Value>,
}

/// A validated, immutable analysis request
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Serialized form of an accepted request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    pub latitude: f64,
    pub longitude: f64,
    pub length: u64,
    pub breadth: u64,
    pub from_date: String,
    pub to_date: String,
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

impl RawRequest {
    /// Parses a request document
    pub fn from_json_str(text: &str) -> NightResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| NightError::Validation(vec![format!("Request is not a valid JSON document: {}", e)]))
    }

    /// Checks every field against its range and the archive coverage
    pub fn validate(&self, coverage: (NaiveDate, NaiveDate)) -> NightResult<AnalysisRequest> {
        let mut problems = Vec::new();
        let (min_date, max_date) = coverage;

        let mut coordinates_numeric = true;
        let latitude = match self.latitude.as_ref().map(as_number) {
            None => {
                problems.push("Latitude is required.".to_string());
                None
            }
            Some(None) => {
                coordinates_numeric = false;
                None
            }
            Some(Some(v)) if (-90.0..=90.0).contains(&v) => Some(v),
            Some(Some(_)) => {
                problems.push("Latitude must be between -90 and 90.".to_string());
                None
            }
        };
        let longitude = match self.longitude.as_ref().map(as_number) {
            None => {
                problems.push("Longitude is required.".to_string());
                None
            }
            Some(None) => {
                coordinates_numeric = false;
                None
            }
            Some(Some(v)) if (-180.0..=180.0).contains(&v) => Some(v),
            Some(Some(_)) => {
                problems.push("Longitude must be between -180 and 180.".to_string());
                None
            }
        };
        if !coordinates_numeric {
            problems.push("Latitude and Longitude must be numerical values.".to_string());
        }

        let mut extents_numeric = true;
        let mut extent = |value: &Option<Value>, name: &str| -> Option<u64> {
            match value.as_ref().map(as_integer) {
                None => {
                    problems.push(format!("{} is required.", name));
                    None
                }
                Some(None) => {
                    extents_numeric = false;
                    None
                }
                Some(Some(v)) if v > 0 => Some(v as u64),
                Some(Some(_)) => {
                    problems.push(format!("{} must be a positive numerical value.", name));
                    None
                }
            }
        };
        let length = extent(&self.length, "Length");
        let breadth = extent(&self.breadth, "Width");
        if !extents_numeric {
            problems.push("Length and Width must be numerical values.".to_string());
        }

        let coverage_text = format!("{} and {}", format_month(min_date), format_month(max_date));
        let mut dates_well_formed = true;
        let mut month = |value: &Option<Value>, label: &str| -> Option<NaiveDate> {
            let text = match value {
                None => {
                    problems.push(format!("{} date is required.", label));
                    return None;
                }
                Some(Value::String(text)) => text,
                Some(_) => {
                    dates_well_formed = false;
                    return None;
                }
            };
            match parse_month(text) {
                None => {
                    dates_well_formed = false;
                    None
                }
                Some(date) if date >= min_date && date <= max_date => Some(date),
                Some(_) => {
                    problems.push(format!("{} date must be between {}.", label, coverage_text));
                    None
                }
            }
        };
        let from_date = month(&self.from_date, "From");
        let to_date = month(&self.to_date, "To");
        if !dates_well_formed {
            problems.push("Dates must be in the format MM-YYYY.".to_string());
        }
        if let (Some(from), Some(to)) = (from_date, to_date) {
            if to < from {
                problems.push("End date cannot be before the start date.".to_string());
            }
        }

        match (latitude, longitude, length, breadth, from_date, to_date) {
            (Some(latitude), Some(longitude), Some(length), Some(breadth), Some(from_date), Some(to_date))
                if problems.is_empty() =>
            {
                let request = AnalysisRequest {
                    latitude,
                    longitude,
                    width_m: breadth as f64,
                    height_m: length as f64,
                    from_date,
                    to_date,
                };
                debug!("Accepted request {:?}", request);
                Ok(request)
            }
            _ => Err(NightError::Validation(problems)),
        }
    }
}

impl AnalysisRequest {
    /// Reads and validates a request document from disk
    pub fn load(path: &Path, coverage: (NaiveDate, NaiveDate)) -> NightResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| NightError::io(format!("Failed to read request {}", path.display()), e))?;
        RawRequest::from_json_str(&text)?.validate(coverage)
    }

    pub fn to_document(&self) -> RequestDocument {
        RequestDocument {
            latitude: self.latitude,
            longitude: self.longitude,
            length: self.height_m as u64,
            breadth: self.width_m as u64,
            from_date: format_month(self.from_date),
            to_date: format_month(self.to_date),
        }
    }

    /// Writes the accepted request as a pretty-printed JSON document
    pub fn write(&self, path: &Path) -> NightResult<()> {
        let text = serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| NightError::io(format!("Failed to encode request {}", path.display()), e.into()))?;
        fs::write(path, text)
            .map_err(|e| NightError::io(format!("Failed to write request {}", path.display()), e))
    }
}
