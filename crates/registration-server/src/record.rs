//! Registration record.

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Format of server-assigned entry times, e.g. `10/16/2026, 3:04:05 PM`.
pub const ENTRY_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// One student's submitted form.
///
/// Text fields are free-form and unvalidated. Fields the form does not know
/// about are kept in `extra` and returned verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub grade: String,
    #[serde(default, deserialize_with = "text")]
    pub section: String,
    #[serde(default, deserialize_with = "text")]
    pub lrn: String,
    #[serde(default, deserialize_with = "text")]
    pub emergency: String,
    #[serde(default, deserialize_with = "text")]
    pub address: String,
    #[serde(default, deserialize_with = "text")]
    pub contact: String,
    #[serde(default, deserialize_with = "text")]
    pub birthdate: String,
    #[serde(default, deserialize_with = "text")]
    pub condition: String,

    /// Embedded PNG image, or empty when nothing was drawn
    #[serde(default, deserialize_with = "text")]
    pub signature: String,

    #[serde(default, deserialize_with = "text")]
    pub image_code: String,

    #[serde(default, deserialize_with = "text")]
    pub entry_time: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Registration {
    /// Fill in `entry_time` with the current local time if the client left
    /// it blank.
    pub fn stamp_entry_time(&mut self) {
        if self.entry_time.is_empty() {
            self.entry_time = Local::now().format(ENTRY_TIME_FORMAT).to_string();
        }
    }
}

/// Accept any JSON scalar as text; `null` becomes empty.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
