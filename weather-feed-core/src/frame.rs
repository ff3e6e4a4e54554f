//! Text framing for the `text/event-stream` wire format.

use crate::model::WeatherRecord;

pub const CONTENT_TYPE: &str = "text/event-stream";
pub const CACHE_CONTROL: &str = "no-cache";
pub const CONNECTION: &str = "keep-alive";

/// One event on the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: u64,
    pub data: String,
}

impl Frame {
    pub fn from_records(id: u64, records: &[WeatherRecord]) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_string(records)?;
        Ok(Self { id, data })
    }

    /// `id: <id>\ndata: <data>\n\n`
    pub fn encode(&self) -> String {
        format!("id: {}\ndata: {}\n\n", self.id, self.data)
    }
}
