//! Shared data types: transaction features and form payloads

use serde::{Deserialize, Serialize};

/// Canonical feature order used by the bundled model package and the form page.
pub const FEATURE_NAMES: [&str; 30] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount",
];

/// One transaction row: elapsed time, 28 PCA components, and the amount.
/// Field names mirror the CSV headers of the source dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "V1")]
    pub v1: f64,
    #[serde(rename = "V2")]
    pub v2: f64,
    #[serde(rename = "V3")]
    pub v3: f64,
    #[serde(rename = "V4")]
    pub v4: f64,
    #[serde(rename = "V5")]
    pub v5: f64,
    #[serde(rename = "V6")]
    pub v6: f64,
    #[serde(rename = "V7")]
    pub v7: f64,
    #[serde(rename = "V8")]
    pub v8: f64,
    #[serde(rename = "V9")]
    pub v9: f64,
    #[serde(rename = "V10")]
    pub v10: f64,
    #[serde(rename = "V11")]
    pub v11: f64,
    #[serde(rename = "V12")]
    pub v12: f64,
    #[serde(rename = "V13")]
    pub v13: f64,
    #[serde(rename = "V14")]
    pub v14: f64,
    #[serde(rename = "V15")]
    pub v15: f64,
    #[serde(rename = "V16")]
    pub v16: f64,
    #[serde(rename = "V17")]
    pub v17: f64,
    #[serde(rename = "V18")]
    pub v18: f64,
    #[serde(rename = "V19")]
    pub v19: f64,
    #[serde(rename = "V20")]
    pub v20: f64,
    #[serde(rename = "V21")]
    pub v21: f64,
    #[serde(rename = "V22")]
    pub v22: f64,
    #[serde(rename = "V23")]
    pub v23: f64,
    #[serde(rename = "V24")]
    pub v24: f64,
    #[serde(rename = "V25")]
    pub v25: f64,
    #[serde(rename = "V26")]
    pub v26: f64,
    #[serde(rename = "V27")]
    pub v27: f64,
    #[serde(rename = "V28")]
    pub v28: f64,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

impl TransactionRecord {
    /// Feature values in canonical order.
    pub fn values(&self) -> [f64; 30] {
        [
            self.time, self.v1, self.v2, self.v3, self.v4, self.v5, self.v6, self.v7, self.v8,
            self.v9, self.v10, self.v11, self.v12, self.v13, self.v14, self.v15, self.v16,
            self.v17, self.v18, self.v19, self.v20, self.v21, self.v22, self.v23, self.v24,
            self.v25, self.v26, self.v27, self.v28, self.amount,
        ]
    }
}

/// Ordered field name/value pairs captured from a form at submit time.
/// No validation or normalization is applied; values travel as provided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&TransactionRecord> for FormPayload {
    fn from(record: &TransactionRecord) -> Self {
        let mut payload = FormPayload::new();
        for (name, value) in FEATURE_NAMES.iter().zip(record.values()) {
            payload.push(*name, value.to_string());
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_record() -> TransactionRecord {
        let headers = FEATURE_NAMES.join(",");
        let row = vec!["0.0"; FEATURE_NAMES.len()].join(",");
        let data = format!("{headers}\n{row}\n");
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        reader.deserialize().next().unwrap().unwrap()
    }

    #[test]
    fn record_values_follow_canonical_order() {
        let mut record = zero_record();
        record.time = 1.0;
        record.v14 = -2.5;
        record.amount = 149.62;

        let values = record.values();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[14], -2.5);
        assert_eq!(values[29], 149.62);
    }

    #[test]
    fn payload_preserves_field_order() {
        let record = zero_record();
        let payload = FormPayload::from(&record);
        assert_eq!(payload.len(), 30);
        assert_eq!(payload.fields()[0].0, "Time");
        assert_eq!(payload.fields()[29].0, "Amount");
    }

    #[test]
    fn record_parses_from_csv_headers() {
        let headers = FEATURE_NAMES.join(",");
        let mut row: Vec<String> = (0..30).map(|i| format!("{}.5", i)).collect();
        row[29] = "42.0".to_string();
        let data = format!("{}\n{}\n", headers, row.join(","));

        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: TransactionRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.time, 0.5);
        assert_eq!(record.v1, 1.5);
        assert_eq!(record.amount, 42.0);
    }
}
