//! Parameter table and CSV export

use std::path::Path;

use serde::{Deserialize, Serialize};

use satlink_core::{SatlinkError, SatlinkResult};

const UTF8_BOM: &str = "\u{feff}";
const CSV_HEADER: [&str; 3] = ["Panel", "Parameter", "Value"];

/// One configured value as the operator entered it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRow {
    pub panel: String,
    pub parameter: String,
    /// Text or number, written to CSV as entered
    pub value: serde_json::Value,
}

impl ParameterRow {
    pub fn new(panel: impl Into<String>, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        ParameterRow {
            panel: panel.into(),
            parameter: parameter.into(),
            value: serde_json::Value::String(value.into()),
        }
    }

    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Parameters collected from the panels, one row per (panel, parameter)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable {
    rows: Vec<ParameterRow>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, keeping first-entry order
    pub fn set(&mut self, row: ParameterRow) {
        match self
            .rows
            .iter_mut()
            .find(|r| r.panel == row.panel && r.parameter == row.parameter)
        {
            Some(existing) => existing.value = row.value,
            None => self.rows.push(row),
        }
    }

    pub fn rows(&self) -> &[ParameterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json(&self) -> SatlinkResult<String> {
        serde_json::to_string(self).map_err(|e| SatlinkError::Export(e.to_string()))
    }
}

impl From<Vec<ParameterRow>> for ParameterTable {
    fn from(rows: Vec<ParameterRow>) -> Self {
        let mut table = ParameterTable::new();
        for row in rows {
            table.set(row);
        }
        table
    }
}

/// Render rows as BOM-prefixed CSV with CRLF line endings
pub fn to_csv(rows: &[ParameterRow]) -> String {
    let mut out = String::from(UTF8_BOM);
    push_record(&mut out, CSV_HEADER.iter().copied());
    for row in rows {
        let value = row.value_text();
        push_record(&mut out, [row.panel.as_str(), row.parameter.as_str(), value.as_str()]);
    }
    out
}

/// Write rows to `path`, creating the parent directory if needed
pub async fn write_csv(path: &Path, rows: &[ParameterRow]) -> SatlinkResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, to_csv(rows)).await?;
    tracing::info!(path = %path.display(), rows = rows.len(), "parameters exported");
    Ok(())
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
