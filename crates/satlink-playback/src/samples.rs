//! Sample table - externally supplied time series
//!
//! The feed is a delimited text table with a header row. One column
//! (`time` or `step`) is the join key against display time; every other
//! column is a named channel.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use satlink_core::{SatlinkError, SatlinkResult, SimTime};

const KEY_COLUMNS: [&str; 2] = ["time", "step"];

#[derive(Clone, Debug)]
struct SampleRow {
    time: SimTime,
    values: Vec<Option<f64>>,
}

/// One row of the table, borrowed
#[derive(Clone, Copy, Debug)]
pub struct SampleFrame<'a> {
    pub time: SimTime,
    columns: &'a [String],
    values: &'a [Option<f64>],
}

impl<'a> SampleFrame<'a> {
    /// Value of a named channel, if the column exists and the cell parsed
    pub fn channel(&self, name: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == name)?;
        self.values.get(idx).copied().flatten()
    }
}

/// Read-only table of sample frames sorted by time
#[derive(Clone, Debug, Default)]
pub struct SampleTable {
    columns: Vec<String>,
    rows: Vec<SampleRow>,
}

impl SampleTable {
    /// Parse a comma- or tab-delimited table.
    /// Rows whose key does not parse are dropped.
    pub fn parse(text: &str) -> SatlinkResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| SatlinkError::MalformedFeed("empty feed".to_string()))?;
        let delimiter = if header.contains('\t') { '\t' } else { ',' };

        let names: Vec<String> = header
            .split(delimiter)
            .map(|h| h.trim().trim_matches('"').to_string())
            .collect();
        let key = names
            .iter()
            .position(|n| KEY_COLUMNS.iter().any(|k| n.eq_ignore_ascii_case(k)))
            .ok_or_else(|| {
                SatlinkError::MalformedFeed("no `time` or `step` column".to_string())
            })?;

        let columns: Vec<String> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != key)
            .map(|(_, n)| n.clone())
            .collect();

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for line in lines {
            let cells: Vec<&str> = line.split(delimiter).map(|c| c.trim()).collect();
            let Some(time) = cells.get(key).and_then(|c| parse_cell(c)) else {
                dropped += 1;
                continue;
            };
            let values = (0..names.len())
                .filter(|i| *i != key)
                .map(|i| cells.get(i).and_then(|c| parse_cell(c)))
                .collect();
            rows.push(SampleRow {
                time: SimTime::from_secs_f64(time),
                values,
            });
        }

        if dropped > 0 {
            tracing::debug!(dropped, "sample rows with unparseable key dropped");
        }

        // stable: equal times keep feed order
        rows.sort_by_key(|r| r.time);

        Ok(SampleTable { columns, rows })
    }

    /// Channel names, key column excluded
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn frame(&self, idx: usize) -> Option<SampleFrame<'_>> {
        self.rows.get(idx).map(|r| SampleFrame {
            time: r.time,
            columns: &self.columns,
            values: &r.values,
        })
    }

    /// Frame nearest to `t` within `tolerance` (inclusive).
    /// Ties go to the earlier frame.
    pub fn nearest(&self, t: SimTime, tolerance: Duration) -> Option<SampleFrame<'_>> {
        let idx = self.rows.partition_point(|r| r.time < t);

        // the last row before t, then the first row at/after t
        let before = idx.checked_sub(1).map(|i| (i, t - self.rows[i].time));
        let after = self.rows.get(idx).map(|r| (idx, r.time - t));

        let best = match (before, after) {
            (Some(b), Some(a)) => {
                if a.1 < b.1 {
                    a
                } else {
                    // an earlier row with the same time as rows[i] may exist
                    let time = self.rows[b.0].time;
                    (self.rows.partition_point(|r| r.time < time), b.1)
                }
            }
            (Some(b), None) => {
                let time = self.rows[b.0].time;
                (self.rows.partition_point(|r| r.time < time), b.1)
            }
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        if best.1 <= tolerance {
            self.frame(best.0)
        } else {
            None
        }
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim_matches('"')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Shared slot the loader fills once. The driver reads it every tick.
#[derive(Clone, Debug, Default)]
pub struct SampleSlot {
    table: Arc<RwLock<Option<Arc<SampleTable>>>>,
}

impl SampleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, table: SampleTable) {
        tracing::info!(rows = table.len(), columns = table.columns().len(), "sample table installed");
        *self.table.write() = Some(Arc::new(table));
    }

    pub fn current(&self) -> Option<Arc<SampleTable>> {
        self.table.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.read().is_some()
    }
}
