use serde::Deserialize;

use crate::error::{HeatmapError, Result};

use super::Sample;


#[derive(Debug, Deserialize)]
struct Payload {
    table: Option<Table>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    column_names: Option<Vec<String>>,
    rows: Option<Vec<(f64, f64, f64)>>,
}

/// Parses a griddap JSON payload into samples, keeping the row order of the payload.
pub fn decode(payload: &str) -> Result<Vec<Sample>> {
    let payload: Payload = serde_json::from_str(payload)?;

    let table = payload
        .table
        .ok_or_else(|| HeatmapError::Format("missing field `table`".to_string()))?;

    if let Some(columns) = &table.column_names {
        if columns.len() != 3 {
            return Err(HeatmapError::Format(format!(
                "expected latitude, longitude and altitude columns, got {:?}",
                columns
            )));
        }
    }

    let rows = table
        .rows
        .ok_or_else(|| HeatmapError::Format("missing field `table.rows`".to_string()))?;

    Ok(rows
        .into_iter()
        .map(|(lat, lng, altitude)| Sample::new(lat, lng, altitude))
        .collect())
}
