//! Live-site summaries for the dashboard map.
//!
//! The site list comes from one call; per-site metrics come from one detail
//! call per site, issued concurrently. A detail reply is enriched whatever
//! its status; only a transport or parse failure degrades that site to
//! zeroed metrics, and never fails the whole listing.

use futures::future::join_all;
use serde_json::{Map, Value, json};

use super::{RanBackend, RanError};

/// Fetch every live site and merge in per-site metrics.
///
/// # Errors
///
/// Returns an error only if the site list itself cannot be fetched.
pub async fn live_sites_with_metrics(ran: &dyn RanBackend) -> Result<Vec<Value>, RanError> {
    let listing = ran.live_sites().await?;
    let sites = listing.get("sites").and_then(Value::as_array).cloned().unwrap_or_default();

    let details = join_all(sites.iter().map(|site| async move {
        match site.get("siteId").and_then(Value::as_str) {
            Some(site_id) => ran.live_site(site_id).await,
            None => Err(RanError::Parse("site without siteId".into())),
        }
    }))
    .await;

    Ok(sites
        .iter()
        .zip(details)
        .map(|(site, detail)| match detail {
            Ok(detail) => enrich_site(site, &detail),
            Err(e) => {
                let site_id = site.get("siteId").and_then(Value::as_str).unwrap_or_default();
                tracing::warn!(error = %e, site_id, "ran: site detail unavailable");
                degraded_site(site)
            }
        })
        .collect())
}

/// Merge detail metrics into a site listing entry.
#[must_use]
pub fn enrich_site(site: &Value, detail: &Value) -> Value {
    let metrics = detail.get("metrics").unwrap_or(&Value::Null);
    let cells = detail.get("cells").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

    let avg_sinr = if cells.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let count = cells.len() as f64;
        cells.iter().map(|cell| number(cell, "averageSINR_dB").unwrap_or(0.0)).sum::<f64>() / count
    };

    let total_cells = metrics
        .get("total_cells")
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .unwrap_or_else(|| site_cell_count(site));

    #[allow(clippy::cast_possible_truncation)]
    let avg_load = number(metrics, "average_cell_load").unwrap_or(0.0).round() as i64;

    let mut out = site_fields(site);
    out.insert("totalUes".into(), json!(metrics.get("total_connected_ues").and_then(Value::as_u64).unwrap_or(0)));
    out.insert("activeCells".into(), json!(metrics.get("active_cells").and_then(Value::as_u64).unwrap_or(0)));
    out.insert("totalCells".into(), json!(total_cells));
    out.insert("avgLoad".into(), json!(avg_load));
    out.insert("avgSINR".into(), json!(to_fixed_1(avg_sinr)));
    out.insert("cells".into(), Value::Array(cells.iter().map(summarize_cell).collect()));
    Value::Object(out)
}

/// Site entry with zeroed metrics, used when its detail call failed.
#[must_use]
pub fn degraded_site(site: &Value) -> Value {
    let cell_count = site_cell_count(site);
    let mut out = site_fields(site);
    out.insert("totalUes".into(), json!(0));
    out.insert("activeCells".into(), json!(cell_count));
    out.insert("totalCells".into(), json!(cell_count));
    Value::Object(out)
}

fn summarize_cell(cell: &Value) -> Value {
    let mut out = Map::new();
    for (from, to) in [("cellId", "cellId"), ("cellState", "state"), ("load", "load")] {
        if let Some(value) = cell.get(from) {
            out.insert(to.into(), value.clone());
        }
    }
    let ues = cell.get("connectedUes").and_then(Value::as_array).map_or(0, Vec::len);
    out.insert("ues".into(), json!(ues));
    if let Some(sinr) = number(cell, "averageSINR_dB") {
        out.insert("sinr".into(), json!(to_fixed_1(sinr)));
    }
    Value::Object(out)
}

fn site_fields(site: &Value) -> Map<String, Value> {
    site.as_object().cloned().unwrap_or_default()
}

fn site_cell_count(site: &Value) -> u64 {
    site.get("cells").and_then(Value::as_array).map_or(0, |cells| cells.len() as u64)
}

/// One-decimal formatting that rounds exact ties away from zero, as the
/// dashboard's `toFixed(1)` does. `{:.1}` alone rounds them to even.
#[allow(clippy::float_cmp)]
pub(crate) fn to_fixed_1(value: f64) -> String {
    // Ties at one decimal are exactly the quarter values (x.25, x.75).
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0 {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{value:.1}")
    }
}

fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
