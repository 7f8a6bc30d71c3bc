//! The risk-exposure bar chart.
//!
//! The server computes every number and label; the browser only draws them
//! with Chart.js.

use core_types::format::format_usd;
use core_types::{CoreError, RiskExposure};
use serde::Serialize;
use serde_json::{json, Value};

pub const BUY_VOLUME_COLOR: &str = "#3b82f6";
pub const SELL_VOLUME_COLOR: &str = "#ef4444";
pub const NET_EXPOSURE_COLOR: &str = "#d946ef";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
    pub tooltip: String,
}

impl ChartBar {
    fn new(name: &'static str, value: f64, color: &'static str) -> Self {
        Self {
            name,
            value,
            color,
            tooltip: format_usd(value),
        }
    }
}

/// Horizontal bar chart with exactly three bars: buy volume, sell volume and
/// net exposure, in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskExposureChart {
    pub bars: [ChartBar; 3],
}

impl RiskExposureChart {
    pub fn from_exposure(exposure: &RiskExposure) -> Result<Self, CoreError> {
        let parsed = exposure.parse()?;
        Ok(Self {
            bars: [
                ChartBar::new("Buy Volume", parsed.buy_volume_usd, BUY_VOLUME_COLOR),
                ChartBar::new("Sell Volume", parsed.sell_volume_usd, SELL_VOLUME_COLOR),
                ChartBar::new("Net Exposure", parsed.net_exposure, NET_EXPOSURE_COLOR),
            ],
        })
    }

    /// Chart.js configuration. Tooltip text is supplied separately through
    /// [`RiskExposureChart::tooltips`] since the config cannot carry callbacks.
    pub fn chart_config(&self) -> Value {
        let labels: Vec<&str> = self.bars.iter().map(|b| b.name).collect();
        let values: Vec<f64> = self.bars.iter().map(|b| b.value).collect();
        let colors: Vec<&str> = self.bars.iter().map(|b| b.color).collect();

        json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{
                    "data": values,
                    "backgroundColor": colors,
                }]
            },
            "options": {
                "indexAxis": "y",
                "responsive": true,
                "maintainAspectRatio": false,
                "layout": { "padding": { "top": 20, "right": 30, "left": 20, "bottom": 5 } },
                "plugins": { "legend": { "display": false } }
            }
        })
    }

    pub fn tooltips(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.tooltip.as_str()).collect()
    }
}
