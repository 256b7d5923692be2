use crate::services::backend::TelemetrySeries;

pub const DATASET_LABEL: &str = "Telemetry Data";
const CHART_HEIGHT: usize = 8;

/// Chart-ready projection of a series: x labels are the timestamps, y the values.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl PlotData {
    pub fn from_series(series: &TelemetrySeries) -> Self {
        Self {
            label: DATASET_LABEL.to_string(),
            labels: series.iter().map(|p| p.timestamp.clone()).collect(),
            values: series.iter().map(|p| p.value).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Plain-text line chart, one column per sample, in series order.
    pub fn render(&self) -> String {
        self.render_with_height(CHART_HEIGHT)
    }

    pub fn render_with_height(&self, height: usize) -> String {
        if self.is_empty() || height == 0 {
            return String::new();
        }

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };

        let rows: Vec<usize> = self
            .values
            .iter()
            .map(|v| (((v - min) / span) * (height - 1) as f64).round() as usize)
            .collect();

        let mut out = format!("{}\n", self.label);
        for level in (0..height).rev() {
            let axis = if level == height - 1 {
                format!("{:>10.2} |", max)
            } else if level == 0 {
                format!("{:>10.2} |", min)
            } else {
                format!("{:>10} |", "")
            };
            let line: String = rows
                .iter()
                .map(|&row| if row == level { '*' } else { ' ' })
                .collect();
            out.push_str(axis.as_str());
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push_str(&format!("{:>10} +{}\n", "", "-".repeat(rows.len())));

        if let (Some(first), Some(last)) = (self.labels.first(), self.labels.last()) {
            if self.labels.len() > 1 {
                out.push_str(&format!("{:>12}{} .. {}\n", "", first, last));
            } else {
                out.push_str(&format!("{:>12}{}\n", "", first));
            }
        }
        out
    }
}
