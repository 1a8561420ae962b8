use crate::quiz::scoring::ScoreSummary;

const BAR_WIDTH: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarChart {
    pub labels: Vec<String>,
    pub values: Vec<u32>,
    pub max: u32,
}

impl RadarChart {
    pub fn from_summary(summary: &ScoreSummary, max: u32) -> Self {
        Self {
            labels: summary
                .dimensions
                .iter()
                .map(|d| d.category.label().to_string())
                .collect(),
            values: summary.dimensions.iter().map(|d| d.score).collect(),
            max,
        }
    }
}

pub trait ChartRenderer {
    fn render(&self, chart: &RadarChart) -> String;
}

/// One horizontal bar per axis, for plain-text chat messages.
pub struct TextBarRenderer;

impl ChartRenderer for TextBarRenderer {
    fn render(&self, chart: &RadarChart) -> String {
        chart
            .labels
            .iter()
            .zip(&chart.values)
            .map(|(label, value)| {
                let filled = if chart.max == 0 {
                    0
                } else {
                    (value.min(&chart.max) * BAR_WIDTH + chart.max / 2) / chart.max
                };
                format!(
                    "{} {}{} {}/{}",
                    label,
                    "█".repeat(filled as usize),
                    "░".repeat((BAR_WIDTH - filled) as usize),
                    value,
                    chart.max
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
