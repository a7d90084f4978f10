use clap::Subcommand;
use musclelog_core::WeightSeries;

use super::open_log;

#[derive(Subcommand)]
pub enum WeightAction {
    /// List valid bodyweight samples in date order
    Series {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draw the trend as a text chart
    Chart {
        #[arg(long, default_value = "40")]
        width: usize,
        #[arg(long, default_value = "10")]
        height: usize,
    },
}

pub fn run(action: WeightAction) -> Result<(), Box<dyn std::error::Error>> {
    let log = open_log()?;
    let series = log.weight_series();

    match action {
        WeightAction::Series { json: true } => {
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        WeightAction::Series { json: false } => {
            for sample in series.samples() {
                println!("{}  {}", sample.date, sample.weight);
            }
            if let Some(change) = series.change() {
                println!("change: {change:+.1}");
            }
        }
        WeightAction::Chart { width, height } => match render_chart(&series, width, height) {
            Some(chart) => print!("{chart}"),
            None if series.has_trend() => println!("Weights span too wide a range to chart"),
            None => println!("Not enough data for a trend (need at least 2 weights)"),
        },
    }
    Ok(())
}

/// Plot each sample as `*` on a character grid, highest weight at the top.
fn render_chart(series: &WeightSeries, width: usize, height: usize) -> Option<String> {
    let width = width.max(2);
    let height = height.max(2);
    let points = series.plot((width - 1) as f64, (height - 1) as f64)?;
    let (lo, hi) = series.bounds()?;

    let mut grid = vec![vec![' '; width]; height];
    for p in points {
        let col = (p.x.round() as usize).min(width - 1);
        let row = (p.y.round() as usize).min(height - 1);
        grid[row][col] = '*';
    }

    let mut out = String::new();
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            format!("{hi:>6.1}")
        } else if i == height - 1 {
            format!("{lo:>6.1}")
        } else {
            " ".repeat(6)
        };
        let line: String = row.iter().collect();
        out.push_str(&format!("{label} |{}\n", line.trim_end()));
    }
    let first = series.samples().first()?;
    let last = series.latest()?;
    out.push_str(&format!("{} {} .. {}\n", " ".repeat(6), first.date, last.date));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use musclelog_core::{compute_series, DateKey, RecordStore};

    #[test]
    fn chart_places_extremes_on_opposite_rows() {
        let store = RecordStore::new()
            .set_weight(DateKey::parse("2024-01-01").unwrap(), "70")
            .set_weight(DateKey::parse("2024-01-05").unwrap(), "72");
        let chart = render_chart(&compute_series(&store), 11, 5).unwrap();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("  73.0 |"));
        assert!(lines[4].starts_with("  69.0 |"));
        // 72 sits a quarter down from the top, 70 a quarter up from the bottom.
        assert!(lines[1].ends_with('*'));
        assert!(lines[3].contains("|*"));
        assert!(lines[5].contains("2024-01-01 .. 2024-01-05"));
    }

    #[test]
    fn chart_needs_two_samples() {
        let store = RecordStore::new().set_weight(DateKey::parse("2024-01-01").unwrap(), "70");
        assert!(render_chart(&compute_series(&store), 20, 5).is_none());
    }
}
