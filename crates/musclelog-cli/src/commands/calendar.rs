use clap::{Args, ValueEnum};
use musclelog_core::calendar::WEEKDAY_LABELS;
use musclelog_core::{CalendarCell, Config, DateKey, ViewMode};

use super::{date_or_today, open_log, parse_date};

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Week,
    Month,
}

impl From<ViewArg> for ViewMode {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Week => ViewMode::Week,
            ViewArg::Month => ViewMode::Month,
        }
    }
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Selected day as YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<DateKey>,
    /// Grid to show (default: calendar.default_view from config)
    #[arg(long, value_enum)]
    view: Option<ViewArg>,
    /// Print cells as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let log = open_log()?;
    let mode = args
        .view
        .map(ViewMode::from)
        .unwrap_or_else(|| Config::load_or_default().calendar.default_view);
    let selected = date_or_today(args.date);
    let cells = log.calendar(selected, mode);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cells)?);
    } else {
        println!("{}", selected.date().format("%B %Y"));
        print!("{}", render_grid(&cells, mode));
    }
    Ok(())
}

const CELL_WIDTH: usize = 10;

fn render_cell(cell: &CalendarCell, mode: ViewMode) -> String {
    let day = cell.date.date().format("%d").to_string();
    let day = if cell.selected {
        format!("[{day}]")
    } else if mode == ViewMode::Month && !cell.in_month {
        format!("({day})")
    } else {
        format!(" {day} ")
    };
    let markers: String = cell.stamps.iter().map(|p| p.marker()).collect();
    format!("{day}{markers}")
}

fn render_grid(cells: &[CalendarCell], mode: ViewMode) -> String {
    let mut out = String::new();
    let header: Vec<String> = WEEKDAY_LABELS
        .iter()
        .map(|l| format!("{l:<width$}", width = CELL_WIDTH))
        .collect();
    out.push_str(header.concat().trim_end());
    out.push('\n');
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|c| format!("{:<width$}", render_cell(c, mode), width = CELL_WIDTH))
            .collect();
        out.push_str(row.concat().trim_end());
        out.push('\n');
    }
    out
}
