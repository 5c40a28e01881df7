use std::path::PathBuf;

use crate::chart::{self, Canvas, Normalization};
use crate::cli::{GraphMode, Session};
use crate::error::{Result, TallyError};
use crate::reports;

pub fn run(output: &str, mode: GraphMode, independent: bool) -> Result<()> {
    let session = Session::open()?;
    let partition = session.partition(&[])?;
    let settings = &session.settings;
    let canvas = Canvas {
        width: settings.chart_width,
        height: settings.chart_height,
    };
    let skip = settings.chart_skip_groups;

    let (svg, count) = match mode {
        GraphMode::Stacked => {
            let stacked = reports::stacked_chart(&partition, skip, canvas, settings.chart_floor)
                .ok_or_else(nothing_to_chart)?;
            (chart::stacked_svg(&stacked.bands, canvas), stacked.bands.len())
        }
        GraphMode::Lines => {
            let buckets = chart::monthly_buckets(&reports::chart_series(&partition, skip))
                .ok_or_else(nothing_to_chart)?;
            let normalization = if independent {
                Normalization::Independent
            } else {
                Normalization::Joint
            };
            let lines = chart::overlaid_lines(&buckets, canvas, normalization);
            (chart::lines_svg(&lines, canvas), lines.len())
        }
    };

    let path = PathBuf::from(output);
    std::fs::write(&path, svg)?;
    tracing::debug!(path = %path.display(), series = count, "wrote chart");
    println!("Wrote {count} series to {}", path.display());
    Ok(())
}

fn nothing_to_chart() -> TallyError {
    TallyError::Other("No grouping has transactions to chart".to_string())
}
