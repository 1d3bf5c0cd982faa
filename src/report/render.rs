use std::path::Path;

use plotly::common::{Line, Mode, Title};
use plotly::histogram::Bins;
use plotly::layout::{Axis, GridPattern, Layout, LayoutGrid, RowOrder};
use plotly::{Bar, Histogram, Plot, Scatter};
use tracing::info;

use crate::config::DASHBOARD_TITLE;
use crate::error::Result;
use crate::report::views::DashboardViews;

const DASHBOARD_HEIGHT: usize = 1800;

/// Lay the five views out as stacked rows of one figure.
pub fn render_dashboard(views: &DashboardViews) -> Plot {
    let mut plot = Plot::new();

    // Row 1: swaps per sender
    let labels: Vec<String> = views.top_senders.iter().map(|s| s.label.clone()).collect();
    let counts: Vec<u64> = views.top_senders.iter().map(|s| s.count).collect();
    let addresses: Vec<String> = views.top_senders.iter().map(|s| s.address.clone()).collect();
    plot.add_trace(
        Bar::new(labels, counts)
            .name("Swaps per Sender")
            .hover_text_array(addresses)
            .hover_template("Address: %{hovertext}<br>Swaps: %{y}<extra></extra>")
            .x_axis("x")
            .y_axis("y"),
    );

    // Row 2: amount0 distribution
    plot.add_trace(
        Histogram::new(views.amount0.clone())
            .name("Amount0 Distribution")
            .n_bins_x(views.amount_bins)
            .x_axis("x2")
            .y_axis("y2"),
    );

    // Row 3: swaps per block range
    let (ranges, range_counts): (Vec<u64>, Vec<u64>) = views.block_range_counts.iter().copied().unzip();
    plot.add_trace(
        Bar::new(ranges, range_counts)
            .name("Swaps per Block Range")
            .x_axis("x3")
            .y_axis("y3"),
    );

    // Row 4: price over blocks
    let (blocks, prices): (Vec<u64>, Vec<f64>) = views.price_series.iter().copied().unzip();
    plot.add_trace(
        Scatter::new(blocks, prices)
            .mode(Mode::Lines)
            .name("Price")
            .line(Line::new().width(1.0))
            .x_axis("x4")
            .y_axis("y4"),
    );

    // Row 5: recovery times, one-block bins
    let limit = views.recovery_limit as f64;
    plot.add_trace(
        Histogram::new(views.recovery_times.clone())
            .name("Recovery Time")
            .auto_bin_x(false)
            .x_bins(Bins::new(0.0, limit, 1.0))
            .hover_template("Blocks: %{x:.0f}<br>Count: %{y}<extra></extra>")
            .x_axis("x5")
            .y_axis("y5"),
    );

    plot.set_layout(dashboard_layout(limit));
    plot
}

fn dashboard_layout(recovery_limit: f64) -> Layout {
    Layout::new()
        .title(Title::with_text(DASHBOARD_TITLE).x(0.5))
        .height(DASHBOARD_HEIGHT)
        .show_legend(false)
        .grid(
            LayoutGrid::new()
                .rows(5)
                .columns(1)
                .pattern(GridPattern::Independent)
                .row_order(RowOrder::TopToBottom),
        )
        .x_axis(Axis::new().title(Title::with_text("Sender Address")))
        .y_axis(Axis::new().title(Title::with_text("Number of Swaps")))
        .x_axis2(Axis::new().title(Title::with_text("Swap Amount")))
        .y_axis2(Axis::new().title(Title::with_text("Frequency")))
        .x_axis3(Axis::new().title(Title::with_text("Block Range")))
        .y_axis3(Axis::new().title(Title::with_text("Number of Swaps")))
        .x_axis4(Axis::new().title(Title::with_text("Block Number")))
        .y_axis4(Axis::new().title(Title::with_text("Price (token1/token0)")))
        .x_axis5(
            Axis::new()
                .title(Title::with_text("Blocks to Recover"))
                .range(vec![0.0, recovery_limit]),
        )
        .y_axis5(Axis::new().title(Title::with_text("Number of Swaps")))
}

/// Write the figure as a standalone HTML page, replacing any previous file.
pub fn write_dashboard(plot: &Plot, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, plot.to_html())?;
    info!("Dashboard saved as {}", path.display());
    Ok(())
}
