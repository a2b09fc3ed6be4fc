//! Drawing benchmark results as a bar chart.
//!
//! The chart is a single node with an HTML table label: one pair of bars per
//! ordering, the node count of the constructed BDD above the node count of
//! the minimised one, with the timings next to them.

use std::fmt::Write as _;
use std::time::Duration;

use crate::analysis::Benchmark;
use crate::error::Result;
use crate::print::dot::escape_html;
use crate::print::{Figure, FigureNode, PrettyPrint};

/// Bar chart of the node counts and timings of a [`Benchmark`].
#[derive(Debug)]
pub struct BenchmarkChart<'a> {
    benchmark: &'a Benchmark<'a>,
    /// Width of the longest bar, in points (default: 300)
    pub bar_width: u32,
    /// Height of each bar, in points (default: 14)
    pub bar_height: u32,
    /// Bar color for the constructed BDDs (default: "#b0b0b0")
    pub bdd_color: &'static str,
    /// Bar color for the minimised BDDs (default: "#1f77b4")
    pub min_bdd_color: &'static str,
}

impl<'a> BenchmarkChart<'a> {
    pub fn new(benchmark: &'a Benchmark<'a>) -> Self {
        Self {
            benchmark,
            bar_width: 300,
            bar_height: 14,
            bdd_color: "#b0b0b0",
            min_bdd_color: "#1f77b4",
        }
    }

    fn width(&self, nodes: usize, max: usize) -> u32 {
        let width = (self.bar_width as u64 * nodes as u64 / max.max(1) as u64) as u32;
        width.max(1)
    }

    fn bar(&self, html: &mut String, nodes: usize, max: usize, color: &str) -> std::fmt::Result {
        write!(
            html,
            "<TD ALIGN=\"LEFT\"><TABLE BORDER=\"0\" CELLPADDING=\"0\" CELLSPACING=\"0\"><TR>\
             <TD FIXEDSIZE=\"TRUE\" WIDTH=\"{}\" HEIGHT=\"{}\" BGCOLOR=\"{}\"></TD>\
             </TR></TABLE></TD><TD ALIGN=\"LEFT\">{}</TD>",
            self.width(nodes, max),
            self.bar_height,
            color,
            nodes
        )
    }

    fn table(&self) -> std::result::Result<String, std::fmt::Error> {
        let results = self.benchmark.results();
        let max = results.iter().map(|r| r.bdd_nodes().max(r.min_bdd_nodes())).max().unwrap_or(1);

        let mut html = String::new();
        write!(html, "<TABLE BORDER=\"0\" CELLSPACING=\"4\" CELLPADDING=\"2\">")?;
        write!(
            html,
            "<TR><TD COLSPAN=\"4\"><B>Results for {}</B></TD></TR>",
            escape_html(self.benchmark.tree().name())
        )?;

        for result in results {
            write!(
                html,
                "<TR><TD ROWSPAN=\"2\" ALIGN=\"RIGHT\">{}</TD>",
                escape_html(&result.ordering_name)
            )?;
            self.bar(&mut html, result.bdd_nodes(), max, self.bdd_color)?;
            write!(
                html,
                "<TD ROWSPAN=\"2\" ALIGN=\"LEFT\">ordering {}<BR/>construction {}<BR/>minimising {}</TD></TR>",
                millis(result.ordering_time),
                millis(result.construction_time),
                millis(result.minimising_time)
            )?;
            write!(html, "<TR>")?;
            self.bar(&mut html, result.min_bdd_nodes(), max, self.min_bdd_color)?;
            write!(html, "</TR>")?;
        }

        write!(
            html,
            "<TR><TD></TD><TD COLSPAN=\"3\" ALIGN=\"LEFT\">\
             <FONT COLOR=\"{}\">&#9632;</FONT> nodes \
             <FONT COLOR=\"{}\">&#9632;</FONT> nodes after minimising</TD></TR>",
            self.bdd_color, self.min_bdd_color
        )?;
        write!(html, "</TABLE>")?;
        Ok(html)
    }
}

fn millis(duration: Duration) -> String {
    format!("{:.3} ms", duration.as_secs_f64() * 1000.0)
}

impl PrettyPrint for BenchmarkChart<'_> {
    fn prepare(&self) -> Result<Figure> {
        let mut figure = Figure::new(format!("Benchmark {}", self.benchmark.tree().name()));
        let mut node = FigureNode::new("chart", self.table()?, "none");
        node.html = true;
        figure.add_node(node);
        Ok(figure)
    }
}
