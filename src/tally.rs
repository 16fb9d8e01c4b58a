use crate::paper::PageDimension;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Page counts per format label, iterated in label order.
pub type FormatTally = BTreeMap<String, usize>;

const FORMAT_WIDTH: usize = 27;
const COUNT_WIDTH: usize = 9;

/// Count pages per format. Orientation is not part of the label, so portrait
/// and landscape pages of a standard size share a bucket.
pub fn tally<'a, I>(pages: I) -> FormatTally
where
    I: IntoIterator<Item = &'a PageDimension>,
{
    let mut counts = FormatTally::new();
    for page in pages {
        *counts.entry(page.format(false)).or_insert(0) += 1;
    }
    counts
}

/// Render the tally as a two-column, right-aligned text table.
pub fn render_table(tally: &FormatTally) -> String {
    let mut out = row("Format", "Count");
    out.push_str(&"-".repeat(FORMAT_WIDTH));
    out.push_str("  ");
    out.push_str(&"-".repeat(COUNT_WIDTH - 1));
    out.push('\n');
    for (format, count) in tally {
        out.push_str(&row(format, count));
    }
    out
}

fn row(format: impl Display, count: impl Display) -> String {
    format!(
        "{:>fw$} {:>cw$}\n",
        format,
        count,
        fw = FORMAT_WIDTH,
        cw = COUNT_WIDTH
    )
}
