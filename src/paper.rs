/// A standard paper size, in points, stored portrait-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperSize {
    pub name: &'static str,
    pub short: u32,
    pub long: u32,
}

impl PaperSize {
    const fn new(name: &'static str, short: u32, long: u32) -> Self {
        assert!(short <= long);
        PaperSize { name, short, long }
    }

    // Saturates rather than overflowing on absurdly large pages.
    fn distance(&self, short: i64, long: i64) -> u64 {
        short
            .abs_diff(i64::from(self.short))
            .saturating_add(long.abs_diff(i64::from(self.long)))
    }
}

/// Known paper sizes. Lookup ties are resolved in this order.
pub const PAPER_SIZES: &[PaperSize] = &[
    PaperSize::new("A0", 2384, 3370),
    PaperSize::new("A1", 1684, 2384),
    PaperSize::new("A2", 1190, 1684),
    PaperSize::new("A3", 842, 1190),
    PaperSize::new("A4", 595, 842),
    PaperSize::new("A5", 420, 595),
    PaperSize::new("A6", 298, 420),
    PaperSize::new("A7", 210, 298),
    PaperSize::new("A8", 148, 210),
    PaperSize::new("B0", 2835, 4008),
    PaperSize::new("B1", 2004, 2835),
    PaperSize::new("B2", 1417, 2004),
    PaperSize::new("B3", 1001, 1417),
    PaperSize::new("B4", 709, 1001),
    PaperSize::new("B5", 499, 709),
    PaperSize::new("B6", 354, 499),
    PaperSize::new("B7", 249, 354),
    PaperSize::new("B8", 176, 249),
    PaperSize::new("B9", 125, 176),
    PaperSize::new("B10", 88, 125),
    PaperSize::new("C2", 578, 1837),
    PaperSize::new("C3", 578, 919),
    PaperSize::new("C4", 649, 919),
    PaperSize::new("C5", 459, 649),
    PaperSize::new("C6", 323, 459),
    PaperSize::new("Invoice", 396, 612),
    PaperSize::new("Executive", 522, 756),
    PaperSize::new("Letter", 612, 792),
    PaperSize::new("Legal", 612, 1008),
    PaperSize::new("Ledger", 792, 1224),
    PaperSize::new("A4x3", 842, 1785),
    PaperSize::new("A4x4", 842, 2383),
    PaperSize::new("A4x5", 842, 2978),
    PaperSize::new("A4x6", 842, 3573),
    PaperSize::new("A4x7", 842, 4168),
    PaperSize::new("A4x8", 842, 4766),
    PaperSize::new("A4x9", 842, 5361),
    PaperSize::new("A3x3", 1190, 2526),
    PaperSize::new("A3x4", 1190, 3371),
    PaperSize::new("A3x5", 1190, 4213),
    PaperSize::new("A3x6", 1190, 5055),
    PaperSize::new("A3x7", 1190, 5897),
    PaperSize::new("A2x3", 1684, 3573),
    PaperSize::new("A2x4", 1684, 4766),
    PaperSize::new("A2x5", 1684, 5956),
    PaperSize::new("A1x3", 2384, 6742),
    PaperSize::new("A0x2", 3370, 4768),
    PaperSize::new("A0x3", 3370, 7152),
];

/// Maximum Manhattan distance, in points, still reported as an exact match.
pub const TOLERANCE: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Squares count as portrait.
    pub fn of(width: f64, height: f64) -> Self {
        if width <= height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Orientation::Portrait => "-P",
            Orientation::Landscape => "-L",
        }
    }
}

/// Width and height of a page's media box, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimension {
    pub width: f64,
    pub height: f64,
}

impl PageDimension {
    pub fn new(width: f64, height: f64) -> Self {
        PageDimension { width, height }
    }

    pub fn format(&self, with_orientation: bool) -> String {
        classify(self.width, self.height, with_orientation)
    }
}

/// Find the closest table entry for a size given in whole points, in either
/// orientation. Returns the entry and its distance.
pub fn nearest(width: i64, height: i64) -> (&'static PaperSize, u64) {
    let (short, long) = (width.min(height), width.max(height));

    let mut best = (&PAPER_SIZES[0], PAPER_SIZES[0].distance(short, long));
    for size in &PAPER_SIZES[1..] {
        let distance = size.distance(short, long);
        if distance < best.1 {
            best = (size, distance);
        }
    }
    best
}

/// Classify a page size (in points) into a format label.
///
/// Sizes within [`TOLERANCE`] of a table entry are labelled with its name,
/// followed by `-P` or `-L` when `with_orientation` is set. Anything else
/// gets a descriptive label such as `600x800 ~Letter-P(612x792)`, which
/// always carries the orientation.
pub fn classify(width: f64, height: f64, with_orientation: bool) -> String {
    let rounded_width = round_points(width);
    let rounded_height = round_points(height);

    let (size, distance) = nearest(rounded_width, rounded_height);
    let orientation = Orientation::of(width, height);

    if distance <= TOLERANCE {
        return if with_orientation {
            format!("{}{}", size.name, orientation.suffix())
        } else {
            size.name.to_string()
        };
    }

    let (std_width, std_height) = match orientation {
        Orientation::Portrait => (size.short, size.long),
        Orientation::Landscape => (size.long, size.short),
    };

    format!(
        "{}x{} ~{}{}({}x{})",
        rounded_width,
        rounded_height,
        size.name,
        orientation.suffix(),
        std_width,
        std_height
    )
}

// Half-point values round to even, so 594.5 reads as 594.
fn round_points(value: f64) -> i64 {
    value.round_ties_even() as i64
}
