use crate::pdf::Collection;
use crate::tally::{render_table, tally};

pub fn run(collection: &Collection) {
    print!("{}", render_table(&tally(collection.dimensions())));
}
