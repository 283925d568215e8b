pub mod eval;
pub mod ordering;
pub mod searcher;
pub mod tt;

pub use searcher::{CHECKMATE_SCORE, NEGATIVE_INFINITY, POSITIVE_INFINITY, Searcher};
