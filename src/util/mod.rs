mod segment_tree;

pub use segment_tree::{Interval, SegmentTree};
