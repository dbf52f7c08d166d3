use std::collections::BTreeSet;
use std::ops::Range;

/// Simplified segment tree over half-open intervals
///
/// Intervals get cloned once per node on which they get stored, so they should be cheap to clone
/// (or wrapped in a reference). Built once from a fixed set of intervals; stab queries after that.
#[derive(Debug)]
pub struct SegmentTree<I: Interval + Clone>(Option<SegmentNode<I>>);

impl<I: Interval + Clone> SegmentTree<I> {
    /// Make a new segment tree containing all the specified intervals
    ///
    /// Empty intervals (where `start == end`) contain no point and are skipped.
    pub fn new(intervals: Vec<I>) -> SegmentTree<I> {
        let intervals: Vec<I> = intervals
            .into_iter()
            .filter(|interval| interval.start() < interval.end())
            .collect();

        // Collect and sort all endpoints, then carve out elementary segments between them
        let endpoints: Vec<I::Endpoint> = intervals
            .iter()
            .flat_map(|interval| [interval.start(), interval.end()])
            .collect::<BTreeSet<I::Endpoint>>()
            .into_iter()
            .collect();

        if endpoints.len() < 2 {
            return SegmentTree(None);
        }

        let mut tree = SegmentTree(Some(Self::build_empty(&endpoints)));
        for interval in intervals {
            tree.insert(interval);
        }
        tree
    }

    /// Find all intervals containing the specified point
    pub fn intervals_containing(&self, point: I::Endpoint) -> Vec<&I> {
        let mut node = match self.0.as_ref() {
            Some(root_node) if root_node.contains(point) => root_node,
            _ => return vec![],
        };

        let mut containing_intervals: Vec<&I> = vec![];
        loop {
            // All intervals on this node contain the point
            containing_intervals.extend(node.intervals());

            // At most one child (if there are any) can continue the search
            if let SegmentNode::Inner {
                left_child,
                right_child,
                ..
            } = node
            {
                if left_child.contains(point) {
                    node = left_child;
                    continue;
                } else if right_child.contains(point) {
                    node = right_child;
                    continue;
                }
            }
            break;
        }

        containing_intervals
    }

    /// Build an empty tree whose leaves are the elementary segments `[e_i, e_i+1)`
    fn build_empty(endpoints: &[I::Endpoint]) -> SegmentNode<I> {
        match endpoints.len() {
            0 | 1 => unreachable!(),
            2 => SegmentNode::Leaf {
                start: endpoints[0],
                end: endpoints[1],
                intervals: vec![],
            },
            n => {
                // Split so that the shared endpoint appears in both halves
                let mid = n / 2;
                let left_child = Box::new(Self::build_empty(&endpoints[..=mid]));
                let right_child = Box::new(Self::build_empty(&endpoints[mid..]));
                SegmentNode::Inner {
                    start: endpoints[0],
                    end: endpoints[n - 1],
                    left_child,
                    right_child,
                    intervals: vec![],
                }
            }
        }
    }

    /// Insert a new interval in the tree
    ///
    /// Invariant: the interval's endpoints must be among the elementary endpoints.
    fn insert(&mut self, interval: I) {
        let mut to_visit: Vec<&mut SegmentNode<I>> = vec![];
        if let Some(root) = self.0.as_mut() {
            to_visit.push(root);
        }

        while let Some(node) = to_visit.pop() {
            // If the node's segment is inside the input interval, store the interval here
            if node.contained_in(&interval) {
                node.push_interval(interval.clone());
                continue;
            }

            if let SegmentNode::Inner {
                ref mut left_child,
                ref mut right_child,
                ..
            } = node
            {
                if left_child.overlaps(&interval) {
                    to_visit.push(left_child);
                }
                if right_child.overlaps(&interval) {
                    to_visit.push(right_child);
                }
            }
        }
    }
}

/// Internal node, covering the half-open segment `[start, end)`
#[derive(Debug)]
enum SegmentNode<I: Interval> {
    Leaf {
        start: I::Endpoint,
        end: I::Endpoint,
        intervals: Vec<I>,
    },
    Inner {
        start: I::Endpoint,
        end: I::Endpoint,
        left_child: Box<SegmentNode<I>>,
        right_child: Box<SegmentNode<I>>,
        intervals: Vec<I>,
    },
}

impl<I: Interval + Clone> SegmentNode<I> {
    fn contains(&self, point: I::Endpoint) -> bool {
        self.start() <= point && point < self.end()
    }

    fn intervals(&self) -> &[I] {
        match self {
            SegmentNode::Leaf { intervals, .. } => intervals,
            SegmentNode::Inner { intervals, .. } => intervals,
        }
    }

    fn push_interval(&mut self, interval: I) {
        match self {
            SegmentNode::Leaf { intervals, .. } => intervals.push(interval),
            SegmentNode::Inner { intervals, .. } => intervals.push(interval),
        }
    }

    /// Is this node's segment fully contained inside the other interval?
    fn contained_in(&self, other: &I) -> bool {
        other.start() <= self.start() && self.end() <= other.end()
    }

    /// Does this node's segment share any point with the other interval?
    fn overlaps(&self, other: &I) -> bool {
        other.start() < self.end() && self.start() < other.end()
    }

    fn start(&self) -> I::Endpoint {
        match self {
            SegmentNode::Leaf { start, .. } => *start,
            SegmentNode::Inner { start, .. } => *start,
        }
    }

    fn end(&self) -> I::Endpoint {
        match self {
            SegmentNode::Leaf { end, .. } => *end,
            SegmentNode::Inner { end, .. } => *end,
        }
    }
}

/// Half-open interval `[start, end)`
pub trait Interval {
    type Endpoint: Ord + Copy + std::fmt::Debug;

    /// Start of the interval (inclusive)
    fn start(&self) -> Self::Endpoint;

    /// End of the interval (exclusive)
    fn end(&self) -> Self::Endpoint;
}

impl<Idx: Copy + Ord + std::fmt::Debug> Interval for Range<Idx> {
    type Endpoint = Idx;

    fn start(&self) -> Idx {
        self.start
    }

    fn end(&self) -> Idx {
        self.end
    }
}
