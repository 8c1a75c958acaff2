//! Contiguity analysis on the circular week.
//!
//! A selection is contiguous when it forms one unbroken arc of consecutive
//! days modulo 7. Arcs may cross the Saturday→Sunday boundary, so a plain
//! `max - min + 1 == len` range check is not enough: `{5,6,0,1}` is a single
//! arc of length 4.

use super::day::{DAYS_PER_WEEK, Day};
use super::selection::Selection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of analyzing a selection's shape on the week cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcAnalysis {
    /// Whether the selection is one unbroken arc
    pub is_contiguous: bool,
    /// First day of the arc (any valid rotation; `None` when not contiguous or full week)
    pub arc_start: Option<Day>,
    /// Number of days in the arc (equals the selection size when contiguous)
    pub arc_length: usize,
    /// All seven days are selected
    pub is_full_week: bool,
}

impl ArcAnalysis {
    /// Whether the arc crosses the Saturday→Sunday boundary
    pub fn wraps_around(&self) -> bool {
        match self.arc_start {
            Some(start) if self.is_contiguous && !self.is_full_week => {
                start.index() as usize + self.arc_length > DAYS_PER_WEEK
            }
            _ => false,
        }
    }

    /// Last day of the arc (the checkout day)
    pub fn arc_end(&self) -> Option<Day> {
        self.arc_start
            .map(|start| start.offset(self.arc_length.saturating_sub(1)))
    }
}

/// Detect whether `selection` forms a single arc on the 7-day cycle.
///
/// The full week is answered before the arc search: a 7-element set has no
/// unique rotation.
pub fn analyze(selection: &Selection) -> ArcAnalysis {
    let len = selection.len();

    if len == DAYS_PER_WEEK {
        return ArcAnalysis {
            is_contiguous: true,
            arc_start: None,
            arc_length: DAYS_PER_WEEK,
            is_full_week: true,
        };
    }

    if len == 0 {
        return ArcAnalysis {
            is_contiguous: false,
            arc_start: None,
            arc_length: 0,
            is_full_week: false,
        };
    }

    let arc_start = selection.iter().find(|&start| {
        let arc: BTreeSet<Day> = (0..len).map(|n| start.offset(n)).collect();
        selection.iter().eq(arc.into_iter())
    });

    ArcAnalysis {
        is_contiguous: arc_start.is_some(),
        arc_start,
        arc_length: if arc_start.is_some() { len } else { 0 },
        is_full_week: false,
    }
}
