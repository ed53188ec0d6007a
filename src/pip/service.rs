//! PIP filter that partitions candidate points against a polygon set.

use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::PolygonSet;
use crate::models::Located;

/// Points kept by a filter run, in input order, with summary counts
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult<T> {
    pub kept: Vec<T>,
    /// Number of candidates fed in, including ones without a position
    pub total_considered: usize,
    pub total_kept: usize,
}

impl<T> FilterResult<T> {
    fn new(kept: Vec<T>, total_considered: usize) -> Self {
        let total_kept = kept.len();
        Self {
            kept,
            total_considered,
            total_kept,
        }
    }

    /// Candidates that were dropped, whether outside or without a position
    pub fn total_rejected(&self) -> usize {
        self.total_considered - self.total_kept
    }
}

/// Point-in-Polygon filter over a fixed polygon set
pub struct PipFilter<'a> {
    polygons: &'a PolygonSet,
}

impl<'a> PipFilter<'a> {
    pub fn new(polygons: &'a PolygonSet) -> Self {
        Self { polygons }
    }

    /// Whether a single candidate is inside the boundary.
    ///
    /// Candidates without a position are never inside.
    pub fn accepts<T: Located>(&self, candidate: &T) -> bool {
        match candidate.location() {
            Some(c) => self.polygons.contains(c.x, c.y),
            None => {
                trace!("Candidate has no usable coordinates, skipping");
                false
            }
        }
    }

    /// Keep candidates inside the polygon set, preserving order
    pub fn filter<T: Located>(&self, candidates: Vec<T>) -> FilterResult<T> {
        let total = candidates.len();
        debug!("Filtering {} candidates against {} polygons", total, self.polygons.len());

        let kept: Vec<T> = candidates.into_iter().filter(|c| self.accepts(c)).collect();

        let result = FilterResult::new(kept, total);
        info!(
            "Kept {} of {} candidates inside boundary",
            result.total_kept, result.total_considered
        );
        result
    }

    /// Same result as [`PipFilter::filter`], evaluated on the rayon pool
    pub fn filter_par<T: Located + Send>(&self, candidates: Vec<T>) -> FilterResult<T> {
        let total = candidates.len();
        debug!(
            "Filtering {} candidates against {} polygons on {} threads",
            total,
            self.polygons.len(),
            rayon::current_num_threads()
        );

        // Vec collect from a rayon iterator keeps input order.
        let kept: Vec<T> = candidates
            .into_par_iter()
            .filter(|c| self.accepts(c))
            .collect();

        let result = FilterResult::new(kept, total);
        info!(
            "Kept {} of {} candidates inside boundary",
            result.total_kept, result.total_considered
        );
        result
    }
}
