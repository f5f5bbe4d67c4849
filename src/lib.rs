//! Settings editor for course outline items: section, subsection and unit
//! settings modals that collect partial updates from a set of editors and
//! issue them as one update request.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod model;
pub mod storage;
pub mod tui;
