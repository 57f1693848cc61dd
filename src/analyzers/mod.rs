//! Meal-window extraction and glucose curve aggregation.
//!
//! This module finds meal events in each participant's series, slices the
//! samples around them, joins biometrics, buckets participants into health
//! groups, and reduces the result to mean/std glucose curves.

pub mod aggregate;
pub mod analyzer;
pub mod enrich;
pub mod grade;
pub mod meals;
pub mod profile;
pub mod types;
pub mod utility;
pub mod window;
