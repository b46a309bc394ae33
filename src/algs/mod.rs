//! Algorithms over triangulations and laminations.

pub mod crush;
pub mod flip_rule;
pub mod shorten;
pub mod twist;

pub use flip_rule::{dual_weight, flipped_weight};
pub use shorten::{shorten, shorten_lamination};
