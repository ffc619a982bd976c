//! crates/idea_ranker_core/src/rating.rs
//!
//! The rating rule (four 0-100 sub-scores to a 0-5 rating) and the ranking
//! rule applied to a collection of ideas at read time.

use crate::domain::{Idea, RankedIdea, Scores};

/// Ratings at or above this value are flagged in the list view, but only
/// within the first `HOT_POSITIONS` entries.
pub const HOT_THRESHOLD: f64 = 2.0;
pub const HOT_POSITIONS: usize = 3;
/// Positions past this one are shown without a number.
pub const NUMBERED_POSITIONS: usize = 5;

/// Turns four sub-scores into a rating on a 0-5 scale, rounded half-up to
/// one decimal place.
///
/// The inputs are not range-checked here; keeping them in `[0, 100]` is the
/// caller's job.
pub fn compute_rating(simplicity: u8, practicality: u8, appeal: u8, gut_feeling: u8) -> f64 {
    let total = u32::from(simplicity)
        + u32::from(practicality)
        + u32::from(appeal)
        + u32::from(gut_feeling);
    // total / 400 * 5, expressed in tenths, is exactly total / 8.
    let tenths = (f64::from(total) / 8.0).round();
    tenths / 10.0
}

impl Scores {
    pub fn rating(&self) -> f64 {
        compute_rating(
            self.simplicity,
            self.practicality,
            self.appeal,
            self.gut_feeling,
        )
    }
}

impl RankedIdea {
    /// A highly rated idea near the top of the list.
    pub fn is_hot(&self) -> bool {
        self.position <= HOT_POSITIONS && self.idea.rating >= HOT_THRESHOLD
    }

    /// The number shown next to the idea, if it is shown at all.
    pub fn display_position(&self) -> Option<usize> {
        (self.position <= NUMBERED_POSITIONS).then_some(self.position)
    }

    /// The rating as shown in the list: one decimal, or a placeholder at zero.
    pub fn rating_label(&self) -> String {
        if self.idea.rating == 0.0 {
            "Not rated yet".to_string()
        } else {
            format!("{:.1}", self.idea.rating)
        }
    }
}

/// Orders ideas by rating, highest first. Equal ratings keep their input order.
pub fn rank(mut ideas: Vec<Idea>) -> Vec<Idea> {
    // `sort_by` is a stable sort.
    ideas.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ideas
}

/// Ranks the ideas and numbers them from 1.
pub fn rank_with_positions(ideas: Vec<Idea>) -> Vec<RankedIdea> {
    rank(ideas)
        .into_iter()
        .enumerate()
        .map(|(index, idea)| RankedIdea {
            position: index + 1,
            idea,
        })
        .collect()
}
