//! crates/idea_ranker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Adapters decide how these are stored; the core only cares about their shape.

use serde::{Deserialize, Serialize};

/// The four subjective sub-scores of an idea, each expected in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub simplicity: u8,
    pub practicality: u8,
    pub appeal: u8,
    pub gut_feeling: u8,
}

impl Scores {
    pub fn new(simplicity: u8, practicality: u8, appeal: u8, gut_feeling: u8) -> Self {
        Self {
            simplicity,
            practicality,
            appeal,
            gut_feeling,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// An idea as it sits in the entry form, before it has been persisted.
///
/// `Default` is the untouched form: empty text and all scores at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeaDraft {
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub scores: Scores,
}

impl IdeaDraft {
    /// True when nothing at all was entered. Text is compared untrimmed.
    pub fn is_unmodified(&self) -> bool {
        self.title.is_empty()
            && self.short_description.is_empty()
            && self.full_description.is_empty()
            && self.scores.is_zero()
    }

    /// True when the title or the short description is blank.
    pub fn missing_required_fields(&self) -> bool {
        self.title.trim().is_empty() || self.short_description.trim().is_empty()
    }
}

/// The fields handed to the store on insert: the draft plus its computed rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIdea {
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub scores: Scores,
    pub rating: f64,
}

impl NewIdea {
    /// Attaches the store-assigned id and owner, producing the persisted record.
    pub fn into_idea(self, id: String, owner_id: String) -> Idea {
        Idea {
            id,
            owner_id,
            title: self.title,
            short_description: self.short_description,
            full_description: self.full_description,
            scores: self.scores,
            rating: self.rating,
        }
    }
}

/// A persisted idea. Never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub scores: Scores,
    /// Computed once at submission; not re-derived from `scores` on read.
    pub rating: f64,
}

/// An idea together with its 1-based position in a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIdea {
    pub position: usize,
    #[serde(flatten)]
    pub idea: Idea,
}

/// The signed-in identity, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl Session {
    /// The name used to greet the user: first word of the display name.
    pub fn first_name(&self) -> &str {
        self.display_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or("User")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_is_unmodified() {
        let draft = IdeaDraft::default();
        assert!(draft.is_unmodified());
        assert!(draft.missing_required_fields());
    }

    #[test]
    fn whitespace_counts_as_modified_but_still_missing() {
        let draft = IdeaDraft {
            title: "  ".to_string(),
            ..Default::default()
        };
        assert!(!draft.is_unmodified());
        assert!(draft.missing_required_fields());
    }

    #[test]
    fn score_alone_marks_draft_modified() {
        let draft = IdeaDraft {
            scores: Scores::new(0, 0, 1, 0),
            ..Default::default()
        };
        assert!(!draft.is_unmodified());
    }

    #[test]
    fn filled_required_fields() {
        let draft = IdeaDraft {
            title: "Garden robot".to_string(),
            short_description: "Weeds while I sleep".to_string(),
            ..Default::default()
        };
        assert!(!draft.missing_required_fields());
    }

    #[test]
    fn first_name_falls_back_to_user() {
        let mut session = Session {
            uid: "u1".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            email: None,
            photo_url: None,
        };
        assert_eq!(session.first_name(), "Ada");

        session.display_name = None;
        assert_eq!(session.first_name(), "User");

        session.display_name = Some("   ".to_string());
        assert_eq!(session.first_name(), "User");
    }
}
