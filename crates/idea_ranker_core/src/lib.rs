pub mod domain;
pub mod ports;
pub mod rating;
pub mod service;

pub use domain::{Idea, IdeaDraft, NewIdea, RankedIdea, Scores, Session};
pub use ports::{
    IdeaStore, IdentityProvider, PortError, PortResult, SessionCache, SessionChangeStream,
};
pub use rating::{compute_rating, rank, rank_with_positions};
pub use service::{IdeaService, SessionManager, SubmitError, ValidationError};
