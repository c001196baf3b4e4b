pub mod candidates;
pub mod geo;
pub mod swipes;

pub use candidates::{Candidate, CandidateSelector, CANDIDATE_LIMIT};
pub use swipes::{SwipeOutcome, SwipeProcessor};
