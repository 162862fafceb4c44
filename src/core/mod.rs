// Core algorithm exports
pub mod conversations;
pub mod matcher;
pub mod scoring;

pub use conversations::latest_per_conversation;
pub use matcher::Matcher;
pub use scoring::{gpa_bonus, role_bonus, score_job, score_peer, shared_skill_count, Affinity};
