// Scoring: authenticity, risk, credibility and the combined trust score.

pub mod authenticity;
pub mod credibility;
pub mod risk;
pub mod trust;
