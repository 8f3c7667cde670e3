// Text analysis primitives: tokenization, features, lexicons, similarity.

pub mod features;
pub mod lexicon;
pub mod similarity;
