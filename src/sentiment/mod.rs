// Sentiment analysis: polarity, subjectivity and manipulation indicators.

pub mod lexical;
pub mod traits;
