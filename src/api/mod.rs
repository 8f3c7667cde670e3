// Public API facade: request conversion, the trust service and the
// response envelope.

pub mod envelope;
pub mod requests;
pub mod service;

pub use envelope::ApiResponse;
pub use requests::{
    AnalyzeReviewRequest, BulkReviewItem, BulkReviewRequest, ImageVerifyRequest, RawReviewerData,
};
pub use service::{BulkAnalysis, BulkSummary, ServiceOptions, TrustService, TrustTrendPoint};
