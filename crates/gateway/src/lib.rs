#![forbid(unsafe_code)]

pub mod http;
pub mod repository;

pub use http::{HttpGateway, HttpGatewayConfig};
pub use repository::{
    Gateway, GatewayError, InMemoryGateway, QuestionSource, ReportId, ResultReporter, ResultRow,
};
