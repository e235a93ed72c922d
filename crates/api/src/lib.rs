#![forbid(unsafe_code)]

pub mod client;
pub mod http;
pub mod wire;

pub use client::{ApiError, AssessmentApi, InMemoryAssessmentApi, QuizOverview};
pub use http::{ApiConfig, AuthSession, HttpAssessmentApi};
