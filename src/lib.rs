//! linkscope — link classification and risk aggregation.
//!
//! Given a domain, IP, or URL, linkscope fetches the page, extracts
//! every hyperlink, classifies each one with a pre-trained model, and
//! derives aggregate risk insights. The pipeline core lives in
//! [`pipeline`]; the HTTP API ([`rest`]), chart/CSV rendering
//! ([`render`]), and CLI ([`cli`]) are hosts around it.

pub mod classify;
pub mod cli;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod insight;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod rest;
pub mod target;
