//! `linkscope serve` — start the HTTP API.

use crate::pipeline::Analyzer;
use crate::rest;
use anyhow::Result;
use std::sync::Arc;

pub async fn run(port: u16, analyzer: Analyzer) -> Result<()> {
    rest::start(port, Arc::new(analyzer)).await
}
