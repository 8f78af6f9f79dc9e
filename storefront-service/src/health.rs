//! Liveness endpoint

use crate::{error::Result, responses::Reply, routing::PathParams};

const API_VERSION: &str = "1.0.0";

/// `GET /health`
///
/// Always succeeds while the process is serving; it does not touch the
/// database.
pub async fn health(_params: PathParams) -> Result<Reply> {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    Ok(Reply::message("Kamran Sports API is running")
        .with_field("version", API_VERSION)
        .with_field("timestamp", timestamp))
}
