//! Generate `OpenAPI` specification for the points tracker API
//!
//! Prints to stdout, or writes to the path given as first argument.

use api::ApiDoc;
use eyre::WrapErr;
use utoipa::OpenApi;

fn main() -> eyre::Result<()> {
    let openapi = ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&openapi).wrap_err("failed to serialize OpenAPI spec")?;

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, json).wrap_err_with(|| format!("failed to write {path}"))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
