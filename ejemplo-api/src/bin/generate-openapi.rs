//! OpenAPI Specification Generator Binary
//!
//! Writes the Ejemplo OpenAPI specification as JSON to stdout.
//!
//! Usage:
//!   cargo run -p ejemplo-api --bin generate-openapi > openapi.json

use ejemplo_api::ApiDoc;

fn main() {
    match ApiDoc::to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
