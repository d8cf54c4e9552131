//! The `labelscan schema` command.

use labelscan_core::SchemaTemplate;

/// Print the product template as pretty JSON.
pub fn execute() -> anyhow::Result<()> {
    let template = SchemaTemplate::default().to_value();
    println!("{}", serde_json::to_string_pretty(&template)?);
    Ok(())
}
