use clap::Args;
use serde::de::DeserializeOwned;
use tw_core::enums::{AuditAction, EntityType};

/// Filters for `tw audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Entity type, e.g. `solution` or `auth_token`.
    #[arg(long = "entity-type", value_parser = parse_snake::<EntityType>)]
    pub entity_type: Option<EntityType>,
    /// Entity id.
    #[arg(long)]
    pub entity: Option<String>,
    /// Action, e.g. `reflected` or `migrated_v2`.
    #[arg(long, value_parser = parse_snake::<AuditAction>)]
    pub action: Option<AuditAction>,
}

/// Parse a snake_case enum name through its serde representation.
fn parse_snake<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown value '{raw}'"))
}
