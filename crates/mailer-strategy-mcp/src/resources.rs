use mailer_strategy_core::{affinities, formats, themes, Industry, TargetAudience};
use serde_json::{json, Value};

pub const THEMES_URI: &str = "mailer://catalog/themes";
pub const FORMATS_URI: &str = "mailer://catalog/formats";
pub const INDUSTRIES_URI: &str = "mailer://catalog/industries";
pub const AUDIENCES_URI: &str = "mailer://catalog/audiences";

#[derive(Debug, Clone, Copy)]
pub struct CatalogResource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

static CATALOG_RESOURCES: [CatalogResource; 4] = [
    CatalogResource {
        uri: THEMES_URI,
        name: "catalog/themes.json",
        description: "Mailer themes with historical ROAS, suited industries and AOV floor.",
        mime_type: "application/json",
    },
    CatalogResource {
        uri: FORMATS_URI,
        name: "catalog/formats.json",
        description: "Mail formats with per-piece cost and minimum audience.",
        mime_type: "application/json",
    },
    CatalogResource {
        uri: INDUSTRIES_URI,
        name: "catalog/industries.json",
        description: "Industry codes accepted by calculate_strategy.",
        mime_type: "application/json",
    },
    CatalogResource {
        uri: AUDIENCES_URI,
        name: "catalog/audiences.json",
        description: "Target audience codes accepted by calculate_strategy.",
        mime_type: "application/json",
    },
];

pub fn resources() -> &'static [CatalogResource] {
    &CATALOG_RESOURCES
}

pub fn themes_value() -> Value {
    json!({
        "themes": themes(),
        "affinities": affinities()
    })
}

pub fn formats_value() -> Value {
    json!({ "formats": formats() })
}

fn industries_value() -> Value {
    let items = Industry::ALL
        .iter()
        .map(|industry| json!({"code": industry.code(), "label": industry.label()}))
        .collect::<Vec<_>>();
    json!({ "industries": items })
}

fn audiences_value() -> Value {
    let items = TargetAudience::ALL
        .iter()
        .map(|audience| json!({"code": audience.code(), "label": audience.label()}))
        .collect::<Vec<_>>();
    json!({ "audiences": items })
}

/// Renders a catalog resource as pretty JSON text.
pub fn resource_text(uri: &str) -> Option<String> {
    let value = match uri {
        THEMES_URI => themes_value(),
        FORMATS_URI => formats_value(),
        INDUSTRIES_URI => industries_value(),
        AUDIENCES_URI => audiences_value(),
        _ => return None,
    };
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_resource_renders() {
        for resource in resources() {
            let text = resource_text(resource.uri).expect("resource text");
            let parsed: Value = serde_json::from_str(&text).expect("valid json");
            assert!(parsed.is_object(), "{}", resource.uri);
        }
    }

    #[test]
    fn themes_resource_keeps_table_order() {
        let value = themes_value();
        let ids = value["themes"]
            .as_array()
            .expect("themes array")
            .iter()
            .filter_map(|t| t["id"].as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids.first().copied(), Some("newMoms"));
        assert_eq!(ids.len(), 7);
        assert_eq!(value["affinities"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn unknown_uri_has_no_text() {
        assert!(resource_text("mailer://catalog/nope").is_none());
    }
}
