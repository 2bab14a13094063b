//! Model Context Protocol static resource providers
//!
//! Exposes calendar metadata as file-like resources under `nameday://` URIs.

use rust_mcp_sdk::schema::{
    ReadResourceContent, ReadResourceRequestParams, ReadResourceResult, Resource,
    TextResourceContents,
};
use serde_json::{json, Value};

use crate::calendar::Locale;
use crate::domain::tools::build_tools_list;
use crate::mcp::rpc::{json_rpc_error, json_rpc_error_with_data, json_rpc_result};

pub const SUPPORTED_LOCALES_RESOURCE_URI: &str = "nameday://supported-locales";
pub const LOCALE_INFO_SK_RESOURCE_URI: &str = "nameday://locale-info/sk";
pub const LOCALE_INFO_CZ_RESOURCE_URI: &str = "nameday://locale-info/cz";
pub const STATISTICS_RESOURCE_URI: &str = "nameday://statistics";

pub fn build_resources_list() -> Vec<Resource> {
    vec![
        Resource {
            annotations: None,
            description: Some("List of supported country locales for nameday data".to_string()),
            icons: vec![],
            meta: None,
            mime_type: Some("application/json".to_string()),
            name: "Supported Locales".to_string(),
            size: None,
            title: None,
            uri: SUPPORTED_LOCALES_RESOURCE_URI.to_string(),
        },
        Resource {
            annotations: None,
            description: Some("Information about Slovakia nameday calendar".to_string()),
            icons: vec![],
            meta: None,
            mime_type: Some("application/json".to_string()),
            name: "Slovakia Nameday Info".to_string(),
            size: None,
            title: None,
            uri: LOCALE_INFO_SK_RESOURCE_URI.to_string(),
        },
        Resource {
            annotations: None,
            description: Some("Information about Czech Republic nameday calendar".to_string()),
            icons: vec![],
            meta: None,
            mime_type: Some("application/json".to_string()),
            name: "Czech Republic Nameday Info".to_string(),
            size: None,
            title: None,
            uri: LOCALE_INFO_CZ_RESOURCE_URI.to_string(),
        },
        Resource {
            annotations: None,
            description: Some("Statistics about available nameday data across all locales".to_string()),
            icons: vec![],
            meta: None,
            mime_type: Some("application/json".to_string()),
            name: "Nameday Statistics".to_string(),
            size: None,
            title: None,
            uri: STATISTICS_RESOURCE_URI.to_string(),
        },
    ]
}

pub fn handle_resources_read(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let content = match resource_read.uri.as_str() {
        SUPPORTED_LOCALES_RESOURCE_URI => json!({
            "locales": Locale::ALL
                .iter()
                .map(|locale| json!({
                    "code": locale.code(),
                    "name": locale.display_name(),
                }))
                .collect::<Vec<_>>(),
            "total": Locale::ALL.len(),
        }),
        LOCALE_INFO_SK_RESOURCE_URI => json!({
            "locale": "sk",
            "name": "Slovakia",
            "description": "Traditional Slovak nameday calendar with Catholic saints and traditional names",
            "calendar_type": "Gregorian",
            "cultural_context": "Catholic tradition, widely celebrated in Slovakia",
        }),
        LOCALE_INFO_CZ_RESOURCE_URI => json!({
            "locale": "cz",
            "name": "Czech Republic",
            "description": "Traditional Czech nameday calendar with Catholic saints and traditional names",
            "calendar_type": "Gregorian",
            "cultural_context": "Catholic tradition, widely celebrated in Czech Republic",
        }),
        STATISTICS_RESOURCE_URI => json!({
            "total_locales": Locale::ALL.len(),
            "supported_countries": Locale::ALL
                .iter()
                .map(|locale| locale.display_name())
                .collect::<Vec<_>>(),
            "tools_available": build_tools_list().len(),
            "features": ["name_lookup", "date_lookup", "today_namedays"],
        }),
        _ => {
            return json_rpc_error_with_data(
                id,
                -32601,
                "Method not found",
                Some(json!({
                    "code": "resource_not_found",
                    "message": "unknown resource uri",
                    "details": {
                        "uri": resource_read.uri,
                    },
                })),
            )
        }
    };

    let result = serde_json::to_value(ReadResourceResult {
        contents: vec![ReadResourceContent::from(TextResourceContents {
            meta: None,
            mime_type: Some("application/json".to_string()),
            text: content.to_string(),
            uri: resource_read.uri,
        })],
        meta: None,
    })
    .expect("read resource result serialization");

    json_rpc_result(id, result)
}
