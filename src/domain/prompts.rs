//! Pre-built prompt templates exposed via Model Context Protocol
//!
//! Provides the `find-nameday`, `names-on-date` and `today-namedays` query
//! templates, each pointing the client at the matching tool.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::calendar::Locale;
use crate::mcp::rpc::{json_rpc_error, json_rpc_error_with_data, json_rpc_result};

#[derive(Debug, Deserialize)]
struct PromptParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

pub fn build_prompts_list() -> Value {
    json!([
        {
            "name": "find-nameday",
            "description": "Find when a specific name has its nameday",
            "arguments": [
                {
                    "name": "name",
                    "description": "The name to search for (e.g. 'Radovan', 'Mária')",
                    "required": true
                },
                {
                    "name": "locale",
                    "description": "Country locale (sk, cz, pl, hu, at, hr, bg, ru, gr, fr, it)",
                    "required": false
                }
            ]
        },
        {
            "name": "names-on-date",
            "description": "Find which names celebrate on a specific date",
            "arguments": [
                {
                    "name": "month",
                    "description": "Month number (1-12)",
                    "required": true
                },
                {
                    "name": "day",
                    "description": "Day of the month (1-31)",
                    "required": true
                },
                {
                    "name": "locale",
                    "description": "Country locale (sk, cz, pl, hu, at, hr, bg, ru, gr, fr, it)",
                    "required": false
                }
            ]
        },
        {
            "name": "today-namedays",
            "description": "Get today's nameday celebrations",
            "arguments": [
                {
                    "name": "locale",
                    "description": "Country locale (sk, cz, pl, hu, at, hr, bg, ru, gr, fr, it)",
                    "required": false
                }
            ]
        }
    ])
}

pub fn handle_prompts_get(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let prompt: PromptParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let args = prompt.arguments.unwrap_or_default();
    let text = match prompt.name.as_str() {
        "find-nameday" => {
            let name = argument_string(&args, "name", "[NAME]");
            let locale = argument_string(&args, "locale", "sk");
            format!(
                "Find when the name \"{name}\" has its nameday in {} (locale: {locale}). \
                 Use the find_name_day tool to get this information.",
                locale_label(&locale)
            )
        }
        "names-on-date" => {
            let month = argument_string(&args, "month", "[MONTH]");
            let day = argument_string(&args, "day", "[DAY]");
            let locale = argument_string(&args, "locale", "sk");
            format!(
                "Find which names have their nameday on {month}/{day} in {} (locale: {locale}). \
                 Use the find_names_by_date tool with month={month} and day={day}.",
                locale_label(&locale)
            )
        }
        "today-namedays" => {
            let locale = argument_string(&args, "locale", "sk");
            format!(
                "Get today's nameday celebrations in {} (locale: {locale}). \
                 Use the get_today_name_days tool to retrieve this information.",
                locale_label(&locale)
            )
        }
        _ => {
            return json_rpc_error_with_data(
                id,
                -32601,
                "Method not found",
                Some(json!({
                    "code": "prompt_not_found",
                    "message": "unknown prompt name",
                    "details": {
                        "name": prompt.name,
                    },
                })),
            )
        }
    };

    json_rpc_result(
        id,
        json!({
            "messages": [
                {
                    "role": "user",
                    "content": {
                        "type": "text",
                        "text": text
                    }
                }
            ]
        }),
    )
}

fn argument_string(args: &Map<String, Value>, key: &str, default: &str) -> String {
    match args.get(key) {
        Some(Value::String(value)) if !value.is_empty() => value.clone(),
        Some(Value::Number(value)) => value.to_string(),
        _ => default.to_string(),
    }
}

/// Country label for a locale code; unknown codes fall back to the uppercased
/// code, as the original service did.
fn locale_label(code: &str) -> String {
    code.parse::<Locale>()
        .map(|locale| locale.display_name().to_string())
        .unwrap_or_else(|_| code.to_ascii_uppercase())
}
