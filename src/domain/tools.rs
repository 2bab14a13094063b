//! Interactive tools exposed via Model Context Protocol
//!
//! Provides the `find_name_day`, `find_names_by_date` and `get_today_name_days`
//! implementations by delegating to the `NamedayProvider` calendar dynamically.

use chrono::{Datelike, Local};
use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::calendar::NamedayProvider;
use crate::domain::utils::{format_date, format_short_date, normalize_locale};
use crate::errors::AppError;
use crate::mcp::rpc::{json_rpc_error, json_rpc_result};

#[derive(Debug, Deserialize)]
pub struct FindNameDayParams {
    pub name: String,
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindNamesByDateParams {
    pub month: u32,
    pub day: u32,
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetTodayNameDaysParams {
    pub locale: Option<String>,
}

#[macros::mcp_tool(
    name = "find_name_day",
    description = "Find when a specific name has its name day"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct FindNameDayTool {
    /// The name to search for (e.g. 'Radovan', 'Mária')
    pub name: String,
    /// Calendar locale (sk, cz, pl, hu, at, hr, bg, ru, gr, fr, it)
    pub locale: Option<String>,
}

#[macros::mcp_tool(
    name = "find_names_by_date",
    description = "Find which names have their name day on a specific date"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct FindNamesByDateTool {
    /// Month (1-12)
    pub month: u32,
    /// Day of the month (1-31)
    pub day: u32,
    /// Calendar locale (sk, cz, pl, hu, at, hr, bg, ru, gr, fr, it)
    pub locale: Option<String>,
}

#[macros::mcp_tool(
    name = "get_today_name_days",
    description = "Get the names that have their name day today"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTodayNameDaysTool {
    /// Calendar locale (sk, cz, pl, hu, at, hr, bg, ru, gr, fr, it)
    pub locale: Option<String>,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![
        FindNameDayTool::tool(),
        FindNamesByDateTool::tool(),
        GetTodayNameDaysTool::tool(),
    ]
}

/// Execute a tool by name. Business failures (bad arguments, unknown locale,
/// impossible dates, unknown tool) become a result with the error flag set,
/// never a protocol error.
pub async fn call_tool(
    calendar: &dyn NamedayProvider,
    name: &str,
    arguments: Value,
) -> CallToolResult {
    match run_tool(calendar, name, arguments).await {
        Ok(text) => text_result(text),
        Err(err) => error_result(format!("Error processing request: {}", err.message())),
    }
}

async fn run_tool(
    calendar: &dyn NamedayProvider,
    name: &str,
    arguments: Value,
) -> Result<String, AppError> {
    match name {
        "find_name_day" => {
            let params: FindNameDayParams = parse_arguments(name, arguments)?;
            let locale = normalize_locale(params.locale)?;

            match calendar.date_for_name(locale, &params.name).await? {
                Some(date) => {
                    let formatted = format_date(date.month, date.day)?;
                    Ok(format!("{} has name day on {formatted}.", params.name))
                }
                None => Ok(format!(
                    "Name \"{}\" was not found in the name day calendar.",
                    params.name
                )),
            }
        }
        "find_names_by_date" => {
            let params: FindNamesByDateParams = parse_arguments(name, arguments)?;
            let locale = normalize_locale(params.locale)?;
            let formatted = format_date(params.month, params.day)?;

            let names = calendar
                .names_for_date(locale, params.month, params.day)
                .await?;
            if names.is_empty() {
                Ok(format!("No names have name days on {formatted}."))
            } else {
                Ok(format!(
                    "{formatted} has name days: {}.",
                    names.join(", ")
                ))
            }
        }
        "get_today_name_days" => {
            let params: GetTodayNameDaysParams = parse_arguments(name, arguments)?;
            let locale = normalize_locale(params.locale)?;

            let today = Local::now().date_naive();
            let date = format_short_date(today.month(), today.day());
            let names = calendar
                .names_for_date(locale, today.month(), today.day())
                .await?;
            if names.is_empty() {
                Ok(format!("Today {date} no names have name days."))
            } else {
                Ok(format!("Today {date} has name days: {}.", names.join(", ")))
            }
        }
        _ => Err(AppError::bad_request(
            "unknown_tool",
            format!("Unknown tool: {name}"),
        )),
    }
}

fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool: &str,
    arguments: Value,
) -> Result<T, AppError> {
    serde_json::from_value(arguments).map_err(|_| {
        AppError::bad_request(
            "invalid_arguments",
            format!("Invalid arguments for tool \"{tool}\""),
        )
    })
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    }
}

fn error_result(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(message, None, None))],
        is_error: Some(true),
        meta: None,
        structured_content: None,
    }
}

pub async fn handle_tools_call(
    calendar: &dyn NamedayProvider,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let arguments = json!(tool_call.arguments.unwrap_or_default());
    let result = call_tool(calendar, &tool_call.name, arguments).await;

    json_rpc_result(
        id,
        serde_json::to_value(result).expect("tool call result serialization"),
    )
}
