//! Interactive todo tools exposed via Model Context Protocol
//!
//! Provides `create_todo`, `read_todos`, `update_todo` and `delete_todo` by
//! delegating to the `TodoRepository` store implementation dynamically.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::utils::{parse_created_date, parse_todo_id};
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::store::{CreateTodoInput, Todo, UpdateTodoInput};
use crate::AppState;

#[macros::mcp_tool(
    name = "create_todo",
    description = "Creates a new todo with a description and creation date."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateTodoTool {
    pub description: String,
    #[serde(rename = "createdDate")]
    pub created_date: String,
}

#[macros::mcp_tool(
    name = "read_todos",
    description = "Reads all todos, or a single todo if an id is provided."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ReadTodosTool {
    pub id: Option<String>,
}

#[macros::mcp_tool(
    name = "update_todo",
    description = "Updates the specified todo fields by id."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateTodoTool {
    pub id: String,
    pub description: Option<String>,
    #[serde(rename = "createdDate")]
    pub created_date: Option<String>,
}

#[macros::mcp_tool(name = "delete_todo", description = "Deletes a todo by id.")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteTodoTool {
    pub id: String,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![
        CreateTodoTool::tool(),
        ReadTodosTool::tool(),
        UpdateTodoTool::tool(),
        DeleteTodoTool::tool(),
    ]
}

pub async fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let arguments = json!(tool_call.arguments.unwrap_or_default());

    match tool_call.name.as_str() {
        "create_todo" => {
            let args: CreateTodoTool = match serde_json::from_value(arguments) {
                Ok(value) => value,
                Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
            };

            if let Err(err) = parse_created_date(&args.created_date) {
                return app_error_to_json_rpc(id, err);
            }

            match state
                .store
                .create_todo(CreateTodoInput {
                    description: args.description,
                    created_date: args.created_date,
                })
                .await
            {
                Ok(todo) => text_result(
                    id,
                    format!(
                        "Todo created: {} (Id: {})",
                        todo.description.as_deref().unwrap_or_default(),
                        todo.id
                    ),
                ),
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        "read_todos" => {
            let args: ReadTodosTool = match serde_json::from_value(arguments) {
                Ok(value) => value,
                Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
            };

            let selector = args
                .id
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty());

            let todos = match selector {
                None => state.store.read_todos(None).await,
                Some(raw) => match parse_todo_id(raw) {
                    Some(todo_id) => state.store.read_todos(Some(todo_id)).await,
                    // A malformed id reads as "no matching todo", not an error.
                    None => Ok(Vec::new()),
                },
            };

            match todos {
                Ok(todos) => todos_result(id, todos),
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        "update_todo" => {
            let args: UpdateTodoTool = match serde_json::from_value(arguments) {
                Ok(value) => value,
                Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
            };

            let Some(todo_id) = parse_todo_id(&args.id) else {
                return text_result(id, "Invalid todo id.".to_string());
            };

            // A createdDate that fails to parse is dropped from the partial;
            // the store owns the blank-description policy.
            let input = UpdateTodoInput {
                description: args.description,
                created_date: args
                    .created_date
                    .filter(|value| parse_created_date(value).is_ok()),
            };

            match state.store.update_todo(todo_id, input).await {
                Ok(true) => text_result(id, format!("Todo {todo_id} updated.")),
                Ok(false) => text_result(id, format!("Todo with Id {todo_id} not found.")),
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        "delete_todo" => {
            let args: DeleteTodoTool = match serde_json::from_value(arguments) {
                Ok(value) => value,
                Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
            };

            let Some(todo_id) = parse_todo_id(&args.id) else {
                return text_result(id, "Invalid todo id.".to_string());
            };

            match state.store.delete_todo(todo_id).await {
                Ok(true) => text_result(id, format!("Todo {todo_id} deleted.")),
                Ok(false) => text_result(id, format!("Todo with Id {todo_id} not found.")),
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}

fn text_result(id: Option<Value>, message: String) -> Value {
    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(message, None, None))],
            is_error: None,
            meta: None,
            structured_content: None,
        })
        .expect("tool result serialization"),
    )
}

fn todos_result(id: Option<Value>, todos: Vec<Todo>) -> Value {
    let returned = todos.len();
    let body = serde_json::to_string(&todos).expect("todo list serialization");

    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(body, None, None))],
            is_error: None,
            meta: None,
            structured_content: Some(serde_json::Map::from_iter([
                ("todos".to_string(), json!(todos)),
                ("returned".to_string(), json!(returned)),
            ])),
        })
        .expect("read_todos tool result serialization"),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::{build_tools_list, handle_tools_call};
    use crate::store::SqliteTodoStore;
    use crate::AppState;

    async fn state() -> AppState {
        let store = SqliteTodoStore::in_memory().await.expect("in-memory store");
        AppState::new(Arc::new(store))
    }

    async fn call(state: &AppState, name: &str, arguments: Value) -> Value {
        handle_tools_call(
            state,
            Some(json!(1)),
            Some(json!({ "name": name, "arguments": arguments })),
        )
        .await
    }

    fn result_text(response: &Value) -> &str {
        response["result"]["content"][0]["text"]
            .as_str()
            .expect("text content")
    }

    #[test]
    fn catalog_lists_all_four_tools() {
        let names: Vec<String> = build_tools_list()
            .into_iter()
            .map(|tool| tool.name)
            .collect();

        assert_eq!(
            names,
            vec!["create_todo", "read_todos", "update_todo", "delete_todo"]
        );
    }

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let state = state().await;

        let created = call(
            &state,
            "create_todo",
            json!({ "description": "Buy milk", "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;
        assert_eq!(result_text(&created), "Todo created: Buy milk (Id: 1)");

        let read = call(&state, "read_todos", json!({})).await;
        let todos = read["result"]["structuredContent"]["todos"]
            .as_array()
            .expect("todos array");
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0]["id"], json!(1));
        assert_eq!(todos[0]["description"], json!("Buy milk"));
        assert_eq!(todos[0]["createdDate"], json!("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn create_rejects_invalid_date() {
        let state = state().await;

        let response = call(
            &state,
            "create_todo",
            json!({ "description": "x", "createdDate": "not-a-date" }),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32602));
        assert_eq!(response["error"]["data"]["code"], json!("invalid_created_date"));

        let read = call(&state, "read_todos", json!({})).await;
        assert_eq!(read["result"]["structuredContent"]["returned"], json!(0));
    }

    #[tokio::test]
    async fn create_with_missing_description_is_invalid_params() {
        let state = state().await;

        let response = call(
            &state,
            "create_todo",
            json!({ "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;

        assert_eq!(response["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn blank_update_keeps_description() {
        let state = state().await;
        call(
            &state,
            "create_todo",
            json!({ "description": "Buy milk", "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;

        let updated = call(
            &state,
            "update_todo",
            json!({ "id": "1", "description": "" }),
        )
        .await;
        assert_eq!(result_text(&updated), "Todo 1 updated.");

        let read = call(&state, "read_todos", json!({ "id": "1" })).await;
        let todos = read["result"]["structuredContent"]["todos"]
            .as_array()
            .expect("todos array");
        assert_eq!(todos[0]["description"], json!("Buy milk"));
    }

    #[tokio::test]
    async fn update_unknown_id_reports_not_found() {
        let state = state().await;

        let response = call(
            &state,
            "update_todo",
            json!({ "id": "999", "description": "x" }),
        )
        .await;

        assert_eq!(result_text(&response), "Todo with Id 999 not found.");
    }

    #[tokio::test]
    async fn update_with_malformed_id_is_a_message_not_an_error() {
        let state = state().await;

        let response = call(&state, "update_todo", json!({ "id": "abc" })).await;

        assert!(response.get("error").is_none());
        assert_eq!(result_text(&response), "Invalid todo id.");
    }

    #[tokio::test]
    async fn update_with_missing_id_is_invalid_params() {
        let state = state().await;

        let response = call(&state, "update_todo", json!({ "description": "x" })).await;

        assert_eq!(response["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn update_drops_unparseable_date_but_applies_description() {
        let state = state().await;
        call(
            &state,
            "create_todo",
            json!({ "description": "old", "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;

        let updated = call(
            &state,
            "update_todo",
            json!({ "id": "1", "description": "new", "createdDate": "tomorrow" }),
        )
        .await;
        assert_eq!(result_text(&updated), "Todo 1 updated.");

        let read = call(&state, "read_todos", json!({ "id": "1" })).await;
        let todos = read["result"]["structuredContent"]["todos"]
            .as_array()
            .expect("todos array");
        assert_eq!(todos[0]["description"], json!("new"));
        assert_eq!(todos[0]["createdDate"], json!("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn read_with_malformed_id_returns_empty_set() {
        let state = state().await;
        call(
            &state,
            "create_todo",
            json!({ "description": "present", "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;

        let read = call(&state, "read_todos", json!({ "id": "abc" })).await;

        assert!(read.get("error").is_none());
        assert_eq!(read["result"]["structuredContent"]["returned"], json!(0));
        assert_eq!(result_text(&read), "[]");
    }

    #[tokio::test]
    async fn read_with_non_positive_id_reads_all() {
        let state = state().await;
        for description in ["a", "b"] {
            call(
                &state,
                "create_todo",
                json!({ "description": description, "createdDate": "2024-01-01T00:00:00Z" }),
            )
            .await;
        }

        let read = call(&state, "read_todos", json!({ "id": "0" })).await;

        assert_eq!(read["result"]["structuredContent"]["returned"], json!(2));
    }

    #[tokio::test]
    async fn delete_with_malformed_id_leaves_store_untouched() {
        let state = state().await;
        call(
            &state,
            "create_todo",
            json!({ "description": "survivor", "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;

        let response = call(&state, "delete_todo", json!({ "id": "abc" })).await;
        assert_eq!(result_text(&response), "Invalid todo id.");

        let read = call(&state, "read_todos", json!({})).await;
        assert_eq!(read["result"]["structuredContent"]["returned"], json!(1));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found_second_time() {
        let state = state().await;
        call(
            &state,
            "create_todo",
            json!({ "description": "gone", "createdDate": "2024-01-01T00:00:00Z" }),
        )
        .await;

        let first = call(&state, "delete_todo", json!({ "id": "1" })).await;
        let second = call(&state, "delete_todo", json!({ "id": "1" })).await;

        assert_eq!(result_text(&first), "Todo 1 deleted.");
        assert_eq!(result_text(&second), "Todo with Id 1 not found.");
    }

    #[tokio::test]
    async fn unknown_tool_returns_tool_not_found() {
        let state = state().await;

        let response = call(&state, "bogus_tool", json!({})).await;

        assert_eq!(response["error"]["code"], json!(-32601));
        assert_eq!(response["error"]["data"]["code"], json!("tool_not_found"));
    }
}
