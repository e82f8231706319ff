//! Tool manifest and executor for the chat assistant.
//!
//! Four callable actions: list the product catalog, evaluate an arithmetic
//! expression, read the clock, and search products by name. All of them run
//! locally and synchronously; results are serialized to JSON strings for
//! the follow-up round.

use chrono::Utc;
use serde_json::json;

use crate::models::Product;
use crate::supabase::SupabaseClient;

use super::error::ClaudeError;
use super::expr;
use super::types::Tool;

/// The fixed tool manifest sent with every round-1 request.
#[must_use]
pub fn hub_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_products".to_owned(),
            description: "List the active subscription products. Use when the user asks \
                          about products, prices, or plans."
                .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        },
        Tool {
            name: "calculate".to_owned(),
            description: "Evaluate an arithmetic expression. Use when the user asks for a \
                          calculation."
                .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "expression": {
                        "type": "string",
                        "description": "The expression to evaluate, e.g. '2 + 2' or '100 / 4'",
                    },
                },
                "required": ["expression"],
            }),
        },
        Tool {
            name: "get_current_time".to_owned(),
            description: "Get the current date and time. Use when the user asks about the \
                          time, the date, or 'today'."
                .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        },
        Tool {
            name: "search_products".to_owned(),
            description: "Search products by name. Use when the user mentions a specific \
                          product name or keyword, e.g. 'free', 'monthly', 'yearly'."
                .to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "searchTerm": {
                        "type": "string",
                        "description": "Product name or keyword to search for",
                    },
                },
                "required": ["searchTerm"],
            }),
        },
    ]
}

/// Executes tool calls against the local data sources.
pub struct ToolExecutor<'a> {
    supabase: &'a SupabaseClient,
    access_token: &'a str,
}

impl<'a> ToolExecutor<'a> {
    /// Create a new executor bound to a platform token.
    #[must_use]
    pub const fn new(supabase: &'a SupabaseClient, access_token: &'a str) -> Self {
        Self {
            supabase,
            access_token,
        }
    }

    /// Execute a tool by name.
    ///
    /// # Errors
    ///
    /// Returns [`ClaudeError::ToolExecution`] for unknown tools, missing
    /// inputs, or failed lookups. The caller converts the error into an
    /// `is_error` tool result so the model can recover.
    pub async fn execute(
        &self,
        name: &str,
        input: &serde_json::Value,
    ) -> Result<String, ClaudeError> {
        match name {
            "get_products" => self.get_products().await,
            "calculate" => Self::calculate(input),
            "get_current_time" => Ok(Self::get_current_time()),
            "search_products" => self.search_products(input).await,
            other => Err(ClaudeError::ToolExecution(format!("unknown tool: {other}"))),
        }
    }

    async fn get_products(&self) -> Result<String, ClaudeError> {
        let products = self
            .supabase
            .list_active_products(self.access_token)
            .await
            .map_err(|e| ClaudeError::ToolExecution(format!("failed to list products: {e}")))?;

        Ok(json!({
            "count": products.len(),
            "products": products.iter().map(product_summary).collect::<Vec<_>>(),
        })
        .to_string())
    }

    fn calculate(input: &serde_json::Value) -> Result<String, ClaudeError> {
        let expression = input["expression"].as_str().ok_or_else(|| {
            ClaudeError::ToolExecution("missing required field: expression".to_owned())
        })?;

        let result = expr::evaluate(expression)
            .map_err(|e| ClaudeError::ToolExecution(format!("cannot evaluate: {e}")))?;

        Ok(json!({
            "expression": expression,
            "result": result,
        })
        .to_string())
    }

    fn get_current_time() -> String {
        let now = Utc::now();
        json!({
            "currentTime": now.format("%A, %B %-d, %Y %H:%M:%S UTC").to_string(),
            "timestamp": now.to_rfc3339(),
        })
        .to_string()
    }

    async fn search_products(&self, input: &serde_json::Value) -> Result<String, ClaudeError> {
        let term = input["searchTerm"].as_str().ok_or_else(|| {
            ClaudeError::ToolExecution("missing required field: searchTerm".to_owned())
        })?;

        let products = self
            .supabase
            .search_products(self.access_token, term)
            .await
            .map_err(|e| ClaudeError::ToolExecution(format!("failed to search products: {e}")))?;

        Ok(json!({
            "searchTerm": term,
            "count": products.len(),
            "products": products.iter().map(product_summary).collect::<Vec<_>>(),
        })
        .to_string())
    }
}

fn product_summary(product: &Product) -> serde_json::Value {
    json!({
        "name": product.name,
        "planType": product.plan_type,
        "price": product.price.amount(),
        "durationMonths": product.duration_months,
        "description": product.description,
        "features": product.features,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_names() {
        let names: Vec<String> = hub_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            ["get_products", "calculate", "get_current_time", "search_products"]
        );
    }

    #[test]
    fn test_manifest_schemas_declare_required_inputs() {
        let tools = hub_tools();
        let calculate = tools.iter().find(|t| t.name == "calculate").unwrap();
        assert_eq!(calculate.input_schema["required"][0], "expression");
        let search = tools.iter().find(|t| t.name == "search_products").unwrap();
        assert_eq!(search.input_schema["required"][0], "searchTerm");
    }

    #[test]
    fn test_calculate_tool() {
        let result = ToolExecutor::calculate(&json!({ "expression": "(2 + 3) * 4" })).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["result"], 20.0);
    }

    #[test]
    fn test_calculate_tool_rejects_bad_input() {
        assert!(ToolExecutor::calculate(&json!({})).is_err());
        assert!(ToolExecutor::calculate(&json!({ "expression": "rm -rf" })).is_err());
    }

    #[test]
    fn test_current_time_includes_rfc3339_timestamp() {
        let result = ToolExecutor::get_current_time();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(parsed["timestamp"].as_str().unwrap().contains('T'));
    }
}
