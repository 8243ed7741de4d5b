//! Name to handler mapping for the exposed tools

use crate::error::{Result, ServerError, ToolError};
use futures::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::error;

/// Text result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Turn a tool body's result into its reply, reporting errors as
    /// `Error: <message>`
    pub fn from_result(tool: &str, result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(e) => {
                error!("Tool {} failed: {}", tool, e);
                Self::failure(format!("Error: {}", e.detail()))
            }
        }
    }
}

/// Name, description and argument schema advertised for a tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

type Handler = Box<dyn Fn(Value) -> Result<BoxFuture<'static, ToolOutput>> + Send + Sync>;

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Handler,
}

/// Registry of callable tools, kept in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<&'static str, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler taking typed arguments.
    ///
    /// Arguments that do not deserialize into `A` are rejected before the
    /// handler runs. Registering a name twice replaces the earlier handler.
    pub fn register<A, F, Fut>(
        &mut self,
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        handler: F,
    ) where
        A: DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolOutput> + Send + 'static,
    {
        let handler: Handler = Box::new(move |arguments: Value| -> Result<BoxFuture<'static, ToolOutput>> {
            let args: A = serde_json::from_value(arguments)
                .map_err(|e| ToolError::InvalidArguments(format!("{}: {}", name, e)))?;
            Ok(handler(args).boxed())
        });

        self.tools.insert(
            name,
            RegisteredTool {
                descriptor: ToolDescriptor {
                    name,
                    description,
                    input_schema,
                },
                handler,
            },
        );
    }

    /// Invoke a tool by name. Missing arguments are treated as `{}`.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutput> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ServerError::from(ToolError::UnknownTool(name.to_string())))?;

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let future = (tool.handler)(arguments)?;
        Ok(future.await)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values().map(|tool| &tool.descriptor)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
