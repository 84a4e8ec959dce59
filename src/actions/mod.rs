//! Named actions behind the message bus
//!
//! Every request the panels can send maps to one action. Actions follow a
//! registry pattern: typed parameters deserialized from the message payload,
//! a shared mutable context, and a uniform `{success, data, error}` result.
//! Unknown action names produce a failed result with a descriptive error,
//! never a fault.

pub mod extraction;
pub mod selection;
pub mod state;

use crate::error::{ExtractError, Result};
use crate::extract::Page;
use crate::select::SelectionSession;
use crate::storage::SelectionStore;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Side effects a handler asks the coordinator to perform after responding
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Show the side panel (a selection just landed)
    OpenSidePanel,
    /// Re-broadcast a message to the other panels
    Broadcast { action: String, payload: serde_json::Value },
}

/// Shared mutable state handed to every action
pub struct ActionContext<'a> {
    /// The attached page, when the content surface is present
    pub page: Option<&'a mut Page>,
    pub store: &'a mut SelectionStore,
    pub selection: &'a mut SelectionSession,
    /// Pause before resolving a visual selection, letting the page settle
    pub settle_delay: Duration,
    /// Events collected during the handler run
    pub events: Vec<PanelEvent>,
}

impl<'a> ActionContext<'a> {
    /// The attached page, or a NoResponse failure when the content surface
    /// is absent
    pub fn page(&mut self) -> Result<&mut Page> {
        self.page.as_deref_mut().ok_or_else(|| {
            ExtractError::NoResponse("no page is attached; reload the page".to_string())
        })
    }
}

/// Outcome of an action, in the wire shape panels expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn success_with(data: serde_json::Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

impl From<ExtractError> for ActionResult {
    fn from(err: ExtractError) -> Self {
        Self::failure(err.to_string())
    }
}

/// A named handler with typed parameters
pub trait Action {
    type Params: DeserializeOwned + JsonSchema;

    /// Wire name of the action (e.g. "extract")
    fn name(&self) -> &str;

    fn execute_typed(
        &self,
        params: Self::Params,
        context: &mut ActionContext,
    ) -> Result<ActionResult>;

    /// JSON schema of the parameters, for documentation and tooling
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Self::Params))
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Parameters for actions that take none
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmptyParams {}

/// Object-safe wrapper so heterogeneous actions share one registry
trait ErasedAction: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, params: serde_json::Value, context: &mut ActionContext)
        -> Result<ActionResult>;
}

impl<A> ErasedAction for A
where
    A: Action + Send + Sync,
{
    fn name(&self) -> &str {
        Action::name(self)
    }

    fn execute(
        &self,
        params: serde_json::Value,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        let typed: A::Params = serde_json::from_value(params).map_err(|e| {
            ExtractError::InvalidRequest(format!("bad parameters for '{}': {}", self.name(), e))
        })?;
        self.execute_typed(typed, context)
    }
}

/// Dispatch table from action name to handler
pub struct ActionRegistry {
    actions: Vec<Box<dyn ErasedAction>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    /// Registry with every action the panels use
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(state::PingAction);
        registry.register(extraction::ExtractAction);
        registry.register(extraction::ExtractVisualElementAction);
        registry.register(selection::ActivateSelectionAction);
        registry.register(selection::DeactivateSelectionAction);
        registry.register(selection::ElementSelectedAction);
        registry.register(state::ExtractionCompleteAction);
        registry.register(state::ClearSelectionAction);
        registry.register(state::GetSelectedElementAction);
        registry
    }

    pub fn register<A>(&mut self, action: A)
    where
        A: Action + Send + Sync + 'static,
    {
        self.actions.push(Box::new(action));
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Run an action by name. Unknown names fail softly; handler errors
    /// propagate for the caller to convert at its boundary.
    pub fn execute(
        &self,
        name: &str,
        params: serde_json::Value,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        let params = if params.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            params
        };
        match self.actions.iter().find(|a| a.name() == name) {
            Some(action) => action.execute(params, context),
            None => Ok(ActionResult::failure(format!("unsupported action '{name}'"))),
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
