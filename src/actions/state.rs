use crate::actions::{Action, ActionContext, ActionResult, EmptyParams, PanelEvent};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Liveness probe for the content surface
#[derive(Default)]
pub struct PingAction;

impl Action for PingAction {
    type Params = EmptyParams;

    fn name(&self) -> &str {
        "ping"
    }

    fn execute_typed(
        &self,
        _params: EmptyParams,
        _context: &mut ActionContext,
    ) -> Result<ActionResult> {
        Ok(ActionResult::success_with(serde_json::json!({
            "message": "content agent active",
        })))
    }
}

/// Parameters carrying a finished export document
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionCompleteParams {
    pub html: String,
}

/// Persist a finished extraction and notify the other panels
#[derive(Default)]
pub struct ExtractionCompleteAction;

impl Action for ExtractionCompleteAction {
    type Params = ExtractionCompleteParams;

    fn name(&self) -> &str {
        "extractionComplete"
    }

    fn execute_typed(
        &self,
        params: ExtractionCompleteParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        context.store.set_extracted_html(params.html.clone());
        context.events.push(PanelEvent::Broadcast {
            action: "extractionComplete".to_string(),
            payload: serde_json::json!({ "html": params.html }),
        });
        Ok(ActionResult::success())
    }
}

/// Drop descriptor, preview, and extraction result together
#[derive(Default)]
pub struct ClearSelectionAction;

impl Action for ClearSelectionAction {
    type Params = EmptyParams;

    fn name(&self) -> &str {
        "clearSelection"
    }

    fn execute_typed(
        &self,
        _params: EmptyParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        context.store.clear();
        Ok(ActionResult::success())
    }
}

/// Load the persisted selection for the side panel
#[derive(Default)]
pub struct GetSelectedElementAction;

impl Action for GetSelectedElementAction {
    type Params = EmptyParams;

    fn name(&self) -> &str {
        "getSelectedElement"
    }

    fn execute_typed(
        &self,
        _params: EmptyParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        let element = context.store.selected_element()?;
        let preview = context.store.preview();
        match (element, preview) {
            (Some(element), Some(preview)) => {
                let mut data = serde_json::json!({
                    "element": element,
                    "preview": preview,
                });
                if let Some(html) = context.store.extracted_html() {
                    data["extractedHTML"] = serde_json::Value::String(html);
                }
                Ok(ActionResult::success_with(data))
            }
            _ => Ok(ActionResult::failure("no element selected")),
        }
    }
}
