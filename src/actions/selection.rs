use crate::actions::{Action, ActionContext, ActionResult, EmptyParams, PanelEvent};
use crate::descriptor::ElementDescriptor;
use crate::error::{ExtractError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Enter visual selection mode on the attached page
#[derive(Default)]
pub struct ActivateSelectionAction;

impl Action for ActivateSelectionAction {
    type Params = EmptyParams;

    fn name(&self) -> &str {
        "activateSelection"
    }

    fn execute_typed(
        &self,
        _params: EmptyParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        let page = context.page.as_deref_mut().ok_or_else(|| {
            ExtractError::NoResponse("no page is attached; reload the page".to_string())
        })?;
        context.selection.activate(&mut page.dom);
        Ok(ActionResult::success())
    }
}

/// Leave visual selection mode; safe when it was never entered
#[derive(Default)]
pub struct DeactivateSelectionAction;

impl Action for DeactivateSelectionAction {
    type Params = EmptyParams;

    fn name(&self) -> &str {
        "deactivateSelection"
    }

    fn execute_typed(
        &self,
        _params: EmptyParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        let page = context.page.as_deref_mut().ok_or_else(|| {
            ExtractError::NoResponse("no page is attached; reload the page".to_string())
        })?;
        context.selection.deactivate(&mut page.dom);
        Ok(ActionResult::success())
    }
}

/// Parameters delivered when the user clicks an element in selection mode
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ElementSelectedParams {
    pub element: ElementDescriptor,

    /// Outer-HTML preview of the picked element
    #[serde(default)]
    pub preview: String,
}

/// Persist a fresh selection and ask for the side panel
#[derive(Default)]
pub struct ElementSelectedAction;

impl Action for ElementSelectedAction {
    type Params = ElementSelectedParams;

    fn name(&self) -> &str {
        "elementSelected"
    }

    fn execute_typed(
        &self,
        params: ElementSelectedParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        context.store.set_selected_element(&params.element)?;
        context.store.set_preview(params.preview);
        context.events.push(PanelEvent::OpenSidePanel);
        Ok(ActionResult::success())
    }
}
