use crate::actions::{Action, ActionContext, ActionResult};
use crate::descriptor::ElementDescriptor;
use crate::error::Result;
use crate::extract::{self, ExtractionRequest};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Run an extraction against the attached page and persist the result
#[derive(Default)]
pub struct ExtractAction;

impl Action for ExtractAction {
    type Params = ExtractionRequest;

    fn name(&self) -> &str {
        "extract"
    }

    fn execute_typed(
        &self,
        params: ExtractionRequest,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        let page = context.page()?;
        let document = extract::extract(page, &params)?;
        context.store.set_extracted_html(document.html.clone());

        Ok(ActionResult::success_with(serde_json::json!({
            "html": document.html,
            "title": document.title,
        })))
    }
}

/// Parameters for extracting a previously picked element
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VisualElementParams {
    /// The descriptor captured during visual selection
    pub element: ElementDescriptor,
}

/// Resolve a stored descriptor back to a live element and extract its
/// container
#[derive(Default)]
pub struct ExtractVisualElementAction;

impl Action for ExtractVisualElementAction {
    type Params = VisualElementParams;

    fn name(&self) -> &str {
        "extractVisualElement"
    }

    fn execute_typed(
        &self,
        params: VisualElementParams,
        context: &mut ActionContext,
    ) -> Result<ActionResult> {
        // Give the page a moment to settle after the selection round-trip
        // before trying to re-locate the element.
        if !context.settle_delay.is_zero() {
            std::thread::sleep(context.settle_delay);
        }

        let request = ExtractionRequest::visual(params.element);
        let page = context.page()?;
        let document = extract::extract(page, &request)?;
        context.store.set_extracted_html(document.html.clone());

        Ok(ActionResult::success_with(serde_json::json!({
            "html": document.html,
            "title": document.title,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::extract::Page;
    use crate::select::SelectionSession;
    use crate::storage::SelectionStore;
    use std::time::Duration;

    fn run(
        action: &impl Action<Params = ExtractionRequest>,
        params: ExtractionRequest,
        page: &mut Page,
        store: &mut SelectionStore,
    ) -> Result<ActionResult> {
        let mut session = SelectionSession::new();
        let mut context = ActionContext {
            page: Some(page),
            store,
            selection: &mut session,
            settle_delay: Duration::ZERO,
            events: Vec::new(),
        };
        action.execute_typed(params, &mut context)
    }

    #[test]
    fn test_extract_persists_result() {
        let mut page = Page::new(
            "<html><body><p>conteúdo da página</p></body></html>",
            "https://www.jusbrasil.com.br/doc",
        );
        let mut store = SelectionStore::in_memory();

        let result = run(
            &ExtractAction,
            ExtractionRequest::full_page(),
            &mut page,
            &mut store,
        )
        .expect("extract");

        assert!(result.success);
        let stored = store.extracted_html().expect("persisted");
        assert!(stored.contains("conteúdo da página"));
    }

    #[test]
    fn test_extract_without_page_is_no_response() {
        let mut store = SelectionStore::in_memory();
        let mut session = SelectionSession::new();
        let mut context = ActionContext {
            page: None,
            store: &mut store,
            selection: &mut session,
            settle_delay: Duration::ZERO,
            events: Vec::new(),
        };

        let err = ExtractAction
            .execute_typed(ExtractionRequest::full_page(), &mut context)
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoResponse(_)));
    }

    #[test]
    fn test_extract_visual_element() {
        let mut page = Page::new(
            "<html><body><div class=\"main-content\">\
             <p id=\"alvo\">parágrafo escolhido pelo usuário com texto</p>\
             </div></body></html>",
            "https://www.jusbrasil.com.br/doc",
        );
        let (path, _) = page.dom.iter().find(|(_, el)| el.id() == Some("alvo")).unwrap();
        let element = crate::descriptor::capture(&page.dom, &path).expect("capture");

        let mut store = SelectionStore::in_memory();
        let mut session = SelectionSession::new();
        let mut context = ActionContext {
            page: Some(&mut page),
            store: &mut store,
            selection: &mut session,
            settle_delay: Duration::ZERO,
            events: Vec::new(),
        };

        let result = ExtractVisualElementAction
            .execute_typed(VisualElementParams { element }, &mut context)
            .expect("extract");
        assert!(result.success);
        assert!(store.extracted_html().unwrap().contains("parágrafo escolhido"));
    }
}
