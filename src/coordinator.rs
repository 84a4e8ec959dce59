//! Message routing between the panels and the page
//!
//! The coordinator owns the shared state (store, selection session, the
//! attached page) and routes each incoming message to the matching action.
//! Page-bound actions are gated twice before dispatch: a page must be
//! attached, and its URL must belong to the supported domain. Every failure
//! becomes a `{success: false, error}` response; nothing faults the caller.

use crate::actions::{ActionContext, ActionRegistry, ActionResult, PanelEvent};
use crate::error::ExtractError;
use crate::extract::Page;
use crate::select::SelectionSession;
use crate::storage::SelectionStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Actions that operate on the live page and need the domain gate
const PAGE_ACTIONS: [&str; 4] = [
    "extract",
    "activateSelection",
    "deactivateSelection",
    "extractVisualElement",
];

/// One request on the message bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub action: String,

    /// Everything besides the action name, handed to the handler as-is
    #[serde(flatten)]
    pub payload: serde_json::Value,
}

impl Message {
    pub fn new(action: impl Into<String>) -> Self {
        Self { action: action.into(), payload: serde_json::Value::Object(Default::default()) }
    }

    pub fn with_payload(action: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { action: action.into(), payload }
    }
}

/// The reply sent back for a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

impl From<ActionResult> for Response {
    fn from(result: ActionResult) -> Self {
        Self { success: result.success, data: result.data, error: result.error }
    }
}

impl From<ExtractError> for Response {
    fn from(err: ExtractError) -> Self {
        Self::failure(err.to_string())
    }
}

/// Coordinator settings
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Domain whose pages the extractor understands
    pub supported_domain: String,
    /// Pause before resolving a visual selection, letting the page settle
    pub settle_delay: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            supported_domain: "jusbrasil.com.br".to_string(),
            settle_delay: Duration::from_millis(100),
        }
    }
}

/// Routes messages to actions over the shared state
pub struct Coordinator {
    config: CoordinatorConfig,
    registry: ActionRegistry,
    store: SelectionStore,
    selection: SelectionSession,
    page: Option<Page>,
    events: Vec<PanelEvent>,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            registry: ActionRegistry::with_defaults(),
            store: SelectionStore::in_memory(),
            selection: SelectionSession::new(),
            page: None,
            events: Vec::new(),
        }
    }

    /// Swap in a freshly loaded page. Any selection in progress on the old
    /// page is gone with it, so the session resets.
    pub fn attach_page(&mut self, page: Page) {
        self.selection = SelectionSession::new();
        self.page = Some(page);
    }

    pub fn detach_page(&mut self) {
        self.selection = SelectionSession::new();
        self.page = None;
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Handle one message and produce its reply
    pub fn handle(&mut self, message: Message) -> Response {
        if message.action.is_empty() {
            return Response::failure("message has no action");
        }

        if PAGE_ACTIONS.contains(&message.action.as_str()) {
            let page = match self.page.as_ref() {
                Some(page) => page,
                None => {
                    return ExtractError::NoResponse(
                        "no page is attached; reload the page".to_string(),
                    )
                    .into();
                }
            };
            if let Err(err) = check_domain(&page.url, &self.config.supported_domain) {
                return err.into();
            }
        }

        log::debug!("dispatching action '{}'", message.action);
        let mut context = ActionContext {
            page: self.page.as_mut(),
            store: &mut self.store,
            selection: &mut self.selection,
            settle_delay: self.config.settle_delay,
            events: Vec::new(),
        };
        let outcome = self
            .registry
            .execute(&message.action, message.payload, &mut context);
        let events = std::mem::take(&mut context.events);
        self.events.extend(events);

        match outcome {
            Ok(result) => result.into(),
            Err(err) => {
                log::warn!("action '{}' failed: {err}", message.action);
                err.into()
            }
        }
    }

    /// Drain the side effects requested by handled messages
    pub fn take_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

/// Accept the supported domain itself and any of its subdomains
fn check_domain(page_url: &str, domain: &str) -> crate::error::Result<()> {
    let parsed = Url::parse(page_url).map_err(|_| {
        ExtractError::DomainMismatch(format!("unparseable page URL: {page_url}"))
    })?;
    let host = parsed.host_str().unwrap_or_default();
    if host == domain || host.ends_with(&format!(".{domain}")) {
        Ok(())
    } else {
        Err(ExtractError::DomainMismatch(format!(
            "page is on '{host}', not '{domain}'"
        )))
    }
}
