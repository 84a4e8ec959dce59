//! Interactive visual selection
//!
//! A small two-state machine driving the pick-an-element workflow. While
//! selecting, the hovered element carries a temporary highlight; the
//! highlight is a scoped side effect represented by a [`HighlightGuard`]
//! that restores the element's prior inline style on every exit path
//! (pointer-out, click, cancel, deactivation).

use crate::descriptor::{self, ElementDescriptor, HTML_SNIPPET_MAX};
use crate::dom::{ElementNode, NodePath, PageDom};
use crate::error::{ExtractError, Result};

/// id of the full-viewport overlay installed while selecting
pub const OVERLAY_ID: &str = "teor-selection-overlay";

/// Instructional banner shown while selection is active
pub const INSTRUCTION_BANNER: &str =
    "Clique no elemento que deseja extrair. Pressione Esc para cancelar.";

const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
     background: rgba(0, 0, 0, 0.1); z-index: 999999; pointer-events: none; cursor: crosshair;";

const HIGHLIGHT_STYLE: &str =
    "outline: 2px solid #007bff; background-color: rgba(0, 123, 255, 0.1);";

/// Selection machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    Selecting,
}

/// Undo token for a highlight: remembers the element's prior inline style
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightGuard {
    path: NodePath,
    prior_style: Option<String>,
}

/// Emitted when the user clicks an element while selecting
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub descriptor: ElementDescriptor,
    /// Leading outer HTML of the picked element, highlight-free
    pub preview: String,
}

/// The picker: owns the overlay and the current highlight for the duration
/// of one selection interaction
#[derive(Debug, Default)]
pub struct SelectionSession {
    state: SelectorState,
    highlight: Option<HighlightGuard>,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn is_selecting(&self) -> bool {
        self.state == SelectorState::Selecting
    }

    /// Enter `Selecting`: install the overlay and arm the listeners.
    ///
    /// Activating while already selecting tears the previous overlay down
    /// first, so exactly one overlay ever exists.
    pub fn activate(&mut self, dom: &mut PageDom) {
        self.deactivate(dom);
        if let Some(body) = dom.body() {
            if let Some(body_el) = dom.get_mut(&body) {
                body_el.add_child(
                    ElementNode::new("div")
                        .with_attr("id", OVERLAY_ID)
                        .with_attr("style", OVERLAY_STYLE),
                );
            }
        }
        self.state = SelectorState::Selecting;
        log::debug!("selection activated");
    }

    /// Return to `Idle`, reverting the highlight and removing the overlay.
    /// Safe to call from `Idle`.
    pub fn deactivate(&mut self, dom: &mut PageDom) {
        self.clear_hover(dom);
        if let Some(body) = dom.body() {
            if let Some(body_el) = dom.get_mut(&body) {
                body_el.children.retain(|child| match child {
                    crate::dom::ChildNode::Element(el) => el.id() != Some(OVERLAY_ID),
                    crate::dom::ChildNode::Text(_) => true,
                });
            }
        }
        self.state = SelectorState::Idle;
    }

    /// Pointer moved onto an element: highlight it, reverting any previous
    /// highlight first
    pub fn hover(&mut self, dom: &mut PageDom, path: &NodePath) -> Result<()> {
        if !self.is_selecting() {
            return Err(ExtractError::InvalidRequest(
                "selection mode is not active".to_string(),
            ));
        }
        self.clear_hover(dom);

        let el = dom.get_mut(path).ok_or_else(|| {
            ExtractError::ElementNotResolved("hovered element is gone".to_string())
        })?;
        let prior_style = el.attr("style").map(str::to_string);
        let combined = match &prior_style {
            Some(style) => format!("{style}; {HIGHLIGHT_STYLE}"),
            None => HIGHLIGHT_STYLE.to_string(),
        };
        el.attributes.insert("style".to_string(), combined);
        self.highlight = Some(HighlightGuard {
            path: path.clone(),
            prior_style,
        });
        Ok(())
    }

    /// Pointer left the highlighted element: revert its style
    pub fn clear_hover(&mut self, dom: &mut PageDom) {
        let Some(guard) = self.highlight.take() else { return };
        if let Some(el) = dom.get_mut(&guard.path) {
            match guard.prior_style {
                Some(style) => {
                    el.attributes.insert("style".to_string(), style);
                }
                None => {
                    el.attributes.remove("style");
                }
            }
        }
    }

    /// Click while selecting: capture the element, tear everything down,
    /// and hand the descriptor to the coordinator
    pub fn click(&mut self, dom: &mut PageDom, path: &NodePath) -> Result<SelectionEvent> {
        if !self.is_selecting() {
            return Err(ExtractError::InvalidRequest(
                "selection mode is not active".to_string(),
            ));
        }
        // revert the highlight before capturing, so neither the descriptor
        // nor the preview carries the temporary style
        self.clear_hover(dom);

        let descriptor = descriptor::capture(dom, path).ok_or_else(|| {
            ExtractError::ElementNotResolved("clicked element is gone".to_string())
        })?;
        let preview = dom
            .get(path)
            .map(|el| truncate_chars(&el.outer_html(), HTML_SNIPPET_MAX))
            .unwrap_or_default();

        self.deactivate(dom);
        Ok(SelectionEvent { descriptor, preview })
    }

    /// Escape pressed: leave selection mode without emitting anything
    pub fn cancel(&mut self, dom: &mut PageDom) {
        log::debug!("selection cancelled");
        self.deactivate(dom);
    }
}

/// One-line element description shown in the hover tooltip
pub fn tooltip_text(descriptor: &ElementDescriptor) -> String {
    let mut out = format!("<{}", descriptor.tag_name);
    if let Some(id) = &descriptor.id {
        out.push_str(&format!(" id=\"{id}\""));
    }
    if !descriptor.class_names.is_empty() {
        out.push_str(&format!(" class=\"{}\"", descriptor.class_names.join(" ")));
    }
    out.push('>');
    let snippet: String = descriptor.text_snippet.chars().take(60).collect();
    if !snippet.is_empty() {
        out.push(' ');
        out.push_str(&snippet);
        if descriptor.text_snippet.chars().count() > 60 {
            out.push('…');
        }
    }
    out
}

/// Clamp a tooltip rectangle to the viewport
pub fn clamp_to_viewport(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> (f64, f64) {
    let clamped_x = x.min(viewport_width - width).max(0.0);
    let clamped_y = y.min(viewport_height - height).max(0.0);
    (clamped_x, clamped_y)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Number of selection overlays currently installed in the page
pub fn overlay_count(dom: &PageDom) -> usize {
    dom.iter().filter(|(_, el)| el.id() == Some(OVERLAY_ID)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageDom {
        PageDom::parse(
            "<html><body><div id=\"wrap\">\
             <p id=\"alvo\" style=\"color: red\">texto do alvo</p>\
             <p id=\"outro\">outro texto</p>\
             </div></body></html>",
        )
    }

    fn path_of(dom: &PageDom, id: &str) -> NodePath {
        dom.iter()
            .find(|(_, el)| el.id() == Some(id))
            .map(|(path, _)| path)
            .expect("element")
    }

    #[test]
    fn test_activate_installs_single_overlay() {
        let mut dom = page();
        let mut session = SelectionSession::new();

        session.activate(&mut dom);
        assert!(session.is_selecting());
        assert_eq!(overlay_count(&dom), 1);
    }

    #[test]
    fn test_double_activate_keeps_one_overlay() {
        let mut dom = page();
        let mut session = SelectionSession::new();

        session.activate(&mut dom);
        session.activate(&mut dom);
        assert_eq!(overlay_count(&dom), 1);
        assert!(session.is_selecting());
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut dom = page();
        let mut session = SelectionSession::new();

        session.deactivate(&mut dom);
        assert_eq!(session.state(), SelectorState::Idle);

        session.activate(&mut dom);
        session.deactivate(&mut dom);
        session.deactivate(&mut dom);
        assert_eq!(overlay_count(&dom), 0);
        assert_eq!(session.state(), SelectorState::Idle);
    }

    #[test]
    fn test_hover_applies_and_reverts_style() {
        let mut dom = page();
        let mut session = SelectionSession::new();
        session.activate(&mut dom);

        let target = path_of(&dom, "alvo");
        session.hover(&mut dom, &target).expect("hover");
        let style = dom.get(&target).unwrap().attr("style").unwrap().to_string();
        assert!(style.contains("color: red"));
        assert!(style.contains("outline"));

        session.clear_hover(&mut dom);
        assert_eq!(dom.get(&target).unwrap().attr("style"), Some("color: red"));
    }

    #[test]
    fn test_hover_moves_between_elements() {
        let mut dom = page();
        let mut session = SelectionSession::new();
        session.activate(&mut dom);

        let first = path_of(&dom, "alvo");
        let second = path_of(&dom, "outro");
        session.hover(&mut dom, &first).expect("hover first");
        session.hover(&mut dom, &second).expect("hover second");

        // first reverted, second highlighted
        assert_eq!(dom.get(&first).unwrap().attr("style"), Some("color: red"));
        assert!(dom.get(&second).unwrap().attr("style").unwrap().contains("outline"));
    }

    #[test]
    fn test_hover_requires_selecting() {
        let mut dom = page();
        let mut session = SelectionSession::new();
        let target = path_of(&dom, "alvo");
        assert!(session.hover(&mut dom, &target).is_err());
    }

    #[test]
    fn test_click_emits_clean_event_and_tears_down() {
        let mut dom = page();
        let mut session = SelectionSession::new();
        session.activate(&mut dom);

        let target = path_of(&dom, "alvo");
        session.hover(&mut dom, &target).expect("hover");
        let event = session.click(&mut dom, &target).expect("click");

        assert_eq!(event.descriptor.id.as_deref(), Some("alvo"));
        assert!(event.preview.contains("texto do alvo"));
        // the preview carries the original style, not the highlight
        assert!(!event.preview.contains("outline"));

        assert_eq!(session.state(), SelectorState::Idle);
        assert_eq!(overlay_count(&dom), 0);
        assert_eq!(dom.get(&target).unwrap().attr("style"), Some("color: red"));
    }

    #[test]
    fn test_cancel_reverts_everything_without_event() {
        let mut dom = page();
        let mut session = SelectionSession::new();
        session.activate(&mut dom);

        let target = path_of(&dom, "alvo");
        session.hover(&mut dom, &target).expect("hover");
        session.cancel(&mut dom);

        assert_eq!(session.state(), SelectorState::Idle);
        assert_eq!(overlay_count(&dom), 0);
        assert_eq!(dom.get(&target).unwrap().attr("style"), Some("color: red"));
    }

    #[test]
    fn test_tooltip_text() {
        let dom = page();
        let target = path_of(&dom, "alvo");
        let descriptor = descriptor::capture(&dom, &target).expect("capture");

        let tooltip = tooltip_text(&descriptor);
        assert!(tooltip.starts_with("<p id=\"alvo\">"));
        assert!(tooltip.contains("texto do alvo"));
    }

    #[test]
    fn test_clamp_to_viewport() {
        assert_eq!(clamp_to_viewport(10.0, 20.0, 100.0, 50.0, 800.0, 600.0), (10.0, 20.0));
        assert_eq!(clamp_to_viewport(790.0, 20.0, 100.0, 50.0, 800.0, 600.0), (700.0, 20.0));
        assert_eq!(clamp_to_viewport(-5.0, 590.0, 100.0, 50.0, 800.0, 600.0), (0.0, 550.0));
    }
}
