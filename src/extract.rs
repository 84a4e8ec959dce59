//! Extraction orchestration
//!
//! Turns an [`ExtractionRequest`] into a final, self-contained HTML document:
//! locate the content container for the requested mode, sanitize it, and wrap
//! the cleaned markup in the fixed export template (title, source URL,
//! extraction timestamp, inline styles, no external resources).

use crate::descriptor::{self, ElementDescriptor};
use crate::dom::{escape_attr, escape_text, PageDom};
use crate::error::{ExtractError, Result};
use crate::locate::{self, LocatorConfig, SearchMode};
use crate::sanitize::sanitize;
use chrono::Local;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Marker labels searched for in marker mode, in priority order. Attribute
/// forms ("inteiro-teor", "inteiroteor") are derived by the locator.
pub const DEFAULT_MARKER_TERMS: [&str; 1] = ["Inteiro Teor"];

/// A page handed to the extractor: parsed tree plus its source URL
#[derive(Debug, Clone)]
pub struct Page {
    pub dom: PageDom,
    pub url: String,
}

impl Page {
    /// Parse page HTML captured from `url`
    pub fn new(html: &str, url: impl Into<String>) -> Self {
        Self {
            dom: PageDom::parse(html),
            url: url.into(),
        }
    }
}

/// What to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionMode {
    /// The whole page body, sanitized as-is
    FullPage,
    /// The document block anchored at the site's "Inteiro Teor" marker
    MarkerSearch,
    /// The content block around a user-supplied search term
    CustomTextSearch,
    /// The container around a visually picked element
    VisualSelection,
}

/// An extraction request as received from the panels
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub mode: ExtractionMode,

    /// Search term; required non-empty for customTextSearch, optional
    /// marker override for markerSearch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,

    /// Captured element; required for visualSelection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<ElementDescriptor>,
}

impl ExtractionRequest {
    pub fn full_page() -> Self {
        Self { mode: ExtractionMode::FullPage, search_text: None, descriptor: None }
    }

    pub fn marker_search() -> Self {
        Self { mode: ExtractionMode::MarkerSearch, search_text: None, descriptor: None }
    }

    pub fn custom_search(text: impl Into<String>) -> Self {
        Self {
            mode: ExtractionMode::CustomTextSearch,
            search_text: Some(text.into()),
            descriptor: None,
        }
    }

    pub fn visual(descriptor: ElementDescriptor) -> Self {
        Self {
            mode: ExtractionMode::VisualSelection,
            search_text: None,
            descriptor: Some(descriptor),
        }
    }
}

/// A finished export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub title: String,
    pub html: String,
}

/// A file ready to be saved by the hosting surface
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl DownloadArtifact {
    /// Artifact for an extracted document: `extracao_<date>.html`
    pub fn for_document(document: &ExtractedDocument) -> Self {
        Self {
            filename: format!("extracao_{}.html", Local::now().format("%Y-%m-%d")),
            mime_type: "text/html",
            contents: document.html.clone(),
        }
    }
}

/// Run one extraction against a page.
///
/// Fails with `InvalidRequest` when a mode-required field is missing,
/// `NoContentFound` when a search term exists nowhere in the page, and
/// `ElementNotResolved` when a visual-selection descriptor no longer maps
/// to a live element. Marker search deliberately degrades to the full body
/// instead of failing when the marker is absent.
pub fn extract(page: &Page, request: &ExtractionRequest) -> Result<ExtractedDocument> {
    let body = page
        .dom
        .body()
        .ok_or_else(|| ExtractError::NoContentFound("page has no body".to_string()))?;

    let (container, title) = match request.mode {
        ExtractionMode::FullPage => (body, "Página Completa".to_string()),

        ExtractionMode::MarkerSearch => {
            let override_term = match &request.search_text {
                Some(text) if text.trim().is_empty() => {
                    return Err(ExtractError::InvalidRequest(
                        "marker override must not be blank".to_string(),
                    ));
                }
                Some(text) => Some(text.trim()),
                None => None,
            };
            let terms: Vec<&str> = match override_term {
                Some(term) => vec![term],
                None => DEFAULT_MARKER_TERMS.to_vec(),
            };

            match locate::find_marker(&page.dom, &terms) {
                Some(marker) => {
                    let anchor = locate::anchor_from_marker(&page.dom, &marker);
                    let config = LocatorConfig::for_mode(SearchMode::DocumentGrade);
                    let container =
                        locate::find_container(&page.dom, &anchor, &config, Some(terms[0]));
                    (container, terms[0].to_string())
                }
                None => {
                    // Degrade-not-fail: a page without the marker still has
                    // something worth exporting.
                    log::warn!("marker not found, falling back to full body");
                    (body, "Página Completa".to_string())
                }
            }
        }

        ExtractionMode::CustomTextSearch => {
            let term = request
                .search_text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    ExtractError::InvalidRequest("searchText must not be blank".to_string())
                })?;

            let marker = locate::find_marker(&page.dom, &[term]).ok_or_else(|| {
                ExtractError::NoContentFound(format!("text \"{term}\" not found in page"))
            })?;
            let anchor = locate::anchor_from_marker(&page.dom, &marker);
            let config = LocatorConfig::for_mode(SearchMode::Generic);
            let container = locate::find_container(&page.dom, &anchor, &config, Some(term));
            (container, format!("Conteúdo: \"{term}\""))
        }

        ExtractionMode::VisualSelection => {
            let descriptor = request.descriptor.as_ref().ok_or_else(|| {
                ExtractError::InvalidRequest("visualSelection requires a descriptor".to_string())
            })?;
            let resolved = descriptor::resolve(&page.dom, descriptor).ok_or_else(|| {
                ExtractError::ElementNotResolved(format!(
                    "<{}> could not be re-located in the page",
                    descriptor.tag_name
                ))
            })?;
            let config = LocatorConfig::for_mode(SearchMode::Generic);
            let container = locate::find_container(&page.dom, &resolved, &config, None);
            (container, "Conteúdo Selecionado".to_string())
        }
    };

    let element = page
        .dom
        .get(&container)
        .ok_or_else(|| ExtractError::NoContentFound("container vanished".to_string()))?;
    let clean = sanitize(element);
    let timestamp = Local::now().format("%d/%m/%Y %H:%M").to_string();
    let html = render_document(&title, &page.url, &clean.inner_html(), &timestamp);

    log::info!("extracted \"{}\" ({} bytes)", title, html.len());
    Ok(ExtractedDocument { title, html })
}

/// Assemble the fixed export template: pt-BR document, inline styles only,
/// header with title and source URL, content block, timestamp footer.
pub(crate) fn render_document(title: &str, url: &str, content: &str, timestamp: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            line-height: 1.6;
            margin: 0 auto;
            padding: 20px;
            max-width: 1200px;
        }}
        .header {{
            margin-bottom: 20px;
            padding-bottom: 10px;
            border-bottom: 1px solid #ddd;
        }}
        .content {{
            margin-top: 20px;
        }}
        .footer {{
            margin-top: 30px;
            padding-top: 10px;
            border-top: 1px solid #ddd;
            font-size: 0.8em;
            color: #666;
        }}
    </style>
</head>
<body>
    <div class="header">
        <h1>{escaped_title}</h1>
        <p>URL: <a href="{escaped_url_attr}" target="_blank">{escaped_url}</a></p>
    </div>

    <div class="content">
        {content}
    </div>

    <div class="footer">
        <p>Extraído em: {timestamp}</p>
    </div>
</body>
</html>"#,
        title = escape_text(title),
        escaped_title = escape_text(title),
        escaped_url_attr = escape_attr(url),
        escaped_url = escape_text(url),
        content = content,
        timestamp = escape_text(timestamp),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    const PAGE_URL: &str = "https://www.jusbrasil.com.br/jurisprudencia/123";

    fn marker_page() -> Page {
        let body_text = "decisão ".repeat(200);
        let html = format!(
            "<html><body>\
             <nav class=\"menu\">navegação</nav>\
             <div><h2>Inteiro Teor</h2>\
             <div class=\"x\"><script>track()</script><nav>links</nav>\
             <p>{body_text}</p></div></div>\
             </body></html>"
        );
        Page::new(&html, PAGE_URL)
    }

    #[test]
    fn test_marker_search_extracts_sibling_content() {
        let page = marker_page();
        let doc = extract(&page, &ExtractionRequest::marker_search()).expect("extract");

        assert_eq!(doc.title, "Inteiro Teor");
        assert!(doc.html.contains("decisão"));
        assert!(doc.html.contains("<div class=\"content\">"));
        assert!(!doc.html.contains("<script"));
        assert!(!doc.html.contains("<nav"));
        assert!(doc.html.contains(PAGE_URL));
    }

    #[test]
    fn test_marker_search_degrades_to_body() {
        let page = Page::new(
            "<html><body><p>página sem marcador nenhum</p></body></html>",
            PAGE_URL,
        );
        let doc = extract(&page, &ExtractionRequest::marker_search()).expect("extract");

        assert_eq!(doc.title, "Página Completa");
        assert!(doc.html.contains("página sem marcador"));
    }

    #[test]
    fn test_blank_custom_search_is_invalid() {
        let page = marker_page();
        let err = extract(&page, &ExtractionRequest::custom_search("   ")).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(_)));
    }

    #[test]
    fn test_custom_search_term_not_found() {
        let page = Page::new("<html><body><p>despacho comum</p></body></html>", PAGE_URL);
        let err = extract(&page, &ExtractionRequest::custom_search("Apelação")).unwrap_err();
        assert!(matches!(err, ExtractError::NoContentFound(_)));
    }

    #[test]
    fn test_custom_search_found() {
        let filler = "texto do recurso ".repeat(30);
        let html = format!(
            "<html><body><div class=\"content-area\">\
             <h3>Apelação Cível</h3><div><p>{filler}</p></div>\
             </div></body></html>"
        );
        let page = Page::new(&html, PAGE_URL);
        let doc = extract(&page, &ExtractionRequest::custom_search("Apelação")).expect("extract");

        assert_eq!(doc.title, "Conteúdo: \"Apelação\"");
        assert!(doc.html.contains("texto do recurso"));
    }

    #[test]
    fn test_custom_search_term_in_bare_paragraph() {
        let page = Page::new(
            "<html><body><p>Apelação provida por unanimidade</p></body></html>",
            PAGE_URL,
        );
        let doc = extract(&page, &ExtractionRequest::custom_search("Apelação")).expect("extract");

        assert_eq!(doc.title, "Conteúdo: \"Apelação\"");
        assert!(doc.html.contains("provida por unanimidade"));
    }

    #[test]
    fn test_full_page() {
        let page = Page::new(
            "<html><body><p>tudo</p><script>x()</script></body></html>",
            PAGE_URL,
        );
        let doc = extract(&page, &ExtractionRequest::full_page()).expect("extract");

        assert_eq!(doc.title, "Página Completa");
        assert!(doc.html.contains("tudo"));
        assert!(!doc.html.contains("<script"));
    }

    #[test]
    fn test_visual_selection_requires_descriptor() {
        let page = marker_page();
        let request = ExtractionRequest {
            mode: ExtractionMode::VisualSelection,
            search_text: None,
            descriptor: None,
        };
        let err = extract(&page, &request).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidRequest(_)));
    }

    #[test]
    fn test_visual_selection_unresolved() {
        let page = marker_page();
        let descriptor = ElementDescriptor {
            tag_name: "p".to_string(),
            id: Some("nao-existe".to_string()),
            class_names: vec![],
            text_snippet: "texto inexistente".to_string(),
            inner_html_snippet: String::new(),
            structural_path: vec![],
        };
        let err = extract(&page, &ExtractionRequest::visual(descriptor)).unwrap_err();
        assert!(matches!(err, ExtractError::ElementNotResolved(_)));
    }

    #[test]
    fn test_visual_selection_extracts_container() {
        let filler = "conteúdo selecionado ".repeat(20);
        let html = format!(
            "<html><body><div class=\"main-content\">\
             <p id=\"alvo\">{filler}</p><p>vizinho</p>\
             </div></body></html>"
        );
        let page = Page::new(&html, PAGE_URL);
        let (path, _) = page.dom.iter().find(|(_, el)| el.id() == Some("alvo")).unwrap();
        let descriptor = descriptor::capture(&page.dom, &path).expect("capture");

        let doc = extract(&page, &ExtractionRequest::visual(descriptor)).expect("extract");
        assert_eq!(doc.title, "Conteúdo Selecionado");
        assert!(doc.html.contains("conteúdo selecionado"));
        // the generic-mode container pulls in the whole classed wrapper
        assert!(doc.html.contains("vizinho"));
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::json!({
            "mode": "customTextSearch",
            "searchText": "Apelação"
        });
        let request: ExtractionRequest = serde_json::from_value(json).expect("request");
        assert_eq!(request.mode, ExtractionMode::CustomTextSearch);
        assert_eq!(request.search_text.as_deref(), Some("Apelação"));

        let back = serde_json::to_value(&ExtractionRequest::full_page()).expect("json");
        assert_eq!(back["mode"], "fullPage");
    }

    #[test]
    fn test_artifact_naming() {
        let doc = ExtractedDocument {
            title: "t".to_string(),
            html: "<!DOCTYPE html>".to_string(),
        };
        let artifact = DownloadArtifact::for_document(&doc);
        assert!(artifact.filename.starts_with("extracao_"));
        assert!(artifact.filename.ends_with(".html"));
        assert_eq!(artifact.mime_type, "text/html");
        assert_eq!(artifact.contents, doc.html);
    }

    #[test]
    fn test_template_escapes_metadata() {
        let html = render_document(
            "Conteúdo: \"<b>\"",
            "https://x?a=1&b=2",
            "<p>ok</p>",
            "01/01/2026 12:00",
        );
        assert!(html.contains("Conteúdo: \"&lt;b&gt;\""));
        assert!(html.contains("a=1&amp;b=2"));
        assert!(html.contains("<p>ok</p>"));
    }
}
