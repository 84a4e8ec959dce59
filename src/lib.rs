//! # teor-extract
//!
//! A Rust library for extracting the document body ("Inteiro Teor") from
//! JusBrasil pages and exporting it as a self-contained HTML file.
//!
//! ## Features
//!
//! - **Content Location**: Heuristic discovery of the content container
//!   around a marker heading, a search term, or a picked element
//! - **Sanitization**: Strips scripts, page chrome, and noise-classed
//!   elements from the extracted fragment
//! - **Visual Selection**: A selection session with overlay and highlight
//!   bookkeeping, plus descriptors that survive a page reload
//! - **Message Coordination**: A registry of named actions behind a single
//!   coordinator, mirroring the panel message bus
//!
//! ## Extracting a Document
//!
//! ```rust
//! use teor_extract::{extract, ExtractionRequest, Page};
//!
//! # fn main() -> teor_extract::Result<()> {
//! let html = r#"<html><body>
//!     <h2>Inteiro Teor</h2>
//!     <div id="documento"><p>Texto integral da decisão.</p></div>
//! </body></html>"#;
//!
//! let page = Page::new(html, "https://www.jusbrasil.com.br/jurisprudencia/123");
//! let document = extract(&page, &ExtractionRequest::marker_search())?;
//!
//! assert_eq!(document.title, "Inteiro Teor");
//! assert!(document.html.contains("Texto integral"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the Coordinator
//!
//! The panels talk to the page through JSON messages; the [`Coordinator`]
//! routes each one to the matching action over shared state:
//!
//! ```rust
//! use teor_extract::{Coordinator, Message, Page};
//! use serde_json::json;
//!
//! let mut coordinator = Coordinator::default();
//! coordinator.attach_page(Page::new(
//!     "<html><body><h2>Inteiro Teor</h2><div><p>Decisão.</p></div></body></html>",
//!     "https://www.jusbrasil.com.br/jurisprudencia/123",
//! ));
//!
//! let response = coordinator.handle(Message::with_payload(
//!     "extract",
//!     json!({"mode": "markerSearch"}),
//! ));
//! assert!(response.success);
//! ```
//!
//! ## Saving the Result
//!
//! ```rust
//! use teor_extract::{extract, DownloadArtifact, ExtractionRequest, Page};
//!
//! # fn main() -> teor_extract::Result<()> {
//! let page = Page::new(
//!     "<html><body><p>despacho</p></body></html>",
//!     "https://www.jusbrasil.com.br/doc",
//! );
//! let document = extract(&page, &ExtractionRequest::full_page())?;
//! let artifact = DownloadArtifact::for_document(&document);
//! assert!(artifact.filename.starts_with("extracao_"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Owned element tree, positional paths, HTML serialization
//! - [`locate`]: Marker search and content-container discovery
//! - [`sanitize`]: Denylist cleanup and empty-shell removal
//! - [`descriptor`]: Reload-stable element descriptors and re-resolution
//! - [`extract`]: Extraction modes and the export template
//! - [`select`]: Visual selection session and highlight bookkeeping
//! - [`storage`]: Persisted selection state behind a key-value trait
//! - [`actions`]: Named handlers behind the message bus
//! - [`coordinator`]: Message routing, page attachment, domain gating
//! - [`error`]: Error types and result aliases

pub mod actions;
pub mod coordinator;
pub mod descriptor;
pub mod dom;
pub mod error;
pub mod extract;
pub mod locate;
pub mod sanitize;
pub mod select;
pub mod storage;

pub use actions::{Action, ActionContext, ActionRegistry, ActionResult, PanelEvent};
pub use coordinator::{Coordinator, CoordinatorConfig, Message, Response};
pub use descriptor::ElementDescriptor;
pub use dom::{ElementNode, NodePath, PageDom};
pub use error::{ExtractError, Result};
pub use extract::{
    extract, DownloadArtifact, ExtractedDocument, ExtractionMode, ExtractionRequest, Page,
};
pub use select::SelectionSession;
pub use storage::{KeyValueStore, MemoryStore, SelectionStore};
