//! Minimal HTML node tree
//!
//! Renderers build output as an explicit tree of [`HtmlNode`]s using typed
//! builder calls and serialize it once at the end. Embedded markup from cell
//! values is imported into the same tree through the `scraper` fragment
//! parser, so the tree never contains unbalanced tags.

pub mod fragment;
pub mod node;

pub use fragment::{element_text, parse_fragment};
pub use node::{HtmlElement, HtmlNode, write_nodes};
