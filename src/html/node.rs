//! Owned HTML nodes with a builder API and a serializer

/// Elements that never have children and serialize as `<name/>`
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text content is written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "xmp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
    Comment(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<HtmlNode>,
}

impl HtmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<HtmlNode>) -> Self {
        self.append_child(child);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.append_text(text);
        self
    }

    /// Set an attribute, replacing any existing value
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Append a class to the `class` attribute; empty names are ignored
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() {
            return;
        }
        match self.attributes.iter_mut().find(|(k, _)| k == "class") {
            Some((_, existing)) if existing.is_empty() => class.clone_into(existing),
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.attributes.push(("class".to_string(), class.to_string())),
        }
    }

    pub fn append_child(&mut self, child: impl Into<HtmlNode>) {
        self.children.push(child.into());
    }

    pub fn append_children(&mut self, children: impl IntoIterator<Item = HtmlNode>) {
        self.children.extend(children);
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(HtmlNode::Text(text.into()));
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether text inside this element is written unescaped
    #[must_use]
    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.name.as_str())
    }

    /// Replace the children with the result of `f`
    #[must_use]
    pub fn map_children<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Vec<HtmlNode>) -> Vec<HtmlNode>,
    {
        self.children = f(std::mem::take(&mut self.children));
        self
    }

    /// Serialize this element and its subtree
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }

        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let raw_text = self.is_raw_text();
        for child in &self.children {
            match child {
                HtmlNode::Text(text) if raw_text => out.push_str(text),
                other => other.write_html(out),
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl HtmlNode {
    pub fn write_html(&self, out: &mut String) {
        match self {
            HtmlNode::Element(element) => element.write_html(out),
            HtmlNode::Text(text) => out.push_str(&html_escape::encode_text(text)),
            HtmlNode::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }
}

impl From<HtmlElement> for HtmlNode {
    fn from(element: HtmlElement) -> Self {
        HtmlNode::Element(element)
    }
}

/// Serialize a sequence of sibling nodes
pub fn write_nodes(nodes: &[HtmlNode], out: &mut String) {
    for node in nodes {
        node.write_html(out);
    }
}
