//! Sidecar document builder.
//!
//! Documents are small and flat, so they are assembled as strings with
//! escaped text, two-space indentation and one element per line.

use quick_xml::escape::escape;

/// One sidecar document under construction.
pub struct NfoDocument {
    root: &'static str,
    body: String,
}

impl NfoDocument {
    pub fn new(root: &'static str) -> Self {
        Self {
            root,
            body: String::new(),
        }
    }

    /// `<name>value</name>`, written even when `value` is empty.
    pub fn tag(&mut self, name: &str, value: &str) -> &mut Self {
        self.line(1, name, &[], value);
        self
    }

    /// Like [`NfoDocument::tag`] but skips blank values.
    pub fn opt_tag(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.tag(name, value.trim());
        }
        self
    }

    /// One element per value, skipping blanks.
    pub fn tags<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> &mut Self {
        for value in values {
            self.opt_tag(name, value.as_ref());
        }
        self
    }

    pub fn tag_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)], value: &str) -> &mut Self {
        self.line(1, name, attrs, value);
        self
    }

    /// `<actor><name>..</name><role>..</role></actor>` block.
    pub fn actor(&mut self, name: &str, role: &str) -> &mut Self {
        self.body.push_str("  <actor>\n");
        self.line(2, "name", &[], name);
        self.line(2, "role", &[], role);
        self.body.push_str("  </actor>\n");
        self
    }

    fn line(&mut self, depth: usize, name: &str, attrs: &[(&str, &str)], value: &str) {
        for _ in 0..depth {
            self.body.push_str("  ");
        }
        self.body.push('<');
        self.body.push_str(name);
        for (key, val) in attrs {
            self.body.push(' ');
            self.body.push_str(key);
            self.body.push_str("=\"");
            self.body.push_str(&escape(*val));
            self.body.push('"');
        }
        self.body.push('>');
        self.body.push_str(&escape(value));
        self.body.push_str("</");
        self.body.push_str(name);
        self.body.push_str(">\n");
    }

    pub fn finish(&self) -> String {
        let mut xml = String::with_capacity(self.body.len() + 64);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.push('<');
        xml.push_str(self.root);
        xml.push_str(">\n");
        xml.push_str(&self.body);
        xml.push_str("</");
        xml.push_str(self.root);
        xml.push_str(">\n");
        xml
    }
}

/// Render a loose JSON value as sidecar text: strings verbatim, numbers in
/// their shortest form, lists as one entry per item.
pub fn text_values(value: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Array(items) => items.iter().flat_map(text_values).collect(),
        Value::Null | Value::Object(_) => Vec::new(),
    }
}

#[cfg(test)]
#[path = "tests/nfo_tests.rs"]
mod tests;
