// Rendering of keyword trees as nested lists

use serde::{Deserialize, Serialize};
use wikitree_scanner::KeywordNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderFormat {
    Text,
    Json,
    Html,
    Markdown,
}

impl RenderFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(RenderFormat::Text),
            "json" => Some(RenderFormat::Json),
            "html" => Some(RenderFormat::Html),
            "markdown" | "md" => Some(RenderFormat::Markdown),
            _ => None,
        }
    }
}

pub fn render_tree(tree: &KeywordNode, format: RenderFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        RenderFormat::Text => render_text(tree),
        RenderFormat::Json => serde_json::to_string_pretty(tree)?,
        RenderFormat::Html => render_html(tree),
        RenderFormat::Markdown => render_markdown(tree),
    })
}

fn render_text(tree: &KeywordNode) -> String {
    let mut out = String::new();
    out.push_str(&tree.keyword);
    out.push('\n');
    write_text_children(tree, "", &mut out);
    out
}

fn write_text_children(node: &KeywordNode, prefix: &str, out: &mut String) {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };

        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&child.keyword);
        out.push('\n');

        write_text_children(child, &format!("{}{}", prefix, indent), out);
    }
}

fn render_html(tree: &KeywordNode) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>wikitree: {}</title>\n", escape_html(&tree.keyword)));
    html.push_str("</head>\n<body>\n<ul id=\"result\">");
    write_html_item(tree, &mut html);
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

// Each sub-tree gets its own <ul> inside the parent's <li>
fn write_html_item(node: &KeywordNode, html: &mut String) {
    html.push_str("<li>");
    html.push_str(&escape_html(&node.keyword));
    for child in node.children() {
        html.push_str("<ul>");
        write_html_item(child, html);
        html.push_str("</ul>");
    }
    html.push_str("</li>");
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_markdown(tree: &KeywordNode) -> String {
    let mut md = String::new();
    write_markdown_item(tree, 0, &mut md);
    md
}

fn write_markdown_item(node: &KeywordNode, level: usize, md: &mut String) {
    md.push_str(&format!(
        "{}- [{}](<{}>)\n",
        "  ".repeat(level),
        escape_markdown(&node.keyword),
        node.url
    ));
    for child in node.children() {
        write_markdown_item(child, level + 1, md);
    }
}

fn escape_markdown(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '[' | ']' | '\\' | '*' | '_' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
