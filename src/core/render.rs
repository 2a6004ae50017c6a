//! Renderer module
//!
//! Renders a SymbolMap to different output formats: html, json, jsonl, md

use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;

use crate::core::model::SymbolMap;

/// Default document title
pub const DEFAULT_TITLE: &str = "SVG Preview";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
    Jsonl,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self {
            pretty,
            ..Self::new(format)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// One gallery tile: the key, the source value and the resolved image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub src: Cow<'a, str>,
}

/// Tiles in map order
pub fn tiles(map: &SymbolMap) -> Vec<Tile<'_>> {
    map.iter()
        .map(|entry| Tile {
            name: &entry.name,
            url: &entry.url,
            src: resolve_image_ref(&entry.url),
        })
        .collect()
}

/// Give protocol-relative references (`//host/...`) an `https:` scheme
///
/// Everything else is returned unchanged. Local paths are not rewritten and
/// will not resolve inside the rendered document.
pub fn resolve_image_ref(url: &str) -> Cow<'_, str> {
    if url.starts_with("//") {
        Cow::Owned(format!("https:{}", url))
    } else {
        Cow::Borrowed(url)
    }
}

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape text for a Markdown table cell or link
pub fn escape_markdown(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '|', '[', ']', '(', ')', '<', '>', '\n']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' | '|' | '[' | ']' | '(' | ')' | '<' | '>' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

const HTML_STYLE: &str = r#"          body {
              font-family: Arial, sans-serif;
              display: flex;
              flex-direction: column;
              align-items: center;
              justify-content: flex-start;
              padding: 20px;
              background-color: #f3f3f3;
          }
          .svg-container {
              display: grid;
              grid-template-columns: repeat(auto-fill, minmax(150px, 1fr));
              gap: 20px;
              width: 100%;
          }
          .svg-item {
              text-align: center;
              padding: 10px;
              background: #fff;
              border: 1px solid #ddd;
              border-radius: 8px;
              box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
          }
          .svg-item img {
              max-width: 100%;
              max-height: 100px;
          }
          .svg-item p {
              margin: 10px 0 0;
              font-size: 14px;
              color: #333;
              cursor: pointer;
          }"#;

/// Renderer for symbol maps
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a symbol map to a string
    pub fn render(&self, map: &SymbolMap) -> String {
        match self.config.format {
            OutputFormat::Html => self.render_html(map),
            OutputFormat::Json => self.render_json(map),
            OutputFormat::Jsonl => self.render_jsonl(map),
            OutputFormat::Markdown => self.render_markdown(map),
        }
    }

    /// Render to a writer
    #[allow(dead_code)]
    pub fn render_to<W: Write>(&self, map: &SymbolMap, mut writer: W) -> std::io::Result<()> {
        let output = self.render(map);
        writer.write_all(output.as_bytes())
    }

    /// Render the gallery document
    fn render_html(&self, map: &SymbolMap) -> String {
        let title = escape_html(&self.config.title);

        let items: String = tiles(map)
            .iter()
            .map(|tile| {
                let name = escape_html(tile.name);
                format!(
                    r#"          <div class="svg-item">
              <img src="{src}" alt="{name}" />
              <p class="svg-name" data-name="{name}">{name}</p>
          </div>
"#,
                    src = escape_html(&tile.src),
                    name = name,
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
      <meta charset="UTF-8">
      <meta name="viewport" content="width=device-width, initial-scale=1.0">
      <title>{title}</title>
      <style>
{style}
      </style>
</head>
<body>
      <h1>{title}</h1>
      <div class="svg-container">
{items}      </div>
</body>
</html>
"#,
            title = title,
            style = HTML_STYLE,
            items = items,
        )
    }

    /// Render as a single JSON array of tiles
    fn render_json(&self, map: &SymbolMap) -> String {
        let tiles = tiles(map);
        if self.config.pretty {
            serde_json::to_string_pretty(&tiles).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&tiles).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as JSON Lines (one tile per line)
    fn render_jsonl(&self, map: &SymbolMap) -> String {
        tiles(map)
            .iter()
            .filter_map(|tile| {
                if self.config.pretty {
                    serde_json::to_string_pretty(tile).ok()
                } else {
                    serde_json::to_string(tile).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a Markdown table
    fn render_markdown(&self, map: &SymbolMap) -> String {
        let mut output = format!("# {}\n\n", escape_markdown(&self.config.title));

        if map.is_empty() {
            output.push_str("_No symbols found._\n");
            return output;
        }

        output.push_str("| Name | Preview |\n");
        output.push_str("| --- | --- |\n");
        for tile in tiles(map) {
            let name = escape_markdown(tile.name);
            output.push_str(&format!(
                "| `{}` | ![{}](<{}>) |\n",
                tile.name.replace('`', "'").replace('|', "\\|"),
                name,
                escape_markdown(&tile.src),
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SymbolMap {
        vec![
            ("logo", "//cdn.example.com/logo.svg"),
            ("icon", "https://cdn.example.com/icon.svg"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_resolve_image_ref() {
        assert_eq!(
            resolve_image_ref("//example.com/a.svg"),
            "https://example.com/a.svg"
        );
        assert_eq!(resolve_image_ref("https://x.com/b.svg"), "https://x.com/b.svg");
        assert_eq!(resolve_image_ref("./local.svg"), "./local.svg");
        assert!(matches!(resolve_image_ref("/abs/a.svg"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_html() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a|b"), "a\\|b");
        assert_eq!(escape_markdown("[x](y)"), "\\[x\\]\\(y\\)");
        assert!(matches!(escape_markdown("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_render_html_tiles() {
        let html = Renderer::new(OutputFormat::Html).render(&sample());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>SVG Preview</title>"));
        assert!(html.contains(r#"<img src="https://cdn.example.com/logo.svg" alt="logo" />"#));
        assert!(html.contains(r#"<img src="https://cdn.example.com/icon.svg" alt="icon" />"#));
        assert!(html.contains(r#"<p class="svg-name" data-name="logo">logo</p>"#));
        assert_eq!(html.matches(r#"<div class="svg-item">"#).count(), 2);
    }

    #[test]
    fn test_render_html_preserves_order() {
        let html = Renderer::new(OutputFormat::Html).render(&sample());
        let logo = html.find(r#"data-name="logo""#).unwrap();
        let icon = html.find(r#"data-name="icon""#).unwrap();
        assert!(logo < icon);
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = Renderer::new(OutputFormat::Html);
        assert_eq!(renderer.render(&sample()), renderer.render(&sample()));
    }

    #[test]
    fn test_render_html_escapes_keys_and_values() {
        let map: SymbolMap = vec![(r#"<b>"x"&"#, r#"a.svg" onerror="alert(1)"#)]
            .into_iter()
            .collect();
        let html = Renderer::new(OutputFormat::Html).render(&map);

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;&quot;x&quot;&amp;"));
        assert!(html.contains(r#"src="a.svg&quot; onerror=&quot;alert(1)""#));
    }

    #[test]
    fn test_render_html_empty_map() {
        let html = Renderer::new(OutputFormat::Html).render(&SymbolMap::new());
        assert!(html.contains("<div class=\"svg-container\">\n      </div>"));
        assert!(!html.contains("svg-item\">"));
    }

    #[test]
    fn test_render_html_custom_title_is_escaped() {
        let config = RenderConfig::new(OutputFormat::Html).with_title("Icons <dev>");
        let html = Renderer::with_config(config).render(&sample());
        assert!(html.contains("<title>Icons &lt;dev&gt;</title>"));
        assert!(html.contains("<h1>Icons &lt;dev&gt;</h1>"));
    }

    #[test]
    fn test_render_json() {
        let json = Renderer::new(OutputFormat::Json).render(&sample());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = value.as_array().unwrap();

        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["name"], "logo");
        assert_eq!(arr[0]["url"], "//cdn.example.com/logo.svg");
        assert_eq!(arr[0]["src"], "https://cdn.example.com/logo.svg");
        assert_eq!(arr[1]["name"], "icon");
    }

    #[test]
    fn test_render_json_pretty() {
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let json = Renderer::with_config(config).render(&sample());
        assert!(json.contains('\n'));
        assert!(json.contains("  "));
    }

    #[test]
    fn test_render_jsonl() {
        let output = Renderer::new(OutputFormat::Jsonl).render(&sample());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["src"], "https://cdn.example.com/logo.svg");
    }

    #[test]
    fn test_render_markdown() {
        let md = Renderer::new(OutputFormat::Markdown).render(&sample());
        assert!(md.starts_with("# SVG Preview\n"));
        assert!(md.contains("| `logo` | ![logo](<https://cdn.example.com/logo.svg>) |"));
        assert!(md.contains("| `icon` | ![icon](<https://cdn.example.com/icon.svg>) |"));
    }

    #[test]
    fn test_render_markdown_empty() {
        let md = Renderer::new(OutputFormat::Markdown).render(&SymbolMap::new());
        assert!(md.contains("_No symbols found._"));
    }

    #[test]
    fn test_render_to_writer() {
        let mut buf = Vec::new();
        Renderer::new(OutputFormat::Jsonl)
            .render_to(&sample(), &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 2);
    }
}
