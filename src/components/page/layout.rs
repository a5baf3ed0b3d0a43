use super::{Page, Placeholder, PlaceholderId, CONTAINER_ID, DAILY_CLASS, LOCATION_ATTRIBUTE, PENDING_MARKER};
use crate::error::{page_error, OpenHoursResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One placeholder as declared in a page layout file
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceholderLayout {
    pub location: String,
    #[serde(default)]
    pub daily: bool,
}

#[derive(Debug, Deserialize)]
struct LayoutFile {
    container: Option<String>,
    #[serde(default)]
    placeholders: Vec<PlaceholderLayout>,
}

#[derive(Debug, Clone)]
struct Slot {
    layout: PlaceholderLayout,
    content: Vec<String>,
}

/// In-memory page built from a TOML layout and rendered as HTML
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    has_container: bool,
    slots: Vec<Slot>,
}

impl StaticPage {
    /// A page with the container and the given placeholders
    pub fn new(placeholders: Vec<PlaceholderLayout>) -> Self {
        Self {
            has_container: true,
            slots: placeholders
                .into_iter()
                .map(|layout| Slot { layout, content: Vec::new() })
                .collect(),
        }
    }

    /// A page without the openhours container
    pub fn without_container() -> Self {
        Self::default()
    }

    /// Parse a layout such as:
    ///
    /// ```toml
    /// container = "openhours"
    ///
    /// [[placeholders]]
    /// location = "MAIN"
    /// daily = true
    /// ```
    pub fn from_toml_str(content: &str) -> OpenHoursResult<Self> {
        let file: LayoutFile = toml::from_str(content)?;

        let has_container = match file.container.as_deref() {
            Some(CONTAINER_ID) => true,
            Some(other) => {
                return Err(page_error(&format!(
                    "Unknown container '{}', expected '{}'",
                    other, CONTAINER_ID
                )))
            }
            None => false,
        };

        if !has_container && !file.placeholders.is_empty() {
            return Err(page_error("Placeholders declared outside the openhours container"));
        }

        let mut page = Self::new(file.placeholders);
        page.has_container = has_container;
        Ok(page)
    }

    /// Load a layout file from disk
    pub fn load(path: impl AsRef<Path>) -> OpenHoursResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Current content of a placeholder
    pub fn content(&self, id: PlaceholderId) -> Option<&[String]> {
        self.slots.get(id.0).map(|slot| slot.content.as_slice())
    }

    /// Render the container and its placeholders as HTML
    pub fn to_html(&self) -> String {
        if !self.has_container {
            return String::new();
        }

        let mut html = format!("<div id=\"{}\">\n", CONTAINER_ID);
        for slot in &self.slots {
            let class = if slot.layout.daily {
                format!(" class=\"{}\"", DAILY_CLASS)
            } else {
                String::new()
            };
            html.push_str(&format!(
                "  <div {}=\"{}\"{}>",
                LOCATION_ATTRIBUTE,
                escape_html(&slot.layout.location),
                class
            ));
            for line in &slot.content {
                html.push_str(&format!("<span>{}</span>", escape_html(line)));
            }
            html.push_str("</div>\n");
        }
        html.push_str("</div>\n");
        html
    }
}

impl Page for StaticPage {
    fn has_container(&self) -> bool {
        self.has_container
    }

    fn placeholders(&self) -> Vec<Placeholder> {
        if !self.has_container {
            return Vec::new();
        }
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| Placeholder {
                id: PlaceholderId(index),
                location: slot.layout.location.clone(),
                daily: slot.layout.daily,
            })
            .collect()
    }

    fn clear(&mut self, id: PlaceholderId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.content = vec![PENDING_MARKER.to_string()];
        }
    }

    fn write(&mut self, id: PlaceholderId, lines: &[String]) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.content = lines.to_vec();
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"
        container = "openhours"

        [[placeholders]]
        location = "MAIN"
        daily = true

        [[placeholders]]
        location = "STP"
    "#;

    #[test]
    fn test_parse_layout() {
        let page = StaticPage::from_toml_str(LAYOUT).unwrap();
        assert!(page.has_container());

        let placeholders = page.placeholders();
        assert_eq!(placeholders.len(), 2);
        assert_eq!(placeholders[0].location, "MAIN");
        assert!(placeholders[0].daily);
        assert_eq!(placeholders[1].id, PlaceholderId(1));
        assert!(!placeholders[1].daily);
    }

    #[test]
    fn test_layout_without_container() {
        let page = StaticPage::from_toml_str("").unwrap();
        assert!(!page.has_container());
        assert!(page.placeholders().is_empty());
        assert_eq!(page.to_html(), "");
    }

    #[test]
    fn test_placeholders_need_container() {
        let result = StaticPage::from_toml_str(
            r#"
            [[placeholders]]
            location = "MAIN"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_container_rejected() {
        assert!(StaticPage::from_toml_str(r#"container = "hours""#).is_err());
    }

    #[test]
    fn test_clear_then_write() {
        let mut page = StaticPage::from_toml_str(LAYOUT).unwrap();
        page.clear(PlaceholderId(0));
        assert_eq!(page.content(PlaceholderId(0)), Some(&["-".to_string()][..]));

        page.write(PlaceholderId(0), &["Sun 3/10 - 9am - 9pm".to_string()]);
        assert_eq!(
            page.content(PlaceholderId(0)),
            Some(&["Sun 3/10 - 9am - 9pm".to_string()][..])
        );

        // Out of range ids are ignored
        page.write(PlaceholderId(9), &["nope".to_string()]);
        assert_eq!(page.content(PlaceholderId(9)), None);
    }

    #[test]
    fn test_to_html() {
        let mut page = StaticPage::from_toml_str(LAYOUT).unwrap();
        page.write(PlaceholderId(0), &["Sun 3/10 - 9am & 9pm".to_string(), "Mon 3/11 - <Closed>".to_string()]);
        page.write(PlaceholderId(1), &["No Hours Listed".to_string()]);

        let expected = "<div id=\"openhours\">\n\
            \x20 <div data-openhours-location=\"MAIN\" class=\"dailyHours\"><span>Sun 3/10 - 9am &amp; 9pm</span><span>Mon 3/11 - &lt;Closed&gt;</span></div>\n\
            \x20 <div data-openhours-location=\"STP\"><span>No Hours Listed</span></div>\n\
            </div>\n";
        assert_eq!(page.to_html(), expected);
    }
}
