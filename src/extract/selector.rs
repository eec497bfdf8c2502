//! Extraction rule definition and parsing

use crate::ConfigError;
use serde::Deserialize;

/// A named extraction rule
///
/// Without an attribute the rule yields the text content of each matched
/// element; with one it yields that attribute's value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Selector {
    /// Field name in the extracted data
    pub name: String,

    /// CSS selector
    #[serde(alias = "css")]
    pub query: String,

    /// Attribute to read instead of the text content
    #[serde(default, alias = "attr")]
    pub attribute: Option<String>,
}

impl Selector {
    /// Parses a command-line rule of the form `name=css[@attr]`
    ///
    /// The name ends at the first `=` and the attribute starts after the first
    /// `@` of the remainder. A blank attribute is treated as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scrape::Selector;
    ///
    /// let sel = Selector::parse_arg("links=a.story@href").unwrap();
    /// assert_eq!(sel.name, "links");
    /// assert_eq!(sel.query, "a.story");
    /// assert_eq!(sel.attribute.as_deref(), Some("href"));
    ///
    /// let sel = Selector::parse_arg("title = h1").unwrap();
    /// assert_eq!(sel.query, "h1");
    /// assert_eq!(sel.attribute, None);
    /// ```
    pub fn parse_arg(arg: &str) -> Result<Self, ConfigError> {
        let (name, rest) = arg.split_once('=').ok_or_else(|| {
            ConfigError::InvalidSelector(format!(
                "selector must be in name=css[@attr] format: {}",
                arg
            ))
        })?;

        let (query, attribute) = match rest.split_once('@') {
            Some((query, attr)) => {
                let attr = attr.trim();
                (query, (!attr.is_empty()).then(|| attr.to_string()))
            }
            None => (rest, None),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidSelector(format!(
                "selector name cannot be empty: {}",
                arg
            )));
        }

        Ok(Self {
            name: name.to_string(),
            query: query.trim().to_string(),
            attribute,
        })
    }

    /// Compiles the CSS query
    pub fn compile(&self) -> Result<scraper::Selector, ConfigError> {
        scraper::Selector::parse(&self.query).map_err(|e| {
            ConfigError::InvalidSelector(format!(
                "selector '{}' has invalid query '{}': {}",
                self.name, self.query, e
            ))
        })
    }
}
