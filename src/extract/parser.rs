//! HTML field extraction with CSS selectors
//!
//! This module applies extraction rules to a page body:
//! - Text rules collect the stripped text of every matched element
//! - Attribute rules collect every non-empty attribute value
//! - With no rules at all, the page title and `<h1>` headings are extracted

use crate::extract::{ExtractError, ExtractedData, Extractor, Selector};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector as CssSelector};

/// Field names produced when no selectors are configured
pub const DEFAULT_FIELDS: [&str; 2] = ["title", "h1"];

/// A rule with its query compiled once up front
#[derive(Debug)]
struct CompiledRule {
    name: String,
    css: CssSelector,
    attribute: Option<String>,
}

/// CSS-selector based [`Extractor`]
#[derive(Debug)]
pub struct SelectorExtractor {
    rules: Vec<CompiledRule>,
}

impl SelectorExtractor {
    /// Compiles the given rules
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorExtractor)` - Every query compiled
    /// * `Err(ConfigError)` - A query is not valid CSS
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_scrape::{Extractor, Selector, SelectorExtractor};
    ///
    /// let rules = vec![Selector::parse_arg("links=a@href").unwrap()];
    /// let extractor = SelectorExtractor::new(&rules).unwrap();
    ///
    /// let data = extractor
    ///     .extract(r#"<a href="/one">1</a><a>no href</a><a href="/two">2</a>"#)
    ///     .unwrap();
    /// assert_eq!(data["links"], vec!["/one", "/two"]);
    /// ```
    pub fn new(selectors: &[Selector]) -> Result<Self, ConfigError> {
        let rules = selectors
            .iter()
            .map(|sel| {
                Ok(CompiledRule {
                    name: sel.name.clone(),
                    css: sel.compile()?,
                    attribute: sel.attribute.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { rules })
    }

    /// Names of the fields this extractor produces, in rule order
    pub fn field_names(&self) -> Vec<String> {
        if self.rules.is_empty() {
            DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect()
        } else {
            self.rules.iter().map(|r| r.name.clone()).collect()
        }
    }
}

impl Extractor for SelectorExtractor {
    fn extract(&self, body: &str) -> Result<ExtractedData, ExtractError> {
        let document = Html::parse_document(body);

        if self.rules.is_empty() {
            return default_extraction(&document);
        }

        let mut data = ExtractedData::new();
        for rule in &self.rules {
            let values = document
                .select(&rule.css)
                .filter_map(|element| match &rule.attribute {
                    Some(attr) => element
                        .value()
                        .attr(attr)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string),
                    None => Some(stripped_text(&element)),
                })
                .collect();
            data.insert(rule.name.clone(), values);
        }

        Ok(data)
    }
}

/// Extracts the document title and every `<h1>` heading
fn default_extraction(document: &Html) -> Result<ExtractedData, ExtractError> {
    let title_selector = parse_builtin("title")?;
    let h1_selector = parse_builtin("h1")?;

    let title: Vec<String> = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .into_iter()
        .collect();

    let headings = document
        .select(&h1_selector)
        .map(|element| stripped_text(&element))
        .collect();

    let mut data = ExtractedData::new();
    data.insert("title".to_string(), title);
    data.insert("h1".to_string(), headings);
    Ok(data)
}

fn parse_builtin(query: &str) -> Result<CssSelector, ExtractError> {
    CssSelector::parse(query).map_err(|e| ExtractError::Selector {
        name: query.to_string(),
        message: e.to_string(),
    })
}

/// Concatenates the element's text nodes, each stripped of surrounding whitespace
fn stripped_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
