// page.rs
use crate::errors::{Result, ScraperError};
use regex::Regex;
use ::scraper::{ElementRef, Html, Selector};

/// A parsed HTML document. Parsing never fails; broken markup is repaired the
/// way a browser would repair it.
pub struct Page {
    document: Html,
}

/// An element inside a [`Page`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

/// A direct child of a [`Node`], in document order. Comments and other
/// non-content nodes are skipped.
pub enum Child<'a> {
    Element(Node<'a>),
    Text(&'a str),
}

/// What to look for: a tag name, attribute filters and an optional predicate
/// on the element's text.
pub struct Query<'q> {
    tag: &'q str,
    filters: Vec<AttrFilter<'q>>,
    text: Option<TextMatch<'q>>,
}

enum AttrFilter<'q> {
    Equals(&'q str, &'q str),
    HasClass(&'q str),
}

enum TextMatch<'q> {
    Exact(&'q str),
    Pattern(&'q Regex),
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            element: self.document.root_element(),
        }
    }

    pub fn find_first(&self, query: &Query<'_>) -> Result<Option<Node<'_>>> {
        Ok(self.find_all_matching(query)?.into_iter().next())
    }

    /// Every `tag` element carrying the `class` token, in document order.
    pub fn find_all(&self, tag: &str, class: &str) -> Result<Vec<Node<'_>>> {
        self.find_all_matching(&Query::tag(tag).class(class))
    }

    pub fn find_all_matching(&self, query: &Query<'_>) -> Result<Vec<Node<'_>>> {
        let selector = query.selector()?;
        Ok(self
            .document
            .select(&selector)
            .map(|element| Node { element })
            .filter(|node| query.accepts(node))
            .collect())
    }

    /// Like [`Page::find_first`], but a miss is an extraction error for `field`.
    pub fn require(&self, query: &Query<'_>, field: &'static str) -> Result<Node<'_>> {
        self.find_first(query)?
            .ok_or_else(|| ScraperError::missing(field, format!("no match for {query}")))
    }
}

impl<'a> Node<'a> {
    pub fn tag(&self) -> &'a str {
        self.element.value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Whitespace-separated tokens of the `class` attribute, in source order.
    pub fn class_tokens(&self) -> impl Iterator<Item = &'a str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// All descendant text, concatenated.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn children(&self) -> impl Iterator<Item = Child<'a>> {
        self.element.children().filter_map(|child| {
            if let Some(element) = ElementRef::wrap(child) {
                Some(Child::Element(Node { element }))
            } else {
                child.value().as_text().map(|text| Child::Text(&**text))
            }
        })
    }

    /// Searches descendants only, never the node itself.
    pub fn find_first(&self, query: &Query<'_>) -> Result<Option<Node<'a>>> {
        Ok(self.find_all_matching(query)?.into_iter().next())
    }

    pub fn find_all(&self, tag: &str, class: &str) -> Result<Vec<Node<'a>>> {
        self.find_all_matching(&Query::tag(tag).class(class))
    }

    pub fn find_all_matching(&self, query: &Query<'_>) -> Result<Vec<Node<'a>>> {
        let selector = query.selector()?;
        Ok(self
            .element
            .select(&selector)
            .map(|element| Node { element })
            .filter(|node| query.accepts(node))
            .collect())
    }

    pub fn require(&self, query: &Query<'_>, field: &'static str) -> Result<Node<'a>> {
        self.find_first(query)?.ok_or_else(|| {
            ScraperError::missing(field, format!("no match for {query} under <{}>", self.tag()))
        })
    }
}

impl Child<'_> {
    /// Text of the child, whether it is a bare text node or an element.
    pub fn text(&self) -> String {
        match self {
            Child::Element(node) => node.text(),
            Child::Text(text) => text.to_string(),
        }
    }
}

impl<'q> Query<'q> {
    pub fn tag(tag: &'q str) -> Self {
        Self {
            tag,
            filters: Vec::new(),
            text: None,
        }
    }

    pub fn id(self, id: &'q str) -> Self {
        self.attr("id", id)
    }

    /// Attribute must equal `value` exactly. For `class` that means the whole
    /// attribute string, not a single token.
    pub fn attr(mut self, name: &'q str, value: &'q str) -> Self {
        self.filters.push(AttrFilter::Equals(name, value));
        self
    }

    /// `class` attribute must contain `token`.
    pub fn class(mut self, token: &'q str) -> Self {
        self.filters.push(AttrFilter::HasClass(token));
        self
    }

    /// Trimmed text must equal `text` exactly.
    pub fn text(mut self, text: &'q str) -> Self {
        self.text = Some(TextMatch::Exact(text));
        self
    }

    /// Text must contain a match for `pattern`.
    pub fn text_matching(mut self, pattern: &'q Regex) -> Self {
        self.text = Some(TextMatch::Pattern(pattern));
        self
    }

    fn css(&self) -> String {
        let mut css = self.tag.to_string();
        for filter in &self.filters {
            match filter {
                AttrFilter::Equals(name, value) => {
                    css.push_str(&format!("[{name}=\"{}\"]", escape(value)))
                }
                AttrFilter::HasClass(token) => {
                    css.push_str(&format!("[class~=\"{}\"]", escape(token)))
                }
            }
        }
        css
    }

    fn selector(&self) -> Result<Selector> {
        let css = self.css();
        Selector::parse(&css).map_err(|e| ScraperError::Selector(format!("{css}: {e}")))
    }

    fn accepts(&self, node: &Node<'_>) -> bool {
        match &self.text {
            None => true,
            Some(TextMatch::Exact(text)) => node.text().trim() == *text,
            Some(TextMatch::Pattern(pattern)) => pattern.is_match(&node.text()),
        }
    }
}

impl std::fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}`", self.css())?;
        match &self.text {
            Some(TextMatch::Exact(text)) => write!(f, " with text {text:?}"),
            Some(TextMatch::Pattern(pattern)) => write!(f, " with text ~ /{pattern}/"),
            None => Ok(()),
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
