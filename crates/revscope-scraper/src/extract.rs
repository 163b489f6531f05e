//! Field-spec driven extraction over HTML snapshots.
//!
//! A field spec names a semantic field, the CSS selector that locates it and
//! how to turn the matched node(s) into a value. Lookups never fail: a
//! selector that matches nothing (or does not parse) resolves to the field's
//! sentinel, so layout drift in one field leaves the others intact.

use scraper::{ElementRef, Html, Selector};

/// How a matched element is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Text content, trimmed, with internal whitespace runs collapsed.
    Text,
    /// A trimmed attribute value, e.g. `src` or `alt`.
    Attr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// First match with a non-empty value, or `sentinel`.
    Single {
        transform: Transform,
        sentinel: &'static str,
    },
    /// Every non-empty match in document order; empty when nothing matches.
    /// Values containing `exclude` are dropped.
    List {
        transform: Transform,
        exclude: Option<&'static str>,
    },
    /// One key/value entry per matched row. Rows missing either cell are
    /// dropped.
    Pairs { cells: PairCells },
}

/// Where a row keeps its key and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairCells {
    /// First `key` descendant and first `value` descendant, e.g. `th`/`td`.
    Selectors {
        key: &'static str,
        value: &'static str,
    },
    /// First and second descendants matching `cell`, e.g. two `td`s.
    Positional { cell: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub selector: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    #[must_use]
    pub const fn text(name: &'static str, selector: &'static str, sentinel: &'static str) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::Single {
                transform: Transform::Text,
                sentinel,
            },
        }
    }

    #[must_use]
    pub const fn attr(
        name: &'static str,
        selector: &'static str,
        attr: &'static str,
        sentinel: &'static str,
    ) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::Single {
                transform: Transform::Attr(attr),
                sentinel,
            },
        }
    }

    #[must_use]
    pub const fn list(name: &'static str, selector: &'static str, transform: Transform) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::List {
                transform,
                exclude: None,
            },
        }
    }

    /// Like [`FieldSpec::list`], dropping values that contain `exclude`.
    #[must_use]
    pub const fn list_excluding(
        name: &'static str,
        selector: &'static str,
        transform: Transform,
        exclude: &'static str,
    ) -> Self {
        Self {
            name,
            selector,
            kind: FieldKind::List {
                transform,
                exclude: Some(exclude),
            },
        }
    }

    #[must_use]
    pub const fn pairs(
        name: &'static str,
        row_selector: &'static str,
        key: &'static str,
        value: &'static str,
    ) -> Self {
        Self {
            name,
            selector: row_selector,
            kind: FieldKind::Pairs {
                cells: PairCells::Selectors { key, value },
            },
        }
    }

    /// Key/value rows whose first two `cell` descendants hold the key and
    /// the value.
    #[must_use]
    pub const fn cell_pairs(
        name: &'static str,
        row_selector: &'static str,
        cell: &'static str,
    ) -> Self {
        Self {
            name,
            selector: row_selector,
            kind: FieldKind::Pairs {
                cells: PairCells::Positional { cell },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Pairs(Vec<(String, String)>),
}

/// Values produced by one pass over a field-spec table, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: Vec<(&'static str, FieldValue)>,
}

impl ExtractedFields {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Text value of a single-valued field. Empty for unknown names.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(FieldValue::Text(value)) => value.clone(),
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(FieldValue::List(values)) => values.clone(),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn pairs(&self, name: &str) -> Vec<(String, String)> {
        match self.get(name) {
            Some(FieldValue::Pairs(pairs)) => pairs.clone(),
            _ => Vec::new(),
        }
    }
}

/// Parses `selector`, returning `None` for invalid CSS.
#[must_use]
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!(selector, error = %e, "invalid CSS selector");
            None
        }
    }
}

/// Returns `true` when at least one element in `html` matches `selector`.
#[must_use]
pub fn selector_matches(html: &str, selector: &Selector) -> bool {
    let doc = Html::parse_document(html);
    doc.select(selector).next().is_some()
}

/// Runs every spec in `table` against the whole document.
#[must_use]
pub fn extract_document(html: &str, table: &[FieldSpec]) -> ExtractedFields {
    let doc = Html::parse_document(html);
    extract_fields(doc.root_element(), table)
}

/// Runs `table` once per element matching `card_selector`, scoping every
/// lookup to that element. Cards come back in document order.
#[must_use]
pub fn extract_cards(html: &str, card_selector: &str, table: &[FieldSpec]) -> Vec<ExtractedFields> {
    let Some(cards) = parse_selector(card_selector) else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&cards)
        .map(|card| extract_fields(card, table))
        .collect()
}

/// Runs every spec in `table` against the subtree rooted at `scope`.
#[must_use]
pub fn extract_fields(scope: ElementRef<'_>, table: &[FieldSpec]) -> ExtractedFields {
    ExtractedFields {
        values: table
            .iter()
            .map(|spec| (spec.name, lookup(scope, spec)))
            .collect(),
    }
}

/// Resolves one field, substituting the spec's sentinel on a miss.
#[must_use]
pub fn lookup(scope: ElementRef<'_>, spec: &FieldSpec) -> FieldValue {
    let selector = parse_selector(spec.selector);

    match spec.kind {
        FieldKind::Single {
            transform,
            sentinel,
        } => {
            let found = selector.as_ref().and_then(|sel| {
                scope
                    .select(sel)
                    .find_map(|el| read_value(el, transform))
            });
            if found.is_none() {
                tracing::debug!(field = spec.name, selector = spec.selector, "field not found");
            }
            FieldValue::Text(found.unwrap_or_else(|| sentinel.to_string()))
        }
        FieldKind::List { transform, exclude } => FieldValue::List(
            selector
                .as_ref()
                .map(|sel| {
                    scope
                        .select(sel)
                        .filter_map(|el| read_value(el, transform))
                        .filter(|value| !exclude.is_some_and(|pattern| value.contains(pattern)))
                        .collect()
                })
                .unwrap_or_default(),
        ),
        FieldKind::Pairs { cells } => {
            let (Some(rows), Some(cells)) = (selector, CellSelectors::parse(cells)) else {
                return FieldValue::Pairs(Vec::new());
            };
            FieldValue::Pairs(
                scope
                    .select(&rows)
                    .filter_map(|row| cells.read(row))
                    .collect(),
            )
        }
    }
}

enum CellSelectors {
    Selectors(Selector, Selector),
    Positional(Selector),
}

impl CellSelectors {
    fn parse(cells: PairCells) -> Option<Self> {
        match cells {
            PairCells::Selectors { key, value } => {
                Some(Self::Selectors(parse_selector(key)?, parse_selector(value)?))
            }
            PairCells::Positional { cell } => Some(Self::Positional(parse_selector(cell)?)),
        }
    }

    fn read(&self, row: ElementRef<'_>) -> Option<(String, String)> {
        let text = |el: ElementRef<'_>| read_value(el, Transform::Text);
        let (key, value) = match self {
            Self::Selectors(key, value) => (
                row.select(key).next().and_then(text)?,
                row.select(value).next().and_then(text)?,
            ),
            Self::Positional(cell) => {
                let mut found = row.select(cell);
                (found.next().and_then(text)?, found.next().and_then(text)?)
            }
        };
        Some((key, value))
    }
}

fn read_value(el: ElementRef<'_>, transform: Transform) -> Option<String> {
    let value = match transform {
        Transform::Text => collapse_whitespace(&el.text().collect::<String>()),
        Transform::Attr(name) => el.value().attr(name)?.trim().to_string(),
    };
    (!value.is_empty()).then_some(value)
}

/// Trims `text` and collapses internal whitespace runs to single spaces.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
