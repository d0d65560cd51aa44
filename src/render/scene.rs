use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// One node of the retained SVG scene.
///
/// Charts render into an `Element` and find their previous output in it on
/// the next pass, which is what makes repeated renders idempotent. Children
/// created by a keyed join remember their key in `data_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attrs: IndexMap<String, String>,
    style: IndexMap<String, String>,
    children: Vec<Element>,
    data_key: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: SmallVec::new(),
            attrs: IndexMap::new(),
            style: IndexMap::new(),
            children: Vec::new(),
            data_key: None,
        }
    }

    /// Root `<svg>` element sized in pixels.
    #[must_use]
    pub fn svg(width: f64, height: f64) -> Self {
        let mut root = Self::new("svg");
        root.set_attr("xmlns", "http://www.w3.org/2000/svg");
        root.set_attr("width", width.to_string());
        root.set_attr("height", height.to_string());
        root
    }

    #[must_use]
    pub fn with_classes(mut self, classes: &str) -> Self {
        self.set_classes(classes);
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_owned(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    /// Sets the attribute for `Some`, removes it for `None`.
    pub fn set_or_remove_attr(&mut self, name: &str, value: Option<String>) {
        match value {
            Some(value) => self.set_attr(name, value),
            None => {
                self.remove_attr(name);
            }
        }
    }

    #[must_use]
    pub fn style(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        self.style.insert(name.to_owned(), value.into());
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Replaces the class list with the whitespace-separated `classes`.
    pub fn set_classes(&mut self, classes: &str) {
        self.classes.clear();
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_owned());
            }
        }
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            if !self.has_class(class) {
                self.classes.push(class.to_owned());
            }
        } else {
            self.classes.retain(|c| c != class);
        }
    }

    #[must_use]
    pub fn data_key(&self) -> Option<&str> {
        self.data_key.as_deref()
    }

    pub fn set_data_key(&mut self, key: impl Into<String>) {
        self.data_key = Some(key.into());
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn append(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// True when the tag matches and every class in `classes` is present.
    #[must_use]
    pub fn matches(&self, tag: &str, classes: &str) -> bool {
        self.tag == tag && classes.split_whitespace().all(|c| self.has_class(c))
    }

    #[must_use]
    pub fn select_child(&self, tag: &str, classes: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.matches(tag, classes))
    }

    pub fn select_child_mut(&mut self, tag: &str, classes: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.matches(tag, classes))
    }

    /// Returns the first matching child, appending it first if absent.
    pub fn ensure_child(&mut self, tag: &str, classes: &str) -> &mut Element {
        let index = match self.children.iter().position(|c| c.matches(tag, classes)) {
            Some(index) => index,
            None => {
                self.children.push(Element::new(tag).with_classes(classes));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Depth-first search for a descendant (or self) with `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    /// All descendants (not self) matching `tag` and `classes`, in document order.
    #[must_use]
    pub fn select_all(&self, tag: &str, classes: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_matching(tag, classes, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, tag: &str, classes: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.matches(tag, classes) {
                found.push(child);
            }
            child.collect_matching(tag, classes, found);
        }
    }

    /// Visits self and every descendant.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Keyed join of this element's `tag.class` children against `keys`.
    ///
    /// Children whose key is not in `keys` are removed, surviving children
    /// keep their position, and one child is appended per new key in `keys`
    /// order. Other children are untouched.
    pub fn join_keyed(&mut self, tag: &str, class: &str, keys: &[&str]) -> KeyedJoin {
        let mut removed = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        self.children.retain(|child| {
            if !child.matches(tag, class) {
                return true;
            }
            match child.data_key() {
                Some(key) if keys.contains(&key) && !seen.iter().any(|s| s == key) => {
                    seen.push(key.to_owned());
                    true
                }
                key => {
                    removed.push(key.unwrap_or_default().to_owned());
                    false
                }
            }
        });

        let mut entered = Vec::new();
        for key in keys {
            if seen.iter().any(|s| s == key) || entered.iter().any(|e: &String| e == key) {
                continue;
            }
            let mut child = Element::new(tag).with_classes(class);
            child.set_data_key(*key);
            self.children.push(child);
            entered.push((*key).to_owned());
        }

        trace!(
            tag,
            class,
            entered = entered.len(),
            updated = seen.len(),
            removed = removed.len(),
            "keyed join"
        );
        KeyedJoin {
            entered,
            updated: seen,
            removed,
        }
    }

    /// Mutable access to the keyed child for `key`.
    pub fn keyed_child_mut(&mut self, tag: &str, class: &str, key: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .find(|c| c.matches(tag, class) && c.data_key() == Some(key))
    }

    /// Checks that no numeric geometry in the scene is malformed.
    pub fn validate(&self) -> ChartResult<()> {
        let mut error = None;
        self.walk(&mut |element| {
            if error.is_some() {
                return;
            }
            if let Err(err) = element.validate_geometry() {
                error = Some(err);
            }
        });
        error.map_or(Ok(()), Err)
    }

    fn validate_geometry(&self) -> ChartResult<()> {
        if self.tag == "path" {
            if let Some(d) = self.attr("d") {
                if d.contains("NaN") || d.contains("inf") {
                    return Err(ChartError::InvalidScene(format!(
                        "path data contains a non-finite number: {d}"
                    )));
                }
            }
        }
        for name in ["cx", "cy", "r", "width", "height"] {
            if let Some(value) = self.attr(name) {
                let finite = value.parse::<f64>().map(f64::is_finite).unwrap_or(false);
                if !finite {
                    return Err(ChartError::InvalidScene(format!(
                        "<{}> attribute `{name}` is not a finite number: {value}",
                        self.tag
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Outcome of [`Element::join_keyed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedJoin {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl KeyedJoin {
    #[must_use]
    pub fn is_entered(&self, key: &str) -> bool {
        self.entered.iter().any(|k| k == key)
    }
}
