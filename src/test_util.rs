// Test utilities shared by unit tests and integration tests in the "tests" folder.

use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;

use crate::surface::{ElementSpec, Surface};


#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FakeElement {
    pub tag: String,
    pub text: String,
    pub classes: BTreeSet<String>,
    pub disabled: bool,
    pub displayed: bool,
    pub value: String,
    pub focused: bool,
    // Text of the element at the start of each pulse.
    pub pulsed_text: Vec<String>,
    pub children: Vec<String>,
}

impl FakeElement {
    pub fn has_class(&self, class: &str) -> bool { self.classes.contains(class) }
    pub fn class_attribute(&self) -> String { self.classes.iter().cloned().collect::<Vec<_>>().join(" ") }
}

// In-memory stand-in for a page. Elements spring into existence on first access, which mirrors a
// server-rendered template that already contains every static id.
#[derive(Clone, Debug, Default)]
pub struct FakeSurface {
    elements: HashMap<String, FakeElement>,
}

impl FakeSurface {
    pub fn new() -> Self { Self::default() }

    pub fn element(&self, id: &str) -> &FakeElement {
        self.elements.get(id).unwrap_or_else(|| panic!("Element \"{id}\" was never rendered"))
    }

    pub fn text(&self, id: &str) -> &str { &self.element(id).text }
    pub fn children(&self, id: &str) -> &[String] { &self.element(id).children }
    pub fn children_text(&self, id: &str) -> Vec<String> {
        self.children(id).iter().map(|child| self.text(child).to_owned()).collect()
    }

    pub fn with_input_value(mut self, id: &str, value: &str) -> Self {
        self.entry(id).value = value.to_owned();
        self
    }

    // Declares template elements that live inside `container_id`, e.g. board cells.
    pub fn with_container<S: Into<String>>(
        mut self, container_id: &str, child_ids: impl IntoIterator<Item = S>,
    ) -> Self {
        let child_ids: Vec<String> = child_ids.into_iter().map(Into::into).collect();
        for child in &child_ids {
            self.entry(child);
        }
        self.entry(container_id).children.extend(child_ids);
        self
    }

    fn entry(&mut self, id: &str) -> &mut FakeElement {
        self.elements
            .entry(id.to_owned())
            .or_insert_with(|| FakeElement { displayed: true, ..FakeElement::default() })
    }

    fn create(&mut self, spec: &ElementSpec) {
        self.elements.insert(spec.id.clone(), FakeElement {
            tag: spec.tag.to_owned(),
            text: spec.text.clone(),
            classes: spec.classes.iter().cloned().collect(),
            displayed: true,
            ..FakeElement::default()
        });
    }

    fn subtree(&self, id: &str) -> Vec<String> {
        let mut ids = vec![];
        if let Some(element) = self.elements.get(id) {
            for child in &element.children {
                ids.push(child.clone());
                ids.extend(self.subtree(child));
            }
        }
        ids
    }

    fn remove_subtree(&mut self, id: &str) {
        if let Some(element) = self.elements.remove(id) {
            for child in element.children {
                self.remove_subtree(&child);
            }
        }
    }
}

impl Surface for FakeSurface {
    type Error = Infallible;

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), Infallible> {
        self.entry(id).text = text.to_owned();
        Ok(())
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> Result<(), Infallible> {
        self.entry(id).disabled = disabled;
        Ok(())
    }

    fn toggle_class(&mut self, id: &str, class: &str, present: bool) -> Result<(), Infallible> {
        let classes = &mut self.entry(id).classes;
        if present {
            classes.insert(class.to_owned());
        } else {
            classes.remove(class);
        }
        Ok(())
    }

    fn set_class_attribute(&mut self, id: &str, classes: &str) -> Result<(), Infallible> {
        self.entry(id).classes = classes.split_whitespace().map(str::to_owned).collect();
        Ok(())
    }

    fn set_displayed(&mut self, id: &str, displayed: bool) -> Result<(), Infallible> {
        self.entry(id).displayed = displayed;
        Ok(())
    }

    fn replace_children(
        &mut self, container_id: &str, children: &[ElementSpec],
    ) -> Result<(), Infallible> {
        let old_children = std::mem::take(&mut self.entry(container_id).children);
        for child in old_children {
            self.remove_subtree(&child);
        }
        for child in children {
            self.create(child);
        }
        self.entry(container_id).children = children.iter().map(|child| child.id.clone()).collect();
        Ok(())
    }

    // Only elements created by `replace_children` or declared with `with_container` count as
    // being inside the container.
    fn purge_class_within(&mut self, container_id: &str, class: &str) -> Result<(), Infallible> {
        for id in self.subtree(container_id) {
            self.entry(&id).classes.remove(class);
        }
        Ok(())
    }

    fn pulse(&mut self, id: &str, class: &str) -> Result<(), Infallible> {
        let element = self.entry(id);
        element.classes.insert(class.to_owned());
        element.pulsed_text.push(element.text.clone());
        Ok(())
    }

    fn reset_input(&mut self, id: &str, focus: bool) -> Result<(), Infallible> {
        let element = self.entry(id);
        element.value.clear();
        element.focused = focus;
        Ok(())
    }
}

// Unwraps results of a surface that cannot fail.
pub trait Infallibly<T> {
    fn infallibly(self) -> T;
}

impl<T> Infallibly<T> for Result<T, Infallible> {
    fn infallibly(self) -> T {
        match self {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}
