// The seam between view models and whatever displays them. The browser client implements it on
// top of the DOM; tests use `test_util::FakeSurface`.
//
// Elements are addressed by DOM id. Page templates come from the server, so every id a render
// function touches is expected to exist already, except for elements the render function itself
// creates through `replace_children`.

// Text that keeps an empty cell the same height as an occupied one.
pub const NBSP: &str = "\u{a0}";


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ElementSpec {
    pub tag: &'static str,
    pub id: String,
    pub classes: Vec<String>,
    pub text: String,
}

impl ElementSpec {
    pub fn new(tag: &'static str, id: impl Into<String>) -> Self {
        ElementSpec { tag, id: id.into(), classes: vec![], text: String::new() }
    }

    pub fn with_classes<'a>(mut self, classes: impl IntoIterator<Item = &'a str>) -> Self {
        self.classes.extend(classes.into_iter().map(str::to_owned));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

pub trait Surface {
    type Error;

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), Self::Error>;

    // Adds or removes the `disabled` attribute.
    fn set_disabled(&mut self, id: &str, disabled: bool) -> Result<(), Self::Error>;

    fn toggle_class(&mut self, id: &str, class: &str, present: bool) -> Result<(), Self::Error>;

    // Replaces the whole `class` attribute.
    fn set_class_attribute(&mut self, id: &str, classes: &str) -> Result<(), Self::Error>;

    fn set_displayed(&mut self, id: &str, displayed: bool) -> Result<(), Self::Error>;

    fn replace_children(
        &mut self, container_id: &str, children: &[ElementSpec],
    ) -> Result<(), Self::Error>;

    // Removes `class` from every descendant of the container.
    fn purge_class_within(&mut self, container_id: &str, class: &str) -> Result<(), Self::Error>;

    // Restarts the CSS animation attached to `class`.
    fn pulse(&mut self, id: &str, class: &str) -> Result<(), Self::Error>;

    fn reset_input(&mut self, id: &str, focus: bool) -> Result<(), Self::Error>;
}
