use std::ops;

use wasm_bindgen::JsCast;

use crate::rust_error;
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_id(self, value: &str) -> web_sys::Element;
    fn with_text_content(self, text: &str) -> web_sys::Element;
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    fn as_html_element(&self) -> JsResult<&web_sys::HtmlElement>;

    fn set_disabled(&self, disabled: bool) -> JsResult<()>;
    fn set_displayed(&self, displayed: bool) -> JsResult<()>;
    fn restart_animation(&self, class: &str) -> JsResult<()>;

    fn remove_all_children(&self);
    fn set_children(
        &self, children: impl IntoIterator<Item = impl ops::Deref<Target = web_sys::Node>>,
    ) -> JsResult<()>;
}

impl WebElementExt for web_sys::Element {
    fn with_id(self, value: &str) -> web_sys::Element {
        self.set_id(value);
        self
    }

    fn with_text_content(self, text: &str) -> web_sys::Element {
        self.set_text_content(Some(text));
        self
    }

    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    fn as_html_element(&self) -> JsResult<&web_sys::HtmlElement> {
        self.dyn_ref::<web_sys::HtmlElement>()
            .ok_or_else(|| rust_error!("Element \"{}\" is not an HTML element", self.id()))
    }

    fn set_disabled(&self, disabled: bool) -> JsResult<()> {
        if disabled {
            self.set_attribute("disabled", "")
        } else {
            self.remove_attribute("disabled")
        }
    }

    // Page templates hide elements with inline `display: none`, so this works on the style too.
    fn set_displayed(&self, displayed: bool) -> JsResult<()> {
        let style = self.as_html_element()?.style();
        if displayed {
            style.remove_property("display")?;
        } else {
            style.set_property("display", "none")?;
        }
        Ok(())
    }

    fn restart_animation(&self, class: &str) -> JsResult<()> {
        self.class_list().add_1(class)?;
        let element = self.as_html_element()?;
        element.style().set_property("animation", "none")?;
        // Reading layout forces a reflow, so the animation starts over once the override is gone.
        let _ = element.offset_width();
        element.style().remove_property("animation")?;
        Ok(())
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn set_children(
        &self, children: impl IntoIterator<Item = impl ops::Deref<Target = web_sys::Node>>,
    ) -> JsResult<()> {
        self.remove_all_children();
        for child in children {
            self.append_child(&child)?;
        }
        Ok(())
    }
}
