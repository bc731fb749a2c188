use wasm_bindgen::{JsCast, JsValue};

use wordparty::surface::{ElementSpec, Surface};

use crate::rust_error;
use crate::web_document::{WebDocument, web_document};
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


pub struct DomSurface {
    document: WebDocument,
}

impl DomSurface {
    pub fn new() -> JsResult<Self> { Ok(DomSurface { document: web_document()? }) }

    pub fn document(&self) -> &WebDocument { &self.document }

    fn element(&self, id: &str) -> JsResult<web_sys::Element> {
        self.document.get_existing_element_by_id(id)
    }

    fn create(&self, spec: &ElementSpec) -> JsResult<web_sys::Element> {
        Ok(self
            .document
            .create_element(spec.tag)?
            .with_id(&spec.id)
            .with_classes(spec.classes.iter().map(String::as_str))?
            .with_text_content(&spec.text))
    }
}

impl Surface for DomSurface {
    type Error = JsValue;

    fn set_text(&mut self, id: &str, text: &str) -> JsResult<()> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> JsResult<()> {
        self.element(id)?.set_disabled(disabled)
    }

    fn toggle_class(&mut self, id: &str, class: &str, present: bool) -> JsResult<()> {
        self.element(id)?.class_list().toggle_with_force(class, present)?;
        Ok(())
    }

    fn set_class_attribute(&mut self, id: &str, classes: &str) -> JsResult<()> {
        self.element(id)?.set_attribute("class", classes)
    }

    fn set_displayed(&mut self, id: &str, displayed: bool) -> JsResult<()> {
        self.element(id)?.set_displayed(displayed)
    }

    fn replace_children(&mut self, container_id: &str, children: &[ElementSpec]) -> JsResult<()> {
        let container = self.element(container_id)?;
        let elements: Vec<_> = children.iter().map(|spec| self.create(spec)).collect::<JsResult<_>>()?;
        container.set_children(elements)
    }

    fn purge_class_within(&mut self, container_id: &str, class: &str) -> JsResult<()> {
        for node in self.document.query_selector_all_within(container_id, &format!(".{class}"))? {
            let element = node
                .dyn_into::<web_sys::Element>()
                .map_err(|_| rust_error!("Node with class \"{}\" is not an element", class))?;
            element.class_list().remove_1(class)?;
        }
        Ok(())
    }

    fn pulse(&mut self, id: &str, class: &str) -> JsResult<()> {
        self.element(id)?.restart_animation(class)
    }

    fn reset_input(&mut self, id: &str, focus: bool) -> JsResult<()> {
        let input = self
            .element(id)?
            .dyn_into::<web_sys::HtmlInputElement>()
            .map_err(|_| rust_error!("Element \"{}\" is not an input", id))?;
        input.set_value("");
        if focus {
            input.focus()?;
        }
        Ok(())
    }
}
