use wasm_bindgen::JsCast;

use wordparty::player_id::{self, PlayerId};

use crate::rust_error;
use crate::web_error_handling::JsResult;
use crate::web_iterators::NodeListIterator;


pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn get_element_by_id(&self, element_id: &str) -> Option<web_sys::Element> {
        self.0.get_element_by_id(element_id)
    }
    pub fn get_existing_element_by_id(&self, element_id: &str) -> JsResult<web_sys::Element> {
        let element = self
            .0
            .get_element_by_id(element_id)
            .ok_or_else(|| rust_error!("Cannot find element \"{}\"", element_id))?;
        if !element.is_object() {
            return Err(rust_error!("Element \"{}\" is not an object", element_id));
        }
        Ok(element)
    }

    // Static list: safe to modify the elements while iterating.
    pub fn query_selector_all_within(
        &self, container_id: &str, selectors: &str,
    ) -> JsResult<NodeListIterator> {
        let container = self.get_existing_element_by_id(container_id)?;
        container.query_selector_all(selectors).map(|iter| iter.into())
    }

    pub fn create_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        self.0.create_element(local_name)
    }

    pub fn input_value(&self, element_id: &str) -> JsResult<String> {
        let input = self
            .get_existing_element_by_id(element_id)?
            .dyn_into::<web_sys::HtmlInputElement>()
            .map_err(|_| rust_error!("Element \"{}\" is not an input", element_id))?;
        Ok(input.value())
    }

    fn html_document(&self) -> JsResult<web_sys::HtmlDocument> {
        self.0
            .clone()
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|_| rust_error!("Not an HTML document"))
    }

    pub fn cookies(&self) -> JsResult<String> { self.html_document()?.cookie() }

    // Reads the player id cookie, creating it on first visit.
    pub fn ensure_player_id(&self) -> JsResult<PlayerId> {
        let (id, assignment) = player_id::ensure_player_id(&self.cookies()?);
        if let Some(assignment) = assignment {
            self.html_document()?.set_cookie(&assignment)?;
        }
        Ok(id)
    }
}

pub fn web_document() -> JsResult<WebDocument> {
    let document = web_window()?.document().ok_or_else(|| rust_error!("Cannot find document"))?;
    Ok(WebDocument(document))
}

pub fn web_window() -> JsResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| rust_error!("Cannot find window"))
}

// Blocking `window.confirm`.
pub fn confirm(question: &str) -> JsResult<bool> { web_window()?.confirm_with_message(question) }

pub fn reload_page() -> JsResult<()> { web_window()?.location().reload() }
