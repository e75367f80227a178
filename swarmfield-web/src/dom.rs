//! DOM render sink: one fixed-position `div` per element.
//!
//! Elements carry their layer's class name, so [`DomSink::clear_layer`] also
//! removes elements created by an earlier sink or page script. DOM calls that
//! fail are ignored; a missing element just stops moving.

use std::collections::HashMap;

use swarmfield::{ElementId, ElementStyle, Layer, Pose, RenderSink};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Inline CSS for a freshly attached element.
pub fn style_declarations(layer: Layer, style: &ElementStyle) -> Vec<(&'static str, String)> {
    vec![
        ("position", "fixed".to_string()),
        ("left", "0".to_string()),
        ("top", "0".to_string()),
        ("width", format!("{}px", style.size)),
        ("height", format!("{}px", style.size)),
        ("background", style.color.to_string()),
        ("border-radius", style.shape.css_radius().to_string()),
        ("opacity", style.opacity.to_string()),
        ("pointer-events", "none".to_string()),
        ("z-index", z_index(layer).to_string()),
    ]
}

fn z_index(layer: Layer) -> i32 {
    match layer {
        Layer::Field => 0,
        Layer::Swarm => 9999,
    }
}

pub struct DomSink {
    document: Document,
    container: HtmlElement,
    next_id: u32,
    elements: HashMap<ElementId, (Layer, HtmlElement)>,
}

impl DomSink {
    /// Sink appending to `document.body`. `None` if there is no body.
    pub fn new(document: Document) -> Option<Self> {
        let container = document.body()?;
        Some(Self {
            document,
            container,
            next_id: 0,
            elements: HashMap::new(),
        })
    }

    fn create(&self, layer: Layer, style: &ElementStyle) -> Option<HtmlElement> {
        let div = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        div.set_class_name(layer.class_name());
        let css = div.style();
        for (property, value) in style_declarations(layer, style) {
            let _ = css.set_property(property, &value);
        }
        self.container.append_child(&div).ok()?;
        Some(div)
    }
}

impl RenderSink for DomSink {
    fn attach(&mut self, layer: Layer, style: ElementStyle) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        match self.create(layer, &style) {
            Some(div) => {
                self.elements.insert(id, (layer, div));
            }
            // The handle is still returned: placing it is a no-op, and this
            // element is missing from `len_layer` until the layer is rebuilt.
            None => tracing::warn!(?layer, "failed to create DOM element"),
        }
        id
    }

    fn place(&mut self, id: ElementId, pose: Pose) {
        if let Some((_, div)) = self.elements.get(&id) {
            let _ = div.style().set_property("transform", &pose.css_transform());
        }
    }

    fn clear_layer(&mut self, layer: Layer) {
        self.elements.retain(|_, (l, _)| *l != layer);
        let selector = format!(".{}", layer.class_name());
        if let Ok(nodes) = self.document.query_selector_all(&selector) {
            for i in 0..nodes.length() {
                let element = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok());
                if let Some(element) = element {
                    element.remove();
                }
            }
        }
    }

    fn len_layer(&self, layer: Layer) -> usize {
        self.elements.values().filter(|(l, _)| *l == layer).count()
    }
}
