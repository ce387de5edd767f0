//! The on-page popover listing extracted sources.
//!
//! A translucent backdrop covers the page and every source gets a
//! draggable activator at the corner of its graphic, carrying
//! `Download`, `X` (dismiss) and `Show` buttons.  `Show` renders the
//! source markup in a draggable preview panel.
//!
//! Everything created here carries the [`CROWBAR_CLASS`] class so a
//! later run can remove it first.  Event handlers are leaked with
//! [`Closure::forget`]; they live as long as the elements they drive.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use std::cell::Cell;
use std::rc::Rc;

use crowbar_export::{Position, PresenterConfig, activator_label, place_activators, prepare_download};
use crowbar_extract::ExtractedSource;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::download::trigger_download;

/// Class shared by every element this crate adds to the page.
pub const CROWBAR_CLASS: &str = "svg-crowbar";

/// Title shown in the preview panel header.
const PREVIEW_TITLE: &str = "SVG Visualizer";

const BUTTON_STYLE: &[(&str, &str)] = &[
    ("font-size", "12px"),
    ("line-height", "1.4em"),
    ("margin", "5px 0 0 0"),
    ("cursor", "pointer"),
];

const BUTTON_STYLE_IMPORTANT: &[(&str, &str)] = &[
    ("color", "black"),
    ("background", "rgba(255, 255, 255, 0.9)"),
];

/// Errors that can occur while building the popover.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// A browser API call returned an error or a required object was missing.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for PresentError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Remove every element a previous run added to `document`.
pub fn cleanup(document: &Document) {
    let Ok(leftovers) = document.query_selector_all(&format!(".{CROWBAR_CLASS}")) else {
        return;
    };
    // Collect first: the list is static but removing parents detaches children.
    let elements: Vec<web_sys::Element> = (0..leftovers.length())
        .filter_map(|i| leftovers.get(i))
        .filter_map(|node| node.dyn_into().ok())
        .collect();
    for element in elements {
        element.remove();
    }
    log::debug!("removed previous crowbar elements");
}

/// Show one activator per source on top of the current page.
///
/// # Errors
///
/// Returns [`PresentError::JsError`] if the window, document or body is
/// missing or an element cannot be created.
pub fn show_popover(
    sources: Vec<ExtractedSource>,
    page_title: Option<String>,
    config: PresenterConfig,
) -> Result<(), PresentError> {
    let window = web_sys::window().ok_or_else(|| PresentError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| PresentError::JsError("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| PresentError::JsError("no document body".into()))?;

    cleanup(&document);

    let scroll = Position::new(window.scroll_y()?, window.scroll_x()?);
    let positions = place_activators(&sources, scroll, config.overlap_threshold);

    let container = create(&document, "div")?;
    apply(
        &container,
        &[("z-index", "999999"), ("position", "absolute"), ("top", "0"), ("left", "0")],
    )?;
    body.append_child(&container)?;

    let backdrop = create(&document, "div")?;
    apply(
        &backdrop,
        &[
            ("background", "rgba(255, 255, 255, 0.7)"),
            ("z-index", "999998"),
            ("position", "fixed"),
            ("left", "0"),
            ("top", "0"),
            ("width", "100%"),
            ("height", "100%"),
        ],
    )?;
    body.append_child(&backdrop)?;

    let preview = build_preview(&document)?;
    body.append_child(&preview.panel)?;

    let sources = Rc::new(sources);
    let page_title = Rc::new(page_title);
    let config = Rc::new(config);

    for (index, (source, position)) in sources.iter().zip(&positions).enumerate() {
        let top = format!("{}px", position.top);
        let left = format!("{}px", position.left);
        let wrapper = create(&document, "div")?;
        apply(
            &wrapper,
            &[
                ("position", "absolute"),
                ("top", top.as_str()),
                ("left", left.as_str()),
                ("padding", "4px"),
                ("border-radius", "3px"),
                ("font-family", "'Helvetica Neue'"),
                ("box-shadow", "0px 4px 18px rgba(0, 0, 0, 0.4)"),
                ("cursor", "move"),
            ],
        )?;
        apply_important(
            &wrapper,
            &[
                ("color", "white"),
                ("text-align", "center"),
                ("background", "rgba(0, 0, 0, 0.8)"),
            ],
        )?;
        wrapper.set_text_content(Some(&activator_label(index, &source.identity)));
        container.append_child(&wrapper)?;

        let download = create_button(&document, "Download", "130px")?;
        {
            let sources = Rc::clone(&sources);
            let page_title = Rc::clone(&page_title);
            let config = Rc::clone(&config);
            on_click(&download, move || {
                let Some(source) = sources.get(index) else {
                    return;
                };
                let request = prepare_download(source, page_title.as_deref(), &config);
                if let Err(e) = trigger_download(&request, config.release_delay_ms) {
                    log::error!("download of source #{index} failed: {e}");
                }
            });
        }
        wrapper.append_child(&download)?;

        let dismiss = create_button(&document, "X", "20px")?;
        {
            let wrapper = wrapper.clone();
            on_click(&dismiss, move || wrapper.remove());
        }
        wrapper.append_child(&dismiss)?;

        let show = create_button(&document, "Show", "40px")?;
        {
            let sources = Rc::clone(&sources);
            let panel = preview.panel.clone();
            let content = preview.body.clone();
            on_click(&show, move || {
                let Some(source) = sources.get(index) else {
                    return;
                };
                content.set_inner_html(source.svg_markup());
                let _ = panel.style().set_property("display", "block");
            });
        }
        wrapper.append_child(&show)?;

        make_draggable(&document, &wrapper);
    }

    log::info!("showing {} sources", sources.len());
    Ok(())
}

/// The preview panel and the element its markup goes into.
struct Preview {
    panel: HtmlElement,
    body: HtmlElement,
}

/// Build the hidden, draggable preview panel.
fn build_preview(document: &Document) -> Result<Preview, PresentError> {
    let panel = create(document, "div")?;
    apply(
        &panel,
        &[
            ("z-index", "9999999"),
            ("position", "absolute"),
            ("width", "300px"),
            ("min-width", "300px"),
            ("min-height", "300px"),
            ("border", "4px solid black"),
            ("top", "0"),
            ("left", "0"),
            ("display", "none"),
        ],
    )?;
    apply_important(&panel, &[("background", "rgba(255, 255, 255, 0.9)")])?;

    let header = create(document, "div")?;
    apply(
        &header,
        &[
            ("background", "black"),
            ("color", "white"),
            ("font-size", "14px"),
            ("text-align", "center"),
        ],
    )?;
    header.set_text_content(Some(PREVIEW_TITLE));

    let close = create(document, "button")?;
    apply(
        &close,
        &[
            ("color", "white"),
            ("background", "transparent"),
            ("font-weight", "bold"),
            ("border", "none"),
            ("outline", "none"),
            ("float", "right"),
            ("margin", "0px"),
            ("cursor", "pointer"),
            ("text-align", "center"),
        ],
    )?;
    close.set_text_content(Some("\u{2716}"));
    {
        let panel = panel.clone();
        on_click(&close, move || {
            let _ = panel.style().set_property("display", "none");
        });
    }
    header.append_child(&close)?;
    panel.append_child(&header)?;

    let body = create(document, "div")?;
    panel.append_child(&body)?;

    make_draggable(document, &panel);
    Ok(Preview { panel, body })
}

/// Create an `HtmlElement` tagged with [`CROWBAR_CLASS`].
fn create(document: &Document, tag: &str) -> Result<HtmlElement, PresentError> {
    let element = document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|e| PresentError::JsError(format!("failed to cast element: {e:?}")))?;
    element.set_class_name(CROWBAR_CLASS);
    Ok(element)
}

fn create_button(document: &Document, label: &str, width: &str) -> Result<HtmlElement, PresentError> {
    let button = create(document, "button")?;
    apply(&button, BUTTON_STYLE)?;
    apply(&button, &[("width", width)])?;
    apply_important(&button, BUTTON_STYLE_IMPORTANT)?;
    button.set_text_content(Some(label));
    Ok(button)
}

fn apply(element: &HtmlElement, declarations: &[(&str, &str)]) -> Result<(), PresentError> {
    let style = element.style();
    for (name, value) in declarations {
        style.set_property(name, value)?;
    }
    Ok(())
}

/// Like [`apply`], with `!important` so page stylesheets cannot win.
fn apply_important(element: &HtmlElement, declarations: &[(&str, &str)]) -> Result<(), PresentError> {
    let style = element.style();
    for (name, value) in declarations {
        style.set_property_with_priority(name, value, "important")?;
    }
    Ok(())
}

fn on_click(element: &HtmlElement, mut handler: impl FnMut() + 'static) {
    let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        event.stop_propagation();
        handler();
    });
    element.set_onclick(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
}

/// Let the user move `element` by dragging it anywhere inside.
fn make_draggable(document: &Document, element: &HtmlElement) {
    let last = Rc::new(Cell::new((0, 0)));

    let on_move = {
        let element = element.clone();
        let last = Rc::clone(&last);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            event.prevent_default();
            let (x, y) = last.get();
            let (dx, dy) = (x - event.client_x(), y - event.client_y());
            last.set((event.client_x(), event.client_y()));
            let style = element.style();
            let _ = style.set_property("top", &format!("{}px", element.offset_top() - dy));
            let _ = style.set_property("left", &format!("{}px", element.offset_left() - dx));
        })
    };

    let on_up = {
        let document = document.clone();
        Closure::<dyn FnMut()>::new(move || {
            document.set_onmousemove(None);
            document.set_onmouseup(None);
        })
    };

    let on_down = {
        let document = document.clone();
        let move_fn: js_sys::Function = on_move.as_ref().unchecked_ref::<js_sys::Function>().clone();
        let up_fn: js_sys::Function = on_up.as_ref().unchecked_ref::<js_sys::Function>().clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            event.prevent_default();
            last.set((event.client_x(), event.client_y()));
            document.set_onmouseup(Some(&up_fn));
            document.set_onmousemove(Some(&move_fn));
        })
    };

    element.set_onmousedown(Some(on_down.as_ref().unchecked_ref()));
    on_move.forget();
    on_up.forget();
    on_down.forget();
}
