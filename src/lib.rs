#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod import;
pub mod parse;

use std::fmt;

use geom::{Color, Point3, Shape, Wire};
use import::{ImportDiagnostics, ImportOptions};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("kon rayon threadpool niet initialiseren: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
enum GeometryItem {
    Polyline { points: Vec<[f64; 3]>, closed: bool },
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ShapeKind {
    Face,
    Wire,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
struct ShapeExport {
    id: usize,
    kind: ShapeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    area: Option<f64>,
    items: Vec<GeometryItem>,
}

#[derive(Debug, Serialize)]
struct GeometryResponse {
    shapes: Vec<ShapeExport>,
    summary: String,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    options: ImportOptions,
    shapes: Vec<Shape>,
    diagnostics: ImportDiagnostics,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            options: ImportOptions::default(),
            shapes: Vec::new(),
            diagnostics: ImportDiagnostics::new(),
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Attribuut dat als label wordt overgenomen; `None` schakelt labels uit.
    #[wasm_bindgen]
    pub fn set_label_by(&mut self, attribute: Option<String>) {
        self.options.label_by = attribute;
    }

    #[wasm_bindgen]
    pub fn set_mirror(&mut self, mirror: bool) {
        self.options.mirror = mirror;
    }

    #[wasm_bindgen]
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), JsValue> {
        self.apply_options(self.options.clone().with_tolerance(tolerance))
    }

    /// Zet alle importinstellingen in één keer vanuit een JS-object.
    #[wasm_bindgen]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: ImportOptions =
            serde_wasm_bindgen::from_value(options).map_err(|err| JsError::new(&err.to_string()))?;
        self.apply_options(options)
    }

    /// Laad een SVG-document. Bij een fout blijft de vorige inhoud staan.
    #[wasm_bindgen]
    pub fn load_svg(&mut self, svg: &str) -> Result<(), JsValue> {
        let mut shapes = import::import_svg_str(svg, self.options.clone());
        let loaded = shapes
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js_error)?;

        debug_log!(
            "svg geladen: {} vormen ({})",
            loaded.len(),
            shapes.diagnostics().summary()
        );
        self.diagnostics = shapes.diagnostics().clone();
        self.shapes = loaded;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Korte samenvatting van de diagnostiek van de laatste import.
    #[wasm_bindgen]
    pub fn diagnostics_summary(&self) -> String {
        self.diagnostics.summary()
    }

    /// Haalt alle vormen op als getesselleerde polylijnen.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        let response = GeometryResponse {
            shapes: self.export_shapes(),
            summary: self.diagnostics.summary(),
        };
        serde_wasm_bindgen::to_value(&response).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Engine {
    /// Neemt `options` over als de tolerantie geldig is; anders blijft alles staan.
    fn apply_options(&mut self, options: ImportOptions) -> Result<(), JsValue> {
        if !options.has_valid_tolerance() {
            return Err(js_error(&format!(
                "tolerantie moet een positief eindig getal zijn, kreeg {}",
                options.tolerance
            )));
        }
        self.options = options;
        Ok(())
    }

    fn export_shapes(&self) -> Vec<ShapeExport> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(id, shape)| export_shape(id, shape))
            .collect()
    }
}

fn export_shape(id: usize, shape: &Shape) -> ShapeExport {
    let (kind, area, items) = match shape {
        Shape::Face(face) => {
            let items = std::iter::once(face.outer_wire())
                .chain(face.inner_wires())
                .map(wire_item)
                .collect();
            (ShapeKind::Face, Some(face.area()), items)
        }
        Shape::Wire(wire) => (ShapeKind::Wire, None, vec![wire_item(wire)]),
    };

    ShapeExport {
        id,
        kind,
        label: shape.label().map(str::to_owned),
        color: shape.color().map(color_to_array),
        area,
        items,
    }
}

fn wire_item(wire: &Wire) -> GeometryItem {
    GeometryItem::Polyline {
        points: wire.tessellate().into_iter().map(Point3::to_array).collect(),
        closed: wire.is_closed(),
    }
}

fn color_to_array(color: Color) -> [f64; 4] {
    [color.r, color.g, color.b, color.a]
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, GeometryItem, ImportOptions, ShapeKind};

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <rect id="vlak" x="0" y="0" width="4" height="2" fill="blue"/>
        <path id="lijn" fill="none" stroke="red" d="M 0,0 L 3,0"/>
    </svg>"#;

    #[test]
    fn loads_svg_and_counts_shapes() {
        let mut engine = Engine::new();
        assert!(engine.is_initialized());
        assert!(engine.load_svg(SVG).is_ok());
        assert_eq!(engine.shape_count(), 2);
        assert_eq!(engine.diagnostics_summary(), "subpaths:2");
    }

    #[test]
    fn exports_faces_and_wires_as_polylines() {
        let mut engine = Engine::new();
        engine.set_mirror(false);
        assert!(engine.load_svg(SVG).is_ok());
        let shapes = engine.export_shapes();

        assert_eq!(shapes[0].kind, ShapeKind::Face);
        assert_eq!(shapes[0].label.as_deref(), Some("vlak"));
        assert_eq!(shapes[0].color, Some([0.0, 0.0, 1.0, 1.0]));
        assert!((shapes[0].area.unwrap() - 8.0).abs() < 1e-12);

        assert_eq!(shapes[1].kind, ShapeKind::Wire);
        assert_eq!(shapes[1].area, None);
        match &shapes[1].items[0] {
            GeometryItem::Polyline { points, closed } => {
                assert_eq!(points, &vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
                assert!(!closed);
            }
        }
    }

    #[test]
    fn label_by_can_be_disabled() {
        let mut engine = Engine::new();
        engine.set_label_by(None);
        assert!(engine.load_svg(SVG).is_ok());
        assert!(engine.export_shapes().iter().all(|shape| shape.label.is_none()));
    }

    #[test]
    fn tolerance_is_stored() {
        let mut engine = Engine::new();
        assert!(engine.set_tolerance(1e-3).is_ok());
        assert!((engine.options.tolerance - 1e-3).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_tolerance_in_options_is_rejected() {
        let mut engine = Engine::new();
        engine.set_mirror(false);
        for bad in [0.0, -1.0, f64::NAN] {
            let options = ImportOptions::default().with_label_by(Some("class")).with_tolerance(bad);
            assert!(engine.apply_options(options).is_err());
            assert!(engine.set_tolerance(bad).is_err());
        }
        // vorige instellingen blijven staan
        assert!(!engine.options.mirror);
        assert_eq!(engine.options.label_by.as_deref(), Some("id"));
        assert!(engine.options.has_valid_tolerance());
    }
}
