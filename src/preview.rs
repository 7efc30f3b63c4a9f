//! 3D preview data for the visualization front end.
//!
//! The box is drawn at the origin and the product at a fixed inset offset so
//! it appears nested inside the box. The inset is a presentation convention,
//! not a placement algorithm: whether the product fits is decided by
//! `geometry::fit_report` from dimensions alone.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Result;
use crate::geometry::{self, FitReport};
use crate::model::Configuration;
use crate::types::{BoundingBox, Dimensional, Vec3};

/// Where the product is drawn relative to the box origin.
pub const DEFAULT_PRODUCT_INSET: Vec3 = Vec3::new(50.0, 50.0, 10.0);

const BOX_COLOR: &str = "lightgray";
const BOX_OPACITY: f64 = 0.2;
const PRODUCT_COLOR: &str = "red";
const PRODUCT_OPACITY: f64 = 0.7;

/// A prism as parallel vertex coordinate arrays, ready for a mesh trace.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PrismMesh {
    pub name: String,
    pub color: String,
    pub opacity: f64,
    pub x: [f64; 8],
    pub y: [f64; 8],
    pub z: [f64; 8],
}

impl PrismMesh {
    fn from_vertices(name: &str, color: &str, opacity: f64, vertices: [Vec3; 8]) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            opacity,
            x: vertices.map(|v| v.x),
            y: vertices.map(|v| v.y),
            z: vertices.map(|v| v.z),
        }
    }
}

/// Everything the preview needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PreviewScene {
    #[serde(rename = "box")]
    pub box_mesh: PrismMesh,
    pub product: PrismMesh,
    /// Whether the drawn product stays within the drawn box at this inset.
    /// Purely visual; see `fit` for the actual verdict.
    pub drawn_inside: bool,
    pub fit: FitReport,
}

/// Builds the preview scene for a configuration.
pub fn build_scene(config: &Configuration, inset: Vec3) -> Result<PreviewScene> {
    let outer = config.shipping_box.dimensions();
    let item = config.product.dimensions();

    let box_vertices = geometry::bounding_box(Vec3::zero(), outer.x, outer.y, outer.z)?;
    let product_vertices = geometry::bounding_box(inset, item.x, item.y, item.z)?;

    let drawn_inside = BoundingBox::from_position_and_dims(Vec3::zero(), outer)
        .contains(&BoundingBox::from_position_and_dims(inset, item));

    Ok(PreviewScene {
        box_mesh: PrismMesh::from_vertices("Box", BOX_COLOR, BOX_OPACITY, box_vertices),
        product: PrismMesh::from_vertices(
            "Product",
            PRODUCT_COLOR,
            PRODUCT_OPACITY,
            product_vertices,
        ),
        drawn_inside,
        fit: geometry::fit_report(&config.product, &config.shipping_box)?,
    })
}
