//! Export document: the canonical JSON snapshot of a configuration.
//!
//! The document shape is a compatibility contract for downstream consumers:
//! four sections `product`, `box`, `packaging` and `tests`. All four packaging
//! parameters are always written, whichever type is active, so a document
//! can be parsed back without losing the retained values.

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::error::Result;
use crate::model::{BoxType, Configuration, Flute, PackagingKind, ProductMaterial, TestCategory};
use crate::score;
use crate::store::ConfigurationStore;
use crate::types::{Axis, Dimensional};

/// Default file name offered for download.
pub const DEFAULT_FILE_NAME: &str = "virtupack_simulation.json";

/// Immutable export document.
///
/// Integer fields are read as `i64` so that out-of-domain values in an
/// imported document surface as range errors from the store instead of
/// opaque parse failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExportSnapshot {
    pub product: ProductSection,
    #[serde(rename = "box")]
    pub shipping_box: BoxSection,
    pub packaging: PackagingSection,
    pub tests: TestsSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSection {
    pub name: String,
    #[serde(with = "millimetres")]
    #[schema(value_type = [f64; 3], example = json!([100, 80, 50]))]
    pub dimensions_mm: [f64; 3],
    pub fragility: i64,
    pub materials: Vec<ProductMaterial>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoxSection {
    #[serde(rename = "type")]
    pub box_type: BoxType,
    #[serde(with = "millimetres")]
    #[schema(value_type = [f64; 3], example = json!([300, 200, 150]))]
    pub dimensions_mm: [f64; 3],
    pub wall_thickness_mm: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PackagingSection {
    #[serde(rename = "type")]
    pub kind: PackagingKind,
    pub paper_gsm: i64,
    pub air_pillows: i64,
    pub foam_fill_pct: i64,
    pub flute: Flute,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TestsSection {
    pub drop: i64,
    pub vibration: i64,
    pub compression: i64,
    /// Derived on export, ignored on import.
    #[serde(default)]
    pub confidence_score: f64,
}

impl ExportSnapshot {
    /// Builds the snapshot of a configuration, deriving the confidence score.
    pub fn from_configuration(config: &Configuration) -> Self {
        let Configuration {
            product,
            shipping_box,
            packaging,
            tests,
        } = config;

        Self {
            product: ProductSection {
                name: product.name.clone(),
                dimensions_mm: product.dimensions().to_array(),
                fragility: i64::from(product.fragility),
                materials: product.materials.iter().copied().collect(),
            },
            shipping_box: BoxSection {
                box_type: shipping_box.box_type,
                dimensions_mm: shipping_box.dimensions().to_array(),
                wall_thickness_mm: shipping_box.wall_thickness,
            },
            packaging: PackagingSection {
                kind: packaging.kind,
                paper_gsm: i64::from(packaging.gsm),
                air_pillows: i64::from(packaging.air_count),
                foam_fill_pct: i64::from(packaging.foam_fill_pct),
                flute: packaging.flute,
            },
            tests: TestsSection {
                drop: i64::from(tests.drop),
                vibration: i64::from(tests.vibration),
                compression: i64::from(tests.compression),
                confidence_score: score::confidence(tests),
            },
        }
    }

    /// Pretty-printed JSON text with two-space indentation.
    ///
    /// # Panics
    /// Never in practice: every field is a string, an integer or a float.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .expect("export snapshot contains only JSON-representable values")
    }

    /// Rebuilds a configuration, validating every field through the store.
    ///
    /// `confidence_score` is not read back; it is derived from the scores.
    pub fn into_configuration(self) -> Result<Configuration> {
        let Self {
            product,
            shipping_box,
            packaging,
            tests,
        } = self;

        let mut store = ConfigurationStore::new();

        store.set_product_name(product.name);
        for (axis, value) in Axis::ALL.into_iter().zip(product.dimensions_mm) {
            store.set_product_dimension(axis, value)?;
        }
        store.set_fragility(product.fragility)?;
        store.set_materials(product.materials);

        store.set_box_type(shipping_box.box_type);
        for (axis, value) in Axis::ALL.into_iter().zip(shipping_box.dimensions_mm) {
            store.set_box_dimension(axis, value)?;
        }
        store.set_wall_thickness(shipping_box.wall_thickness_mm)?;

        store.set_paper_gsm(packaging.paper_gsm)?;
        store.set_air_pillows(packaging.air_pillows)?;
        store.set_foam_fill(packaging.foam_fill_pct)?;
        store.set_flute(packaging.flute);
        store.set_material_type(packaging.kind);

        store.set_test_score(TestCategory::Drop, tests.drop)?;
        store.set_test_score(TestCategory::Vibration, tests.vibration)?;
        store.set_test_score(TestCategory::Compression, tests.compression)?;

        Ok(store.into_configuration())
    }
}

/// Serializes a configuration into the export document.
pub fn serialize(config: &Configuration) -> String {
    ExportSnapshot::from_configuration(config).to_json()
}

/// Parses an export document back into a validated configuration.
///
/// # Errors
/// `Error::Document` for text that is not a well-formed document,
/// `Error::Range` for a field outside its domain.
pub fn parse(text: &str) -> Result<Configuration> {
    let snapshot: ExportSnapshot = serde_json::from_str(text)?;
    snapshot.into_configuration()
}

/// Writes whole-millimetre values as JSON integers (`[100, 80, 50]`) and
/// everything else as floats.
mod millimetres {
    use serde::ser::SerializeTuple;
    use serde::{Deserialize, Deserializer, Serializer};

    // Largest magnitude at which every integral f64 is exactly an i64.
    const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S>(dims: &[f64; 3], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_tuple(3)?;
        for value in dims {
            if value.fract() == 0.0 && value.abs() <= EXACT_INT_LIMIT {
                seq.serialize_element(&(*value as i64))?;
            } else {
                seq.serialize_element(value)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[f64; 3], D::Error>
    where
        D: Deserializer<'de>,
    {
        <[f64; 3]>::deserialize(deserializer)
    }
}
