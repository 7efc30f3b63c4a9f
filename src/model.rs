//! Data models for the packaging configuration.
//!
//! This module defines the typed configuration record:
//! - `Product`: the item being shipped
//! - `ShippingBox`: the corrugated box it ships in
//! - `PackagingSettings`: the protective material, with every material's
//!   parameter retained so switching the type is lossless
//! - `TestResults`: user-entered ISTA test percentages
//! - `Configuration`: the aggregate root owned by the store
//!
//! Defaults reproduce the initial state a new session starts with.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::error::Error;
use crate::types::{Axis, Dimensional, Vec3};

/// Materials a product can be made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProductMaterial {
    Glass,
    Wood,
    Plastic,
    Metal,
    Foam,
    Electronics,
}

/// The item being packed.
///
/// # Fields
/// * `name` - Free-text product name
/// * `length`, `width`, `height` - Dimensions in mm, each within [10, 500]
/// * `fragility` - Fragility score 0–100
/// * `materials` - Set of materials the product is made of
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Chair Arm",
    "length": 100.0,
    "width": 80.0,
    "height": 50.0,
    "fragility": 50,
    "materials": ["Plastic"]
}))]
pub struct Product {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub fragility: u8,
    #[schema(value_type = Vec<ProductMaterial>)]
    pub materials: BTreeSet<ProductMaterial>,
}

impl Product {
    pub const DIMENSION_MIN_MM: f64 = 10.0;
    pub const DIMENSION_MAX_MM: f64 = 500.0;
    pub const FRAGILITY_MIN: i64 = 0;
    pub const FRAGILITY_MAX: i64 = 100;

    /// Returns the dimension along one axis.
    pub fn dimension(&self, axis: Axis) -> f64 {
        self.dimensions().component(axis)
    }

    pub(crate) fn dimension_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Length => &mut self.length,
            Axis::Width => &mut self.width,
            Axis::Height => &mut self.height,
        }
    }
}

impl Default for Product {
    fn default() -> Self {
        Self {
            name: "Chair Arm".to_string(),
            length: 100.0,
            width: 80.0,
            height: 50.0,
            fragility: 50,
            materials: BTreeSet::from([ProductMaterial::Plastic]),
        }
    }
}

impl Dimensional for Product {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.length, self.width, self.height)
    }
}

/// FEFCO style of the shipping box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BoxType {
    #[default]
    #[serde(rename = "FEFCO 0201")]
    Fefco0201,
    #[serde(rename = "FEFCO 0300")]
    Fefco0300,
    #[serde(rename = "FEFCO 0427")]
    Fefco0427,
    Custom,
}

/// The corrugated box the product ships in.
///
/// # Fields
/// * `box_type` - FEFCO style (`type` on the wire)
/// * `length`, `width`, `height` - Inner dimensions in mm, each within [100, 1000]
/// * `wall_thickness` - Board thickness in mm, within [1.0, 10.0]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShippingBox {
    #[serde(rename = "type")]
    pub box_type: BoxType,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub wall_thickness: f64,
}

impl ShippingBox {
    pub const DIMENSION_MIN_MM: f64 = 100.0;
    pub const DIMENSION_MAX_MM: f64 = 1000.0;
    pub const WALL_MIN_MM: f64 = 1.0;
    pub const WALL_MAX_MM: f64 = 10.0;

    /// Returns the dimension along one axis.
    pub fn dimension(&self, axis: Axis) -> f64 {
        self.dimensions().component(axis)
    }

    pub(crate) fn dimension_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Length => &mut self.length,
            Axis::Width => &mut self.width,
            Axis::Height => &mut self.height,
        }
    }
}

impl Default for ShippingBox {
    fn default() -> Self {
        Self {
            box_type: BoxType::default(),
            length: 300.0,
            width: 200.0,
            height: 150.0,
            wall_thickness: 3.0,
        }
    }
}

impl Dimensional for ShippingBox {
    fn dimensions(&self) -> Vec3 {
        Vec3::new(self.length, self.width, self.height)
    }
}

/// Protective packaging material type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PackagingKind {
    #[default]
    PaperWrap,
    AirPillow,
    FoamInPlace,
    CorrugateInsert,
}

/// Corrugated board flute profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Flute {
    B,
    #[default]
    C,
    E,
}

/// The active packaging material with its single meaningful parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum PackagingMaterial {
    PaperWrap { gsm: u16 },
    AirPillow { air_count: u8 },
    FoamInPlace { foam_fill_pct: u8 },
    CorrugateInsert { flute: Flute },
}

impl PackagingMaterial {
    pub fn kind(&self) -> PackagingKind {
        match self {
            PackagingMaterial::PaperWrap { .. } => PackagingKind::PaperWrap,
            PackagingMaterial::AirPillow { .. } => PackagingKind::AirPillow,
            PackagingMaterial::FoamInPlace { .. } => PackagingKind::FoamInPlace,
            PackagingMaterial::CorrugateInsert { .. } => PackagingKind::CorrugateInsert,
        }
    }
}

/// Stored packaging state.
///
/// Holds the selected type plus the payload of every material type. Only the
/// payload matching `kind` is meaningful; the others are kept so that
/// reselecting a type restores its last value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PackagingSettings {
    #[serde(rename = "type")]
    pub kind: PackagingKind,
    pub gsm: u16,
    pub air_count: u8,
    pub foam_fill_pct: u8,
    pub flute: Flute,
}

impl PackagingSettings {
    pub const GSM_MIN: i64 = 20;
    pub const GSM_MAX: i64 = 200;
    pub const AIR_COUNT_MIN: i64 = 1;
    pub const AIR_COUNT_MAX: i64 = 20;
    pub const FOAM_FILL_MIN: i64 = 0;
    pub const FOAM_FILL_MAX: i64 = 100;

    /// Resolves the selected type to its variant.
    pub fn active(&self) -> PackagingMaterial {
        match self.kind {
            PackagingKind::PaperWrap => PackagingMaterial::PaperWrap { gsm: self.gsm },
            PackagingKind::AirPillow => PackagingMaterial::AirPillow {
                air_count: self.air_count,
            },
            PackagingKind::FoamInPlace => PackagingMaterial::FoamInPlace {
                foam_fill_pct: self.foam_fill_pct,
            },
            PackagingKind::CorrugateInsert => {
                PackagingMaterial::CorrugateInsert { flute: self.flute }
            }
        }
    }
}

impl Default for PackagingSettings {
    fn default() -> Self {
        Self {
            kind: PackagingKind::default(),
            gsm: 80,
            air_count: 5,
            foam_fill_pct: 15,
            flute: Flute::default(),
        }
    }
}

/// ISTA test category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TestCategory {
    Drop,
    Vibration,
    Compression,
}

impl TestCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TestCategory::Drop => "drop",
            TestCategory::Vibration => "vibration",
            TestCategory::Compression => "compression",
        }
    }

    pub(crate) const fn field(&self) -> &'static str {
        match self {
            TestCategory::Drop => "tests.drop",
            TestCategory::Vibration => "tests.vibration",
            TestCategory::Compression => "tests.compression",
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestCategory {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "drop" | "drop_test" => Ok(TestCategory::Drop),
            "vibration" | "vibration_test" => Ok(TestCategory::Vibration),
            "compression" | "compression_test" => Ok(TestCategory::Compression),
            _ => Err(Error::UnknownName {
                kind: "test category",
                value: raw.to_string(),
            }),
        }
    }
}

/// User-entered ISTA pass percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TestResults {
    pub drop: u8,
    pub vibration: u8,
    pub compression: u8,
}

impl TestResults {
    pub const SCORE_MIN: i64 = 0;
    pub const SCORE_MAX: i64 = 100;

    pub fn score(&self, category: TestCategory) -> u8 {
        match category {
            TestCategory::Drop => self.drop,
            TestCategory::Vibration => self.vibration,
            TestCategory::Compression => self.compression,
        }
    }

    pub(crate) fn score_mut(&mut self, category: TestCategory) -> &mut u8 {
        match category {
            TestCategory::Drop => &mut self.drop,
            TestCategory::Vibration => &mut self.vibration,
            TestCategory::Compression => &mut self.compression,
        }
    }
}

impl Default for TestResults {
    fn default() -> Self {
        Self {
            drop: 94,
            vibration: 82,
            compression: 90,
        }
    }
}

/// The complete packaging configuration of one session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Configuration {
    pub product: Product,
    #[serde(rename = "box")]
    pub shipping_box: ShippingBox,
    pub packaging: PackagingSettings,
    pub tests: TestResults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_matches_session_start() {
        let config = Configuration::default();
        assert_eq!(config.product.name, "Chair Arm");
        assert_eq!(config.product.dimensions(), Vec3::new(100.0, 80.0, 50.0));
        assert_eq!(config.shipping_box.dimensions(), Vec3::new(300.0, 200.0, 150.0));
        assert_eq!(config.shipping_box.box_type, BoxType::Fefco0201);
        assert_eq!(
            config.packaging.active(),
            PackagingMaterial::PaperWrap { gsm: 80 }
        );
        assert_eq!(config.tests, TestResults::default());
    }

    #[test]
    fn active_material_follows_selected_kind() {
        let mut settings = PackagingSettings::default();
        settings.kind = PackagingKind::AirPillow;
        assert_eq!(settings.active(), PackagingMaterial::AirPillow { air_count: 5 });
        settings.kind = PackagingKind::FoamInPlace;
        assert_eq!(
            settings.active(),
            PackagingMaterial::FoamInPlace { foam_fill_pct: 15 }
        );
        settings.kind = PackagingKind::CorrugateInsert;
        assert_eq!(
            settings.active(),
            PackagingMaterial::CorrugateInsert { flute: Flute::C }
        );
        assert_eq!(settings.active().kind(), PackagingKind::CorrugateInsert);
    }

    #[test]
    fn box_type_uses_fefco_labels_on_the_wire() {
        let json = serde_json::to_string(&BoxType::Fefco0427).unwrap();
        assert_eq!(json, "\"FEFCO 0427\"");
        let parsed: BoxType = serde_json::from_str("\"Custom\"").unwrap();
        assert_eq!(parsed, BoxType::Custom);
    }

    #[test]
    fn test_category_parses_case_insensitively() {
        assert_eq!("Drop".parse::<TestCategory>().unwrap(), TestCategory::Drop);
        assert_eq!(
            "compression_test".parse::<TestCategory>().unwrap(),
            TestCategory::Compression
        );
        assert!("shock".parse::<TestCategory>().is_err());
    }

    #[test]
    fn product_volume_uses_all_axes() {
        let product = Product::default();
        assert_eq!(product.volume(), 400_000.0);
        assert_eq!(product.dimension(Axis::Height), 50.0);
    }
}
