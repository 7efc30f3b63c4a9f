//! Session-scoped configuration store.
//!
//! Owns the single `Configuration` of a session and exposes one validated
//! setter per field. A rejected value returns an error and leaves the record
//! untouched.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{Result, check_int, check_range};
use crate::export;
use crate::geometry::{self, FitReport};
use crate::model::{
    BoxType, Configuration, Flute, PackagingKind, PackagingMaterial, PackagingSettings, Product,
    ProductMaterial, ShippingBox, TestCategory, TestResults,
};
use crate::score;
use crate::types::Axis;

/// Holds the current configuration of one session.
#[derive(Clone, Debug, Default)]
pub struct ConfigurationStore {
    config: Configuration,
}

impl ConfigurationStore {
    /// Creates a store holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Consumes the store, returning the configuration it holds.
    pub fn into_configuration(self) -> Configuration {
        self.config
    }

    pub fn product(&self) -> &Product {
        &self.config.product
    }

    pub fn shipping_box(&self) -> &ShippingBox {
        &self.config.shipping_box
    }

    pub fn packaging(&self) -> &PackagingSettings {
        &self.config.packaging
    }

    /// The selected packaging material with its current parameter.
    pub fn active_material(&self) -> PackagingMaterial {
        self.config.packaging.active()
    }

    pub fn test_results(&self) -> &TestResults {
        &self.config.tests
    }

    /// Replaces the whole configuration, e.g. after importing an export document.
    pub fn replace(&mut self, config: Configuration) {
        debug!(product = %config.product.name, "configuration replaced");
        self.config = config;
    }

    pub fn set_product_name(&mut self, name: impl Into<String>) -> &Product {
        self.config.product.name = name.into();
        debug!(name = %self.config.product.name, "product name updated");
        &self.config.product
    }

    /// Sets one product dimension in mm.
    ///
    /// # Errors
    /// `Error::Range` if `value` lies outside [10, 500].
    pub fn set_product_dimension(&mut self, axis: Axis, value: f64) -> Result<&Product> {
        let field = match axis {
            Axis::Length => "product.length",
            Axis::Width => "product.width",
            Axis::Height => "product.height",
        };
        let value = check_range(
            field,
            value,
            Product::DIMENSION_MIN_MM,
            Product::DIMENSION_MAX_MM,
        )
        .inspect_err(log_rejection)?;
        *self.config.product.dimension_mut(axis) = value;
        debug!(%axis, value, "product dimension updated");
        Ok(&self.config.product)
    }

    pub fn set_fragility(&mut self, value: i64) -> Result<&Product> {
        self.config.product.fragility = check_int(
            "product.fragility",
            value,
            Product::FRAGILITY_MIN,
            Product::FRAGILITY_MAX,
        )
        .inspect_err(log_rejection)?;
        debug!(value, "product fragility updated");
        Ok(&self.config.product)
    }

    pub fn set_materials(
        &mut self,
        materials: impl IntoIterator<Item = ProductMaterial>,
    ) -> &Product {
        self.config.product.materials = materials.into_iter().collect::<BTreeSet<_>>();
        debug!(
            count = self.config.product.materials.len(),
            "product materials updated"
        );
        &self.config.product
    }

    pub fn set_box_type(&mut self, box_type: BoxType) -> &ShippingBox {
        self.config.shipping_box.box_type = box_type;
        debug!(?box_type, "box type updated");
        &self.config.shipping_box
    }

    /// Sets one inner box dimension in mm.
    ///
    /// # Errors
    /// `Error::Range` if `value` lies outside [100, 1000].
    pub fn set_box_dimension(&mut self, axis: Axis, value: f64) -> Result<&ShippingBox> {
        let field = match axis {
            Axis::Length => "box.length",
            Axis::Width => "box.width",
            Axis::Height => "box.height",
        };
        let value = check_range(
            field,
            value,
            ShippingBox::DIMENSION_MIN_MM,
            ShippingBox::DIMENSION_MAX_MM,
        )
        .inspect_err(log_rejection)?;
        *self.config.shipping_box.dimension_mut(axis) = value;
        debug!(%axis, value, "box dimension updated");
        Ok(&self.config.shipping_box)
    }

    pub fn set_wall_thickness(&mut self, value: f64) -> Result<&ShippingBox> {
        self.config.shipping_box.wall_thickness = check_range(
            "box.wall_thickness",
            value,
            ShippingBox::WALL_MIN_MM,
            ShippingBox::WALL_MAX_MM,
        )
        .inspect_err(log_rejection)?;
        debug!(value, "wall thickness updated");
        Ok(&self.config.shipping_box)
    }

    /// Selects the packaging material type.
    ///
    /// Parameters of the other types are kept as they are; the returned
    /// variant carries the current value of the newly active one.
    pub fn set_material_type(&mut self, kind: PackagingKind) -> PackagingMaterial {
        self.config.packaging.kind = kind;
        let active = self.config.packaging.active();
        debug!(?active, "packaging type updated");
        active
    }

    pub fn set_paper_gsm(&mut self, value: i64) -> Result<&PackagingSettings> {
        self.config.packaging.gsm = check_int(
            "packaging.paper_gsm",
            value,
            PackagingSettings::GSM_MIN,
            PackagingSettings::GSM_MAX,
        )
        .inspect_err(log_rejection)?;
        debug!(value, "paper gsm updated");
        Ok(&self.config.packaging)
    }

    pub fn set_air_pillows(&mut self, value: i64) -> Result<&PackagingSettings> {
        self.config.packaging.air_count = check_int(
            "packaging.air_pillows",
            value,
            PackagingSettings::AIR_COUNT_MIN,
            PackagingSettings::AIR_COUNT_MAX,
        )
        .inspect_err(log_rejection)?;
        debug!(value, "air pillow count updated");
        Ok(&self.config.packaging)
    }

    pub fn set_foam_fill(&mut self, value: i64) -> Result<&PackagingSettings> {
        self.config.packaging.foam_fill_pct = check_int(
            "packaging.foam_fill_pct",
            value,
            PackagingSettings::FOAM_FILL_MIN,
            PackagingSettings::FOAM_FILL_MAX,
        )
        .inspect_err(log_rejection)?;
        debug!(value, "foam fill updated");
        Ok(&self.config.packaging)
    }

    pub fn set_flute(&mut self, flute: Flute) -> &PackagingSettings {
        self.config.packaging.flute = flute;
        debug!(?flute, "flute updated");
        &self.config.packaging
    }

    /// Records one ISTA test percentage.
    ///
    /// # Errors
    /// `Error::Range` if `value` lies outside [0, 100].
    pub fn set_test_score(&mut self, category: TestCategory, value: i64) -> Result<&TestResults> {
        let score = check_int(
            category.field(),
            value,
            TestResults::SCORE_MIN,
            TestResults::SCORE_MAX,
        )
        .inspect_err(log_rejection)?;
        *self.config.tests.score_mut(category) = score;
        debug!(%category, value, "test score updated");
        Ok(&self.config.tests)
    }

    /// Fit check of the current product against the current box.
    pub fn fit_report(&self) -> Result<FitReport> {
        geometry::fit_report(&self.config.product, &self.config.shipping_box)
    }

    /// Confidence score of the current test results.
    pub fn confidence(&self) -> f64 {
        score::confidence(&self.config.tests)
    }

    /// Export document of the current configuration.
    pub fn serialize(&self) -> String {
        export::serialize(&self.config)
    }
}

fn log_rejection(err: &crate::error::Error) {
    warn!(error = %err, "configuration change rejected");
}
