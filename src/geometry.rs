//! Axis-aligned geometry for the product and its shipping box.
//!
//! Provides the prism vertices used by the preview and the dimension-only
//! fit check between product and box.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::types::{Axis, BoundingBox, Dimensional, Vec3};

/// Returns the 8 vertices of an axis-aligned prism anchored at `origin`.
///
/// Vertex order is the bottom face counter-clockwise starting at `origin`,
/// then the top face in the same order.
///
/// # Errors
/// `Error::InvalidGeometry` if a dimension is not positive and finite or the
/// origin is not finite.
///
/// # Examples
/// ```
/// use virtupack::geometry::bounding_box;
/// use virtupack::types::Vec3;
///
/// let vertices = bounding_box(Vec3::zero(), 300.0, 200.0, 150.0).unwrap();
/// assert_eq!(vertices[6], Vec3::new(300.0, 200.0, 150.0));
/// ```
pub fn bounding_box(origin: Vec3, length: f64, width: f64, height: f64) -> Result<[Vec3; 8]> {
    let dims = Vec3::new(length, width, height);
    validate_dims(dims, "prism")?;
    if !origin.is_finite() {
        return Err(Error::InvalidGeometry(format!(
            "prism origin must be finite, got ({}, {}, {})",
            origin.x, origin.y, origin.z
        )));
    }
    Ok(BoundingBox::from_position_and_dims(origin, dims).corners())
}

/// Per-axis clearance between box and product in mm.
///
/// Negative values mean the product is larger than the box on that axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Clearance {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Clearance {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length,
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }
}

impl From<Vec3> for Clearance {
    fn from(v: Vec3) -> Self {
        Self {
            length: v.x,
            width: v.y,
            height: v.z,
        }
    }
}

/// Outcome of the fit check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FitVerdict {
    Fits,
    /// Lists every axis on which the product exceeds the box.
    Overflow { axes: Vec<Axis> },
}

/// Dimension-only comparison of product and box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FitReport {
    pub clearance: Clearance,
    pub verdict: FitVerdict,
    /// Product volume as a percentage of the box volume.
    pub volume_utilization_pct: f64,
}

impl FitReport {
    pub fn fits(&self) -> bool {
        matches!(self.verdict, FitVerdict::Fits)
    }
}

/// Compares product and box dimensions axis by axis.
///
/// The product fits iff every clearance is ≥ 0. Positions play no part:
/// where the preview draws the product has no influence on the verdict.
///
/// # Errors
/// `Error::InvalidGeometry` if either side has a non-positive or non-finite
/// dimension.
pub fn fit_report(product: &impl Dimensional, container: &impl Dimensional) -> Result<FitReport> {
    let item = product.dimensions();
    let outer = container.dimensions();
    validate_dims(item, "product")?;
    validate_dims(outer, "box")?;

    let clearance = Clearance::from(outer - item);
    let failing: Vec<Axis> = Axis::ALL
        .into_iter()
        .filter(|axis| clearance.get(*axis) < 0.0)
        .collect();

    let verdict = if failing.is_empty() {
        FitVerdict::Fits
    } else {
        FitVerdict::Overflow { axes: failing }
    };

    Ok(FitReport {
        clearance,
        verdict,
        volume_utilization_pct: product.volume() / container.volume() * 100.0,
    })
}

fn validate_dims(dims: Vec3, what: &str) -> Result<()> {
    if dims.is_valid_dimension() {
        Ok(())
    } else {
        Err(Error::InvalidGeometry(format!(
            "{what} dimensions must be positive and finite, got ({}, {}, {})",
            dims.x, dims.y, dims.z
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, ShippingBox};

    fn product(l: f64, w: f64, h: f64) -> Product {
        Product {
            length: l,
            width: w,
            height: h,
            ..Product::default()
        }
    }

    fn shipping_box(l: f64, w: f64, h: f64) -> ShippingBox {
        ShippingBox {
            length: l,
            width: w,
            height: h,
            ..ShippingBox::default()
        }
    }

    #[test]
    fn default_pair_fits_with_expected_clearance() {
        let report = fit_report(&product(100.0, 80.0, 50.0), &shipping_box(300.0, 200.0, 150.0))
            .unwrap();

        assert!(report.fits());
        assert_eq!(
            report.clearance,
            Clearance {
                length: 200.0,
                width: 120.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn exact_fit_counts_as_fitting() {
        let report = fit_report(&product(300.0, 200.0, 150.0), &shipping_box(300.0, 200.0, 150.0))
            .unwrap();
        assert_eq!(report.verdict, FitVerdict::Fits);
        assert!((report.volume_utilization_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn overflow_names_every_failing_axis() {
        let report = fit_report(&product(400.0, 80.0, 160.0), &shipping_box(300.0, 200.0, 150.0))
            .unwrap();

        assert_eq!(
            report.verdict,
            FitVerdict::Overflow {
                axes: vec![Axis::Length, Axis::Height]
            }
        );
        assert_eq!(report.clearance.length, -100.0);
        assert_eq!(report.clearance.width, 120.0);
        assert_eq!(report.clearance.height, -10.0);
    }

    #[test]
    fn verdict_matches_component_comparison() {
        let sizes = [10.0, 99.5, 100.0, 150.0, 300.0, 500.0];
        let boxes = [100.0, 150.0, 300.0];
        for &pl in &sizes {
            for &pw in &sizes {
                for &bl in &boxes {
                    let p = product(pl, pw, 50.0);
                    let b = shipping_box(bl, 200.0, 150.0);
                    let expected = b.length >= p.length && b.width >= p.width && b.height >= p.height;
                    assert_eq!(fit_report(&p, &b).unwrap().fits(), expected);
                }
            }
        }
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let err = fit_report(&product(0.0, 80.0, 50.0), &shipping_box(300.0, 200.0, 150.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));

        let err = fit_report(&product(100.0, 80.0, 50.0), &shipping_box(300.0, -1.0, 150.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
    }

    #[test]
    fn bounding_box_anchors_at_origin() {
        let vertices = bounding_box(Vec3::zero(), 300.0, 200.0, 150.0).unwrap();
        let xs: Vec<f64> = vertices.iter().map(|v| v.x).collect();
        let ys: Vec<f64> = vertices.iter().map(|v| v.y).collect();
        let zs: Vec<f64> = vertices.iter().map(|v| v.z).collect();

        assert_eq!(xs, vec![0.0, 300.0, 300.0, 0.0, 0.0, 300.0, 300.0, 0.0]);
        assert_eq!(ys, vec![0.0, 0.0, 200.0, 200.0, 0.0, 0.0, 200.0, 200.0]);
        assert_eq!(zs, vec![0.0, 0.0, 0.0, 0.0, 150.0, 150.0, 150.0, 150.0]);
    }

    #[test]
    fn bounding_box_rejects_bad_input() {
        assert!(bounding_box(Vec3::zero(), 0.0, 1.0, 1.0).is_err());
        assert!(bounding_box(Vec3::zero(), 1.0, f64::NAN, 1.0).is_err());
        assert!(bounding_box(Vec3::new(f64::INFINITY, 0.0, 0.0), 1.0, 1.0, 1.0).is_err());
    }
}
