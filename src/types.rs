//! Common types and traits for 3D geometry.
//!
//! Axes follow the packaging convention used throughout the crate:
//! X is length, Y is width and Z is height, all in millimetres.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Error;

/// Represents a 3D vector or point in space.
///
/// Used for positions, dimensions, and clearances.
///
/// # Examples
/// ```
/// use virtupack::types::Vec3;
///
/// let origin = Vec3::new(50.0, 50.0, 10.0);
/// let dims = Vec3::new(100.0, 80.0, 50.0);
/// assert_eq!(origin + dims, Vec3::new(150.0, 130.0, 60.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new 3D vector.
    ///
    /// # Parameters
    /// * `x` - X component (length)
    /// * `y` - Y component (width)
    /// * `z` - Z component (height)
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a zero vector (origin).
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Converts to the `[length, width, height]` array used by the export format.
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the component along the given axis.
    #[inline]
    pub const fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.x,
            Axis::Width => self.y,
            Axis::Height => self.z,
        }
    }

    /// Checks if all components are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.x > 0.0
            && self.y > 0.0
            && self.z > 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
    }

    /// Checks if all components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// One of the three box axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl Axis {
    /// All axes in export order.
    pub const ALL: [Axis; 3] = [Axis::Length, Axis::Width, Axis::Height];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Axis::Length => "length",
            Axis::Width => "width",
            Axis::Height => "height",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "length" | "l" | "x" => Ok(Axis::Length),
            "width" | "w" | "y" => Ok(Axis::Width),
            "height" | "h" | "z" => Ok(Axis::Height),
            _ => Err(Error::UnknownName {
                kind: "axis",
                value: raw.to_string(),
            }),
        }
    }
}

/// Trait for objects with 3D dimensions.
///
/// Implemented by the product and the shipping box so the geometry engine
/// can treat both uniformly.
pub trait Dimensional {
    /// Returns the dimensions (length, width, height) of the object.
    fn dimensions(&self) -> Vec3;

    /// Calculates the volume in cubic millimetres.
    fn volume(&self) -> f64 {
        let dims = self.dimensions();
        dims.x * dims.y * dims.z
    }
}

/// Represents an Axis-Aligned Bounding Box (AABB).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (position)
    pub min: Vec3,
    /// Maximum corner (position + dimensions)
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a bounding box from position and dimensions.
    #[inline]
    pub fn from_position_and_dims(position: Vec3, dims: Vec3) -> Self {
        Self {
            min: position,
            max: position + dims,
        }
    }

    /// Returns the eight corners of the box.
    ///
    /// Bottom face first, walking counter-clockwise from `min`, then the
    /// top face in the same order.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ]
    }

    /// Checks if another bounding box lies completely inside this one.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.min.z >= self.min.z
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
            && other.max.z <= self.max.z
    }

    /// Returns the dimensions (length, width, height).
    #[inline]
    pub fn dimensions(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(b.to_array(), [4.0, 5.0, 6.0]);
        assert_eq!(b.component(Axis::Width), 5.0);
    }

    #[test]
    fn test_vec3_dimension_validity() {
        assert!(Vec3::new(1.0, 1.0, 1.0).is_valid_dimension());
        assert!(!Vec3::new(0.0, 1.0, 1.0).is_valid_dimension());
        assert!(!Vec3::new(1.0, -1.0, 1.0).is_valid_dimension());
        assert!(!Vec3::new(1.0, 1.0, f64::NAN).is_valid_dimension());
        assert!(!Vec3::new(f64::INFINITY, 1.0, 1.0).is_valid_dimension());
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("length".parse::<Axis>().unwrap(), Axis::Length);
        assert_eq!(" Width ".parse::<Axis>().unwrap(), Axis::Width);
        assert_eq!("z".parse::<Axis>().unwrap(), Axis::Height);
        assert!(matches!(
            "depth".parse::<Axis>(),
            Err(Error::UnknownName { kind: "axis", .. })
        ));
    }

    #[test]
    fn test_bounding_box_corners() {
        let bbox = BoundingBox::from_position_and_dims(
            Vec3::new(50.0, 50.0, 10.0),
            Vec3::new(100.0, 80.0, 50.0),
        );
        let corners = bbox.corners();

        assert_eq!(corners[0], Vec3::new(50.0, 50.0, 10.0));
        assert_eq!(corners[2], Vec3::new(150.0, 130.0, 10.0));
        assert_eq!(corners[6], Vec3::new(150.0, 130.0, 60.0));
        assert_eq!(bbox.dimensions(), Vec3::new(100.0, 80.0, 50.0));
    }

    #[test]
    fn test_bounding_box_contains() {
        let outer = BoundingBox::from_position_and_dims(Vec3::zero(), Vec3::new(300.0, 200.0, 150.0));
        let inner = BoundingBox::from_position_and_dims(
            Vec3::new(50.0, 50.0, 10.0),
            Vec3::new(100.0, 80.0, 50.0),
        );
        let sticking_out = BoundingBox::from_position_and_dims(
            Vec3::new(250.0, 50.0, 10.0),
            Vec3::new(100.0, 80.0, 50.0),
        );

        assert!(outer.contains(&inner));
        assert!(!outer.contains(&sticking_out));
    }
}
