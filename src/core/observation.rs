//! Face observation types produced by an external detector.
//!
//! The engine never touches pixels. An upstream detector hands it either a
//! bounding rectangle in pixel space or a dense mesh of normalized landmark
//! points, together with the frame dimensions the detection was made in.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the analyzed video frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A detected face as a rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when every coordinate is a finite number and the box has
    /// non-negative extent.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// One normalized facial landmark. Coordinates are in [0,1] relative to the
/// frame; `z` is a depth-like value on the same scale as `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One frame's face-detection result, in whichever shape the upstream
/// detector produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaceObservation {
    /// A single face rectangle in pixel coordinates.
    BoundingBox(BoundingBox),
    /// A full landmark mesh in normalized coordinates.
    LandmarkMesh { points: Vec<LandmarkPoint> },
}

impl FaceObservation {
    /// Derive the pixel-space bounding box of the observation.
    ///
    /// For a mesh this is the box around all landmark points scaled into
    /// pixel space. Returns `None` for an empty or non-finite mesh.
    pub fn bounding_box(&self, frame: FrameSize) -> Option<BoundingBox> {
        match self {
            FaceObservation::BoundingBox(rect) => {
                rect.is_well_formed().then_some(*rect)
            }
            FaceObservation::LandmarkMesh { points } => {
                if points.is_empty() || points.iter().any(|p| !p.is_finite()) {
                    return None;
                }

                let mut min_x = f64::INFINITY;
                let mut max_x = f64::NEG_INFINITY;
                let mut min_y = f64::INFINITY;
                let mut max_y = f64::NEG_INFINITY;
                for p in points {
                    let px = p.x * frame.width;
                    let py = p.y * frame.height;
                    min_x = min_x.min(px);
                    max_x = max_x.max(px);
                    min_y = min_y.min(py);
                    max_y = max_y.max(py);
                }

                Some(BoundingBox::new(
                    min_x,
                    min_y,
                    max_x - min_x,
                    max_y - min_y,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_center() {
        let rect = BoundingBox::new(10.0, 20.0, 100.0, 60.0);
        assert_eq!(rect.center(), (60.0, 50.0));
    }

    #[test]
    fn test_well_formed_rejects_nan() {
        let rect = BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0);
        assert!(!rect.is_well_formed());
    }

    #[test]
    fn test_mesh_bounding_box_scales_to_pixels() {
        let frame = FrameSize::new(640.0, 480.0);
        let mesh = FaceObservation::LandmarkMesh {
            points: vec![
                LandmarkPoint::new(0.25, 0.25, 0.0),
                LandmarkPoint::new(0.75, 0.5, 0.0),
            ],
        };

        let rect = mesh.bounding_box(frame).unwrap();
        assert_eq!(rect.x, 160.0);
        assert_eq!(rect.y, 120.0);
        assert_eq!(rect.width, 320.0);
        assert_eq!(rect.height, 120.0);
    }

    #[test]
    fn test_empty_mesh_has_no_bounding_box() {
        let mesh = FaceObservation::LandmarkMesh { points: vec![] };
        assert!(mesh.bounding_box(FrameSize::new(640.0, 480.0)).is_none());
    }

    #[test]
    fn test_observation_serde_tagging() {
        let obs = FaceObservation::BoundingBox(BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"kind\":\"bounding_box\""));

        let back: FaceObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}
