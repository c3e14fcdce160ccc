//! Relative face bounding boxes as reported by a face detector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Box in image-relative coordinates (0..1 on each axis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub xmin:   f32,
    pub ymin:   f32,
    pub width:  f32,
    pub height: f32,
}

/// Box in pixels, guaranteed non-empty and inside the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl FaceBox {
    pub fn new(xmin: f32, ymin: f32, width: f32, height: f32) -> Self {
        FaceBox { xmin, ymin, width, height }
    }

    /// The whole image.
    pub fn full() -> Self { FaceBox::new(0.0, 0.0, 1.0, 1.0) }

    /// Scale to an `img_w` × `img_h` image.
    ///
    /// Corners are truncated toward zero and then clamped into the image.
    /// Returns `None` when nothing of the box is left.
    pub fn to_pixels(&self, img_w: u32, img_h: u32) -> Option<PixelRect> {
        let x1 = (self.xmin * img_w as f32) as i64;
        let y1 = (self.ymin * img_h as f32) as i64;
        let x2 = x1 + (self.width * img_w as f32) as i64;
        let y2 = y1 + (self.height * img_h as f32) as i64;

        let clamp_x = |v: i64| v.clamp(0, img_w as i64) as u32;
        let clamp_y = |v: i64| v.clamp(0, img_h as i64) as u32;
        let (x1, x2) = (clamp_x(x1), clamp_x(x2));
        let (y1, y2) = (clamp_y(y1), clamp_y(y2));

        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(PixelRect { x: x1, y: y1, w: x2 - x1, h: y2 - y1 })
    }
}

impl fmt::Display for FaceBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{},{},{}", self.xmin, self.ymin, self.width, self.height)
    }
}

impl FromStr for FaceBox {
    type Err = String;

    /// Parse `xmin,ymin,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f32> = s
            .split(',')
            .map(|p| p.trim().parse::<f32>().map_err(|e| format!("bad box value {:?}: {}", p, e)))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            &[xmin, ymin, width, height] => Ok(FaceBox::new(xmin, ymin, width, height)),
            other => Err(format!("expected 4 comma-separated values, got {}", other.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_pixels() {
        let b = FaceBox::new(0.25, 0.5, 0.5, 0.25);
        assert_eq!(b.to_pixels(200, 100), Some(PixelRect { x: 50, y: 50, w: 100, h: 25 }));
    }

    #[test]
    fn clamps_to_image() {
        let b = FaceBox::new(0.8, -0.1, 0.5, 0.5);
        assert_eq!(b.to_pixels(100, 100), Some(PixelRect { x: 80, y: 0, w: 20, h: 40 }));
    }

    #[test]
    fn zero_area_is_none() {
        assert_eq!(FaceBox::new(0.5, 0.5, 0.0, 0.3).to_pixels(100, 100), None);
        assert_eq!(FaceBox::new(1.2, 0.0, 0.5, 0.5).to_pixels(100, 100), None);
        assert_eq!(FaceBox::new(0.5, 0.5, 0.004, 0.5).to_pixels(100, 100), None);
    }

    #[test]
    fn full_box_covers_image() {
        assert_eq!(FaceBox::full().to_pixels(64, 48), Some(PixelRect { x: 0, y: 0, w: 64, h: 48 }));
    }

    #[test]
    fn parse() {
        let b: FaceBox = "0.1, 0.2,0.3,0.4".parse().unwrap();
        assert_eq!(b, FaceBox::new(0.1, 0.2, 0.3, 0.4));
        assert!("0.1,0.2,0.3".parse::<FaceBox>().is_err());
        assert!("a,b,c,d".parse::<FaceBox>().is_err());
    }
}
