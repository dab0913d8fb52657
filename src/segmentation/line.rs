use std::fmt;
use serde::{Deserialize, Serialize};

// @module: OCR line units

/// Location of a line inside the document: image index and 0-based ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineRef {
    // @field: Index of the source image
    pub image: usize,

    // @field: Position within that image
    pub position: usize,
}

impl LineRef {
    pub fn new(image: usize, position: usize) -> Self {
        LineRef { image, position }
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "image {} line {}", self.image + 1, self.position + 1)
    }
}

/// One unit of OCR output. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Raw recognized text
    pub text: String,

    /// Index of the image the line was recognized on
    pub image_index: usize,

    /// 0-based ordinal within the image
    pub position: usize,
}

impl Line {
    pub fn new(image_index: usize, position: usize, text: impl Into<String>) -> Self {
        Line {
            text: text.into(),
            image_index,
            position,
        }
    }

    pub fn location(&self) -> LineRef {
        LineRef::new(self.image_index, self.position)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Flatten per-image line lists into lines ordered by (image, position)
    pub fn iter_images(images: &[Vec<String>]) -> impl Iterator<Item = Line> + '_ {
        images.iter().enumerate().flat_map(|(image_index, lines)| {
            lines
                .iter()
                .enumerate()
                .map(move |(position, text)| Line::new(image_index, position, text.as_str()))
        })
    }

    /// Collecting variant of [`Line::iter_images`]
    pub fn from_images(images: &[Vec<String>]) -> Vec<Line> {
        Self::iter_images(images).collect()
    }
}
