use std::ops::Index;

use crate::{CoreError, CoreResult};

/// One encoded quality variant of a media stream.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Representation {
    /// Peak bitrate in bits per second.
    pub bitrate: u32,
    /// Frame width in pixels, if known.
    pub width: Option<u32>,
    /// Frame height in pixels, if known.
    pub height: Option<u32>,
    /// Codec string (e.g. "avc1.64001f,mp4a.40.2").
    pub codecs: Option<String>,
}

impl Representation {
    #[must_use]
    pub fn new(bitrate: u32) -> Self {
        Self {
            bitrate,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_codecs(mut self, codecs: impl Into<String>) -> Self {
        self.codecs = Some(codecs.into());
        self
    }
}

/// Fixed-size, ordered list of representations for one track group.
///
/// Indices are stable for the lifetime of the catalog. The catalog is never
/// empty, so any selection made against it always has a valid index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepresentationCatalog {
    representations: Vec<Representation>,
    /// Indices ordered from highest to lowest bitrate.
    scan_order: Vec<usize>,
}

impl RepresentationCatalog {
    pub fn new(representations: Vec<Representation>) -> CoreResult<Self> {
        if representations.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }

        let mut scan_order: Vec<usize> = (0..representations.len()).collect();
        // Stable sort keeps supplied order among equal bitrates.
        scan_order.sort_by(|&a, &b| representations[b].bitrate.cmp(&representations[a].bitrate));

        Ok(Self {
            representations,
            scan_order,
        })
    }

    pub fn len(&self) -> usize {
        self.representations.len()
    }

    /// Always `false`; an empty catalog cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.representations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Representation> {
        self.representations.get(index)
    }

    pub fn representation(&self, index: usize) -> CoreResult<&Representation> {
        self.get(index).ok_or(CoreError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Representation> {
        self.representations.iter()
    }

    /// Indices from highest to lowest bitrate.
    pub fn scan_order(&self) -> &[usize] {
        &self.scan_order
    }

    /// Index of the lowest-bitrate representation.
    pub fn lowest_index(&self) -> usize {
        self.scan_order[self.scan_order.len() - 1]
    }

    /// Index of the highest-bitrate representation.
    pub fn highest_index(&self) -> usize {
        self.scan_order[0]
    }
}

impl Index<usize> for RepresentationCatalog {
    type Output = Representation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.representations[index]
    }
}
