//! # Dataset Kinds
//!
//! The service serves exactly three device datasets. Each one is exported by
//! openFDA as a single-part bulk file named
//! `device-{slug}-0001-of-0001.json`.

use std::fmt;

/// One of the three fixed device datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    /// 510(k) premarket notification clearances.
    Clearance510k,
    /// Device classification (product codes, device class, regulation number).
    Classification,
    /// Device recall enforcement reports.
    Enforcement,
}

impl DatasetKind {
    /// All datasets, in the order they are advertised on the index route.
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Clearance510k,
        DatasetKind::Classification,
        DatasetKind::Enforcement,
    ];

    /// Short name used in URLs and metric labels.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Clearance510k => "510k",
            Self::Classification => "classification",
            Self::Enforcement => "enforcement",
        }
    }

    /// Canonical bulk-download filename for this dataset.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Clearance510k => "device-510k-0001-of-0001.json",
            Self::Classification => "device-classification-0001-of-0001.json",
            Self::Enforcement => "device-enforcement-0001-of-0001.json",
        }
    }

    /// Filename with the `.json` extension removed. Used as the prefix when
    /// the exact file is missing and a differently-suffixed export is present.
    pub fn file_stem(self) -> &'static str {
        let name = self.filename();
        name.strip_suffix(".json").unwrap_or(name)
    }

    /// Route path, without trailing slash.
    pub fn route(self) -> &'static str {
        match self {
            Self::Clearance510k => "/device/510k",
            Self::Classification => "/device/classification",
            Self::Enforcement => "/device/enforcement",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
