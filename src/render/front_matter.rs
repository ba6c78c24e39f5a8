//! Text of the title, copyright and contents pages.

use super::RenderOptions;
use crate::model::BookMetadata;
use chrono::Datelike;

pub const COPYRIGHT_CAPTION: &str = "Copyright";

pub const TOC_CAPTION: &str = "TABLE OF CONTENTS";

pub const REPRODUCTION_NOTICE: &str = "No portion of this publication may be reproduced, \
redistributed, or commercially embedded in derivative products without prior authorization.";

pub const EXCERPT_NOTICE: &str =
    "Short excerpts may be used for review or commentary with proper attribution.";

/// Returns the configured copyright year or the current local year.
pub fn copyright_year(options: &RenderOptions) -> i32 {
    options
        .copyright_year
        .unwrap_or_else(|| chrono::Local::now().year())
}

/// "© <year> <holder> - All Rights Reserved."
pub fn rights_line(metadata: &BookMetadata, year: i32) -> String {
    format!("© {} {} - All Rights Reserved.", year, metadata.rights_holder())
}

/// Body lines of the copyright page, after the caption.
pub fn copyright_lines(metadata: &BookMetadata, year: i32) -> [String; 3] {
    [
        rights_line(metadata, year),
        REPRODUCTION_NOTICE.to_string(),
        EXCERPT_NOTICE.to_string(),
    ]
}
