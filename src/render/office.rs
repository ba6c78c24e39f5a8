//! PDF conversion through an installed office suite.
//!
//! The DOCX rendition is written to a scratch directory and converted with
//! `<office> --headless --convert-to pdf`. The directory is removed when
//! the conversion returns, whatever the outcome.

use crate::error::{Error, Result};
use log::debug;
use std::process::Command;

const INPUT_NAME: &str = "book.docx";
const OUTPUT_NAME: &str = "book.pdf";

/// Converts DOCX bytes to PDF bytes with the given office executable.
pub fn convert_docx_to_pdf(docx: &[u8], office_command: &str) -> Result<Vec<u8>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join(INPUT_NAME);
    std::fs::write(&input, docx)?;

    debug!("office: converting {} with {}", input.display(), office_command);
    let output = Command::new(office_command)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(dir.path())
        .arg(&input)
        .output()
        .map_err(|e| Error::RenderFailure(format!("cannot run '{}': {}", office_command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::RenderFailure(format!(
            "'{}' exited with {}: {}",
            office_command,
            output.status,
            stderr.trim()
        )));
    }

    let pdf = dir.path().join(OUTPUT_NAME);
    if !pdf.is_file() {
        return Err(Error::RenderFailure(format!(
            "'{}' produced no PDF",
            office_command
        )));
    }

    Ok(std::fs::read(pdf)?)
}
