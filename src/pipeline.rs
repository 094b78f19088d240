//! Drives a [Template] across an ordered batch of [LabelContent].
//!
//! Output mode follows the template's `page_size()`: fixed-sheet media
//! composite into one paged document, dynamically sized media yield one
//! raster per label. A run is single-threaded and batch-oriented; any fatal
//! error aborts the whole run before an output file is produced.

use crate::content::LabelContent;
use crate::pdf::{PdfDocument, PdfImage};
use crate::template::Template;
use crate::LabelError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Run-level knobs that are independent of the template's own options.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Number of grid slots to consume before the first label, used to
    /// resume a partially used adhesive sheet. Paged mode only.
    pub skip: usize,
    /// Stroke each label's placement rectangle, for printer calibration.
    /// Paged mode only.
    pub draw_outline: bool,
}

/// The finished output of one run.
pub enum RenderOutput {
    /// A single multi-page PDF.
    Document(Vec<u8>),
    /// One PNG per label, in input order.
    Rasters(Vec<Vec<u8>>),
}

/// Renders `contents` through `template`. The template is reset first, so a
/// reused instance always starts from slot zero.
pub fn render(
    template: &mut Template,
    contents: &[LabelContent],
    options: &RenderOptions,
) -> Result<RenderOutput, LabelError> {
    template.reset();
    match template.page_size() {
        Some((width, height)) => {
            render_paged(template, contents, options, width, height).map(RenderOutput::Document)
        }
        None => render_rasters(template, contents, options).map(RenderOutput::Rasters),
    }
}

fn render_paged(
    template: &mut Template,
    contents: &[LabelContent],
    options: &RenderOptions,
    page_width: crate::Pt,
    page_height: crate::Pt,
) -> Result<Vec<u8>, LabelError> {
    log::info!(
        "rendering {} label(s) with template '{}' (paged, skipping {} slot(s))",
        contents.len(),
        template.name(),
        options.skip
    );

    let mut document = PdfDocument::new(page_width, page_height);

    for _ in 0..options.skip {
        template.next_geometry(None);
    }

    for (index, content) in contents.iter().enumerate() {
        let geometry = template.next_geometry(Some(content));
        let (width, height) = (geometry.width(), geometry.height());
        if width.0 <= 0.0 || height.0 <= 0.0 {
            return Err(LabelError::DegenerateGeometry {
                width: width.0,
                height: height.0,
            });
        }

        if geometry.on_new_page && document.page_count() > 0 {
            document.start_page();
        }

        log::debug!(
            "label {}: '{}' at ({}, {})",
            index + 1,
            content.display_id,
            geometry.left,
            geometry.bottom
        );

        let raster = template.render(content)?;
        document.place_label(PdfImage::decode(&raster)?, &geometry);
        if options.draw_outline {
            document.stroke_outline(&geometry);
        }
    }

    if document.page_count() == 0 {
        document.start_page();
    }

    let mut bytes = Vec::new();
    document.write(&mut bytes)?;
    Ok(bytes)
}

fn render_rasters(
    template: &mut Template,
    contents: &[LabelContent],
    options: &RenderOptions,
) -> Result<Vec<Vec<u8>>, LabelError> {
    // These options only make sense on a shared page; rejecting them beats a
    // silent no-op.
    if options.skip > 0 {
        return Err(LabelError::IncompatibleOption {
            option: "skip",
            template: template.name().to_string(),
        });
    }
    if options.draw_outline {
        return Err(LabelError::IncompatibleOption {
            option: "outline",
            template: template.name().to_string(),
        });
    }

    log::info!(
        "rendering {} label(s) with template '{}' (one raster per label)",
        contents.len(),
        template.name()
    );

    contents.iter().map(|content| template.render(content)).collect()
}

/// Writes document bytes to `path` atomically: the bytes land in a temporary
/// file in the same directory and are renamed into place, so an aborted run
/// never leaves a truncated file behind.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<(), LabelError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path).map_err(|e| LabelError::Io(e.error))?;
    Ok(())
}

/// Writes each raster as `{prefix}_NN.png` (1-based, zero-padded) next to
/// the prefix path, atomically, returning the written paths in order.
pub fn write_rasters(prefix: &Path, rasters: &[Vec<u8>]) -> Result<Vec<PathBuf>, LabelError> {
    let mut written = Vec::with_capacity(rasters.len());
    for (index, raster) in rasters.iter().enumerate() {
        let path = PathBuf::from(format!("{}_{:02}.png", prefix.display(), index + 1));
        write_document(&path, raster)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::FixedResolver;

    fn contents(count: usize) -> Vec<LabelContent> {
        (0..count)
            .map(|i| {
                LabelContent::new(
                    format!("BOX.{i:03}"),
                    format!("Box number {i}"),
                    format!("http://inv/location/{i}"),
                )
            })
            .collect()
    }

    fn sheet() -> Template {
        Template::by_name("avery5163", &FixedResolver).unwrap()
    }

    fn tape() -> Template {
        Template::by_name("ptouch", &FixedResolver).unwrap()
    }

    #[test]
    fn sheet_runs_produce_a_document() {
        let out = render(&mut sheet(), &contents(3), &RenderOptions::default()).unwrap();
        match out {
            RenderOutput::Document(bytes) => assert!(bytes.starts_with(b"%PDF-")),
            RenderOutput::Rasters(_) => panic!("expected a paged document"),
        }
    }

    #[test]
    fn empty_sheet_run_still_yields_a_valid_document() {
        let out = render(&mut sheet(), &[], &RenderOptions::default()).unwrap();
        match out {
            RenderOutput::Document(bytes) => assert!(bytes.starts_with(b"%PDF-")),
            RenderOutput::Rasters(_) => panic!("expected a paged document"),
        }
    }

    #[test]
    fn tape_runs_produce_one_raster_per_label() {
        let out = render(&mut tape(), &contents(3), &RenderOptions::default()).unwrap();
        match out {
            RenderOutput::Rasters(rasters) => {
                assert_eq!(rasters.len(), 3);
                for raster in &rasters {
                    assert!(image::load_from_memory(raster).is_ok());
                }
            }
            RenderOutput::Document(_) => panic!("expected rasters"),
        }
    }

    #[test]
    fn skip_is_rejected_for_tape() {
        let options = RenderOptions { skip: 2, ..RenderOptions::default() };
        assert!(matches!(
            render(&mut tape(), &contents(1), &options),
            Err(LabelError::IncompatibleOption { option: "skip", .. })
        ));
    }

    #[test]
    fn outline_is_rejected_for_tape() {
        let options = RenderOptions { draw_outline: true, ..RenderOptions::default() };
        assert!(matches!(
            render(&mut tape(), &contents(1), &options),
            Err(LabelError::IncompatibleOption { option: "outline", .. })
        ));
    }

    #[test]
    fn atomic_write_lands_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.pdf");
        write_document(&path, b"%PDF-stub").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-stub");
    }

    #[test]
    fn rasters_are_numbered_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("label");
        let paths = write_rasters(&prefix, &[vec![1], vec![2], vec![3]]).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["label_01.png", "label_02.png", "label_03.png"]);
        assert_eq!(std::fs::read(&paths[2]).unwrap(), vec![3]);
    }
}
