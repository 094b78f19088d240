//! Minimal paged vector output: letter-style pages carrying pre-rasterized
//! label images and optional calibration outlines.
//!
//! Label rasters are embedded as RGB image XObjects with a grayscale SMask
//! for their alpha channel; page content streams only place those XObjects
//! and stroke outlines, so the document needs no font resources of its own.

use crate::geometry::LabelGeometry;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::LabelError;
use image::{DynamicImage, GenericImageView};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use std::io::Write;

/// A decoded label raster ready for embedding.
pub struct PdfImage {
    image: DynamicImage,
}

impl PdfImage {
    /// Decode PNG (or any other raster format [image] recognizes) bytes.
    pub fn decode(bytes: &[u8]) -> Result<PdfImage, LabelError> {
        let image = image::load_from_memory(bytes)?;
        Ok(PdfImage { image })
    }

    fn write(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(index));
        let level = CompressionLevel::DefaultLevel as u8;
        let (width, height) = self.image.dimensions();

        let mask = self.image.color().has_alpha().then(|| {
            let alphas: Vec<u8> = self.image.pixels().map(|p| (p.2).0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });
        let rgb = compress_to_vec_zlib(self.image.to_rgb8().as_raw(), level);

        let mut image = writer.image_xobject(id, rgb.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(width as i32);
        image.height(height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);

        let mask_id = mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask), Some(mask_id)) = (mask, mask_id) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(width as i32);
            s_mask.height(height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

struct Placement {
    image_index: usize,
    left: Pt,
    bottom: Pt,
    width: Pt,
    height: Pt,
}

struct OutlineRect {
    left: Pt,
    bottom: Pt,
    width: Pt,
    height: Pt,
}

#[derive(Default)]
struct PdfPage {
    placements: Vec<Placement>,
    outlines: Vec<OutlineRect>,
}

impl PdfPage {
    fn render(&self) -> Vec<u8> {
        let mut content = Content::new();
        for placement in &self.placements {
            content.save_state();
            content.transform([
                placement.width.0,
                0.0,
                0.0,
                placement.height.0,
                placement.left.0,
                placement.bottom.0,
            ]);
            let name = format!("I{}", placement.image_index);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();
        }
        for outline in &self.outlines {
            content.save_state();
            content.set_line_width(0.5);
            content.rect(
                outline.left.0,
                outline.bottom.0,
                outline.width.0,
                outline.height.0,
            );
            content.stroke();
            content.restore_state();
        }
        content.finish()
    }
}

/// A document under construction: fixed page size, pages appended in order,
/// every label raster embedded exactly once.
pub struct PdfDocument {
    page_width: Pt,
    page_height: Pt,
    pages: Vec<PdfPage>,
    images: Vec<PdfImage>,
}

impl PdfDocument {
    pub fn new(page_width: Pt, page_height: Pt) -> PdfDocument {
        PdfDocument {
            page_width,
            page_height,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Appends a fresh page; subsequent placements land on it.
    pub fn start_page(&mut self) {
        self.pages.push(PdfPage::default());
    }

    /// Places `image` into the geometry rectangle on the current page.
    pub fn place_label(&mut self, image: PdfImage, geometry: &LabelGeometry) {
        let index = self.images.len();
        self.images.push(image);
        let page = self.current_page();
        page.placements.push(Placement {
            image_index: index,
            left: geometry.left,
            bottom: geometry.bottom,
            width: geometry.width(),
            height: geometry.height(),
        });
    }

    /// Strokes a thin calibration outline around the geometry rectangle.
    pub fn stroke_outline(&mut self, geometry: &LabelGeometry) {
        let left = geometry.left;
        let bottom = geometry.bottom;
        let width = geometry.width();
        let height = geometry.height();
        let page = self.current_page();
        page.outlines.push(OutlineRect {
            left,
            bottom,
            width,
            height,
        });
    }

    fn current_page(&mut self) -> &mut PdfPage {
        if self.pages.is_empty() {
            self.pages.push(PdfPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Write the entire document to the writer. The document is rendered in
    /// memory first, so references stay unresolved until this call.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), LabelError> {
        let PdfDocument {
            page_width,
            page_height,
            pages,
            images,
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();

        let page_refs: Vec<Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        for (i, image) in images.iter().enumerate() {
            image.write(&mut refs, i, &mut writer);
        }

        let media_box = Rect {
            x1: 0.0,
            y1: 0.0,
            x2: page_width.0,
            y2: page_height.0,
        };

        for (page_index, (page, id)) in pages.iter().zip(page_refs).enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(page_index));

            let mut page_writer = writer.page(id);
            page_writer.media_box(media_box);
            page_writer.parent(page_tree_id);

            let mut resources = page_writer.resources();
            let mut xobjects = resources.x_objects();
            for placement in &page.placements {
                if let Some(image_id) = refs.get(RefType::Image(placement.image_index)) {
                    let name = format!("I{}", placement.image_index);
                    xobjects.pair(Name(name.as_bytes()), image_id);
                }
            }
            xobjects.finish();
            resources.finish();

            page_writer.contents(content_id);
            page_writer.finish();

            let rendered = page.render();
            writer.stream(content_id, rendered.as_slice());
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}
