//! End-to-end runs through the public API: template lookup, option
//! validation, pagination, and both output modes, driven with a fixed-metric
//! font so no font file is needed.

use label_gen::{
    render, write_rasters, FontFace, FontResolver, FontWeight, LabelContent, LabelError,
    OutlineSink, Pt, RenderOptions, RenderOutput, Template,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Deterministic face: every glyph advances half the em square and outlines
/// as a plain box.
struct BoxFace;

impl FontFace for BoxFace {
    fn units_per_em(&self) -> u16 {
        1000
    }

    fn ascender(&self) -> i16 {
        800
    }

    fn descender(&self) -> i16 {
        -200
    }

    fn glyph_advance(&self, ch: char) -> Option<u16> {
        if ch == '\n' {
            None
        } else {
            Some(500)
        }
    }

    fn outline_glyph(&self, ch: char, sink: &mut dyn OutlineSink) -> bool {
        if ch.is_whitespace() {
            return false;
        }
        sink.move_to(50.0, 0.0);
        sink.line_to(450.0, 0.0);
        sink.line_to(450.0, 700.0);
        sink.line_to(50.0, 700.0);
        sink.close();
        true
    }
}

struct BoxResolver;

impl FontResolver for BoxResolver {
    fn resolve(&self, _weight: FontWeight) -> Result<Arc<dyn FontFace>, LabelError> {
        Ok(Arc::new(BoxFace))
    }
}

fn batch(count: usize) -> Vec<LabelContent> {
    (0..count)
        .map(|i| {
            let mut content = LabelContent::new(
                format!("BOX.{i:03}"),
                format!("Storage box number {i}"),
                format!("http://inventory.local/location/{i}"),
            );
            content.parent = "Garage / Shelf B".into();
            content.labels = vec!["tools".into(), "seasonal".into()];
            content.description = "Assorted hand tools and spare fasteners".into();
            content
        })
        .collect()
}

fn sheet() -> Template {
    Template::by_name("avery5163", &BoxResolver).unwrap()
}

fn tape() -> Template {
    Template::by_name("ptouch", &BoxResolver).unwrap()
}

#[test]
fn a_full_sheet_and_change_renders_to_one_document() {
    // 12 labels overflow one 10-slot sheet onto a second page.
    let out = render(&mut sheet(), &batch(12), &RenderOptions::default()).unwrap();
    match out {
        RenderOutput::Document(bytes) => {
            assert!(bytes.starts_with(b"%PDF-"));
            assert!(bytes.len() > 1024);
        }
        RenderOutput::Rasters(_) => panic!("sheet media must produce a paged document"),
    }
}

#[test]
fn skipping_used_slots_still_renders() {
    let options = RenderOptions { skip: 9, ..RenderOptions::default() };
    // Label 1 fills the last slot of the sheet, label 2 opens a new page.
    let out = render(&mut sheet(), &batch(2), &options).unwrap();
    assert!(matches!(out, RenderOutput::Document(_)));
}

#[test]
fn outline_stroking_changes_the_document() {
    let plain = render(&mut sheet(), &batch(1), &RenderOptions::default()).unwrap();
    let outlined = render(
        &mut sheet(),
        &batch(1),
        &RenderOptions { draw_outline: true, ..RenderOptions::default() },
    )
    .unwrap();
    match (plain, outlined) {
        (RenderOutput::Document(a), RenderOutput::Document(b)) => assert_ne!(a, b),
        _ => panic!("expected paged documents"),
    }
}

#[test]
fn tape_media_produces_one_raster_per_label() {
    let out = render(&mut tape(), &batch(3), &RenderOptions::default()).unwrap();
    match out {
        RenderOutput::Rasters(rasters) => {
            assert_eq!(rasters.len(), 3);
            for raster in &rasters {
                let img = image::load_from_memory(raster).unwrap();
                // 18mm of tape at 180dpi
                assert_eq!(img.height(), 128);
            }
        }
        RenderOutput::Document(_) => panic!("tape media must produce standalone rasters"),
    }
}

#[test]
fn sheet_only_options_are_rejected_for_tape() {
    let skip = RenderOptions { skip: 1, ..RenderOptions::default() };
    assert!(matches!(
        render(&mut tape(), &batch(1), &skip),
        Err(LabelError::IncompatibleOption { option: "skip", .. })
    ));

    let outline = RenderOptions { draw_outline: true, ..RenderOptions::default() };
    assert!(matches!(
        render(&mut tape(), &batch(1), &outline),
        Err(LabelError::IncompatibleOption { option: "outline", .. })
    ));
}

#[test]
fn option_validation_happens_before_rendering() {
    let mut template = sheet();
    let bad = HashMap::from([("orientation".to_string(), "diagonal".to_string())]);
    assert!(matches!(
        template.apply_options(&bad),
        Err(LabelError::InvalidOptionValue { .. })
    ));

    let unknown = HashMap::from([("cutter".to_string(), "auto".to_string())]);
    assert!(matches!(
        template.apply_options(&unknown),
        Err(LabelError::UnknownOption { .. })
    ));

    let good = HashMap::from([("orientation".to_string(), "vertical".to_string())]);
    template.apply_options(&good).unwrap();
}

#[test]
fn unknown_template_names_are_rejected_with_alternatives() {
    match Template::by_name("dymo450", &BoxResolver) {
        Err(LabelError::UnknownTemplate { name, available }) => {
            assert_eq!(name, "dymo450");
            assert!(available.contains("ptouch"));
        }
        _ => panic!("expected an unknown-template error"),
    }
}

#[test]
fn identical_runs_are_byte_identical() {
    let run = || match render(&mut sheet(), &batch(4), &RenderOptions::default()).unwrap() {
        RenderOutput::Document(bytes) => bytes,
        RenderOutput::Rasters(_) => panic!("expected a paged document"),
    };
    assert_eq!(run(), run());
}

#[test]
fn orientation_swaps_label_raster_dimensions() {
    let horizontal = sheet();
    let mut vertical = sheet();
    vertical
        .apply_options(&HashMap::from([(
            "orientation".to_string(),
            "vertical".to_string(),
        )]))
        .unwrap();

    let content = &batch(1)[0];
    let h = image::load_from_memory(&horizontal.render(content).unwrap()).unwrap();
    let v = image::load_from_memory(&vertical.render(content).unwrap()).unwrap();
    assert_eq!((h.width(), h.height()), (v.height(), v.width()));
}

#[test]
fn grid_pagination_cycles_every_ten_slots() {
    let mut template = sheet();
    template.reset();
    let content = batch(1).remove(0);
    for call in 0..21 {
        let geometry = template.next_geometry(Some(&content));
        assert_eq!(geometry.on_new_page, call % 10 == 0, "call {call}");
        assert!(geometry.width() > Pt(0.0));
        assert!(geometry.height() > Pt(0.0));
    }
}

#[test]
fn tape_width_tracks_content_within_bounds() {
    let mut template = tape();
    let min = template.next_geometry(None).width();
    assert_eq!(min, Pt::from_mm(30.0));

    let short = LabelContent::new("A", "Bins", "");
    let long = LabelContent::new("A", "Stainless hex bolts, assorted metric sizes", "");
    let w_short = template.next_geometry(Some(&short)).width();
    let w_long = template.next_geometry(Some(&long)).width();
    assert!(w_short <= w_long);
    assert!(w_long <= Pt::from_mm(75.0));

    let huge = LabelContent::new("A", "x".repeat(500), "");
    assert_eq!(template.next_geometry(Some(&huge)).width(), Pt::from_mm(75.0));
}

#[test]
fn rasters_land_on_disk_with_sequential_names() {
    let rasters = match render(&mut tape(), &batch(2), &RenderOptions::default()).unwrap() {
        RenderOutput::Rasters(rasters) => rasters,
        RenderOutput::Document(_) => panic!("expected rasters"),
    };
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("shelf");
    let paths = write_rasters(&prefix, &rasters).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("shelf_01.png"));
    assert!(paths[1].ends_with("shelf_02.png"));
    for path in &paths {
        assert!(image::load_from_memory(&std::fs::read(path).unwrap()).is_ok());
    }
}
