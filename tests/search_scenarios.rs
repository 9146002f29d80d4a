//! End-to-end search scenarios on synthetic images
//!
//! The checkerboard stand-in decoder only succeeds when a candidate shows
//! at least eight clean alternating modules in enough rows, which makes the
//! winning region and recipe predictable.

mod common;

use common::{CheckerboardDecoder, MarkerDecoder, UnavailableDecoder, dark_bounds, on_dark_cell, synth};
use qrscout::search::SLIDING_WINDOW_NAME;
use qrscout::utils::resample::rescale;
use qrscout::{Diagnostic, Point, Recipe, SearchConfig, SymbolDecoder, search};
use std::sync::atomic::Ordering;

fn assert_close(a: Point, b: Point, tolerance: f32) {
    assert!(
        a.distance(&b) <= tolerance,
        "({}, {}) vs ({}, {})",
        a.x,
        a.y,
        b.x,
        b.y
    );
}

#[test]
fn small_code_in_bottom_right_found_by_first_window() {
    // 30x30 modules of 10px spanning (600, 600)..(900, 900)
    let image = synth(1000, 1000, |x, y| match on_dark_cell(x, y, 600, 30, 10) {
        Some(true) => 0,
        _ => 255,
    });
    let decoder = CheckerboardDecoder::new(10);

    let outcome = search(&image, Some(&decoder), &SearchConfig::default()).unwrap();
    let symbol = outcome.symbol.expect("code in the first window");

    assert_eq!(decoder.calls(), 1);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(symbol.provenance.region, Some(SLIDING_WINDOW_NAME));
    assert_eq!(symbol.provenance.recipe, Some(Recipe::ContrastOtsu));
    assert_eq!(symbol.provenance.scale, None);
    for corner in symbol.location.unwrap().corners() {
        assert!(corner.x >= 750.0 && corner.x <= 900.0, "x = {}", corner.x);
        assert!(corner.y >= 750.0 && corner.y <= 900.0, "y = {}", corner.y);
    }
}

#[test]
fn blank_image_exhausts_every_candidate() {
    let image = synth(400, 300, |_, _| 128);
    let decoder = CheckerboardDecoder::new(10);

    let outcome = search(&image, Some(&decoder), &SearchConfig::default()).unwrap();

    assert!(outcome.symbol.is_none());
    assert!(outcome.diagnostics.is_empty());
    // 4 windows + 6 named regions + 4 scales, each through 4 recipes
    assert_eq!(decoder.calls(), 56);
    assert_eq!(outcome.attempts, 56);
}

#[test]
fn gradient_lighting_needs_adaptive_threshold() {
    // 12x12 modules at (40, 40)..(160, 160); illumination ramps from 30 to
    // 225 across the code so no single global threshold separates more than
    // a few columns of modules
    let light = |x: usize| -> i32 {
        match x {
            0..40 => 30,
            40..160 => 30 + (x as i32 - 40) * 13 / 8,
            _ => 225,
        }
    };
    let image = synth(200, 200, |x, y| {
        let l = light(x);
        match on_dark_cell(x, y, 40, 12, 10) {
            Some(true) => (l - 30) as u8,
            _ => (l + 30) as u8,
        }
    });
    let decoder = CheckerboardDecoder::new(10);

    let outcome = search(&image, Some(&decoder), &SearchConfig::default()).unwrap();
    let symbol = outcome.symbol.expect("adaptive threshold recovers the code");

    assert_eq!(symbol.provenance.recipe, Some(Recipe::Adaptive));
    assert_eq!(symbol.provenance.recipe.map(Recipe::name), Some("method2"));
    assert_eq!(symbol.provenance.region, Some("center"));
    // 4 windows and 4 quadrants fail on all recipes, then center: method1 fails, method2 hits
    assert_eq!(decoder.calls(), 4 * 4 + 4 * 4 + 2);

    let location = symbol.location.unwrap();
    assert!(location.top_left.x >= 50.0 && location.bottom_right.x <= 150.0);
}

#[test]
fn missing_decoder_is_reported_not_found() {
    let image = synth(300, 300, |_, _| 255);

    let outcome = search(&image, None, &SearchConfig::default()).unwrap();

    assert!(outcome.symbol.is_none());
    assert!(outcome.decoder_unavailable());
    assert_eq!(outcome.attempts, 0);
}

#[test]
fn unavailable_decoder_stops_after_first_attempt() {
    let image = synth(300, 300, |_, _| 255);
    let decoder = UnavailableDecoder::new();

    let outcome = search(&image, Some(&decoder), &SearchConfig::default()).unwrap();

    assert!(outcome.symbol.is_none());
    assert_eq!(decoder.calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        outcome.diagnostics.as_slice(),
        [Diagnostic::DecoderUnavailable(reason)] if reason.contains("failed to load")
    ));
}

#[test]
fn window_hit_maps_back_to_image_coordinates() {
    let image = synth(200, 200, |x, y| {
        if (160..180).contains(&x) && (160..180).contains(&y) { 0 } else { 255 }
    });
    let expected = dark_bounds(image.data(), 200, 200).unwrap();

    let outcome = search(&image, Some(&MarkerDecoder), &SearchConfig::default()).unwrap();
    let symbol = outcome.symbol.unwrap();

    assert_eq!(symbol.provenance.region, Some(SLIDING_WINDOW_NAME));
    assert_eq!(symbol.location.unwrap(), expected);
}

#[test]
fn rescaled_corners_map_back_within_a_pixel() {
    let image = synth(200, 200, |x, y| {
        if (60..140).contains(&x) && (60..140).contains(&y) { 0 } else { 255 }
    });
    let original = dark_bounds(image.data(), 200, 200).unwrap();

    for scale in [1.5_f32, 2.0, 0.5] {
        let scaled = rescale(&image, scale).unwrap();
        let found = MarkerDecoder
            .decode(scaled.data(), scaled.width(), scaled.height(), Default::default())
            .unwrap()
            .unwrap()
            .unscaled(scale);
        let location = found.location.unwrap();
        for (got, want) in location.corners().into_iter().zip(original.corners()) {
            assert_close(got, want, 1.0);
        }
    }
}

#[test]
fn multiscale_pass_reports_scale() {
    let image = synth(200, 200, |x, y| {
        if (60..140).contains(&x) && (60..140).contains(&y) { 0 } else { 255 }
    });
    let original = dark_bounds(image.data(), 200, 200).unwrap();
    let config = SearchConfig {
        sliding_window: false,
        named_regions: false,
        scales: vec![2.0],
        ..SearchConfig::default()
    };

    let outcome = search(&image, Some(&MarkerDecoder), &config).unwrap();
    let symbol = outcome.symbol.unwrap();

    assert_eq!(symbol.provenance.scale, Some(2.0));
    assert_eq!(symbol.provenance.region, None);
    for (got, want) in symbol.location.unwrap().corners().into_iter().zip(original.corners()) {
        assert_close(got, want, 1.0);
    }
}
