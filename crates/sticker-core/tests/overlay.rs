#![recursion_limit = "256"]

mod common;

use common::{init_logging, sticker, tgs, BlockFont};
use lottie_core::{Animator, Codec};
use lottie_data::model::{AnimationDocument, GroupShape, Property, Shape};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sticker_core::layout::resting_position;
use sticker_core::{AnimationVariant, Caption, LineRole, OverlayConfig, StickerError, StickerOverlay};

fn overlay() -> StickerOverlay<BlockFont> {
    StickerOverlay::new(BlockFont, OverlayConfig::default()).unwrap()
}

fn top(text: &str) -> Caption {
    Caption::new(Some(text.to_string()), None, None)
}

fn line_groups(doc: &AnimationDocument) -> Vec<&GroupShape> {
    doc.layers[0]
        .shapes
        .iter()
        .flatten()
        .filter_map(|s| match s {
            Shape::Group(g) => Some(g),
            _ => None,
        })
        .collect()
}

fn letters(line: &GroupShape) -> Vec<&GroupShape> {
    line.items
        .iter()
        .filter_map(|s| match s {
            Shape::Group(g) => Some(g),
            _ => None,
        })
        .collect()
}

fn position(group: &GroupShape) -> &Property {
    group.transform.as_ref().and_then(|t| t.p.as_ref()).unwrap()
}

#[test]
fn test_hi_shakes_two_letters_across_the_timeline() {
    init_logging();
    let mut doc = sticker(60.0, 0.0, 120.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    let used = overlay()
        .apply(&mut doc, &top("Hi"), Some(AnimationVariant::Shake), &mut rng)
        .unwrap();
    assert_eq!(used, AnimationVariant::Shake);

    let lines = line_groups(&doc);
    assert_eq!(lines.len(), 1);
    let letters = letters(lines[0]);
    assert_eq!(letters.len(), 2);

    for letter in letters {
        let track = position(letter);
        assert!(track.is_animated());
        let kfs = track.keyframes();
        assert_eq!(kfs.first().map(|k| k.t), Some(0.0));
        assert_eq!(kfs.last().map(|k| k.t), Some(120.0));
        for frame in [0.0, 17.0, 59.5, 120.0] {
            let p = Animator::point_at(track, frame).unwrap();
            assert!(p.x.abs() <= 5.0 && p.y.abs() <= 5.0);
        }
    }
}

#[test]
fn test_shake_density_follows_the_output_frame_rate() {
    // Normalizes to a 60 fps sticker of 100 frames
    let input = tgs(&sticker(100000.0, 0.0, 100.0, 512, 512));
    let mut rng = StdRng::seed_from_u64(3);
    let bytes = overlay()
        .overlay(&input, &top("Hi"), Some(AnimationVariant::Shake), &mut rng)
        .unwrap();

    let output = Codec::decode(&bytes).unwrap();
    assert_eq!((output.fr, output.op), (60.0, 100.0));
    for letter in letters(line_groups(&output)[0]) {
        assert_eq!(position(letter).keyframes().len(), 31);
    }
}

#[test]
fn test_line_is_styled_and_centered() {
    let overlay = overlay();
    let mut doc = sticker(60.0, 0.0, 120.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    let caption = Caption::new(Some("Top".into()), Some("mid".into()), Some("Bottom".into()));
    overlay
        .apply(&mut doc, &caption, Some(AnimationVariant::Shake), &mut rng)
        .unwrap();

    let lines = line_groups(&doc);
    let names: Vec<_> = lines.iter().map(|g| g.nm.as_deref().unwrap()).collect();
    assert_eq!(names, vec!["Top", "Bottom", "mid"]);

    for (line, role) in lines.iter().zip([LineRole::Top, LineRole::Bottom, LineRole::Middle]) {
        let n = line.items.len();
        assert!(matches!(line.items[n - 2], Shape::Fill(_)));
        assert!(matches!(line.items[n - 1], Shape::Stroke(_)));

        let bounds = overlay.render_line(line.nm.as_deref().unwrap()).bounds;
        let p = position(line).static_components().unwrap();
        assert_eq!(p[1], role.baseline_y(overlay.config()));
        let center = p[0] + bounds.width() / 2.0;
        assert!((center - 256.0).abs() < 0.01);
    }
}

#[test]
fn test_left_side_bearing_keeps_line_centered() {
    let overlay = overlay();
    let mut doc = sticker(60.0, 0.0, 120.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    overlay
        .apply(&mut doc, &top("JJ"), Some(AnimationVariant::Shake), &mut rng)
        .unwrap();

    let bounds = overlay.render_line("JJ").bounds;
    // 200 units of bearing at size 64
    assert!((bounds.x0 - 12.8).abs() < 1e-9);

    let line = line_groups(&doc)[0];
    let transform = line.transform.as_ref().unwrap();
    let p = position(line).static_components().unwrap();
    let anchor = transform.a.as_ref().and_then(|a| a.static_components()).unwrap();
    assert!((p[0] + bounds.width() / 2.0 - 256.0).abs() < 0.01);
    assert!((anchor[0] - bounds.x0).abs() < 1e-9);
}

#[test]
fn test_long_line_is_shrunk_to_fit() {
    let overlay = overlay();
    let text = "WWWWWWWWWWWWWWWW";
    // 16 blocks at size 64: 15 advances of 38.4 plus a 32 wide glyph
    let rendered = overlay.render_line(text);
    assert!((rendered.width() - overlay.config().fit_width()).abs() < 1e-6);

    let rest = resting_position(LineRole::Top, rendered.bounds, overlay.config());
    assert!((rest.x - 16.0).abs() < 1e-6);

    let short = overlay.render_line("WW");
    assert!((short.width() - 70.4).abs() < 1e-6);
}

#[test]
fn test_spring_pull_top_drops_letters_in() {
    let mut doc = sticker(60.0, 0.0, 170.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    overlay()
        .apply(&mut doc, &top("ABCD"), Some(AnimationVariant::SpringPullTop), &mut rng)
        .unwrap();

    let lines = line_groups(&doc);
    for (index, letter) in letters(lines[0]).into_iter().enumerate() {
        let track = position(letter);
        let first = &track.keyframes()[0];
        assert_eq!(first.t, index as f64 * 25.0);
        assert_eq!(Animator::point_at(track, 0.0).map(|p| p.y), Some(-512.0));
        assert_eq!(Animator::point_at(track, 100.0).map(|p| p.y), Some(0.0));
    }
}

#[test]
fn test_side_spring_moves_lines_not_letters() {
    let mut doc = sticker(60.0, 0.0, 180.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    let caption = Caption::new(Some("up".into()), Some("mid".into()), Some("down".into()));
    overlay()
        .apply(&mut doc, &caption, Some(AnimationVariant::SpringPullSide), &mut rng)
        .unwrap();

    let lines = line_groups(&doc);
    let up = position(lines[0]);
    let down = position(lines[1]);
    let mid = position(lines[2]);
    assert_eq!(Animator::point_at(up, 0.0).map(|p| p.x), Some(512.0));
    assert_eq!(Animator::point_at(down, 0.0).map(|p| p.x), Some(-512.0));
    assert!(!mid.is_animated());
    assert_eq!(up.keyframes().last().map(|k| k.t), Some(90.0));

    for line in lines {
        for letter in letters(line) {
            assert!(!position(letter).is_animated());
        }
    }
}

#[test]
fn test_short_sticker_falls_back_to_shake() {
    let mut doc = sticker(60.0, 0.0, 60.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    let used = overlay()
        .apply(&mut doc, &top("Hi"), Some(AnimationVariant::SpringPullTop), &mut rng)
        .unwrap();
    assert_eq!(used, AnimationVariant::Shake);
}

#[test]
fn test_missing_glyphs_are_skipped() {
    let mut doc = sticker(60.0, 0.0, 120.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(3);
    overlay()
        .apply(&mut doc, &top("A#B"), Some(AnimationVariant::Shake), &mut rng)
        .unwrap();
    assert_eq!(letters(line_groups(&doc)[0]).len(), 2);
}

#[test]
fn test_overlay_round_trip() {
    init_logging();
    let input = sticker(30.0, 0.0, 90.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(11);
    let bytes = overlay()
        .overlay(&tgs(&input), &top("Hello"), None, &mut rng)
        .unwrap();
    assert!(Codec::is_gzip(&bytes));

    let output = Codec::decode(&bytes).unwrap();
    assert_eq!(output.layers.len(), 2);
    assert_eq!(output.layers[0].nm.as_deref(), Some("Caption"));
    assert_eq!(output.layers[0].ind, Some(2));
    assert_eq!(output.layers[1].nm, input.layers[0].nm);
    assert_eq!(output.extra, input.extra);
    assert_eq!(line_groups(&output).len(), 1);
}

#[test]
fn test_plain_json_input_is_accepted() {
    let input = serde_json::to_vec(&sticker(60.0, 0.0, 120.0, 512, 512)).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let bytes = overlay().overlay(&input, &top("ok"), None, &mut rng).unwrap();
    assert!(Codec::decode(&bytes).is_ok());
}

#[test]
fn test_output_is_reproducible_for_a_seed() {
    let input = tgs(&sticker(60.0, 0.0, 120.0, 512, 512));
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        overlay().overlay(&input, &top("again"), None, &mut rng).unwrap()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_four_second_sticker_is_cut_to_180_frames() {
    let input = tgs(&sticker(60.0, 0.0, 240.0, 512, 512));
    let mut rng = StdRng::seed_from_u64(1);
    let bytes = overlay()
        .overlay(&input, &top("long"), Some(AnimationVariant::Shake), &mut rng)
        .unwrap();
    let output = Codec::decode(&bytes).unwrap();
    assert_eq!(output.op, 180.0);
    assert_eq!(output.layers[0].op, Some(180.0));
    for letter in letters(line_groups(&output)[0]) {
        assert_eq!(position(letter).keyframes().last().map(|k| k.t), Some(180.0));
    }
}

#[test]
fn test_empty_caption_still_adds_layer() {
    let mut doc = sticker(60.0, 0.0, 120.0, 512, 512);
    let mut rng = StdRng::seed_from_u64(1);
    overlay()
        .apply(&mut doc, &Caption::default(), None, &mut rng)
        .unwrap();
    assert_eq!(doc.layers.len(), 2);
    assert!(line_groups(&doc).is_empty());
}

#[test]
fn test_malformed_input_is_rejected() {
    let mut rng = StdRng::seed_from_u64(1);
    let err = overlay().overlay(b"\x1f\x8bnot gzip", &top("x"), None, &mut rng);
    assert!(matches!(err, Err(StickerError::MalformedInput(_))));

    let err = overlay().overlay(b"{\"fr\": 60}", &top("x"), None, &mut rng);
    assert!(matches!(err, Err(StickerError::MalformedInput(_))));
}

#[test]
fn test_uncorrectable_timeline_is_fatal() {
    // Four seconds starting past the capped out-point
    let input = tgs(&sticker(60.0, 200.0, 440.0, 512, 512));
    let mut rng = StdRng::seed_from_u64(1);
    let err = overlay().overlay(&input, &top("x"), None, &mut rng);
    assert!(matches!(err, Err(StickerError::ConstraintViolation(_))));
}

#[test]
fn test_size_limit_is_enforced() {
    let config = OverlayConfig {
        max_output_bytes: Some(64),
        ..Default::default()
    };
    let overlay = StickerOverlay::new(BlockFont, config).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let err = overlay.overlay(&tgs(&sticker(60.0, 0.0, 120.0, 512, 512)), &top("big"), None, &mut rng);
    assert!(matches!(err, Err(StickerError::ConstraintViolation(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = OverlayConfig {
        wrap_width: 0,
        ..Default::default()
    };
    assert!(matches!(
        StickerOverlay::new(BlockFont, config),
        Err(StickerError::Config(_))
    ));
}
