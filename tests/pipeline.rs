use std::f32::consts::TAU;

use imageproc::{geometry::convex_hull, point::Point};

use makeover::{
    color,
    config::Presets,
    error::{ErrorKind, Status},
    face::{regions, NUM_LANDMARKS},
    fashion::{self, FashionStyle},
    garment::{self, Placement},
    image::{Color, Image, Resolution},
    landmark::{Landmarks, Precomputed},
    makeup::{self, MakeupOptions},
    style,
};

const RES: Resolution = Resolution::new(160, 200);

/// Face oval landmarks with the outer lip contour on a small ellipse below the center.
fn landmarks() -> Landmarks {
    let ellipse = |c: [f32; 2], r: [f32; 2], t: f32| {
        [c[0] + r[0] * (t * TAU).cos(), c[1] + r[1] * (t * TAU).sin()]
    };
    let mut positions = (0..NUM_LANDMARKS)
        .map(|i| ellipse([0.5, 0.5], [0.25, 0.3], i as f32 / NUM_LANDMARKS as f32))
        .collect::<Vec<_>>();
    let lips = regions::LIPS_OUTER.indices;
    for (k, &i) in lips.iter().enumerate() {
        positions[i] = ellipse([0.5, 0.65], [0.08, 0.03], k as f32 / lips.len() as f32);
    }
    Landmarks::new(positions)
}

fn photo() -> Image {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut img = Image::new(RES.width(), RES.height());
    img.map_pixels(|_| Color::from_rgb8(rng.u8(200..230), rng.u8(150..180), rng.u8(130..160)));
    img
}

/// Distance of `p` from the convex polygon `hull`, or 0 if `p` lies inside of it.
fn distance_outside(hull: &[Point<i32>], p: [f32; 2]) -> f32 {
    let edges = hull
        .iter()
        .zip(hull.iter().cycle().skip(1))
        .map(|(a, b)| ([a.x as f32, a.y as f32], [b.x as f32, b.y as f32]));

    let mut sides = (false, false);
    let mut dist = f32::INFINITY;
    for (a, b) in edges {
        let (ab, ap) = ([b[0] - a[0], b[1] - a[1]], [p[0] - a[0], p[1] - a[1]]);
        let cross = ab[0] * ap[1] - ab[1] * ap[0];
        if cross > 0.0 {
            sides.0 = true;
        } else if cross < 0.0 {
            sides.1 = true;
        }

        let len2 = ab[0] * ab[0] + ab[1] * ab[1];
        let t = if len2 > 0.0 {
            ((ap[0] * ab[0] + ap[1] * ab[1]) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let d = [ap[0] - t * ab[0], ap[1] - t * ab[1]];
        dist = dist.min((d[0] * d[0] + d[1] * d[1]).sqrt());
    }

    if sides.0 && sides.1 {
        dist
    } else {
        0.0
    }
}

fn lip_options() -> MakeupOptions {
    MakeupOptions {
        apply_lips: true,
        lip_color: "#E64E6B".into(),
        intensity: 0.7,
        ..Default::default()
    }
}

#[test]
fn lipstick_stays_on_the_lips() {
    let lms = landmarks();
    let photo = photo();
    let out = makeup::apply(
        &mut Precomputed::new(Some(lms.clone())),
        &photo,
        &lip_options(),
        &Presets::default(),
    );
    assert!(out.success());
    assert_eq!(out.status, Status::Applied);
    assert!(out.notes.is_empty());

    let lips = lms.pixel_points(regions::LIPS_OUTER.indices.iter().copied(), RES);
    let hull = convex_hull(&lips);

    let mut changed = 0;
    for y in 0..RES.height() {
        for x in 0..RES.width() {
            if out.image.get(x, y) == photo.get(x, y) {
                continue;
            }
            changed += 1;
            // rasterized edges may cover pixels whose centers lie just outside the hull
            let dist = distance_outside(&hull, [x as f32, y as f32]);
            assert!(dist <= 1.0, "pixel ({x}, {y}) {dist} px outside of the lips changed");
        }
    }
    assert!(changed > 0);

    // the lip center moves towards the lipstick color
    let (cx, cy) = (80, 130);
    let (before, after) = (photo.get(cx, cy), out.image.get(cx, cy));
    assert!(after.g() < before.g(), "{before:?} -> {after:?}");
}

#[test]
fn makeup_without_face_fails() {
    let photo = photo();
    let out = makeup::apply(
        &mut Precomputed::no_face(),
        &photo,
        &lip_options(),
        &Presets::default(),
    );
    assert!(!out.success());
    assert_eq!(out.status, Status::Failed(ErrorKind::NoFaceDetected));
    assert_eq!(out.image, photo);
}

#[test]
fn disabled_makeup_is_a_noop() {
    let photo = photo();
    let out = makeup::apply(
        &mut Precomputed::new(Some(landmarks())),
        &photo,
        &MakeupOptions::default(),
        &Presets::default(),
    );
    assert!(out.success());
    assert_eq!(out.status, Status::Unchanged);
    assert_eq!(out.image, photo);
}

#[test]
fn landmarks_from_json() {
    let json = Precomputed::new(Some(landmarks())).to_json().unwrap();
    let detector = Precomputed::from_json(&json).unwrap();
    assert_eq!(detector.landmarks().map(Landmarks::len), Some(NUM_LANDMARKS));

    let none = Precomputed::from_json(r#"{"landmarks": null}"#).unwrap();
    assert!(none.landmarks().is_none());
    assert!(Precomputed::from_json("{").is_err());
}

#[test]
fn style_transfer_keeps_background() {
    let photo = photo();
    let reference = Image::filled(Resolution::new(40, 30), Color::from_rgb8(90, 40, 160));
    // a flat reference has no contrast; give it some
    let mut reference = reference;
    for x in 0..20 {
        for y in 0..30 {
            reference.set(x, y, Color::from_rgb8(120, 60, 200));
        }
    }

    let out = style::transfer(
        &mut Precomputed::new(Some(landmarks())),
        &photo,
        &reference,
        &Presets::default(),
    );
    assert_eq!(out.status, Status::Applied);
    assert_eq!(out.image.resolution(), RES);
    assert_eq!(out.image.get(0, 0), photo.get(0, 0));
    assert_ne!(out.image.get(80, 100), photo.get(80, 100));
}

#[test]
fn recolored_garment_try_on() {
    let mut shirt = Image::new(20, 10);
    shirt.map_pixels(|_| Color::from_rgb8(200, 30, 30));
    for x in 0..20 {
        shirt.set(x, 0, Color::NONE);
    }

    let green = garment::recolor_hex(&shirt, "#2a2", &Presets::default().recolor);
    assert!(green.notes.is_empty());
    let px = green.image.get(5, 5);
    assert!(px.g() > px.r() && px.g() > px.b(), "{px:?}");
    assert_eq!(green.image.get(5, 0).a(), 0);

    let photo = photo();
    let out = garment::place(
        &photo,
        &green.image,
        Placement {
            x: 150,
            y: -3,
            scale: 1.0,
        },
    );
    assert!(out.success());
    assert!(out.image.is_opaque());
    assert_eq!(out.image.get(149, 0), photo.get(149, 0));
    assert_eq!(out.image.get(155, 5), green.image.get(5, 8));
    // the transparent top row lands above the photo, so row 0 shows fabric
    assert_eq!(out.image.get(150, 0), green.image.get(0, 3));
}

#[test]
fn filters_keep_size() {
    let photo = photo();
    for style in FashionStyle::ALL {
        let out = fashion::apply(&photo, style, 1.0);
        assert_eq!(out.resolution(), RES);
        assert_ne!(out, photo, "{style}");
    }
}

#[test]
fn hex_parsing() {
    assert_eq!(color::parse_hex("#E64E6B"), Ok(Color::from_rgb8(0xe6, 0x4e, 0x6b)));
    assert_eq!(color::parse_hex("fff"), Ok(Color::WHITE));
    assert_eq!(color::hex_to_rgb("nope"), color::DEFAULT_COLOR);
}
