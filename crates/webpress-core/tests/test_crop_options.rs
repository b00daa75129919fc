use webpress_core::crop::{CropEngine, CropField, CropOptions, CropRect};
use webpress_core::error::WebpressError;
use webpress_core::geometry::ImageGeometry;

fn display_surface_options() -> CropOptions {
    CropOptions {
        crop_size_w: Some(800),
        crop_size_h: Some(450),
        crop_top_x: Some(100),
        crop_top_y: Some(50),
        crop_w: Some(400),
        crop_h: Some(225),
    }
}

#[test]
fn test_from_rect_uses_natural_surface() {
    let geometry = ImageGeometry::fit(1920, 1080, 800, 600).unwrap();
    let rect = CropRect::new(10, 20, 300, 400);
    let options = CropOptions::from_rect(&rect, &geometry);

    assert_eq!(options.crop_size_w, Some(1920));
    assert_eq!(options.crop_size_h, Some(1080));
    assert!(options.has_crop());
    assert_eq!(options.resolve(1920, 1080).unwrap(), Some(rect));
}

#[test]
fn test_from_engine_empty_while_disabled() {
    let geometry = ImageGeometry::unscaled(640, 480).unwrap();
    let mut engine = CropEngine::new(geometry).unwrap();

    let options = CropOptions::from_engine(&engine);
    assert_eq!(options, CropOptions::default());
    assert!(!options.has_crop());
    assert_eq!(options.resolve(640, 480).unwrap(), None);

    engine.set_enabled(true);
    engine.set_manual_field(CropField::X, 40).unwrap();
    let options = CropOptions::from_engine(&engine);
    assert_eq!(
        options.resolve(640, 480).unwrap(),
        Some(CropRect::new(40, 0, 600, 480))
    );
}

#[test]
fn test_resolve_rescales_from_display_surface() {
    let rect = display_surface_options().resolve(1920, 1080).unwrap();
    assert_eq!(rect, Some(CropRect::new(240, 120, 960, 540)));
}

#[test]
fn test_resolve_rounds_half_pixels_to_even() {
    // 0.5 -> 0 and 1.5 -> 2; rounding away from zero would overflow the image.
    let options = CropOptions {
        crop_size_w: Some(4),
        crop_size_h: Some(4),
        crop_top_x: Some(1),
        crop_top_y: Some(1),
        crop_w: Some(3),
        crop_h: Some(3),
    };
    assert_eq!(options.resolve(2, 2).unwrap(), Some(CropRect::new(0, 0, 2, 2)));

    // 2.5 -> 2
    let options = CropOptions {
        crop_size_w: Some(2),
        crop_size_h: Some(2),
        crop_top_x: Some(1),
        crop_top_y: Some(1),
        crop_w: Some(1),
        crop_h: Some(1),
    };
    assert_eq!(options.resolve(5, 5).unwrap(), Some(CropRect::new(2, 2, 2, 2)));
}

#[test]
fn test_partial_options_mean_no_crop() {
    let options = CropOptions {
        crop_w: None,
        ..display_surface_options()
    };
    assert!(!options.has_crop());
    assert_eq!(options.resolve(1920, 1080).unwrap(), None);
}

#[test]
fn test_resolve_rejects_empty_surface() {
    let options = CropOptions {
        crop_size_w: Some(0),
        ..display_surface_options()
    };
    assert!(matches!(
        options.resolve(1920, 1080),
        Err(WebpressError::InvalidCrop(_))
    ));
}

#[test]
fn test_resolve_rejects_rect_outside_image() {
    let options = CropOptions {
        crop_top_x: Some(500),
        ..display_surface_options()
    };
    let err = options.resolve(1920, 1080).unwrap_err();
    assert!(err.to_string().contains("exceeds source dimensions"));
}

#[test]
fn test_options_wire_field_names() {
    let json = serde_json::to_value(display_surface_options()).unwrap();
    assert_eq!(json["crop_size_w"], 800);
    assert_eq!(json["crop_size_h"], 450);
    assert_eq!(json["crop_top_x"], 100);
    assert_eq!(json["crop_top_y"], 50);
    assert_eq!(json["crop_w"], 400);
    assert_eq!(json["crop_h"], 225);

    let empty = serde_json::to_string(&CropOptions::default()).unwrap();
    assert_eq!(empty, "{}");
}

#[test]
fn test_options_parse_from_form_json() {
    let options: CropOptions =
        serde_json::from_str(r#"{"crop_size_w": 800, "crop_size_h": 450, "crop_w": 10}"#).unwrap();
    assert_eq!(options.crop_w, Some(10));
    assert_eq!(options.crop_top_x, None);
    assert!(!options.has_crop());
}
