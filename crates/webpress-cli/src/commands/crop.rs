use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use webpress_core::config::WebpressConfig;
use webpress_core::crop::{
    AspectPreset, AspectSpec, CropEngine, CropField, CropMode, CropOptions, CropRect, DragSession,
    LockedDimension,
};
use webpress_core::geometry::{ImageGeometry, Point};

use crate::summary;

#[derive(Args)]
pub struct CropArgs {
    /// Natural image size, e.g. 1920x1080
    #[arg(long, value_parser = parse_size)]
    pub natural: (u32, u32),

    /// Preview box the image is fitted into (defaults to the config's display box)
    #[arg(long, value_parser = parse_size)]
    pub max_box: Option<(u32, u32)>,

    /// Enable cropping (otherwise the full image is selected)
    #[arg(long)]
    pub enable: bool,

    /// Crop origin x, natural pixels
    #[arg(long, allow_hyphen_values = true)]
    pub x: Option<i64>,

    /// Crop origin y, natural pixels
    #[arg(long, allow_hyphen_values = true)]
    pub y: Option<i64>,

    /// Crop width, natural pixels
    #[arg(long, allow_hyphen_values = true)]
    pub w: Option<i64>,

    /// Crop height, natural pixels
    #[arg(long, allow_hyphen_values = true)]
    pub h: Option<i64>,

    /// Lock the crop to an aspect ratio, e.g. 16:9
    #[arg(long, value_parser = parse_ratio, conflicts_with = "preset")]
    pub ratio: Option<(u32, u32)>,

    /// Named aspect preset (Free, 1:1, 3:4, 4:3, 16:9)
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<AspectPreset>,

    /// Dimension that keeps its pixel value in ratio mode
    #[arg(long, value_enum, default_value = "width")]
    pub lock: LockArg,

    /// Pixel value of the locked dimension (defaults to the full image side)
    #[arg(long)]
    pub locked_value: Option<u32>,

    /// Drag a selection on the preview, display pixels: X0,Y0:X1,Y1
    #[arg(long, value_parser = parse_drag)]
    pub drag: Option<(Point, Point)>,

    /// Adopt the resulting selection's ratio as the aspect spec
    #[arg(long)]
    pub derive_ratio: bool,

    /// Center the selection in the image
    #[arg(long)]
    pub center: bool,

    /// Reset the selection to the full image
    #[arg(long)]
    pub full: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LockArg {
    Width,
    Height,
}

impl From<LockArg> for LockedDimension {
    fn from(arg: LockArg) -> Self {
        match arg {
            LockArg::Width => LockedDimension::Width,
            LockArg::Height => LockedDimension::Height,
        }
    }
}

/// Everything the crop command reports.
#[derive(Serialize)]
pub struct CropReport {
    pub geometry: ImageGeometry,
    pub enabled: bool,
    pub ratio_locked: bool,
    pub rect: CropRect,
    pub aspect: Option<AspectSpec>,
    pub options: CropOptions,
}

pub fn run(args: &CropArgs, config: &WebpressConfig) -> Result<()> {
    let (natural_w, natural_h) = args.natural;
    let (max_w, max_h) = args
        .max_box
        .unwrap_or((config.display.max_width, config.display.max_height));
    let geometry = ImageGeometry::fit(natural_w, natural_h, max_w, max_h)?;

    let mut engine = CropEngine::new(geometry)?;
    engine.set_enabled(args.enable);

    if let Some((ratio_w, ratio_h)) = requested_ratio(args) {
        let locked: LockedDimension = args.lock.into();
        let locked_value = args.locked_value.unwrap_or(match locked {
            LockedDimension::Width => natural_w,
            LockedDimension::Height => natural_h,
        });
        engine.set_mode(CropMode::RatioLocked);
        engine
            .set_aspect_spec(AspectSpec::new(ratio_w, ratio_h, locked, locked_value)?)
            .context("Aspect ratio does not fit the image")?;
    }

    for (field, value) in [
        (CropField::X, args.x),
        (CropField::Y, args.y),
        (CropField::Width, args.w),
        (CropField::Height, args.h),
    ] {
        if let Some(value) = value {
            engine
                .set_manual_field(field, value)
                .with_context(|| format!("Cannot set crop {field} to {value}"))?;
        }
    }

    if let Some((from, to)) = args.drag {
        if !engine.is_enabled() {
            bail!("--drag needs --enable");
        }
        let mut session = DragSession::new();
        session.pointer_down(&mut engine, from);
        session.pointer_move(&mut engine, to);
        session.pointer_up(&mut engine);
    }

    if args.full {
        engine.select_full_image();
    }
    if args.center {
        engine.center_crop();
    }
    if args.derive_ratio {
        engine.derive_ratio_from_current();
    }

    let report = CropReport {
        geometry: *engine.geometry(),
        enabled: engine.is_enabled(),
        ratio_locked: engine.is_ratio_locked(),
        rect: engine.rect(),
        aspect: engine.is_ratio_locked().then(|| engine.aspect()),
        options: CropOptions::from_engine(&engine),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        summary::print_crop_summary(&report);
    }

    Ok(())
}

/// Ratio terms from `--ratio` or a non-free `--preset`.
fn requested_ratio(args: &CropArgs) -> Option<(u32, u32)> {
    args.ratio
        .or_else(|| args.preset.and_then(|preset| preset.ratio()))
}

fn parse_pair<T: std::str::FromStr>(s: &str, sep: char, what: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected {what}, got '{s}'"))?;
    let a = a
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{a}' in {what}"))?;
    let b = b
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{b}' in {what}"))?;
    Ok((a, b))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    parse_pair(&s.to_ascii_lowercase(), 'x', "WIDTHxHEIGHT")
}

fn parse_ratio(s: &str) -> Result<(u32, u32), String> {
    parse_pair(s, ':', "W:H")
}

fn parse_preset(s: &str) -> Result<AspectPreset, String> {
    AspectPreset::from_label(s).ok_or_else(|| {
        let known: Vec<String> = AspectPreset::ALL.iter().map(|p| p.to_string()).collect();
        format!("unknown preset '{s}' (expected one of {})", known.join(", "))
    })
}

fn parse_drag(s: &str) -> Result<(Point, Point), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected X0,Y0:X1,Y1, got '{s}'"))?;
    let (x0, y0): (f64, f64) = parse_pair(from, ',', "X0,Y0")?;
    let (x1, y1): (f64, f64) = parse_pair(to, ',', "X1,Y1")?;
    Ok((Point::new(x0, y0), Point::new(x1, y1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_size("800X600"), Ok((800, 600)));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("ax1").is_err());
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_ratio("16:9"), Ok((16, 9)));
        assert!(parse_ratio("16/9").is_err());
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(parse_preset("16:9"), Ok(AspectPreset::SixteenByNine));
        assert_eq!(parse_preset("free"), Ok(AspectPreset::Free));
        assert!(parse_preset("2:1").unwrap_err().contains("expected one of"));
    }

    #[test]
    fn test_parse_drag() {
        let (from, to) = parse_drag("10,20:300.5,40").unwrap();
        assert_eq!(from, Point::new(10.0, 20.0));
        assert_eq!(to, Point::new(300.5, 40.0));
        assert!(parse_drag("10,20").is_err());
    }
}
