use console::Style;
use webpress_core::jobs::{BatchResult, JobOutcome};

use crate::commands::crop::CropReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    ok: Style,
    failed: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            failed: Style::new().red(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_crop_summary(report: &CropReport) {
    let s = Styles::new();
    let g = &report.geometry;

    print_title(&s, "Webpress Crop");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Natural"),
        s.value.apply_to(format!("{}x{}", g.natural_width, g.natural_height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Preview"),
        s.value.apply_to(format!("{}x{}", g.display_width, g.display_height))
    );
    println!();

    println!("  {}", s.header.apply_to("Selection"));
    if !report.enabled {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("disabled (full image)")
        );
    }
    let r = &report.rect;
    println!(
        "    {:<12}{}",
        s.label.apply_to("Origin"),
        s.value.apply_to(format!("{}, {}", r.x, r.y))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{}x{}", r.width, r.height))
    );
    match report.aspect {
        Some(ref aspect) => println!(
            "    {:<12}{}",
            s.label.apply_to("Aspect"),
            s.ok.apply_to(aspect)
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Aspect"),
            s.disabled.apply_to("free")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Submission"));
    let o = &report.options;
    if o.has_crop() {
        for (name, value) in [
            ("crop_size_w", o.crop_size_w),
            ("crop_size_h", o.crop_size_h),
            ("crop_top_x", o.crop_top_x),
            ("crop_top_y", o.crop_top_y),
            ("crop_w", o.crop_w),
            ("crop_h", o.crop_h),
        ] {
            if let Some(value) = value {
                println!("    {:<12}{}", s.label.apply_to(name), s.value.apply_to(value));
            }
        }
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("none")
        );
    }
    println!();
}

pub fn print_batch_summary(result: &BatchResult) {
    let s = Styles::new();

    print_title(&s, "Webpress Batch");

    if let Some(batch_id) = result.batch_id {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Batch"),
            s.value.apply_to(batch_id)
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Completed"),
        s.ok.apply_to(result.len() - result.failed_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Failed"),
        s.failed.apply_to(result.failed_count())
    );
    if result.pending() > 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Unreported"),
            s.disabled.apply_to(result.pending())
        );
    }
    println!();

    if result.is_empty() {
        return;
    }

    println!("  {}", s.header.apply_to("Jobs"));
    for entry in &result.entries {
        match &entry.outcome {
            JobOutcome::Completed { urls } => {
                println!("    {} {}", s.ok.apply_to("\u{2713}"), s.value.apply_to(&entry.original_name));
                for url in urls {
                    println!("        {}", s.path.apply_to(url));
                }
            }
            JobOutcome::Failed { message } => {
                println!(
                    "    {} {}  {}",
                    s.failed.apply_to("\u{2717}"),
                    s.value.apply_to(&entry.original_name),
                    s.label.apply_to(message)
                );
            }
        }
    }
    println!();

    if !result.errors.is_empty() {
        println!("  {}", s.header.apply_to("Errors"));
        for error in &result.errors {
            println!("    {}", s.failed.apply_to(error));
        }
        println!();
    }
}
