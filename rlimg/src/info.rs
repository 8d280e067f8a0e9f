//! Image inspection: decode each input and report what came out.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rasterload::{ErrorKind, Image, ImageFormat, Limits, LoadError, LoadRequest};
use rayon::prelude::*;
use serde::Serialize;

use crate::InfoArgs;
use crate::batch;

/// Run the `info` subcommand.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let files = batch::expand_inputs(&args.files)?;

    if files.is_empty() {
        anyhow::bail!("no image files found");
    }

    let limits = Limits {
        max_width: args.max_width,
        max_height: args.max_height,
        ..Default::default()
    };

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| inspect_file(path, &limits))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let multi = reports.len() > 1;
        for (i, report) in reports.iter().enumerate() {
            if multi {
                if i > 0 {
                    println!();
                }
                println!("{}:", report.path);
            }
            print_report(report);
        }
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} inputs failed to load", reports.len());
    }
    Ok(())
}

/// Decode a single file and summarize it.
fn inspect_file(path: &Path, limits: &Limits) -> FileReport {
    let mut report = FileReport {
        path: path.display().to_string(),
        file_size: std::fs::metadata(path).map(|m| m.len()).ok(),
        format: None,
        layout: None,
        width: None,
        height: None,
        decoded_size: None,
        error_kind: None,
        error: None,
    };

    let result = open_and_sniff(path).and_then(|(format, reader)| {
        report.format = Some(format!("{format:?} ({})", format.mime_type()));
        LoadRequest::new()
            .with_format(format)
            .with_limits(limits)
            .load_from_reader(reader)
    });
    log::debug!("{}: {:?}", path.display(), result.as_ref().map(Image::layout));

    match result {
        Ok(image) => {
            report.layout = Some(format!("{:?}", image.layout()));
            report.width = Some(image.width());
            report.height = Some(image.height());
            report.decoded_size = Some(image.size());
        }
        Err(e) => {
            report.error_kind = Some(kind_name(e.kind()));
            report.error = Some(e.to_string());
        }
    }

    report
}

/// Open `path` and identify it; the returned reader is back at the start.
fn open_and_sniff(path: &Path) -> Result<(ImageFormat, BufReader<File>), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let format = ImageFormat::sniff(&mut reader)
        .map_err(|source| LoadError::Io { format: None, source })?
        .ok_or(LoadError::UnrecognizedFormat)?;
    Ok((format, reader))
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "not-found",
        ErrorKind::Unsupported => "unsupported",
        ErrorKind::Malformed => "malformed",
        ErrorKind::DecodeFailure => "decode-failure",
    }
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    file_size: Option<u64>,
    format: Option<String>,
    layout: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    decoded_size: Option<usize>,
    error_kind: Option<&'static str>,
    error: Option<String>,
}

fn print_report(report: &FileReport) {
    if let Some(err) = &report.error {
        println!(
            "  Error:        {} ({})",
            err,
            report.error_kind.unwrap_or("unknown")
        );
        return;
    }
    if let Some(format) = &report.format {
        println!("  Format:       {format}");
    }
    if let (Some(w), Some(h)) = (report.width, report.height) {
        println!("  Dimensions:   {w}x{h}");
    }
    if let Some(layout) = &report.layout {
        println!("  Layout:       {layout}");
    }
    if let Some(size) = report.decoded_size {
        println!("  Decoded:      {}", batch::format_size(size as u64));
    }
    if let Some(size) = report.file_size {
        println!("  File size:    {}", batch::format_size(size));
    }
}
