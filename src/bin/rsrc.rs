// SPDX-License-Identifier: MIT

//! List or extract the resources of a raw resource fork, such as a
//! Basilisk II `.rsrc` sidecar or a `..namedfork/rsrc` dump.
//!
//! ```text
//! rsrc Untitled
//! rsrc Untitled --extract icl8 128 newton_icl8_128.bin
//! ```

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use itertools::Itertools;
use rsrcfork::{Error, ResourceEntry, ResourceFork, ResourceId, ResourceType};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status when the requested resource is absent.
const EXIT_NOT_FOUND: u8 = 2;

/// List and extract resources from a classic Mac OS resource fork
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Raw resource fork file
    file: PathBuf,

    /// Extract resource TYPE and ID to OUT
    #[arg(
        long,
        num_args = 3,
        value_names = ["TYPE", "ID", "OUT"],
        allow_negative_numbers = true
    )]
    extract: Option<Vec<String>>,

    /// Log decoder progress. RUST_LOG takes precedence.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let buf = fs::read(&args.file)
        .with_context(|| format!("Read resource fork {}", args.file.display()))?;
    let fork = ResourceFork::parse(&buf)
        .with_context(|| format!("Parse resource fork {}", args.file.display()))?;

    match args.extract.as_deref() {
        Some([resource_type, id, out]) => extract(&fork, resource_type, id, Path::new(out)),
        _ => {
            list(&fork, &args.file);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list(fork: &ResourceFork<'_>, path: &Path) {
    println!("Found {} resources in {}", fork.len(), path.display());
    fork.entries()
        .iter()
        .for_each(|entry| println!("{}", format_entry(entry)));

    if !fork.is_empty() {
        let summary = fork
            .type_counts()
            .into_iter()
            .map(|(resource_type, count)| format!("{resource_type} x{count}"))
            .join(", ");
        println!("Types: {summary}");
    }
}

fn format_entry(entry: &ResourceEntry) -> String {
    let name = match entry.name() {
        "" => String::new(),
        name => format!(" \"{name}\""),
    };

    format!(
        "{:4} ({:6})  size={:6}  attrs=0x{:02X}{name}",
        entry.resource_type,
        entry.id,
        entry.data_length,
        entry.attributes().bits()
    )
}

/// The resource key a `--extract` request names, or `None` when no resource
/// could carry it: a code that is not four Latin-1 bytes or an ID outside
/// `i16`. Only an ID that is not an integer at all is an error.
fn requested_key(
    resource_type: &str,
    id: &str,
) -> Result<(Option<(ResourceType, ResourceId)>, i64)> {
    let id: i64 = id
        .parse()
        .with_context(|| format!("Invalid resource id {id:?}"))?;

    let key = resource_type
        .parse::<ResourceType>()
        .ok()
        .zip(ResourceId::try_from(id).ok());

    Ok((key, id))
}

fn extract(fork: &ResourceFork<'_>, resource_type: &str, id: &str, out: &Path) -> Result<ExitCode> {
    let not_found = |id: i64| {
        eprintln!("Not found: {resource_type} ({id})");
        ExitCode::from(EXIT_NOT_FOUND)
    };

    let (resource_type, id) = match requested_key(resource_type, id)? {
        (Some(key), _) => key,
        (None, id) => return Ok(not_found(id)),
    };

    let blob = match fork.extract(resource_type, id) {
        Ok(blob) => blob,
        Err(Error::NotFound { id, .. }) => return Ok(not_found(i64::from(id))),
        Err(err) => return Err(err.into()),
    };

    fs::write(out, blob).with_context(|| format!("Write {}", out.display()))?;

    let digest = Sha256::digest(blob);
    println!(
        "Wrote {}: type={resource_type} id={id} size={} sha256={digest:x}",
        out.display(),
        blob.len()
    );

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: Option<&str>) -> ResourceEntry {
        ResourceEntry {
            resource_type: ResourceType::ICON_LARGE_8BIT,
            id: -128,
            name: name.map(str::to_string),
            attributes: 0x20,
            data_offset: 4,
            data_length: 1024,
        }
    }

    /// `TEST` 128 holding `01 02 03 04`, unnamed.
    fn single_resource_fork() -> Vec<u8> {
        let mut buf = Vec::new();
        for field in [16u32, 24, 8, 50] {
            buf.extend_from_slice(&field.to_be_bytes());
        }
        buf.extend_from_slice(&[0, 0, 0, 4, 1, 2, 3, 4]);

        buf.extend_from_slice(&[0; 24]);
        buf.extend_from_slice(&28u16.to_be_bytes());
        buf.extend_from_slice(&50u16.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(b"TEST");
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&10u16.to_be_bytes());
        buf.extend_from_slice(&128i16.to_be_bytes());
        buf.extend_from_slice(&(-1i16).to_be_bytes());
        buf.extend_from_slice(&[0; 8]);
        buf
    }

    #[test]
    fn formats_unnamed_entry() {
        assert_eq!(
            format_entry(&entry(None)),
            "icl8 (  -128)  size=  1024  attrs=0x20"
        );
    }

    #[test]
    fn formats_named_entry() {
        assert_eq!(
            format_entry(&entry(Some("Newton"))),
            "icl8 (  -128)  size=  1024  attrs=0x20 \"Newton\""
        );
        assert_eq!(
            format_entry(&entry(Some(""))),
            "icl8 (  -128)  size=  1024  attrs=0x20"
        );
    }

    #[test]
    fn accepts_negative_ids() {
        let args = Args::try_parse_from(["rsrc", "fork", "--extract", "STR ", "-16396", "out.bin"])
            .unwrap();
        assert_eq!(
            args.extract.unwrap(),
            ["STR ", "-16396", "out.bin"].map(String::from)
        );
    }

    #[test]
    fn unrepresentable_requests_are_misses() {
        assert_eq!(
            requested_key("STR", "-16396").unwrap(),
            (Some((ResourceType::STRING, -16396)), -16396)
        );
        assert_eq!(requested_key("icl8", "40000").unwrap(), (None, 40000));
        assert_eq!(requested_key("ICON#", "128").unwrap(), (None, 128));
        assert!(requested_key("icl8", "twelve").is_err());
    }

    #[test]
    fn misses_exit_with_not_found_status() {
        let buf = single_resource_fork();
        let fork = ResourceFork::parse(&buf).unwrap();
        assert_eq!(fork.extract(ResourceType(*b"TEST"), 128).unwrap(), &[1, 2, 3, 4]);

        let out = Path::new("unused.bin");
        for (resource_type, id) in [("ICN#", "128"), ("icl8", "40000"), ("ICON#", "128")] {
            let status = extract(&fork, resource_type, id, out).unwrap();
            assert_eq!(status, ExitCode::from(EXIT_NOT_FOUND));
        }
        assert!(!out.exists());
        assert!(extract(&fork, "icl8", "twelve", out).is_err());
    }
}
