#![forbid(unsafe_code)]

use inquire::{Confirm, InquireError, Select, Text};
use std::path::{Path, PathBuf};

use vpsp::psp::{self, EncodeOptions, PspError, PspResult, SourceOptions};

const FROM_ZIP: &str = "zip archive";
const FROM_DIR: &str = "directory";

fn prompt_err(e: InquireError) -> PspError {
    PspError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

fn validate_input(p: &Path, kind: &str) -> PspResult<()> {
    let ok = match kind {
        FROM_DIR => p.is_dir(),
        _ => p.is_file(),
    };
    if !ok {
        return Err(PspError::Invalid(format!("{} is not a {kind}", p.display())));
    }
    Ok(())
}

fn normalize_prefix(mut s: String) -> String {
    s = s.trim().replace('\\', "/");
    if s == "." {
        s.clear();
    }
    if !s.is_empty() && !s.ends_with('/') {
        s.push('/');
    }
    s
}

fn split_excludes(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.to_string())
        .collect()
}

fn ensure_psp_ext(p: &Path) -> PathBuf {
    if p.extension().and_then(|e| e.to_str()).unwrap_or("") == "psp" {
        return p.to_path_buf();
    }
    p.with_extension("psp")
}

pub fn run() -> PspResult<()> {
    println!("V4PSP Wizard\n");

    let kind = Select::new("Source", vec![FROM_ZIP, FROM_DIR])
        .prompt()
        .map_err(prompt_err)?;

    let default_input = if kind == FROM_DIR { "./data" } else { "./data.zip" };
    let input = Text::new("Input")
        .with_default(default_input)
        .prompt()
        .map(PathBuf::from)
        .map_err(prompt_err)?;
    validate_input(&input, kind)?;

    let output_raw = Text::new("Output .psp file")
        .with_default("./data.psp")
        .prompt()
        .map_err(prompt_err)?;
    if output_raw.trim().is_empty() {
        return Err(PspError::Invalid("output path is empty".into()));
    }
    let output = ensure_psp_ext(Path::new(output_raw.trim()));

    let prefix = Text::new("Path prefix inside container (optional)")
        .with_default("")
        .prompt()
        .map(normalize_prefix)
        .map_err(prompt_err)?;

    let excludes_raw = Text::new("Excludes (comma-separated substrings, optional)")
        .with_default("__MACOSX,.DS_Store")
        .prompt()
        .map_err(prompt_err)?;
    let excludes = split_excludes(&excludes_raw);

    println!("\nSummary:");
    println!("  source  : {kind}");
    println!("  input   : {}", input.display());
    println!("  output  : {}", output.display());
    println!("  prefix  : {}", if prefix.is_empty() { "<none>" } else { &prefix });
    let excludes_shown = if excludes.is_empty() {
        "<none>".to_string()
    } else {
        excludes.join(", ")
    };
    println!("  excludes: {excludes_shown}");

    let proceed = Confirm::new("Proceed?")
        .with_default(true)
        .prompt()
        .map_err(prompt_err)?;
    if !proceed {
        return Ok(());
    }

    let source = SourceOptions { prefix, excludes };
    let summary = if kind == FROM_DIR {
        psp::build(&input, &output, &source, EncodeOptions::default())?
    } else {
        psp::repack(&input, &output, &source, EncodeOptions::default())?
    };
    println!("wrote {} entries ({} bytes)", summary.entries, summary.bytes);
    Ok(())
}
