use anyhow::{anyhow, bail, Context, Result};
use qrstitch::args::parse_args;
use qrstitch::pack::{pack, PackOptions};
use qrstitch::session::{ReconstructSession, RecoveryPolicy, SessionBuilder};
use qrstitch::DEFAULT_FEC_LEN;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let matches = parse_args();
    match matches.subcommand() {
        Some(("pack", sub)) => run_pack(sub),
        Some(("restore", sub)) => run_restore(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn run_pack(matches: &clap::ArgMatches) -> Result<()> {
    let input = matches.get_one::<String>("input").expect("required");
    let input_path = Path::new(input);
    let data = fs::read(input_path).with_context(|| format!("failed to read {input}"))?;

    let mut options = PackOptions::default();
    if let Some(&block_size) = matches.get_one::<usize>("block-size") {
        options.block_size = block_size;
    }
    if let Some(&fec_len) = matches.get_one::<usize>("fec") {
        options.fec_len = fec_len;
    }
    options.password = matches.get_one::<String>("password").cloned();
    if let Some(media_type) = matches.get_one::<String>("media-type") {
        options.media_type = media_type.clone();
    }

    let file_name = input_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(input);
    let packed = pack(file_name, &data, &options)?;

    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension("qst"));
    let mut stream = packed.envelopes.join("\n");
    stream.push('\n');
    fs::write(&output, stream).with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Packed {} into {} chunks ({} data + metadata) -> {}",
        file_name,
        packed.metadata.total_blocks,
        packed.metadata.data_chunks(),
        output.display()
    );
    Ok(())
}

fn run_restore(matches: &clap::ArgMatches) -> Result<()> {
    let input = matches.get_one::<String>("input").expect("required");
    let quiet = matches.get_flag("quiet");
    let force = matches.get_flag("force");

    let mut builder = SessionBuilder::new().quiet(quiet);
    if matches.get_flag("strict") {
        builder = builder.policy(RecoveryPolicy::Strict);
    }
    if let Some(password) = matches.get_one::<String>("password") {
        builder = builder.password(password.clone());
    }
    builder = builder.fec_len(
        matches
            .get_one::<usize>("fec")
            .copied()
            .unwrap_or(DEFAULT_FEC_LEN),
    );
    let mut session = builder.build();

    let stream = fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?;
    ingest_stream(&mut session, &stream)?;

    if !force && !session.is_ready() {
        let received = session.received_chunks();
        match session.expected_chunks() {
            Some(expected) => bail!(
                "only {received} of {expected} data chunks present; rerun with --force to \
                 reconstruct anyway"
            ),
            None => bail!("metadata chunk (index 0) not found in {input}"),
        }
    }

    let report = if force {
        session.finalize_forced()?
    } else {
        session.finalize()?
    };

    let output_dir = matches
        .get_one::<String>("output-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let output = output_dir.join(output_file_name(&report.file_name)?);
    fs::write(&output, &report.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Recovered {} ({} bytes) -> {}",
        report.file_name,
        report.bytes.len(),
        output.display()
    );
    if !report.hash_matched {
        eprintln!("WARNING: integrity hash mismatch; the recovered file may be corrupt");
    }
    if report.missing_chunks > 0 {
        eprintln!(
            "WARNING: {} chunk(s) were missing and left zero-filled",
            report.missing_chunks
        );
    }
    Ok(())
}

fn ingest_stream(session: &mut ReconstructSession, stream: &str) -> Result<()> {
    for (line_no, line) in stream.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        session
            .ingest_envelope(line)
            .with_context(|| format!("failed to ingest envelope at line {}", line_no + 1))?;
    }
    Ok(())
}

/// Reduce the metadata's file name to a bare final component. The name
/// comes off the wire, so path separators and `..` must not steer the
/// write outside the output directory.
fn output_file_name(name: &str) -> Result<&str> {
    Path::new(name)
        .file_name()
        .and_then(|component| component.to_str())
        .ok_or_else(|| anyhow!("metadata file name {name:?} has no usable final component"))
}
