use clap::{Arg, ArgAction, Command};

pub fn parse_args() -> clap::ArgMatches {
    Command::new("qrstitch")
        .version("0.1.0")
        .about("Split files into FEC-protected chunk envelopes and stitch them back together")
        .subcommand_required(true)
        .subcommand(
            Command::new("pack")
                .about("Pack a file into a stream of chunk envelopes (one JSON line each)")
                .arg(Arg::new("input").help("File to pack").required(true))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Envelope stream destination (defaults to <input>.qst)"),
                )
                .arg(
                    Arg::new("block-size")
                        .long("block-size")
                        .value_parser(clap::value_parser!(usize))
                        .help("Payload bytes per chunk before parity expansion"),
                )
                .arg(
                    Arg::new("fec")
                        .long("fec")
                        .value_parser(clap::value_parser!(usize))
                        .help("Parity symbols per chunk"),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Encrypt each chunk under this password"),
                )
                .arg(
                    Arg::new("media-type")
                        .long("media-type")
                        .help("Media type recorded in the metadata chunk"),
                ),
        )
        .subcommand(
            Command::new("restore")
                .about("Rebuild a file from an envelope stream")
                .arg(
                    Arg::new("input")
                        .help("Envelope stream (one JSON envelope per line)")
                        .required(true),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory for the recovered file (defaults to .)"),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Password for encrypted transfers"),
                )
                .arg(
                    Arg::new("fec")
                        .long("fec")
                        .value_parser(clap::value_parser!(usize))
                        .help("Parity symbols per chunk (must match the producer)"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Finalize even with chunks missing (ranges stay zero-filled)"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Abort on the first uncorrectable chunk instead of degrading"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Suppress progress output"),
                ),
        )
        .get_matches()
}
