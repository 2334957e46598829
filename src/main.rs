use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use filetime::FileTime;
use tracing_subscriber::EnvFilter;

use qst_decode::container::{PackfileDecoder, RawDecoder};
use qst_decode::decode::{DecodeOptions, DecodedLayer, decode_layer};
use qst_decode::error::{QstError, QstResult};
use qst_decode::quest::{QuestSummary, summarize};

#[derive(Parser)]
#[command(name = "unqst", about = "Zelda Classic quest decoder", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Show quest information and section table
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Write decoded data to pipe (stdout), suppress messages
    #[arg(short = 'p')]
    pipe: bool,

    /// Suppress progress messages
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Stop after the outer layer and write the packfile container
    #[arg(short = 'r', long = "raw")]
    raw: bool,

    /// More log output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output file (default: <QUEST>.dat)
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only try this encoding method (0-4)
    #[arg(long = "method", value_name = "N")]
    method: Option<usize>,

    /// Expected file preamble (default: quest tag, with or without NUL)
    #[arg(long = "preamble", value_name = "TEXT")]
    preamble: Option<String>,

    /// Quest file (.qst), or "-" for stdin
    quest: String,
}

fn main() {
    let cli = Cli::parse();

    let quiet = cli.quiet || cli.pipe;
    init_logging(cli.verbose, quiet);

    if !quiet {
        eprintln!("unqst v{}", env!("CARGO_PKG_VERSION"));
    }

    let data = match read_quest(&cli.quest) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("file open error : {}", cli.quest);
            eprintln!("err: {e}");
            process::exit(1);
        }
    };

    let options = DecodeOptions {
        preamble: cli.preamble.as_ref().map(|p| p.as_bytes().to_vec()),
        method: cli.method,
    };

    let layer = match decode_layer(&data, &options) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("decode failed : {}", cli.quest);
            eprintln!("err: {e}");
            process::exit(1);
        }
    };

    if cli.list {
        if let Err(e) = list_quest(layer, &cli.quest) {
            eprintln!("\nlist failed: {e}");
            process::exit(1);
        }
        return;
    }

    let method = layer.method.index;
    let result = if cli.raw {
        layer.into_payload(&RawDecoder)
    } else {
        layer.into_payload(&PackfileDecoder)
    };
    let payload = match result {
        Ok(p) => p,
        Err(e) => {
            eprintln!("decode failed : {}", cli.quest);
            eprintln!("err: {e}");
            process::exit(1);
        }
    };

    let to_stdout = cli.pipe || (cli.quest == "-" && cli.output.is_none());
    let result = if to_stdout {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(&payload)
            .and_then(|()| out.flush())
            .map_err(QstError::CantOpenDestFile)
    } else {
        let dest = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output(&cli.quest));
        if !quiet {
            eprintln!(
                "\ndecoding {} (method {method}, {} bytes) to {}",
                cli.quest,
                payload.len(),
                dest.display()
            );
        }
        write_output(&dest, &payload, &cli.quest)
    };

    match result {
        Ok(()) => {
            if !quiet {
                eprintln!("\ndone.");
            }
        }
        Err(e) => {
            eprintln!("\nwrite failed: {e}");
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_quest(source: &str) -> QstResult<Vec<u8>> {
    if source == "-" {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        Ok(data)
    } else {
        fs::read(source).map_err(QstError::CantOpenFile)
    }
}

fn default_output(source: &str) -> PathBuf {
    let mut name = Path::new(source).as_os_str().to_owned();
    name.push(".dat");
    PathBuf::from(name)
}

fn write_output(dest: &Path, payload: &[u8], source: &str) -> QstResult<()> {
    let mut file = fs::File::create(dest).map_err(QstError::CantOpenDestFile)?;
    file.write_all(payload).map_err(QstError::CantOpenDestFile)?;
    file.flush().map_err(QstError::CantOpenDestFile)?;
    drop(file);

    // Carry the quest's modification time over to the output.
    if source != "-" {
        if let Ok(meta) = fs::metadata(source) {
            let ft = FileTime::from_last_modification_time(&meta);
            let _ = filetime::set_file_mtime(dest, ft);
        }
    }
    Ok(())
}

fn list_quest(layer: DecodedLayer, source: &str) -> QstResult<()> {
    let method = layer.method.index;
    let container_len = layer.plaintext.len();
    let payload = layer.into_payload(&PackfileDecoder)?;
    let summary = summarize(&payload)?;

    println!("\nListing quest: {source}");
    println!();
    println!("Method    : {method}");
    println!("Container : {container_len} bytes");
    println!("Payload   : {} bytes", payload.len());
    print_header(&summary);
    println!();
    println!("Id   SVer CVer       Offset         Size    CRC32");
    println!("---- ---- ---- ------------ ------------ --------");

    let mut total: u64 = 0;
    for s in &summary.sections {
        println!(
            "{:<4} {:>4} {:>4} {:>12} {:>12} {:08x}",
            s.id, s.sversion, s.cversion, s.offset, s.size, s.crc32
        );
        total += u64::from(s.size);
    }

    println!("---- ---- ---- ------------ ------------ --------");
    let count = summary.sections.len();
    let plural = if count == 1 { "" } else { "s" };
    println!("                            {total:>12}   Total {count} section{plural}");
    Ok(())
}

fn print_header(summary: &QuestSummary) {
    let known = if summary.is_known_id() { "" } else { " (unrecognised)" };
    println!("Id        : {}{known}", summary.id_line);
    if let Some(h) = &summary.header {
        println!("Title     : {}", h.title);
        println!("Author    : {}", h.author);
        println!("Quest     : #{} version {} (min {})", h.quest_number, h.version, h.min_version);
        println!("Engine    : {:x} build {}", h.zelda_version, h.build);
    }
}
