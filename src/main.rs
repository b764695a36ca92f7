use cifra::{
    available_keys, chord_vocabulary, transpose_chart_with, CifraError, Notation, Song, Spelling,
    TransposeOptions, TransposeReport,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "cifra", about = "Transpose worship song chord charts")]
#[command(version)]
struct Cli {
    /// Log each transposition and every skipped token
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transpose a song file to another key
    Transpose {
        /// Path to a song file (chart with optional YAML frontmatter)
        file: PathBuf,

        /// Target key
        #[arg(long, required_unless_present = "minister", conflicts_with = "minister")]
        to: Option<String>,

        /// Transpose to this minister's preferred key
        #[arg(long = "for", value_name = "MINISTER")]
        minister: Option<String>,

        /// Source key (defaults to the song's `key`)
        #[arg(long)]
        from: Option<String>,

        #[command(flatten)]
        output: OutputArgs,

        /// Always render flats
        #[arg(long, conflicts_with = "sharps")]
        flats: bool,

        /// Always render sharps
        #[arg(long)]
        sharps: bool,
    },

    /// List the distinct chords of a song file
    Chords {
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the available keys
    Keys {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Chord notation (defaults to the song's `notation`, else bracketed)
    #[arg(long, value_enum)]
    notation: Option<NotationArg>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum NotationArg {
    Bracketed,
    Plain,
    Lines,
}

impl From<NotationArg> for Notation {
    fn from(arg: NotationArg) -> Self {
        match arg {
            NotationArg::Bracketed => Notation::Bracketed,
            NotationArg::Plain => Notation::Plain,
            NotationArg::Lines => Notation::ChordLines,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CifraError> {
    match command {
        Command::Transpose {
            file,
            to,
            minister,
            from,
            output,
            flats,
            sharps,
        } => {
            let song = read_song(&file);
            let to = match (to, minister) {
                (Some(to), _) => to,
                (None, Some(minister)) => song.preferred_key(&minister)?.to_string(),
                (None, None) => song.key()?.to_string(),
            };
            let from = match from {
                Some(from) => from,
                None => song.key()?.to_string(),
            };
            let spelling = match (flats, sharps) {
                (true, _) => Some(Spelling::Flats),
                (_, true) => Some(Spelling::Sharps),
                _ => None,
            };
            let options = TransposeOptions {
                notation: output.notation.map(Notation::from).unwrap_or(song.metadata.notation),
                spelling,
            };

            let report = transpose_chart_with(&song.chart, &from, &to, &options)?;
            print_report(&report, output.json);
        }
        Command::Chords { file, output } => {
            let song = read_song(&file);
            let notation = output.notation.map(Notation::from).unwrap_or(song.metadata.notation);
            let chords = chord_vocabulary(&song.chart, notation);
            if output.json {
                print_json(&chords);
            } else {
                let names: Vec<String> = chords.iter().map(|c| c.to_string()).collect();
                println!("{}", names.join(" "));
            }
        }
        Command::Keys { json } => {
            let keys = available_keys();
            if json {
                print_json(&keys);
            } else {
                println!("{}", keys.join(" "));
            }
        }
    }
    Ok(())
}

fn read_song(path: &Path) -> Song {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    };
    match Song::parse(&source) {
        Ok(song) => song,
        Err(e) => {
            eprintln!("Error in '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn print_report(report: &TransposeReport, json: bool) {
    if json {
        print_json(report);
    } else {
        print!("{}", report.chart);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error encoding JSON: {}", e);
            process::exit(1);
        }
    }
}
