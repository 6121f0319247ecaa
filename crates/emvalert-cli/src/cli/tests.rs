use super::*;
use clap::Parser;

#[test]
fn run_parses_interval_and_cycle_limit() {
    let cli = Cli::try_parse_from([
        "emvalert",
        "run",
        "--interval-secs",
        "30",
        "--max-cycles",
        "3",
        "--dry-run",
    ])
    .expect("parse");
    match cli.command {
        Commands::Run(RunArgs {
            interval_secs,
            max_cycles,
            dry_run,
        }) => {
            assert_eq!(interval_secs, Some(30));
            assert_eq!(max_cycles, 3);
            assert!(dry_run);
        }
        _ => panic!("expected run command"),
    }
}

#[test]
fn run_defaults_to_unbounded_live_polling() {
    let cli = Cli::try_parse_from(["emvalert", "run"]).expect("parse");
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.interval_secs, None);
            assert_eq!(args.max_cycles, 0);
            assert!(!args.dry_run);
        }
        _ => panic!("expected run command"),
    }
}

#[test]
fn zero_interval_is_rejected() {
    let parsed = Cli::try_parse_from(["emvalert", "run", "--interval-secs", "0"]);
    assert!(parsed.is_err(), "interval must be at least one second");
}

#[test]
fn verbose_flag_is_global() {
    let cli = Cli::try_parse_from(["emvalert", "once", "--verbose"]).expect("parse");
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Once(OnceArgs { dry_run: false })));
}

#[test]
fn render_requires_input_file() {
    assert!(Cli::try_parse_from(["emvalert", "render"]).is_err());
    let cli = Cli::try_parse_from(["emvalert", "render", "--input", "feed.geojson"])
        .expect("parse");
    match cli.command {
        Commands::Render(RenderArgs { input }) => {
            assert_eq!(input, std::path::PathBuf::from("feed.geojson"));
        }
        _ => panic!("expected render command"),
    }
}
