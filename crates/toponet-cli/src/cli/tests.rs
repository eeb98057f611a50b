#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use clap::CommandFactory;

use super::*;

/// The root help output must contain all top-level subcommand names.
#[test]
fn test_root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    for name in ["generate", "synthesize", "cycles", "preprocess", "version"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

/// The root help output must describe every global flag.
#[test]
fn test_root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());

    for flag in [
        "--format",
        "--quiet",
        "--verbose",
        "--max-file-size",
        "--help",
        "--version",
    ] {
        assert!(
            help.contains(flag),
            "root help should mention flag '{flag}'"
        );
    }
}

/// `toponet generate --help` must mention the generator overrides.
#[test]
fn test_generate_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("generate")
        .expect("generate subcommand should exist");
    let help = format!("{}", sub.render_help());
    for flag in [
        "--records",
        "--agents",
        "--seed",
        "--zone-range",
        "--threshold",
        "--epsilon",
        "--scale",
        "--fallback",
        "--output",
    ] {
        assert!(help.contains(flag), "generate help should mention {flag}");
    }
}

/// `toponet preprocess --help` must mention the split ratios.
#[test]
fn test_preprocess_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("preprocess")
        .expect("preprocess subcommand should exist");
    let help = format!("{}", sub.render_help());
    assert!(help.contains("--test-ratio"));
    assert!(help.contains("--validation-ratio"));
    assert!(help.contains("--out-dir"));
    assert!(help.contains("--agent"));
    assert!(help.contains("--one-hot"));
    assert!(help.contains("FILE"));
}

#[test]
fn test_preprocess_agent_target() {
    let cli = Cli::try_parse_from(["toponet", "preprocess", "d.csv", "--agent", "3", "--one-hot"])
        .expect("should parse --agent with --one-hot");
    match cli.command {
        Command::Preprocess(args) => {
            assert_eq!(
                args.target(),
                Some(Target {
                    agent: 3,
                    encoding: TargetEncoding::OneHot,
                })
            );
        }
        _ => panic!("expected Preprocess subcommand"),
    }

    let cli = Cli::try_parse_from(["toponet", "preprocess", "d.csv"]).expect("should parse");
    match cli.command {
        Command::Preprocess(args) => assert_eq!(args.target(), None),
        _ => panic!("expected Preprocess subcommand"),
    }
}

#[test]
fn test_one_hot_requires_agent() {
    let result = Cli::try_parse_from(["toponet", "preprocess", "d.csv", "--one-hot"]);
    assert!(result.is_err(), "--one-hot without --agent must be rejected");
}

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["toponet", "generate"]).expect("should parse");
    match cli.command {
        Command::Generate(args) => {
            assert_eq!(args.records, 100);
            assert_eq!(args.seed, 0);
            assert!(args.agents.is_none());
            assert!(args.output.is_none());
            assert!(matches!(args.preset, PresetArg::Default));
            assert!(matches!(args.fallback, FallbackArg::LowestId));
        }
        _ => panic!("expected Generate subcommand"),
    }
}

#[test]
fn test_synthesize_fallback_flag() {
    let cli = Cli::try_parse_from(["toponet", "synthesize", "--fallback", "nearest", "net.json"])
        .expect("should parse --fallback nearest");
    match cli.command {
        Command::Synthesize { file, fallback } => {
            assert!(matches!(fallback, FallbackArg::Nearest));
            assert!(matches!(file, PathOrStdin::Path(_)));
        }
        _ => panic!("expected Synthesize subcommand"),
    }
}

#[test]
fn test_dash_parses_as_stdin() {
    let cli = Cli::try_parse_from(["toponet", "cycles", "-"]).expect("should parse -");
    match cli.command {
        Command::Cycles { file } => assert!(matches!(file, PathOrStdin::Stdin)),
        _ => panic!("expected Cycles subcommand"),
    }
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["toponet", "-q", "-v", "version"]);
    assert!(result.is_err(), "--quiet and --verbose must conflict");
}

#[test]
fn test_format_is_global() {
    let cli = Cli::try_parse_from(["toponet", "cycles", "net.json", "--format", "json"])
        .expect("global flag after subcommand");
    assert!(matches!(cli.format, OutputFormat::Json));
}

#[test]
fn test_unknown_fallback_is_rejected() {
    let result = Cli::try_parse_from(["toponet", "synthesize", "--fallback", "random", "x"]);
    assert!(result.is_err());
}

#[test]
fn test_fallback_arg_maps_to_policy() {
    assert_eq!(
        FallbackPolicy::from(FallbackArg::Nearest),
        FallbackPolicy::Nearest
    );
    assert_eq!(
        FallbackPolicy::from(FallbackArg::LowestId),
        FallbackPolicy::LowestId
    );
}

#[test]
fn test_path_label() {
    assert_eq!(PathOrStdin::Stdin.label(), "-");
    assert_eq!(
        PathOrStdin::Path(PathBuf::from("a/b.json")).label(),
        "a/b.json"
    );
}
