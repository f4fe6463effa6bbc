use crate::CLAP_STYLING;
use clap::{arg, command};
use spiderbot_scanner::config::DEFAULT_ROOT_URL;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("spiderbot")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("spiderbot")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl every page reachable from a root URL without leaving its host, \
                and print the resulting sitemap.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The root URL to crawl")
                        .default_value(DEFAULT_ROOT_URL),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("5"),
                )
                .arg(
                    arg!(-d --"max-depth" <DEPTH>)
                        .required(false)
                        .help("Stop following links this many hops from the root (0 or less: no limit)")
                        .value_parser(clap::value_parser!(i64))
                        .allow_negative_numbers(true)
                        .default_value("-1"),
                )
                .arg(
                    arg!(--"max-urls-per-round" <COUNT>)
                        .required(false)
                        .help("Fetch at most this many URLs per round (0 or less: no limit)")
                        .value_parser(clap::value_parser!(i64))
                        .allow_negative_numbers(true)
                        .default_value("0"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: tree, text, json")
                        .value_parser(["tree", "text", "json"])
                        .default_value("tree"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save output to file (default: print to stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-v --"verbose" "Log every fetch and round at debug level")
                        .required(false)
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["spiderbot", "crawl"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "crawl");
        assert_eq!(sub.get_one::<String>("url").unwrap(), DEFAULT_ROOT_URL);
        assert_eq!(*sub.get_one::<u64>("timeout").unwrap(), 5);
        assert_eq!(*sub.get_one::<i64>("max-depth").unwrap(), -1);
        assert_eq!(*sub.get_one::<i64>("max-urls-per-round").unwrap(), 0);
        assert_eq!(sub.get_one::<String>("format").unwrap(), "tree");
        assert!(sub.get_one::<std::path::PathBuf>("output").is_none());
        assert!(!sub.get_flag("verbose"));
        assert!(!matches.get_flag("quiet"));
    }

    #[test]
    fn test_crawl_accepts_negative_limits() {
        let matches = command_argument_builder()
            .try_get_matches_from([
                "spiderbot",
                "crawl",
                "--max-depth",
                "-3",
                "--max-urls-per-round",
                "-1",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("crawl").unwrap();

        assert_eq!(*sub.get_one::<i64>("max-depth").unwrap(), -3);
        assert_eq!(*sub.get_one::<i64>("max-urls-per-round").unwrap(), -1);
    }

    #[test]
    fn test_quiet_after_subcommand() {
        let matches = command_argument_builder()
            .try_get_matches_from(["spiderbot", "crawl", "-q"])
            .unwrap();
        assert!(matches.get_flag("quiet"));
    }

    #[test]
    fn test_rejects_zero_timeout_and_unknown_format() {
        assert!(
            command_argument_builder()
                .try_get_matches_from(["spiderbot", "crawl", "--timeout", "0"])
                .is_err()
        );
        assert!(
            command_argument_builder()
                .try_get_matches_from(["spiderbot", "crawl", "-f", "csv"])
                .is_err()
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(
            command_argument_builder()
                .try_get_matches_from(["spiderbot"])
                .is_err()
        );
    }
}
