use super::*;

#[test]
fn parses_search_with_default_limit() {
    let cli = Cli::try_parse_from(["bizlookup-cli", "search", "Acme Roofing", "Hamilton, ON"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Search { ref name, ref location, limit: 5 }
            if name == "Acme Roofing" && location == "Hamilton, ON"
    ));
}

#[test]
fn parses_raw_with_limit() {
    let cli = Cli::try_parse_from(["bizlookup-cli", "raw", "Acme", "Denver, CO", "--limit", "12"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Raw { limit: 12, .. }));
}

#[test]
fn parses_reviews_with_sort() {
    let cli = Cli::try_parse_from([
        "bizlookup-cli",
        "reviews",
        "1234567890",
        "Sydney, NSW",
        "--depth",
        "50",
        "--sort-by",
        "lowest_rating",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Reviews {
            ref cid,
            depth: 50,
            sort_by: ReviewSort::LowestRating,
            ..
        } if cid == "1234567890"
    ));
}

#[test]
fn reviews_defaults_to_newest() {
    let cli = Cli::try_parse_from(["bizlookup-cli", "reviews", "1", "Austin, TX"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Reviews {
            depth: 20,
            sort_by: ReviewSort::Newest,
            ..
        }
    ));
}

#[test]
fn rejects_unknown_sort() {
    let result = Cli::try_parse_from([
        "bizlookup-cli",
        "reviews",
        "1",
        "Austin, TX",
        "--sort-by",
        "oldest",
    ]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["bizlookup-cli"]).is_err());
}

#[test]
fn only_classify_runs_without_credentials() {
    let classify = Cli::try_parse_from(["bizlookup-cli", "classify", "London, UK"])
        .expect("expected valid cli args");
    assert!(!classify.command.needs_client());

    let balance =
        Cli::try_parse_from(["bizlookup-cli", "balance"]).expect("expected valid cli args");
    assert!(balance.command.needs_client());
}

#[test]
fn offline_dispatch_rejects_network_commands() {
    assert!(lookup::dispatch_offline(Commands::Balance).is_err());
}
