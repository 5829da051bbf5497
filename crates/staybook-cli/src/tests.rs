use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["staybook-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["staybook-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["staybook-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn geocode_joins_query_words() {
    let cli = Cli::try_parse_from(["staybook-cli", "geocode", "Paris,", "France"]).unwrap();
    match cli.command {
        Some(Commands::Geocode { query, json }) => {
            assert_eq!(query.join(" "), "Paris, France");
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn geocode_accepts_json_flag() {
    let cli = Cli::try_parse_from(["staybook-cli", "geocode", "--json", "Kyoto"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Geocode { json: true, .. })
    ));
}

#[test]
fn geocode_requires_a_query() {
    assert!(Cli::try_parse_from(["staybook-cli", "geocode"]).is_err());
}

#[test]
fn listings_list_defaults() {
    let cli = Cli::try_parse_from(["staybook-cli", "listings", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Listings {
            command: ListingsCommands::List {
                provenance: None,
                limit: 20
            }
        })
    ));
}

#[test]
fn listings_list_filters_by_provenance() {
    let cli = Cli::try_parse_from([
        "staybook-cli",
        "listings",
        "list",
        "--provenance",
        "default",
        "--limit",
        "5",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Listings {
            command: ListingsCommands::List {
                provenance: Some(crate::listings::ProvenanceFilter::Default),
                limit: 5
            }
        })
    ));
}

#[test]
fn listings_list_rejects_unknown_provenance() {
    assert!(
        Cli::try_parse_from(["staybook-cli", "listings", "list", "--provenance", "guess"]).is_err()
    );
}
