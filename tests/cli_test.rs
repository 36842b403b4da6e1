//! CLI Command Tests
//!
//! Argument parsing, JSON envelopes, and command handlers run against a
//! mocked TMDB server. Covers exit codes and input validation.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use cinefetch::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_info_alias() {
        let cli = Cli::parse_from(["cinefetch", "i", "438631"]);
        assert!(!cli.is_tui_mode());
        match cli.command {
            Command::Info(cmd) => assert_eq!(cmd.id, "438631"),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_json_flag_after_subcommand() {
        let cli = Cli::parse_from(["cinefetch", "poster", "603", "--json"]);
        assert!(cli.json);
        assert!(cli.should_json());
        match cli.command {
            Command::Poster(cmd) => assert!(cmd.size.is_none()),
            _ => panic!("Expected Poster command"),
        }
    }

    #[test]
    fn test_view_alias_many_ids() {
        let cli = Cli::parse_from(["cinefetch", "v", "1", "2", "3"]);
        assert!(cli.is_tui_mode());
        match cli.command {
            Command::View(cmd) => assert_eq!(cmd.ids.len(), 3),
            _ => panic!("Expected View command"),
        }
    }

    #[test]
    fn test_config_timeout_must_be_number() {
        assert!(Cli::try_parse_from(["cinefetch", "config", "--timeout-secs", "soon"]).is_err());
        let cli = Cli::parse_from(["cinefetch", "config", "--timeout-secs", "10"]);
        match cli.command {
            Command::Config(cmd) => assert_eq!(cmd.timeout_secs, Some(10)),
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_unknown_command_fails() {
        assert!(Cli::try_parse_from(["cinefetch", "search", "dune"]).is_err());
    }
}

// =============================================================================
// Command Handler Tests
// =============================================================================

mod handlers {
    use cinefetch::cli::{ExitCode, InfoCmd, Output, PosterCmd};
    use cinefetch::commands::{info_cmd, poster_cmd};
    use cinefetch::config::Config;
    use mockito::Server;

    const MATRIX: &str = r#"{
        "id": 603,
        "title": "The Matrix",
        "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
        "release_date": "1999-03-30",
        "runtime": 136
    }"#;

    fn json_output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn config_for(server: &Server) -> Config {
        Config {
            tmdb_api_key: Some("test_key".into()),
            api_base_url: Some(server.url()),
            ..Default::default()
        }
    }

    fn env_overrides_set() -> bool {
        std::env::var("TMDB_BASE_URL").is_ok() || std::env::var("TMDB_API_KEY").is_ok()
    }

    #[tokio::test]
    async fn test_info_success() {
        if env_overrides_set() {
            return;
        }
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/movie/603")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_body(MATRIX)
            .create_async()
            .await;

        let cmd = InfoCmd { id: "603".into() };
        let code = info_cmd(cmd, &config_for(&server), &json_output()).await;

        mock.assert_async().await;
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_info_not_found_exit_code() {
        if env_overrides_set() {
            return;
        }
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/1")
            .with_status(404)
            .create_async()
            .await;

        let cmd = InfoCmd { id: "1".into() };
        let code = info_cmd(cmd, &config_for(&server), &json_output()).await;

        assert_eq!(code, ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_info_server_error_is_network_error() {
        if env_overrides_set() {
            return;
        }
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/1")
            .with_status(500)
            .create_async()
            .await;

        let cmd = InfoCmd { id: "1".into() };
        let code = info_cmd(cmd, &config_for(&server), &json_output()).await;

        assert_eq!(code, ExitCode::NetworkError);
    }

    #[tokio::test]
    async fn test_info_without_api_key() {
        if env_overrides_set() {
            return;
        }
        let cmd = InfoCmd { id: "603".into() };
        let code = info_cmd(cmd, &Config::default(), &json_output()).await;

        assert_eq!(code, ExitCode::ConfigError);
    }

    #[tokio::test]
    async fn test_poster_with_size() {
        if env_overrides_set() {
            return;
        }
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/movie/603")
            .with_status(200)
            .with_body(MATRIX)
            .create_async()
            .await;

        let cmd = PosterCmd {
            id: "603".into(),
            size: Some("original".into()),
        };
        let code = poster_cmd(cmd, &config_for(&server), &json_output()).await;

        assert_eq!(code, ExitCode::Success);
    }
}

// =============================================================================
// Output Format Tests
// =============================================================================

mod output_format {
    use cinefetch::cli::{ExitCode, JsonOutput, PosterResponse};
    use cinefetch::commands::MovieInfo;
    use cinefetch::models::MovieRecord;

    #[test]
    fn test_poster_response_json() {
        let out = JsonOutput::success(PosterResponse {
            id: "603".into(),
            url: Some("https://image.tmdb.org/t/p/w500/x.jpg".into()),
        });
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], "603");
        assert_eq!(json["data"]["url"], "https://image.tmdb.org/t/p/w500/x.jpg");
        assert!(json.get("error").is_none());
        assert!(json.get("exit_code").is_none());
    }

    #[test]
    fn test_movie_info_flattens_record() {
        let info = MovieInfo {
            movie: MovieRecord {
                id: Some(603),
                title: Some("The Matrix".into()),
                ..Default::default()
            },
            poster_url: None,
        };
        let json = serde_json::to_value(JsonOutput::success(info)).unwrap();

        assert_eq!(json["data"]["id"], 603);
        assert_eq!(json["data"]["title"], "The Matrix");
        assert!(json["data"]["poster_url"].is_null());
    }

    #[test]
    fn test_error_envelope() {
        let json =
            serde_json::to_value(JsonOutput::error_msg("Not found", ExitCode::NotFound)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Not found");
        assert_eq!(json["exit_code"], 4);
        assert!(json.get("data").is_none());
    }
}
