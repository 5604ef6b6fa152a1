use clap::Parser;

use crate::commands::{Cli, Command, KindArg, Parsed, QuizCommand, parse_line, split_line};

fn command(line: &str) -> Command {
    match parse_line(line) {
        Parsed::Command(command) => command,
        other => panic!("expected a command for {line:?}, got {other:?}"),
    }
}

#[test]
fn split_honours_quotes_and_escapes() {
    let words = split_line(r#"suggest-word "tętnica szyjna" 'it''s fine' a\ b """#).unwrap();
    assert_eq!(words, ["suggest-word", "tętnica szyjna", "its fine", "a b", ""]);
}

#[test]
fn split_keeps_backslashes_inside_single_quotes() {
    assert_eq!(split_line(r"'a\b'").unwrap(), [r"a\b"]);
}

#[test]
fn split_rejects_open_quotes() {
    assert!(split_line("login \"ola").is_err());
    assert!(split_line("login ola\\").is_err());
}

#[test]
fn blank_lines_are_ignored() {
    assert!(matches!(parse_line("   "), Parsed::Empty));
}

#[test]
fn login_line_parses() {
    assert_eq!(
        command("login ola secret1"),
        Command::Login {
            username: "ola".to_string(),
            password: "secret1".to_string(),
        }
    );
}

#[test]
fn translations_are_language_pairs() {
    let Command::AddWord { translations, .. } = command(
        "add-word heart 'muscular organ pumping blood' cardiology --translation pl=serce --translation es=corazón",
    ) else {
        panic!("expected add-word");
    };
    assert_eq!(
        translations,
        [
            ("pl".to_string(), "serce".to_string()),
            ("es".to_string(), "corazón".to_string()),
        ]
    );
}

#[test]
fn moderation_kinds_accept_aliases() {
    assert_eq!(
        command("approve vocabulary 12"),
        Command::Approve {
            kind: KindArg::Existing,
            id: "12".to_string(),
        }
    );
    assert_eq!(
        command("reject new 7"),
        Command::Reject {
            kind: KindArg::NewWord,
            id: "7".to_string(),
        }
    );
}

#[test]
fn quiz_subcommands_parse() {
    assert_eq!(
        command("quiz answer 2"),
        Command::Quiz(QuizCommand::Answer {
            choice: "2".to_string(),
        })
    );
    assert_eq!(command("quiz next"), Command::Quiz(QuizCommand::Next));
}

#[test]
fn graph_points_allow_negative_values() {
    let Command::Graph { pan, click, zoom, .. } =
        command("graph cardiology --pan -20,15 --click 300,-40.5 --zoom 2")
    else {
        panic!("expected graph");
    };
    assert_eq!(pan, Some((-20.0, 15.0)));
    assert_eq!(click, Some((300.0, -40.5)));
    assert_eq!(zoom, Some(2.0));
}

#[test]
fn exit_is_an_alias_for_quit() {
    assert_eq!(command("exit"), Command::Quit);
}

#[test]
fn unknown_commands_come_back_as_messages() {
    assert!(matches!(parse_line("fly away"), Parsed::Message(_)));
    assert!(matches!(parse_line("save"), Parsed::Message(_)));
    assert!(matches!(parse_line("help"), Parsed::Message(ref m) if m.contains("login")));
}

#[test]
fn cli_takes_global_options_and_an_optional_command() {
    let cli = Cli::try_parse_from(["lexicon", "--api-url", "http://localhost:9000", "words"]).unwrap();
    assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
    assert_eq!(cli.command, Some(Command::Words { category: None }));

    let cli = Cli::try_parse_from(["lexicon"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn register_defaults_to_interpreter() {
    let Command::Register { role, .. } = command("register ola ola@clinic.pl secret1") else {
        panic!("expected register");
    };
    assert_eq!(role, lexicon_types::Role::Interpreter);
}
