use super::*;

#[test]
fn parse_login_keeps_password_intact() {
    assert_eq!(
        parse_line("login ana@example.com  hunter 2 "),
        ShellCommand::Login { email: "ana@example.com".into(), password: "hunter 2".into() }
    );
}

#[test]
fn parse_login_requires_both_arguments() {
    assert!(matches!(parse_line("login ana@example.com"), ShellCommand::Invalid(_)));
    assert!(matches!(parse_line("login"), ShellCommand::Invalid(_)));
}

#[test]
fn parse_simple_commands() {
    assert_eq!(parse_line("  "), ShellCommand::Empty);
    assert_eq!(parse_line("logout"), ShellCommand::Logout);
    assert_eq!(parse_line("check"), ShellCommand::Check);
    assert_eq!(parse_line("whoami"), ShellCommand::Whoami);
    assert_eq!(parse_line("hint"), ShellCommand::Hint);
    assert_eq!(parse_line("exit"), ShellCommand::Quit);
    assert_eq!(parse_line("?"), ShellCommand::Help);
}

#[test]
fn parse_argument_commands() {
    assert_eq!(parse_line("go /admin/products"), ShellCommand::Go("/admin/products".into()));
    assert_eq!(parse_line("list commission-payouts"), ShellCommand::List("commission-payouts".into()));
    assert_eq!(parse_line("chat do you sell solar?"), ShellCommand::Chat("do you sell solar?".into()));
    assert!(matches!(parse_line("go"), ShellCommand::Invalid(_)));
    assert!(matches!(parse_line("list"), ShellCommand::Invalid(_)));
}

#[test]
fn parse_unknown_command() {
    let ShellCommand::Invalid(message) = parse_line("dance") else {
        panic!("expected invalid command");
    };
    assert!(message.contains("dance"));
}
