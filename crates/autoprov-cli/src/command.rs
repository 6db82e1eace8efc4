//! Parsing of session input lines.

use autoprov_core::FieldChange;

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Current step and displayed violations.
    Status,
    /// Every step with its pass/fail mark.
    Steps,
    /// Preview of the print document.
    Show,
    /// The raw draft as JSON.
    Json,
    Set(FieldChange),
    Next,
    Back,
    Jump(usize),
    Reset,
    Generate,
    /// Print the document, or write it into the given directory.
    Export(Option<String>),
    DamageAdd { panel: String, view: String, kind: String },
    DamageRemove(String),
    Quit,
}

pub const HELP: &str = "\
Commands:
  status                          current step and anything blocking it
  steps                           all steps with a pass/fail mark
  show                            preview the printable document
  json                            dump the draft as JSON
  set <section>.<field> [value]   edit a field (blank value clears it)
  next | back | jump <n>          move between steps
  reset                           start a new case
  generate                        draft the dispute response (dispute only)
  damage add <panel> <view> <type>
  damage remove <id>              edit damage records (pdi only)
  export [dir]                    print the document, or save it into dir
  help | quit";

/// Parse one input line. Blank lines parse to `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let cmd = match word {
        "help" | "?" => Command::Help,
        "status" => Command::Status,
        "steps" => Command::Steps,
        "show" => Command::Show,
        "json" => Command::Json,
        "next" => Command::Next,
        "back" => Command::Back,
        "reset" => Command::Reset,
        "generate" => Command::Generate,
        "quit" | "exit" => Command::Quit,
        "jump" => {
            let n = rest
                .parse::<usize>()
                .map_err(|_| format!("jump expects a step number, got '{rest}'"))?;
            Command::Jump(n)
        }
        "export" => Command::Export((!rest.is_empty()).then(|| rest.to_string())),
        "set" => {
            let (path, value) = split_word(rest);
            let change = FieldChange::from_path(path, value)
                .ok_or_else(|| format!("set expects <section>.<field>, got '{path}'"))?;
            Command::Set(change)
        }
        "damage" => parse_damage(rest)?,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(cmd))
}

fn parse_damage(rest: &str) -> Result<Command, String> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    match args.as_slice() {
        ["add", panel, view, kind] => Ok(Command::DamageAdd {
            panel: panel.to_string(),
            view: view.to_string(),
            kind: kind.to_string(),
        }),
        ["remove", id] => Ok(Command::DamageRemove(id.to_string())),
        _ => Err("usage: damage add <panel> <view> <type> | damage remove <id>".into()),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoprov_core::FieldValue;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("# walk step one"), Ok(None));
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        let cmd = parse("set saleOverview.vehicleRegistration  AB12 CDE ").unwrap();
        let Some(Command::Set(change)) = cmd else {
            panic!("expected set, got {cmd:?}");
        };
        assert_eq!(change.section, "saleOverview");
        assert_eq!(change.field, "vehicleRegistration");
        assert_eq!(change.value, FieldValue::Text("AB12 CDE".into()));
    }

    #[test]
    fn set_without_value_clears() {
        let Ok(Some(Command::Set(change))) = parse("set dealer.email") else {
            panic!("expected set");
        };
        assert_eq!(change.value, FieldValue::Text(String::new()));
    }

    #[test]
    fn set_requires_dotted_path() {
        assert!(parse("set email x").is_err());
        assert!(parse("set .email x").is_err());
    }

    #[test]
    fn jump_needs_a_number() {
        assert_eq!(parse("jump 4"), Ok(Some(Command::Jump(4))));
        assert!(parse("jump four").is_err());
    }

    #[test]
    fn export_with_and_without_dir() {
        assert_eq!(parse("export"), Ok(Some(Command::Export(None))));
        assert_eq!(
            parse("export out/packs"),
            Ok(Some(Command::Export(Some("out/packs".into()))))
        );
    }

    #[test]
    fn damage_subcommands() {
        assert_eq!(
            parse("damage add Bonnet front scratch"),
            Ok(Some(Command::DamageAdd {
                panel: "Bonnet".into(),
                view: "front".into(),
                kind: "scratch".into(),
            }))
        );
        assert_eq!(
            parse("damage remove abc"),
            Ok(Some(Command::DamageRemove("abc".into())))
        );
        assert!(parse("damage add Bonnet").is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse("frobnicate").unwrap_err().contains("frobnicate"));
    }
}
