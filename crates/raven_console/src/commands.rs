/// Console commands, parsed from `:command <rest-of-line-as-single-argument>`
/// lines. Anything not starting with `:` is a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Save,
    Load,
    Use { name: Option<String> },
    ReadFile { target: String },
    WriteFile { dest: String },
    Ask,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    Empty,
    Command(Command),
    Usage(&'static str),
    Unknown(String),
    Chat(String),
}

pub fn parse_input(line: &str) -> ParsedInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ParsedInput::Empty;
    }

    if !trimmed.starts_with(':') {
        return ParsedInput::Chat(trimmed.to_string());
    }

    let (name, argument) = split_command(trimmed);
    match name {
        ":new" => ParsedInput::Command(Command::New),
        ":save" => ParsedInput::Command(Command::Save),
        ":load" => ParsedInput::Command(Command::Load),
        ":ask" => ParsedInput::Command(Command::Ask),
        ":help" => ParsedInput::Command(Command::Help),
        ":exit" => ParsedInput::Command(Command::Exit),
        ":use" => ParsedInput::Command(Command::Use {
            name: argument.map(str::to_string),
        }),
        ":read_file" => match argument {
            Some(target) => ParsedInput::Command(Command::ReadFile {
                target: target.to_string(),
            }),
            None => ParsedInput::Usage("[ERROR] usage: :read_file <relative_path_or_dir>"),
        },
        ":write_file" => match argument {
            Some(dest) => ParsedInput::Command(Command::WriteFile {
                dest: dest.to_string(),
            }),
            None => ParsedInput::Usage("[ERROR] usage: :write_file <relative_path>"),
        },
        unknown => ParsedInput::Unknown(unknown.to_string()),
    }
}

/// Splits off the command name; everything after the first whitespace run is
/// one argument, trimmed.
fn split_command(line: &str) -> (&str, Option<&str>) {
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let rest = rest.trim();
            (name, (!rest.is_empty()).then_some(rest))
        }
        None => (line, None),
    }
}
