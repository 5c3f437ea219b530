//! Input-line parser.
//!
//! A line starting with `/` is a command; anything else is a route to go to.

#[derive(Debug, PartialEq)]
pub enum ParsedInput {
    Route(String),
    Quit,
    Back,
    Reload,
    Search { keyword: String },
    Delete,
    Help,
    Unknown { name: String },
    Empty,
}

/// Parse one submitted input line. Command names are case-insensitive.
pub fn parse_input(input: &str) -> ParsedInput {
    let input = input.trim();
    if input.is_empty() {
        return ParsedInput::Empty;
    }
    let Some(command) = input.strip_prefix('/') else {
        return ParsedInput::Route(input.to_string());
    };

    let (name, rest) = match command.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name.to_lowercase().as_str() {
        "q" | "quit" | "exit" => ParsedInput::Quit,
        "back" | "b" => ParsedInput::Back,
        "reload" | "r" => ParsedInput::Reload,
        "search" | "s" | "find" => ParsedInput::Search {
            keyword: rest.to_string(),
        },
        "delete" | "del" | "rm" => ParsedInput::Delete,
        "help" | "h" | "?" => ParsedInput::Help,
        other => ParsedInput::Unknown {
            name: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_route() {
        assert_eq!(parse_input(" #/sales "), ParsedInput::Route("#/sales".into()));
        assert_eq!(parse_input("sales/detail/1"), ParsedInput::Route("sales/detail/1".into()));
        assert_eq!(parse_input("   "), ParsedInput::Empty);
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("/QUIT"), ParsedInput::Quit);
        assert_eq!(parse_input("/back"), ParsedInput::Back);
        assert_eq!(parse_input("/r"), ParsedInput::Reload);
        assert_eq!(parse_input("/help"), ParsedInput::Help);
        assert_eq!(parse_input("/Delete"), ParsedInput::Delete);
        assert_eq!(parse_input("/rm"), ParsedInput::Delete);
        assert_eq!(
            parse_input("/search  ana maria "),
            ParsedInput::Search { keyword: "ana maria".into() }
        );
        assert_eq!(parse_input("/search"), ParsedInput::Search { keyword: String::new() });
        assert_eq!(parse_input("/frob x"), ParsedInput::Unknown { name: "frob".into() });
    }
}
