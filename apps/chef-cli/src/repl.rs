/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything not starting with `/` is an ingredient list.
    Search(String),
    /// Zero-based index into the last results.
    Save(usize),
    Saved,
    Remove(String),
    Clear,
    Last,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
Type ingredients separated by commas to search, e.g. `egg, flour, sugar`.
  /save N      keep result N of the last search
  /saved       list kept recipes
  /remove ID   forget a kept recipe
  /clear       forget all kept recipes
  /last        show the last search results again
  /help        this text
  /quit        leave";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Search(line.to_string());
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("save", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Save(n - 1),
            _ => Command::Invalid(format!("not a result number: {n}")),
        },
        ("save", None) => Command::Invalid("usage: /save N".into()),
        ("saved", _) => Command::Saved,
        ("remove", Some(id)) => Command::Remove(id.to_string()),
        ("remove", None) => Command::Invalid("usage: /remove ID".into()),
        ("clear", _) => Command::Clear,
        ("last", _) => Command::Last,
        ("help", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        (other, _) => Command::Invalid(format!("unknown command /{other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(parse_command(" egg, flour "), Command::Search("egg, flour".into()));
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn save_is_one_based() {
        assert_eq!(parse_command("/save 1"), Command::Save(0));
        assert!(matches!(parse_command("/save 0"), Command::Invalid(_)));
        assert!(matches!(parse_command("/save x"), Command::Invalid(_)));
        assert!(matches!(parse_command("/save"), Command::Invalid(_)));
    }

    #[test]
    fn session_commands() {
        assert_eq!(parse_command("/remove 52772"), Command::Remove("52772".into()));
        assert_eq!(parse_command("/saved"), Command::Saved);
        assert_eq!(parse_command("/clear"), Command::Clear);
        assert_eq!(parse_command("/last"), Command::Last);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert!(matches!(parse_command("/fly"), Command::Invalid(_)));
    }
}
