use crate::commands::value::Value;

pub type ArgumentParseResult<'a> = Result<(Value, &'a str), ()>;

/// Minecraft usernames are 1 to 16 characters of `[A-Za-z0-9_]`.
const MAX_USERNAME_LEN: usize = 16;

fn skip_whitespace(input: &str) -> &str {
    input.trim_start()
}

pub fn consume_token(input: &str) -> Option<(&str, &str)> {
    let input = skip_whitespace(input);
    if input.is_empty() {
        return None;
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());

    Some((&input[..end], &input[end..]))
}

pub fn parse_greedy_string(input: &str) -> ArgumentParseResult<'_> {
    let input = skip_whitespace(input);
    Ok((Value::GreedyString(input.trim_end().to_string()), ""))
}

pub fn parse_player(input: &str) -> ArgumentParseResult<'_> {
    let (token, rest) = consume_token(input).ok_or(())?;

    let valid = token.len() <= MAX_USERNAME_LEN
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(());
    }

    Ok((Value::Player(token.to_string()), rest))
}
