use crate::error::RedirectionError;

/// The standard-output redirection operator.
pub const REDIRECT_OPERATOR: &str = ">";

/// An external command line split into the command itself and the optional
/// file its standard output goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectedCommand {
    pub argv: Vec<String>,
    pub target: Option<String>,
}

/// Validates the use of `>` in `tokens` and separates the redirection target.
///
/// At most one operator is accepted; it must be preceded by at least one token
/// and followed by exactly one.
pub fn parse_redirection(tokens: &[String]) -> Result<RedirectedCommand, RedirectionError> {
    let mut positions = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.as_str() == REDIRECT_OPERATOR)
        .map(|(i, _)| i);

    let Some(at) = positions.next() else {
        return Ok(RedirectedCommand {
            argv: tokens.to_vec(),
            target: None,
        });
    };
    if positions.next().is_some() {
        return Err(RedirectionError::Multiple);
    }

    match &tokens[at + 1..] {
        [] => Err(RedirectionError::MissingTarget),
        [_, _, ..] => Err(RedirectionError::TooManyTargets),
        [_] if at == 0 => Err(RedirectionError::MissingCommand),
        [target] => Ok(RedirectedCommand {
            argv: tokens[..at].to_vec(),
            target: Some(target.clone()),
        }),
    }
}
