//! Option-token resolution shared by the usage-pattern parser and the argv
//! tokenizer.
//!
//! Both `--long[=value]` and stacked `-abc` tokens are resolved against the
//! [`OptionRegistry`]. Options the registry has never seen are registered
//! on the fly, so that an option mentioned only in a usage pattern is still
//! recognized in argv.

use crate::{Leaf, OptionError, OptionRegistry, OptionSpec, TokenContext, TokenStream, Value};

/// Consumes one `--long` or `--long=value` token (plus a separate argument
/// token if the option needs one).
///
/// In [`TokenContext::Argv`] the returned leaf carries the bound value
/// (`true` for flags, the argument string otherwise) and an unambiguous
/// prefix is accepted in place of the full name. In
/// [`TokenContext::Pattern`] the registry template is returned unchanged.
///
/// # Errors
///
/// [`OptionError::NotUniquePrefix`], [`OptionError::UnexpectedArgument`] or
/// [`OptionError::MissingArgument`].
pub fn parse_long(
    tokens: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Leaf, OptionError> {
    let context = tokens.context();
    let token = tokens.advance().unwrap_or_default();
    let (long, mut value) = match token.split_once('=') {
        Some((long, value)) => (long.to_string(), Some(value.to_string())),
        None => (token, None),
    };

    let mut similar = registry.by_long(&long);
    if context == TokenContext::Argv && similar.is_empty() {
        similar = registry.by_long_prefix(&long);
    }

    if similar.len() > 1 {
        let candidates = similar
            .iter()
            .filter_map(|leaf| leaf.option_spec().and_then(|spec| spec.long.clone()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(OptionError::NotUniquePrefix {
            prefix: long,
            candidates,
        });
    }

    let Some(template) = similar.first().map(|leaf| (*leaf).clone()) else {
        let argcount = u8::from(value.is_some());
        let template = Leaf::option_default(OptionSpec::new(None, Some(&long), argcount));
        registry.register(template.clone());
        return Ok(match context {
            TokenContext::Pattern => template,
            TokenContext::Argv => {
                let bound = match value {
                    Some(value) => Value::Str(value),
                    None => Value::Bool(true),
                };
                Leaf::option(OptionSpec::new(None, Some(&long), argcount), bound)
            }
        });
    };

    let spec = template
        .option_spec()
        .cloned()
        .unwrap_or_else(|| OptionSpec::new(None, Some(&long), 0));
    if spec.takes_argument() {
        if value.is_none() {
            if tokens.at_argument_boundary() {
                return Err(OptionError::MissingArgument(spec.name().to_string()));
            }
            value = tokens.advance();
        }
    } else if value.is_some() {
        return Err(OptionError::UnexpectedArgument(spec.name().to_string()));
    }

    Ok(match context {
        TokenContext::Pattern => template,
        TokenContext::Argv => Leaf::option(spec, value.map_or(Value::Bool(true), Value::Str)),
    })
}

/// Consumes one stacked short-option token such as `-vvo file` or `-ofile`.
///
/// Each character becomes its own option leaf. The first character that
/// names an option taking an argument swallows the rest of the stack, or
/// the next token when the stack is exhausted.
///
/// # Errors
///
/// [`OptionError::AmbiguousShort`] or [`OptionError::MissingArgument`].
pub fn parse_shorts(
    tokens: &mut TokenStream,
    registry: &mut OptionRegistry,
) -> Result<Vec<Leaf>, OptionError> {
    let context = tokens.context();
    let token = tokens.advance().unwrap_or_default();
    let stack = token.trim_start_matches('-');
    let mut parsed = Vec::new();

    for (index, ch) in stack.char_indices() {
        let short = format!("-{ch}");
        let similar = registry.by_short(&short);

        if similar.len() > 1 {
            return Err(OptionError::AmbiguousShort {
                count: similar.len(),
                short,
            });
        }

        let Some(template) = similar.first().map(|leaf| (*leaf).clone()) else {
            let template = Leaf::option_default(OptionSpec::new(Some(&short), None, 0));
            registry.register(template.clone());
            parsed.push(match context {
                TokenContext::Pattern => template,
                TokenContext::Argv => {
                    Leaf::option(OptionSpec::new(Some(&short), None, 0), Value::Bool(true))
                }
            });
            continue;
        };

        let spec = template
            .option_spec()
            .cloned()
            .unwrap_or_else(|| OptionSpec::new(Some(&short), None, 0));
        let mut value = None;
        let mut stack_consumed = false;
        if spec.takes_argument() {
            let rest = &stack[index + ch.len_utf8()..];
            if rest.is_empty() {
                if tokens.at_argument_boundary() {
                    return Err(OptionError::MissingArgument(short));
                }
                value = tokens.advance();
            } else {
                value = Some(rest.to_string());
                stack_consumed = true;
            }
        }

        parsed.push(match context {
            TokenContext::Pattern => template,
            TokenContext::Argv => Leaf::option(spec, value.map_or(Value::Bool(true), Value::Str)),
        });

        if stack_consumed {
            break;
        }
    }

    Ok(parsed)
}
