//! Selector grammar: `@` KIND [ `[` KEY `=` VALUE (`,` KEY `=` VALUE)* `]` ]

use super::{Negatable, Selector, SelectorArguments, SelectorKind, SortMode};
use crate::entity::EntityType;
use crate::error::SelectorError;

pub(super) fn parse(input: &str) -> Result<Selector, SelectorError> {
    let rest = input.strip_prefix('@').ok_or(SelectorError::MissingPrefix)?;

    let mut chars = rest.chars();
    let symbol = chars.next().ok_or(SelectorError::MissingType)?;
    let kind = SelectorKind::from_symbol(symbol).ok_or(SelectorError::UnknownType(symbol))?;
    let rest = chars.as_str();

    let mut arguments = SelectorArguments::default();

    if !rest.is_empty() {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| SelectorError::TrailingInput(rest.to_string()))?;
        let close = find_unquoted(body, ']').ok_or(SelectorError::UnterminatedArguments)?;

        let trailing = &body[close + 1..];
        if !trailing.is_empty() {
            return Err(SelectorError::TrailingInput(trailing.to_string()));
        }

        let body = &body[..close];
        if !body.trim().is_empty() {
            for part in split_unquoted(body, ',') {
                apply_argument(&mut arguments, part.trim())?;
            }
        }
    }

    if let (Some(min), Some(max)) = (arguments.radius_min, arguments.radius_max) {
        if min > max {
            return Err(SelectorError::InvertedRadius { min, max });
        }
    }

    Ok(Selector {
        kind,
        arguments,
        raw: input.to_string(),
    })
}

fn apply_argument(args: &mut SelectorArguments, part: &str) -> Result<(), SelectorError> {
    let (key, value) = part
        .split_once('=')
        .ok_or_else(|| SelectorError::MalformedArgument(part.to_string()))?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() {
        return Err(SelectorError::EmptyKey);
    }

    match key {
        "x" => set_number(&mut args.x, key, value),
        "y" => set_number(&mut args.y, key, value),
        "z" => set_number(&mut args.z, key, value),
        "r" => set_number(&mut args.radius_max, key, value),
        "rm" => set_number(&mut args.radius_min, key, value),
        "dx" => set_number(&mut args.dx, key, value),
        "dy" => set_number(&mut args.dy, key, value),
        "dz" => set_number(&mut args.dz, key, value),
        "type" => {
            if args.entity_type.is_some() {
                return Err(SelectorError::DuplicateArgument(key.to_string()));
            }
            let (negated, id) = split_negation(value);
            let entity_type = id
                .parse::<EntityType>()
                .map_err(|_| SelectorError::UnknownEntityType(id.to_string()))?;
            args.entity_type = Some(Negatable::new(entity_type, negated));
            Ok(())
        }
        "name" => {
            if args.name.is_some() {
                return Err(SelectorError::DuplicateArgument(key.to_string()));
            }
            let (negated, name) = split_negation(value);
            args.name = Some(Negatable::new(unquote(name).to_string(), negated));
            Ok(())
        }
        "tag" => {
            let (negated, tag) = split_negation(value);
            args.tags.push(Negatable::new(unquote(tag).to_string(), negated));
            Ok(())
        }
        "limit" | "c" => {
            if args.limit.is_some() {
                return Err(SelectorError::DuplicateArgument("limit".to_string()));
            }
            let count: i64 = value.parse().map_err(|_| invalid_number(key, value))?;
            if count == 0 {
                return Err(SelectorError::ZeroLimit);
            }
            if count < 0 {
                // Only the legacy `c` form counts from the far end.
                if key == "limit" {
                    return Err(invalid_number(key, value));
                }
                args.count_from_furthest = true;
            }
            let limit = usize::try_from(count.unsigned_abs())
                .map_err(|_| invalid_number(key, value))?;
            args.limit = Some(limit);
            Ok(())
        }
        "sort" => {
            if args.sort.is_some() {
                return Err(SelectorError::DuplicateArgument(key.to_string()));
            }
            let sort = value
                .parse::<SortMode>()
                .map_err(|_| SelectorError::UnknownSort(value.to_string()))?;
            args.sort = Some(sort);
            Ok(())
        }
        other => Err(SelectorError::UnknownArgument(other.to_string())),
    }
}

fn set_number(slot: &mut Option<f64>, key: &str, value: &str) -> Result<(), SelectorError> {
    if slot.is_some() {
        return Err(SelectorError::DuplicateArgument(key.to_string()));
    }
    let number: f64 = value.parse().map_err(|_| invalid_number(key, value))?;
    if !number.is_finite() {
        return Err(invalid_number(key, value));
    }
    *slot = Some(number);
    Ok(())
}

fn invalid_number(key: &str, value: &str) -> SelectorError {
    SelectorError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn split_negation(value: &str) -> (bool, &str) {
    match value.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, value),
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Byte index of the first `needle` that is not inside quotes.
fn find_unquoted(s: &str, needle: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == needle => return Some(i),
            None => {}
        }
    }
    None
}

fn split_unquoted(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(i) = find_unquoted(rest, separator) {
        parts.push(&rest[..i]);
        rest = &rest[i + separator.len_utf8()..];
    }
    parts.push(rest);
    parts
}
