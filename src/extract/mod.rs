//! Extract module - Default-exported symbol maps from source text
//!
//! Provides:
//! - lexer: JS/TS tokenizer aware of strings, templates, comments and regexes
//! - locate: finding the default-exported object literal
//! - literal: parsing the literal as data, without evaluating it

pub mod lexer;
pub mod literal;
pub mod locate;

use log::debug;

use crate::core::error::{LiteralError, PreviewError};
use crate::core::model::SymbolMap;
use literal::Value;
use locate::{locate, LocateStrategy};

/// Locate and parse the default-exported symbol map in `source`
pub fn extract_symbol_map(
    source: &str,
    strategy: LocateStrategy,
) -> Result<SymbolMap, PreviewError> {
    let located = locate(source, strategy)?.ok_or(PreviewError::Extraction)?;
    debug!(
        "located default export at bytes {}..{} ({:?})",
        located.start, located.end, strategy
    );

    let value = literal::parse_range(source, located.start, located.end)?;
    let map = into_symbol_map(value)?;
    debug!("extracted {} symbol(s)", map.len());

    Ok(map)
}

/// Accept only an object whose values are all strings
pub fn into_symbol_map(value: Value) -> Result<SymbolMap, LiteralError> {
    let Value::Object(members) = value else {
        return Err(LiteralError::NotAnObject);
    };

    let mut map = SymbolMap::new();
    for (key, value) in members {
        match value {
            Value::Str(url) => {
                if map.insert(key.as_str(), url).is_some() {
                    debug!("duplicate key `{}`: last value wins", key);
                }
            }
            other => {
                debug!("`{}` holds a {}", key, other.type_name());
                return Err(LiteralError::NonStringValue { key });
            }
        }
    }

    Ok(map)
}
