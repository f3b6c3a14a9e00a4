//! Line-oriented configuration descriptors.
//!
//! A descriptor is a text file of option entries. Each entry is a line
//! `*option_name` followed by a value line:
//!
//! ```text
//! # frame range
//! *start_frame
//! 0
//! *end_frame
//! 10
//! *max_dt
//! 0.01f
//! ```
//!
//! Lines starting with `#` and blank lines are ignored anywhere. Any other
//! line outside an entry is an error.
//!
//! ## Validation policy
//!
//! Options are registered with a type before parsing, and every value is
//! validated strictly against it:
//!
//! - `Int`: the whole value must parse as a signed 64-bit integer.
//! - `Float` / `Double`: the whole value must parse as a finite float,
//!   after stripping one optional trailing `f` or `d` suffix.
//! - `Bool`: exactly one of `0`, `1`, `true`, `false`.
//! - `String`: the value line with surrounding whitespace trimmed.
//!
//! Unknown options are skipped, value included, with a warning. After the
//! last line every registered option must have been supplied. Any failure
//! is a [`StrataError::Configuration`] and leaves previously parsed values
//! untouched.

use std::path::Path;

use strata_types::{StrataError, StrataResult};

/// Declared type of a descriptor option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Int,
    Bool,
    Float,
    Double,
    String,
}

impl OptionType {
    fn name(self) -> &'static str {
        match self {
            OptionType::Int => "int",
            OptionType::Bool => "bool",
            OptionType::Float => "float",
            OptionType::Double => "double",
            OptionType::String => "string",
        }
    }
}

/// A parsed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Float(f32),
    Double(f64),
    String(String),
}

#[derive(Debug, Clone)]
struct OptionSlot {
    name: String,
    ty: OptionType,
    value: Option<OptionValue>,
}

/// Registry of typed options filled by parsing a descriptor.
#[derive(Debug, Clone, Default)]
pub struct ConfigDescriptor {
    options: Vec<OptionSlot>,
}

impl ConfigDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an option. Registering the same name twice is an error.
    pub fn add_option(&mut self, name: &str, ty: OptionType) -> StrataResult<()> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(StrataError::Configuration(format!(
                "Invalid option name '{}'",
                name
            )));
        }
        if self.find_option(name).is_some() {
            return Err(StrataError::Configuration(format!(
                "Option '{}' is already registered",
                name
            )));
        }
        self.options.push(OptionSlot {
            name: name.to_string(),
            ty,
            value: None,
        });
        Ok(())
    }

    fn find_option(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|o| o.name == name)
    }

    /// Number of registered options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates `(name, type, is_set)` in registration order.
    pub fn options(&self) -> impl Iterator<Item = (&str, OptionType, bool)> {
        self.options
            .iter()
            .map(|o| (o.name.as_str(), o.ty, o.value.is_some()))
    }

    /// Returns true once a value for `name` has been parsed.
    pub fn is_set(&self, name: &str) -> bool {
        self.find_option(name)
            .is_some_and(|i| self.options[i].value.is_some())
    }

    /// Parses the descriptor at `path`.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> StrataResult<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            StrataError::Configuration(format!(
                "Couldn't open config file {}: {}",
                path.display(),
                e
            ))
        })?;
        self.parse_str(&text)
            .map_err(|e| match e {
                StrataError::Configuration(msg) => {
                    StrataError::Configuration(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })
    }

    /// Parses descriptor text.
    pub fn parse_str(&mut self, text: &str) -> StrataResult<()> {
        let mut parsed: Vec<Option<OptionValue>> = vec![None; self.options.len()];
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        while let Some((line_no, line)) = lines.next() {
            let Some(name) = line.strip_prefix('*') else {
                return Err(StrataError::Configuration(format!(
                    "invalid line {}: '{}'",
                    line_no, line
                )));
            };
            let name = name.trim();
            let Some((value_line_no, value)) = lines.next() else {
                return Err(StrataError::Configuration(format!(
                    "end of input reached without a value for option '{}' (line {})",
                    name, line_no
                )));
            };

            let Some(index) = self.find_option(name) else {
                tracing::warn!(option = name, line = line_no, "Unknown descriptor option, skipped");
                continue;
            };
            let slot = &self.options[index];
            let value = parse_value(slot.ty, value).ok_or_else(|| {
                StrataError::Configuration(format!(
                    "invalid {} value for option '{}' on line {}: '{}'",
                    slot.ty.name(),
                    slot.name,
                    value_line_no,
                    value
                ))
            })?;
            parsed[index] = Some(value);
        }

        let missing: Vec<&str> = self
            .options
            .iter()
            .zip(&parsed)
            .filter(|(_, v)| v.is_none())
            .map(|(o, _)| o.name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(StrataError::Configuration(format!(
                "missing required option(s): {}",
                missing.join(", ")
            )));
        }

        for (slot, value) in self.options.iter_mut().zip(parsed) {
            slot.value = value;
        }
        Ok(())
    }

    /// Raw parsed value of `name`.
    pub fn value(&self, name: &str) -> StrataResult<&OptionValue> {
        let index = self.find_option(name).ok_or_else(|| {
            StrataError::Configuration(format!("Option '{}' is not registered", name))
        })?;
        self.options[index].value.as_ref().ok_or_else(|| {
            StrataError::Configuration(format!("Option '{}' has no value", name))
        })
    }

    pub fn get_int(&self, name: &str) -> StrataResult<i64> {
        match self.value(name)? {
            OptionValue::Int(v) => Ok(*v),
            other => Err(type_mismatch(name, "int", other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> StrataResult<bool> {
        match self.value(name)? {
            OptionValue::Bool(v) => Ok(*v),
            other => Err(type_mismatch(name, "bool", other)),
        }
    }

    pub fn get_float(&self, name: &str) -> StrataResult<f32> {
        match self.value(name)? {
            OptionValue::Float(v) => Ok(*v),
            other => Err(type_mismatch(name, "float", other)),
        }
    }

    pub fn get_double(&self, name: &str) -> StrataResult<f64> {
        match self.value(name)? {
            OptionValue::Double(v) => Ok(*v),
            other => Err(type_mismatch(name, "double", other)),
        }
    }

    pub fn get_string(&self, name: &str) -> StrataResult<&str> {
        match self.value(name)? {
            OptionValue::String(v) => Ok(v),
            other => Err(type_mismatch(name, "string", other)),
        }
    }
}

fn type_mismatch(name: &str, wanted: &str, found: &OptionValue) -> StrataError {
    StrataError::Configuration(format!(
        "Option '{}' requested as {}, holds {:?}",
        name, wanted, found
    ))
}

fn parse_value(ty: OptionType, raw: &str) -> Option<OptionValue> {
    match ty {
        OptionType::Int => raw.parse().ok().map(OptionValue::Int),
        OptionType::Bool => match raw {
            "1" | "true" => Some(OptionValue::Bool(true)),
            "0" | "false" => Some(OptionValue::Bool(false)),
            _ => None,
        },
        OptionType::Float => strip_float_suffix(raw)
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(OptionValue::Float),
        OptionType::Double => strip_float_suffix(raw)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(OptionValue::Double),
        OptionType::String => Some(OptionValue::String(raw.to_string())),
    }
}

fn strip_float_suffix(raw: &str) -> &str {
    raw.strip_suffix(&['f', 'd'][..]).unwrap_or(raw)
}
