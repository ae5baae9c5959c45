//! `type/subtype` media types as used for content negotiation.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::MediaTypeError;

const WILDCARD: &str = "*";

/// A parsed media type such as `application/x-rust-serialized-object`.
///
/// Type, subtype and parameter names are stored lower-cased; parameter values keep their case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
  main_type: String,
  sub_type: String,
  parameters: BTreeMap<String, String>,
}

impl MediaType {
  pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
    Self {
      main_type: main_type.into().to_ascii_lowercase(),
      sub_type: sub_type.into().to_ascii_lowercase(),
      parameters: BTreeMap::new(),
    }
  }

  /// The media type owned by the object body codec.
  pub fn serialized_object() -> Self {
    Self::new("application", "x-rust-serialized-object")
  }

  /// `*/*`
  pub fn all() -> Self {
    Self::new(WILDCARD, WILDCARD)
  }

  pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.parameters.insert(name.into().to_ascii_lowercase(), value.into());
    self
  }

  pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
    let mut parts = split_parameters(value)?.into_iter();
    let full_type = parts.next().map(str::trim).unwrap_or_default();
    if full_type.is_empty() {
      return Err(MediaTypeError::invalid(value, "media type must not be empty"));
    }
    let (main_type, sub_type) = if full_type == WILDCARD {
      (WILDCARD, WILDCARD)
    } else {
      full_type
        .split_once('/')
        .ok_or_else(|| MediaTypeError::invalid(value, "does not contain '/'"))?
    };
    let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
    if main_type.is_empty() {
      return Err(MediaTypeError::invalid(value, "does not contain a type"));
    }
    if sub_type.is_empty() {
      return Err(MediaTypeError::invalid(value, "does not contain a subtype"));
    }
    if sub_type.contains('/') {
      return Err(MediaTypeError::invalid(value, "contains more than one '/'"));
    }
    if main_type == WILDCARD && sub_type != WILDCARD {
      return Err(MediaTypeError::invalid(value, "wildcard type is legal only in '*/*'"));
    }

    let mut media_type = MediaType::new(main_type, sub_type);
    for parameter in parts.map(str::trim).filter(|p| !p.is_empty()) {
      let (name, raw_value) = parameter
        .split_once('=')
        .ok_or_else(|| MediaTypeError::invalid(value, "parameter does not contain '='"))?;
      let name = name.trim();
      if name.is_empty() {
        return Err(MediaTypeError::invalid(value, "parameter name must not be empty"));
      }
      media_type = media_type.with_parameter(name, unquote(raw_value.trim()));
    }
    Ok(media_type)
  }

  pub fn main_type(&self) -> &str {
    &self.main_type
  }

  pub fn sub_type(&self) -> &str {
    &self.sub_type
  }

  pub fn parameter(&self, name: &str) -> Option<&str> {
    self.parameters.get(&name.to_ascii_lowercase()).map(String::as_str)
  }

  pub fn is_wildcard_type(&self) -> bool {
    self.main_type == WILDCARD
  }

  /// True for `*` and `*+suffix` subtypes.
  pub fn is_wildcard_sub_type(&self) -> bool {
    self.sub_type == WILDCARD || self.sub_type.starts_with("*+")
  }

  /// True when neither the type nor the subtype is a wildcard.
  pub fn is_concrete(&self) -> bool {
    !self.is_wildcard_type() && !self.is_wildcard_sub_type()
  }

  fn suffix(&self) -> Option<&str> {
    self.sub_type.rsplit_once('+').map(|(_, suffix)| suffix)
  }

  /// Indicates whether this media type includes `other`.
  ///
  /// `*/*` includes every media type, `text/*` includes `text/plain`, and
  /// `application/*+xml` includes `application/soap+xml`. Inclusion is not symmetric.
  pub fn includes(&self, other: &MediaType) -> bool {
    if self.is_wildcard_type() {
      return true;
    }
    if self.main_type != other.main_type {
      return false;
    }
    if self.sub_type == other.sub_type || self.sub_type == WILDCARD {
      return true;
    }
    if self.is_wildcard_sub_type() {
      // *+suffix
      if let Some(suffix) = self.suffix() {
        return other.sub_type == suffix || other.suffix() == Some(suffix);
      }
    }
    false
  }

  /// Symmetric variant of [`MediaType::includes`].
  pub fn is_compatible_with(&self, other: &MediaType) -> bool {
    self.includes(other) || other.includes(self)
  }
}

/// Splits on `;` outside of quoted strings.
fn split_parameters(value: &str) -> Result<Vec<&str>, MediaTypeError> {
  let mut parts = Vec::new();
  let mut start = 0;
  let mut quoted = false;
  let mut escaped = false;
  for (i, c) in value.char_indices() {
    if escaped {
      escaped = false;
      continue;
    }
    match c {
      '\\' if quoted => escaped = true,
      '"' => quoted = !quoted,
      ';' if !quoted => {
        parts.push(&value[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  if quoted {
    return Err(MediaTypeError::invalid(value, "unterminated quoted string"));
  }
  parts.push(&value[start..]);
  Ok(parts)
}

fn unquote(value: &str) -> String {
  if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
    let mut unquoted = String::with_capacity(value.len() - 2);
    let mut chars = value[1..value.len() - 1].chars();
    while let Some(c) = chars.next() {
      match c {
        '\\' => unquoted.extend(chars.next()),
        c => unquoted.push(c),
      }
    }
    unquoted
  } else {
    value.to_string()
  }
}

const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

fn needs_quoting(value: &str) -> bool {
  value.is_empty()
    || value
      .chars()
      .any(|c| c.is_ascii_whitespace() || c.is_ascii_control() || TSPECIALS.contains(c))
}

impl FromStr for MediaType {
  type Err = MediaTypeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    MediaType::parse(s)
  }
}

impl Display for MediaType {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.main_type, self.sub_type)?;
    for (name, value) in &self.parameters {
      if needs_quoting(value) {
        write!(f, ";{}=\"", name)?;
        for c in value.chars() {
          if c == '"' || c == '\\' {
            f.write_str("\\")?;
          }
          write!(f, "{}", c)?;
        }
        f.write_str("\"")?;
      } else {
        write!(f, ";{}={}", name, value)?;
      }
    }
    Ok(())
  }
}
