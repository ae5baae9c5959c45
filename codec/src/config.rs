use crate::config_option::ConfigOption;
use crate::error::ConfigError;
use crate::media_type::MediaType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
  media_type: MediaType,
  write_content_length: bool,
}

impl Default for CodecConfig {
  fn default() -> Self {
    Self {
      media_type: MediaType::serialized_object(),
      write_content_length: true,
    }
  }
}

impl CodecConfig {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Result<CodecConfig, ConfigError> {
    let mut config = CodecConfig::default();
    for option in options {
      option.apply(&mut config)?;
    }
    Ok(config)
  }

  pub fn get_media_type(&self) -> &MediaType {
    &self.media_type
  }

  /// Fails for `*/*`, `type/*` and `type/*+suffix`.
  pub fn set_media_type(&mut self, media_type: MediaType) -> Result<(), ConfigError> {
    if !media_type.is_concrete() {
      return Err(ConfigError::NonConcreteMediaType(media_type));
    }
    self.media_type = media_type;
    Ok(())
  }

  /// Whether `write` sets `Content-Length` when the output message has none.
  pub fn is_write_content_length(&self) -> bool {
    self.write_content_length
  }

  pub fn set_write_content_length(&mut self, write_content_length: bool) {
    self.write_content_length = write_content_length;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[test]
  fn test_default_config() {
    let config = CodecConfig::default();
    assert_eq!(config.get_media_type().to_string(), "application/x-rust-serialized-object");
    assert!(config.is_write_content_length());
  }

  #[test]
  fn test_options_are_applied_in_order() {
    let config = CodecConfig::from([
      ConfigOption::with_media_type(MediaType::new("application", "x-first")),
      ConfigOption::with_write_content_length(false),
      ConfigOption::with_media_type(MediaType::new("application", "x-second")),
    ])
    .expect("config");
    assert_eq!(config.get_media_type(), &MediaType::new("application", "x-second"));
    assert!(!config.is_write_content_length());
  }

  #[rstest]
  #[case("*/*")]
  #[case("application/*")]
  #[case("application/*+json")]
  fn test_rejects_wildcard_media_type(#[case] value: &str) {
    let media_type = MediaType::parse(value).expect("media type");
    let err = CodecConfig::from([ConfigOption::with_media_type(media_type.clone())]).expect_err("wildcard");
    assert_eq!(err, ConfigError::NonConcreteMediaType(media_type));

    let mut config = CodecConfig::default();
    assert!(config.set_media_type(MediaType::parse(value).expect("media type")).is_err());
    assert_eq!(config.get_media_type(), &MediaType::serialized_object());
  }
}
