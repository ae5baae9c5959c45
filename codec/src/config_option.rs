use crate::config::CodecConfig;
use crate::error::ConfigError;
use crate::media_type::MediaType;

#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetMediaType(MediaType),
  SetWriteContentLength(bool),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut CodecConfig) -> Result<(), ConfigError> {
    match self {
      ConfigOption::SetMediaType(media_type) => {
        config.set_media_type(media_type.clone())?;
      }
      ConfigOption::SetWriteContentLength(enabled) => {
        config.set_write_content_length(*enabled);
      }
    }
    Ok(())
  }

  pub fn with_media_type(media_type: MediaType) -> ConfigOption {
    ConfigOption::SetMediaType(media_type)
  }

  pub fn with_write_content_length(enabled: bool) -> ConfigOption {
    ConfigOption::SetWriteContentLength(enabled)
  }
}
