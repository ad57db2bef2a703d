pub mod byte_codec;
pub mod format_validator;
pub mod wav_format;
