pub mod file_stream;
pub mod memory_stream;
pub mod metadata;
pub mod wav_reader;
pub mod wav_writer;
