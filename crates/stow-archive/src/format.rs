use std::io::{BufRead, Read};

use crate::error::{Error, Result};

/// Compression wrapped around the tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    None,
    Gzip,
    Zstd,
}

impl Codec {
    /// Guess the codec from the first bytes of a stream.
    pub fn detect(header: &[u8]) -> Option<Self> {
        match header {
            [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(Self::Zstd),
            [0x1F, 0x8B, ..] => Some(Self::Gzip),
            _ if is_tar_header(header) => Some(Self::None),
            _ => None,
        }
    }

    /// Wrap `reader` in the matching decompressor.
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Result<Box<dyn Read + 'a>> {
        match self {
            Self::None => Ok(Box::new(reader)),
            #[cfg(feature = "gzip")]
            Self::Gzip => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader)
                    .map_err(|source| Error::Read { source })?;
                Ok(Box::new(decoder))
            }
            #[allow(unreachable_patterns)]
            other => Err(Error::CodecDisabled(other)),
        }
    }
}

fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 263 && data[257..262] == *b"ustar"
}

/// Peek at a buffered stream and detect its codec without consuming input.
pub fn detect_codec<R: BufRead>(reader: &mut R) -> Result<Codec> {
    let header = reader.fill_buf().map_err(|source| Error::Read { source })?;
    Codec::detect(header).ok_or(Error::UnknownCodec)
}
