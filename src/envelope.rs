//! Request/response envelope.
//!
//! Frame layout, all lengths big-endian `u32`:
//!
//! ```text
//! total_len | header_len | header | body_len | body
//! ```
//!
//! `total_len` counts every byte after itself.

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

use crate::errors::RpcError;
use crate::wire::{Message, ResponseHeader};

pub const LENGTH_FIELD_SIZE: usize = 4;

/// Smallest valid frame: three length fields and two empty sections.
pub const MIN_FRAME_SIZE: usize = 3 * LENGTH_FIELD_SIZE;

/// Encodes `header` and `body` and frames them together.
pub fn to_frame<H: Message, B: Message>(header: &H, body: &B) -> Result<Bytes, RpcError> {
    let header = header.encode()?;
    let body = body.encode()?;

    let total = 2 * LENGTH_FIELD_SIZE + header.len() + body.len();
    let total_len = u32::try_from(total).map_err(|_| RpcError::MessageTooLarge {
        size: total,
        max: u32::MAX as usize,
    })?;

    let mut writer = BytesMut::with_capacity(LENGTH_FIELD_SIZE + total).writer();
    writer.write_u32::<BigEndian>(total_len)?;
    write_delimited(&mut writer, &header)?;
    write_delimited(&mut writer, &body)?;
    Ok(writer.into_inner().freeze())
}

fn write_delimited<W: Write>(writer: &mut W, section: &[u8]) -> Result<(), RpcError> {
    writer.write_u32::<BigEndian>(section.len() as u32)?;
    writer.write_all(section)?;
    Ok(())
}

/// A frame split into its header and body sections. Both are views into
/// the original buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    header: Bytes,
    body: Bytes,
}

impl Frame {
    pub fn parse(frame: Bytes) -> Result<Self, RpcError> {
        let mut reader = &frame[..];
        let total = read_length(&mut reader, "total")?;
        if total != frame.len() - LENGTH_FIELD_SIZE {
            return Err(RpcError::Decode(format!(
                "frame declares {} bytes but carries {}",
                total,
                frame.len() - LENGTH_FIELD_SIZE
            )));
        }

        let mut offset = LENGTH_FIELD_SIZE;
        let header = read_section(&frame, &mut offset, "header")?;
        let body = read_section(&frame, &mut offset, "body")?;
        if offset != frame.len() {
            return Err(RpcError::Decode(format!(
                "{} trailing bytes after frame body",
                frame.len() - offset
            )));
        }

        Ok(Self { header, body })
    }

    pub fn header<H: Message>(&self) -> Result<H, RpcError> {
        H::decode(&self.header)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

fn read_length(reader: &mut &[u8], section: &str) -> Result<usize, RpcError> {
    reader
        .read_u32::<BigEndian>()
        .map(|len| len as usize)
        .map_err(|_| RpcError::Decode(format!("truncated frame: missing {} length", section)))
}

fn read_section(frame: &Bytes, offset: &mut usize, section: &str) -> Result<Bytes, RpcError> {
    let mut reader = &frame[*offset..];
    let len = read_length(&mut reader, section)?;
    let start = *offset + LENGTH_FIELD_SIZE;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= frame.len())
        .ok_or_else(|| {
            RpcError::Decode(format!(
                "truncated frame: {} declares {} bytes, {} available",
                section,
                len,
                frame.len().saturating_sub(start)
            ))
        })?;
    *offset = end;
    Ok(frame.slice(start..end))
}

/// A parsed response frame as handed to a call's decoder.
#[derive(Debug, Clone)]
pub struct CallResponse {
    header: ResponseHeader,
    message: Bytes,
}

impl CallResponse {
    pub fn new(header: ResponseHeader, message: Bytes) -> Self {
        Self { header, message }
    }

    pub fn parse(frame: Bytes) -> Result<Self, RpcError> {
        let frame = Frame::parse(frame)?;
        let header = frame.header::<ResponseHeader>()?;
        Ok(Self {
            header,
            message: frame.body,
        })
    }

    pub fn header(&self) -> &ResponseHeader {
        &self.header
    }

    /// Service-specific response body, still encoded.
    pub fn pb_message(&self) -> &[u8] {
        &self.message
    }
}

/// Splits a byte stream into whole frames, `total_len` prefix included.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = RpcError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, RpcError> {
        if src.len() < LENGTH_FIELD_SIZE {
            return Ok(None);
        }

        let frame_len = LENGTH_FIELD_SIZE + BigEndian::read_u32(&src[..LENGTH_FIELD_SIZE]) as usize;
        if frame_len > self.max_frame_size {
            return Err(RpcError::MessageTooLarge {
                size: frame_len,
                max: self.max_frame_size,
            });
        }

        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        Ok(Some(src.split_to(frame_len).freeze()))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = RpcError;

    fn encode(&mut self, frame: Bytes, dst: &mut BytesMut) -> Result<(), RpcError> {
        if frame.len() > self.max_frame_size {
            return Err(RpcError::MessageTooLarge {
                size: frame.len(),
                max: self.max_frame_size,
            });
        }
        dst.extend_from_slice(&frame);
        Ok(())
    }
}
