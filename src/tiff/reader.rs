//! TIFF file reader implementation
//!
//! Reads the header and IFD chain of a TIFF/BigTIFF file and decodes tag
//! values through a byte order handler picked from the file header.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;
use crate::tiff::validation;

/// Upper bound on IFDs followed before the chain is considered cyclic
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Current file path
    current_file: Option<PathBuf>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            current_file: None,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Byte order of the last file read
    pub fn byte_order(&self) -> TiffResult<ByteOrder> {
        Ok(self.handler()?.order())
    }

    /// Loads a TIFF file from the given path
    pub fn load(&mut self, filepath: &Path) -> TiffResult<TIFF> {
        info!("Loading TIFF file: {}", filepath.display());
        self.current_file = Some(filepath.to_path_buf());

        let file = File::open(filepath)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);

        self.read(&mut reader)
    }

    /// Reads a TIFF file from the given reader
    ///
    /// Detects the byte order, checks for TIFF or BigTIFF and then reads
    /// every IFD in the chain.
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;
        let is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                validation::validate_bigtiff_header(reader, handler)?;
                true
            }
            header::TIFF_VERSION => false,
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };
        debug!("TIFF version {} ({})", version, if is_big_tiff { "BigTIFF" } else { "classic" });

        let first_ifd_offset = if is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };
        self.is_big_tiff = is_big_tiff;

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::NoImage);
        }

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    ///
    /// A broken link after the first IFD ends the chain with a warning;
    /// only the first IFD is needed for pixel access.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            let next_ifd_offset = match self.read_offset(reader) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };
            ifds.push(ifd);

            if next_ifd_offset != 0 && (next_ifd_offset >= file_size || next_ifd_offset < 8) {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads an IFD from the reader, leaving it positioned at the next-IFD link
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD {} at offset {} has {} entries", number, offset, entry_count);

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = self.read_offset(reader)?;
        let value_offset = self.read_offset(reader)?;

        Ok(IFDEntry::new(tag, field_type, count, value_offset))
    }

    /// Reads a count or offset word (4 bytes, or 8 in BigTIFF)
    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u32(reader)? as u64)
        }
    }

    /// Returns the raw bytes of an entry's values, in file byte order
    ///
    /// Inline values are recovered by re-encoding the value/offset word in
    /// the file's byte order and keeping the leading bytes.
    pub fn read_entry_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        let order = self.byte_order()?;
        let len = entry.data_len();

        if entry.is_value_inline(self.is_big_tiff) {
            let packed: Vec<u8> = if self.is_big_tiff {
                order.u64_bytes(entry.value_offset).to_vec()
            } else {
                order.u32_bytes(entry.value_offset as u32).to_vec()
            };
            return Ok(packed[..len].to_vec());
        }

        let file_size = validation::get_file_size(reader)?;
        validation::validate_block_range(entry.tag as usize, entry.value_offset, len as u64, file_size)?;

        let mut buffer = vec![0u8; len];
        reader.seek(SeekFrom::Start(entry.value_offset))?;
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads an integer-typed tag as a vector of u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;
        let bytes = self.read_entry_bytes(reader, entry)?;
        let handler = self.handler()?;
        let mut cursor = Cursor::new(bytes);
        let count = entry.count as usize;

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let value = match entry.field_type {
                field_types::BYTE | field_types::UNDEFINED | field_types::ASCII => {
                    let mut b = [0u8; 1];
                    cursor.read_exact(&mut b)?;
                    b[0] as u64
                }
                field_types::SHORT => handler.read_u16(&mut cursor)? as u64,
                field_types::LONG => handler.read_u32(&mut cursor)? as u64,
                field_types::LONG8 | field_types::IFD8 => handler.read_u64(&mut cursor)?,
                other => return Err(TiffError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Reads the first value of an integer tag, or None when the tag is absent
    pub fn read_scalar(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Option<u64>> {
        if !ifd.has_tag(tag) {
            return Ok(None);
        }
        Ok(self.read_tag_values(reader, ifd, tag)?.first().copied())
    }

    /// Reads a floating-point or integer tag as a vector of f64
    pub fn read_f64_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;

        match entry.field_type {
            field_types::DOUBLE | field_types::FLOAT => {
                let bytes = self.read_entry_bytes(reader, entry)?;
                let handler = self.handler()?;
                let mut cursor = Cursor::new(bytes);
                let mut values = Vec::with_capacity(entry.count as usize);
                for _ in 0..entry.count {
                    let value = if entry.field_type == field_types::DOUBLE {
                        handler.read_f64(&mut cursor)?
                    } else {
                        handler.read_f32(&mut cursor)? as f64
                    };
                    values.push(value);
                }
                Ok(values)
            }
            _ => Ok(self.read_tag_values(reader, ifd, tag)?
                .into_iter()
                .map(|v| v as f64)
                .collect()),
        }
    }

    /// Reads an ASCII tag, trimming trailing NULs and whitespace
    pub fn read_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;
        let mut bytes = self.read_entry_bytes(reader, entry)?;

        while matches!(bytes.last(), Some(0)) {
            bytes.pop();
        }

        String::from_utf8(bytes)
            .map(|s| s.trim().to_string())
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string in tag {}: {}", tag, e)))
    }

    /// Gets the file path if available
    pub fn file_path(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }
}
